pub mod engine;
pub mod frame;
pub mod input;
pub mod rom;

pub mod prelude {
    pub use crate::engine::{Engine, EngineError, FrameSink};
    pub use crate::frame::Frame;
    pub use crate::input::{Button, ButtonState};
    pub use crate::rom::RomImage;
}
