//! Frame-delivery and input-bridging layer between a handheld emulation
//! engine and its host window.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod input;
pub mod layout;
pub mod press;
pub mod rom_loader;

pub mod prelude {
    pub use crate::bridge::{EngineBridge, EngineSource, RegistrySource, Session, SessionId};
    pub use crate::config::Config;
    pub use crate::controller::AppController;
    pub use crate::display::{DisplayGeometry, DisplaySurface, PaintTarget};
    pub use crate::error::{AcquireError, ConfigError, ReadError, ShellError};
    pub use crate::input::{Gesture, InputBridge};
    pub use crate::layout::{Control, HandheldLayout};
    pub use crate::press::HeldControls;
    pub use crate::rom_loader::{LocalFile, RomFile, RomLoader};
}
