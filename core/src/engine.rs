use std::time::Duration;

use thiserror::Error;

use crate::frame::Frame;
use crate::input::ButtonState;

/// Callback invoked by an engine once per finished frame.
///
/// The frame borrows the engine's internal pixel store and is only valid for
/// the duration of the call.
pub type FrameSink = Box<dyn FnMut(&Frame<'_>)>;

/// Errors raised by an engine while loading or running a game.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The ROM image could not be understood (truncated, corrupt header, ...).
    #[error("invalid ROM image: {0}")]
    InvalidRom(String),

    /// The ROM uses a cartridge type or feature the engine does not support.
    #[error("unsupported ROM: {0}")]
    Unsupported(String),

    /// `run()` or `service()` was called before a game was loaded.
    #[error("no game loaded")]
    NotLoaded,

    /// Emulation hit an unrecoverable state.
    #[error("emulation fault: {0}")]
    Fault(String),
}

/// Handheld emulation engine consumed by the shell.
///
/// The shell only ever talks to an engine through this trait. Everything the
/// engine does between `run()` and `stop()` (CPU, video, audio, timing) is
/// opaque: the host hands over wall-clock time through [`service`](Self::service)
/// and the engine decides how many frames that is worth.
pub trait Engine {
    /// Native display resolution as (width, height) in pixels.
    fn display_size(&self) -> (u32, u32);

    /// Load a raw ROM image. Validation is entirely the engine's concern.
    fn load_game(&mut self, rom: &[u8]) -> Result<(), EngineError>;

    /// Turn on audio sample generation.
    fn enable_sound(&mut self);

    /// Register the frame sink, replacing any previously registered one.
    fn on_frame_finished(&mut self, sink: FrameSink);

    /// Detach the frame sink. Frames produced afterwards go nowhere.
    fn clear_frame_sink(&mut self);

    /// Begin continuous execution.
    fn run(&mut self);

    /// Stop continuous execution. Calling this on a stopped engine is a no-op.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Mutable input record, read by the engine at the start of every frame.
    fn input(&mut self) -> &mut ButtonState;

    /// Give the engine's scheduler `elapsed` wall-clock time to work with.
    ///
    /// Invokes the frame sink once for every frame finished during the call.
    /// A stopped engine ignores the call.
    fn service(&mut self, elapsed: Duration) -> Result<(), EngineError>;

    /// Output sample rate in Hz, or 0 if the engine produces no audio.
    fn audio_sample_rate(&self) -> u32 {
        0
    }

    /// Move all buffered mono samples into `out`.
    fn drain_audio(&mut self, _out: &mut Vec<i16>) {}
}
