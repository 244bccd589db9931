//! Engine acquisition and session lifecycle.
//!
//! The engine implementation is looked up on first use and the resulting
//! factory is memoized, so later sessions skip the lookup. Each
//! [`Session`] owns one running engine instance.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};
use zpaceway_core::engine::{Engine, EngineError, FrameSink};
use zpaceway_core::input::ButtonState;
use zpaceway_core::rom::RomImage;
use zpaceway_engines::registry;

use crate::error::{AcquireError, ShellError};

/// Builds fresh, unloaded engine instances.
pub type EngineFactory = Rc<dyn Fn() -> Box<dyn Engine>>;

/// Somewhere an engine implementation can be obtained from.
pub trait EngineSource {
    fn acquire(&self) -> Result<EngineFactory, AcquireError>;
}

/// Looks the engine up by name in the [`registry`].
pub struct RegistrySource {
    name: String,
}

impl RegistrySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EngineSource for RegistrySource {
    fn acquire(&self) -> Result<EngineFactory, AcquireError> {
        let entry = registry::find(&self.name).ok_or_else(|| {
            let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
            AcquireError::NotRegistered {
                name: self.name.clone(),
                available: names.join(", "),
            }
        })?;
        let create = entry.create;
        Ok(Rc::new(move || create()))
    }
}

/// Identifies one session for logging and comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct EngineBridge<S> {
    source: S,
    factory: Option<EngineFactory>,
    next_id: u64,
}

impl<S: EngineSource> EngineBridge<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            factory: None,
            next_id: 1,
        }
    }

    /// Whether the engine implementation has been acquired yet.
    pub fn is_acquired(&self) -> bool {
        self.factory.is_some()
    }

    /// Acquire the engine implementation once; later calls reuse it.
    /// A failed acquisition is not memoized.
    pub fn factory(&mut self) -> Result<EngineFactory, AcquireError> {
        if let Some(factory) = &self.factory {
            return Ok(Rc::clone(factory));
        }
        let factory = self.source.acquire()?;
        info!("engine acquired");
        self.factory = Some(Rc::clone(&factory));
        Ok(factory)
    }

    /// Build a new engine, load `rom`, enable sound and begin execution.
    ///
    /// Emulation errors from loading propagate unchanged. The caller decides
    /// what happens to any previous session.
    pub fn start(&mut self, rom: RomImage) -> Result<Session, ShellError> {
        let factory = self.factory()?;
        let mut engine = factory();
        engine.load_game(rom.bytes())?;
        engine.enable_sound();
        engine.run();

        let id = SessionId(self.next_id);
        self.next_id += 1;
        info!(session = %id, rom = rom.name(), "session started");

        Ok(Session {
            id,
            engine,
            rom,
            has_sink: false,
        })
    }
}

/// One continuous run of an engine against one ROM image.
///
/// Stopping (explicitly or by drop) halts the engine and detaches its frame
/// sink, so a superseded session never paints again.
pub struct Session {
    id: SessionId,
    engine: Box<dyn Engine>,
    rom: RomImage,
    has_sink: bool,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    /// Engine-native output size.
    pub fn native_size(&self) -> (u32, u32) {
        self.engine.display_size()
    }

    /// Register the frame sink. At most one is active; a second call replaces
    /// the first.
    pub fn on_frame(&mut self, sink: FrameSink) {
        if self.has_sink {
            debug!(session = %self.id, "replacing frame sink");
        }
        self.engine.on_frame_finished(sink);
        self.has_sink = true;
    }

    pub fn has_frame_sink(&self) -> bool {
        self.has_sink
    }

    /// The engine's input record.
    pub fn buttons(&mut self) -> &mut ButtonState {
        self.engine.input()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Hand wall-clock time to the engine's scheduler.
    pub fn service(&mut self, elapsed: Duration) -> Result<(), EngineError> {
        self.engine.service(elapsed)
    }

    pub fn audio_sample_rate(&self) -> u32 {
        self.engine.audio_sample_rate()
    }

    pub fn drain_audio(&mut self, out: &mut Vec<i16>) {
        self.engine.drain_audio(out);
    }

    /// Detach the frame sink and stop the engine. Idempotent.
    pub fn stop(&mut self) {
        if self.has_sink {
            self.engine.clear_frame_sink();
            self.has_sink = false;
        }
        if self.engine.is_running() {
            self.engine.stop();
            info!(session = %self.id, "session stopped");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("rom", &self.rom)
            .field("has_sink", &self.has_sink)
            .finish_non_exhaustive()
    }
}
