//! Recording stand-ins for the engine, engine source, paint target and file.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use zpaceway_core::engine::{Engine, EngineError, FrameSink};
use zpaceway_core::frame::{self, Frame};
use zpaceway_core::input::ButtonState;
use zpaceway_shell::bridge::{EngineFactory, EngineSource};
use zpaceway_shell::display::{DisplayGeometry, PaintTarget};
use zpaceway_shell::error::{AcquireError, ReadError};
use zpaceway_shell::rom_loader::RomFile;

pub const NATIVE: (u32, u32) = (160, 144);
pub const CONTAINER: DisplayGeometry = DisplayGeometry::new(60, 60, 480, 432);

/// Counters shared by every engine a [`MockSource`] creates.
#[derive(Default)]
pub struct Probe {
    pub acquisitions: Cell<usize>,
    pub engines_created: Cell<usize>,
    pub live_sinks: Cell<usize>,
    pub sinks_registered: Cell<usize>,
    pub sound_enabled: Cell<usize>,
    pub running: Cell<usize>,
    /// Input record seen by the most recent frame.
    pub last_frame_input: Cell<Option<ButtonState>>,
    /// ROM bytes handed to `load_game`, in order.
    pub loaded: RefCell<Vec<Vec<u8>>>,
}

/// Engine that emits one frame per `service()` call while running. Every
/// pixel carries the engine's creation index so paints can be attributed.
pub struct MockEngine {
    probe: Rc<Probe>,
    index: u8,
    loaded: bool,
    running: bool,
    input: ButtonState,
    sink: Option<FrameSink>,
    pixels: Vec<u8>,
    fail_next_service: bool,
}

impl MockEngine {
    fn new(probe: Rc<Probe>) -> Self {
        let index = probe.engines_created.get() as u8 + 1;
        probe.engines_created.set(probe.engines_created.get() + 1);
        Self {
            probe,
            index,
            loaded: false,
            running: false,
            input: ButtonState::default(),
            sink: None,
            pixels: vec![index; frame::buffer_len(NATIVE.0, NATIVE.1)],
            fail_next_service: false,
        }
    }

    fn drop_sink(&mut self) {
        if self.sink.take().is_some() {
            self.probe.live_sinks.set(self.probe.live_sinks.get() - 1);
        }
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.drop_sink();
        self.stop();
    }
}

impl Engine for MockEngine {
    fn display_size(&self) -> (u32, u32) {
        NATIVE
    }

    fn load_game(&mut self, rom: &[u8]) -> Result<(), EngineError> {
        self.probe.loaded.borrow_mut().push(rom.to_vec());
        match rom.first() {
            None => Err(EngineError::InvalidRom("empty".to_string())),
            Some(0xFF) => Err(EngineError::Unsupported("0xFF cartridge".to_string())),
            // 0xEE loads but faults on the first frame
            Some(&first) => {
                self.fail_next_service = first == 0xEE;
                self.loaded = true;
                Ok(())
            }
        }
    }

    fn enable_sound(&mut self) {
        self.probe.sound_enabled.set(self.probe.sound_enabled.get() + 1);
    }

    fn on_frame_finished(&mut self, sink: FrameSink) {
        self.drop_sink();
        self.sink = Some(sink);
        self.probe.live_sinks.set(self.probe.live_sinks.get() + 1);
        self.probe
            .sinks_registered
            .set(self.probe.sinks_registered.get() + 1);
    }

    fn clear_frame_sink(&mut self) {
        self.drop_sink();
    }

    fn run(&mut self) {
        if !self.running {
            self.running = true;
            self.probe.running.set(self.probe.running.get() + 1);
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.probe.running.set(self.probe.running.get() - 1);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn input(&mut self) -> &mut ButtonState {
        &mut self.input
    }

    fn service(&mut self, _elapsed: Duration) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        if !self.loaded {
            return Err(EngineError::NotLoaded);
        }
        if self.fail_next_service {
            return Err(EngineError::Fault("illegal opcode".to_string()));
        }
        self.probe.last_frame_input.set(Some(self.input));
        if let Some(sink) = self.sink.as_mut()
            && let Some(frame) = Frame::new(NATIVE.0, NATIVE.1, &self.pixels)
        {
            sink(&frame);
        }
        Ok(())
    }

    fn audio_sample_rate(&self) -> u32 {
        8000
    }

    fn drain_audio(&mut self, out: &mut Vec<i16>) {
        if self.running {
            out.extend_from_slice(&[self.index as i16; 4]);
        }
    }
}

pub struct MockSource {
    pub probe: Rc<Probe>,
    pub fail: bool,
}

impl MockSource {
    pub fn new() -> (Self, Rc<Probe>) {
        let probe = Rc::new(Probe::default());
        (
            Self {
                probe: Rc::clone(&probe),
                fail: false,
            },
            probe,
        )
    }

    pub fn failing() -> (Self, Rc<Probe>) {
        let (mut source, probe) = Self::new();
        source.fail = true;
        (source, probe)
    }
}

impl EngineSource for MockSource {
    fn acquire(&self) -> Result<EngineFactory, AcquireError> {
        self.probe
            .acquisitions
            .set(self.probe.acquisitions.get() + 1);
        if self.fail {
            return Err(AcquireError::Unavailable("module failed to load".to_string()));
        }
        let probe = Rc::clone(&self.probe);
        Ok(Rc::new(move || {
            Box::new(MockEngine::new(Rc::clone(&probe))) as Box<dyn Engine>
        }))
    }
}

/// Paint target that records what reached it.
#[derive(Default)]
pub struct RecordingTarget {
    pub backing: (u32, u32),
    pub presentation: Option<DisplayGeometry>,
    pub smoothing: Option<bool>,
    /// First byte of every painted frame (the painting engine's index).
    pub painted: Vec<u8>,
}

impl PaintTarget for RecordingTarget {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_presentation(&mut self, geometry: DisplayGeometry) {
        self.presentation = Some(geometry);
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = Some(enabled);
    }

    fn put_frame(&mut self, frame: &Frame<'_>) {
        self.painted.push(frame.pixels()[0]);
    }
}

/// In-memory file, optionally failing like an aborted read.
pub struct MemoryFile {
    pub name: String,
    pub data: Option<Vec<u8>>,
}

impl MemoryFile {
    pub fn rom(first_byte: u8) -> Self {
        let mut data = vec![0u8; 0x200];
        data[0] = first_byte;
        Self {
            name: format!("rom-{first_byte:02x}.gb"),
            data: Some(data),
        }
    }

    pub fn aborted() -> Self {
        Self {
            name: "aborted.gb".to_string(),
            data: None,
        }
    }
}

impl RomFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&mut self) -> Result<Vec<u8>, ReadError> {
        self.data.clone().ok_or(ReadError::Aborted)
    }
}
