//! Diagnostic engine that honours the full [`Engine`] contract without
//! emulating a CPU.
//!
//! It checks the cartridge header the same way the handheld's boot ROM does,
//! then draws a scrolling four-shade test card with a cursor block driven by
//! the D-pad. A and B sound a square-wave tone once sound is enabled. Useful
//! for checking the shell's frame path, input latency and audio routing.

use std::time::Duration;

use tracing::{debug, info};
use zpaceway_core::engine::{Engine, EngineError, FrameSink};
use zpaceway_core::frame::{self, Frame};
use zpaceway_core::input::ButtonState;

use crate::registry::EngineEntry;

pub const DISPLAY_WIDTH: u32 = 160;
pub const DISPLAY_HEIGHT: u32 = 144;

/// 70224 dots per frame at 4.194304 MHz (~59.73 Hz).
pub const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706);

/// Upper bound on frames produced by one `service()` call. Time beyond this
/// is discarded so a stalled host does not trigger a catch-up burst.
pub const MAX_CATCH_UP_FRAMES: u32 = 4;

pub const SAMPLE_RATE: u32 = 44_100;

/// Samples kept when the host is not draining audio (~185 ms).
const AUDIO_BACKLOG: usize = 8192;
const TONE_AMPLITUDE: i16 = 4000;

// ---------------------------------------------------------------------------
// Cartridge header layout
// ---------------------------------------------------------------------------

pub const HEADER_END: usize = 0x150;
const TITLE: std::ops::Range<usize> = 0x134..0x144;
const CGB_FLAG: usize = 0x143;
const HEADER_CHECKSUM: usize = 0x14D;

/// CGB flag value for cartridges that refuse to run on the original model.
const CGB_ONLY: u8 = 0xC0;

/// DMG shades, lightest first.
const PALETTE: [[u8; 3]; 4] = [
    [0xE0, 0xF8, 0xD0],
    [0x88, 0xC0, 0x70],
    [0x34, 0x68, 0x56],
    [0x08, 0x18, 0x20],
];

const CURSOR_SIZE: u32 = 16;

/// Header checksum over 0x134..=0x14C, as verified by the boot ROM.
/// `None` if the image is too short to hold the header.
pub fn header_checksum(rom: &[u8]) -> Option<u8> {
    let header = rom.get(0x134..=0x14C)?;
    Some(
        header
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1)),
    )
}

pub struct TestCard {
    title: Option<String>,
    running: bool,
    sound: bool,
    input: ButtonState,
    sink: Option<FrameSink>,
    framebuffer: Vec<u8>,
    frame_count: u64,
    accumulated: Duration,
    cursor: (u32, u32),
    scroll: u32,
    tone_phase: u32,
    audio: Vec<i16>,
}

impl TestCard {
    pub fn new() -> Self {
        Self {
            title: None,
            running: false,
            sound: false,
            input: ButtonState::default(),
            sink: None,
            framebuffer: vec![0; frame::buffer_len(DISPLAY_WIDTH, DISPLAY_HEIGHT)],
            frame_count: 0,
            accumulated: Duration::ZERO,
            cursor: (
                (DISPLAY_WIDTH - CURSOR_SIZE) / 2,
                (DISPLAY_HEIGHT - CURSOR_SIZE) / 2,
            ),
            scroll: 0,
            tone_phase: 0,
            audio: Vec::new(),
        }
    }

    /// Cartridge title from the loaded header, if a game is loaded.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Frames produced since the game was loaded.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Top-left corner of the cursor block.
    pub fn cursor(&self) -> (u32, u32) {
        self.cursor
    }

    fn step_frame(&mut self) {
        self.update_cursor();
        self.render();
        if self.sound {
            self.synthesize();
        }
        self.frame_count += 1;

        if let Some(sink) = self.sink.as_mut()
            && let Some(frame) = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, &self.framebuffer)
        {
            sink(&frame);
        }
    }

    fn update_cursor(&mut self) {
        let (mut x, mut y) = self.cursor;
        if self.input.left {
            x = x.saturating_sub(1);
        }
        if self.input.right {
            x = (x + 1).min(DISPLAY_WIDTH - CURSOR_SIZE);
        }
        if self.input.up {
            y = y.saturating_sub(1);
        }
        if self.input.down {
            y = (y + 1).min(DISPLAY_HEIGHT - CURSOR_SIZE);
        }
        self.cursor = (x, y);

        // START freezes the bars
        if !self.input.start {
            self.scroll = (self.scroll + 1) % DISPLAY_WIDTH;
        }
    }

    fn render(&mut self) {
        let invert = self.input.select;
        let cursor_shade = if self.input.a {
            3
        } else if self.input.b {
            0
        } else {
            2
        };
        let (cx, cy) = self.cursor;
        let bar_width = DISPLAY_WIDTH / 4;

        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                let in_cursor =
                    (cx..cx + CURSOR_SIZE).contains(&x) && (cy..cy + CURSOR_SIZE).contains(&y);
                let mut shade = if in_cursor {
                    cursor_shade
                } else {
                    (((x + self.scroll) % DISPLAY_WIDTH) / bar_width) as usize
                };
                if invert {
                    shade = 3 - shade;
                }
                let offset = (y * DISPLAY_WIDTH + x) as usize * frame::BYTES_PER_PIXEL;
                self.framebuffer[offset..offset + 3].copy_from_slice(&PALETTE[shade]);
            }
        }
    }

    fn synthesize(&mut self) {
        let frequency = if self.input.a {
            440
        } else if self.input.b {
            660
        } else {
            0
        };
        let samples = (SAMPLE_RATE as u128 * FRAME_DURATION.as_nanos() / 1_000_000_000) as usize;

        for _ in 0..samples {
            let sample = if frequency == 0 {
                0
            } else {
                let half_period = SAMPLE_RATE / (frequency * 2);
                if (self.tone_phase / half_period) % 2 == 0 {
                    TONE_AMPLITUDE
                } else {
                    -TONE_AMPLITUDE
                }
            };
            self.tone_phase = self.tone_phase.wrapping_add(1);
            self.audio.push(sample);
        }

        if self.audio.len() > AUDIO_BACKLOG {
            let excess = self.audio.len() - AUDIO_BACKLOG;
            self.audio.drain(..excess);
        }
    }
}

impl Default for TestCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for TestCard {
    fn display_size(&self) -> (u32, u32) {
        (DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    fn load_game(&mut self, rom: &[u8]) -> Result<(), EngineError> {
        let too_small = || {
            EngineError::InvalidRom(format!(
                "{} bytes is too small for a cartridge header",
                rom.len()
            ))
        };
        if rom.len() < HEADER_END {
            return Err(too_small());
        }

        let expected = rom[HEADER_CHECKSUM];
        let actual = header_checksum(rom).ok_or_else(too_small)?;
        if expected != actual {
            return Err(EngineError::InvalidRom(format!(
                "header checksum expected 0x{expected:02X}, got 0x{actual:02X}"
            )));
        }

        if rom[CGB_FLAG] == CGB_ONLY {
            return Err(EngineError::Unsupported(
                "cartridge requires colour hardware".to_string(),
            ));
        }

        let title: String = rom[TITLE]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect();
        info!(title = %title, size = rom.len(), "cartridge loaded");

        self.title = Some(title);
        self.frame_count = 0;
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    fn enable_sound(&mut self) {
        self.sound = true;
    }

    fn on_frame_finished(&mut self, sink: FrameSink) {
        self.sink = Some(sink);
    }

    fn clear_frame_sink(&mut self) {
        self.sink = None;
    }

    fn run(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        if self.running {
            debug!(frames = self.frame_count, "test card stopped");
        }
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn input(&mut self) -> &mut ButtonState {
        &mut self.input
    }

    fn service(&mut self, elapsed: Duration) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        if self.title.is_none() {
            return Err(EngineError::NotLoaded);
        }

        self.accumulated += elapsed;
        let mut frames = 0;
        while self.accumulated >= FRAME_DURATION && frames < MAX_CATCH_UP_FRAMES {
            self.accumulated -= FRAME_DURATION;
            self.step_frame();
            frames += 1;
        }
        if self.accumulated >= FRAME_DURATION {
            self.accumulated = Duration::ZERO;
        }
        Ok(())
    }

    fn audio_sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn drain_audio(&mut self, out: &mut Vec<i16>) {
        out.append(&mut self.audio);
    }
}

fn create_engine() -> Box<dyn Engine> {
    Box::new(TestCard::new())
}

inventory::submit! {
    EngineEntry::new(
        "testcard",
        "Diagnostic test card: header check, D-pad cursor, A/B tones",
        create_engine,
    )
}
