use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use tracing::{debug, warn};

/// Number of samples over which to fade in/out (~5.8 ms at 44.1 kHz).
const FADE_SAMPLES: u32 = 256;

/// Samples the device must hold before playback is resumed.
const PREROLL_SAMPLES: usize = 1024;

/// Shared audio ring buffer. The event loop pushes samples in;
/// the SDL audio callback thread pops them out.
type AudioRing = Arc<Mutex<VecDeque<i16>>>;

/// Volume and fade ramps applied to each outgoing sample.
struct Envelope {
    volume: f32,
    fade_in_pos: u32,
    fade_out_pos: u32,
}

impl Envelope {
    fn new(volume: f32) -> Self {
        Self {
            volume,
            fade_in_pos: 0,
            fade_out_pos: 0,
        }
    }

    fn apply(&mut self, raw: i16, fading_out: bool) -> i16 {
        let gain = if self.fade_in_pos < FADE_SAMPLES {
            // Ramp up from silence at startup
            let gain = self.fade_in_pos as f32 / FADE_SAMPLES as f32;
            self.fade_in_pos += 1;
            gain
        } else if fading_out {
            // Ramp down to silence at shutdown
            if self.fade_out_pos < FADE_SAMPLES {
                let gain = 1.0 - (self.fade_out_pos as f32 / FADE_SAMPLES as f32);
                self.fade_out_pos += 1;
                gain
            } else {
                0.0
            }
        } else {
            1.0
        };
        (raw as f32 * gain * self.volume) as i16
    }
}

pub(crate) struct AudioPlayer {
    buffer: AudioRing,
    envelope: Envelope,
    fading_out: Arc<AtomicBool>,
}

impl AudioCallback for AudioPlayer {
    type Channel = i16;
    fn callback(&mut self, out: &mut [i16]) {
        let Ok(mut buf) = self.buffer.lock() else {
            out.fill(0);
            return;
        };
        let fading_out = self.fading_out.load(Ordering::Relaxed);
        for sample in out.iter_mut() {
            let raw = buf.pop_front().unwrap_or(0);
            *sample = self.envelope.apply(raw, fading_out);
        }
    }
}

/// An open playback device for one sample rate.
struct Stream {
    device: AudioDevice<AudioPlayer>,
    ring: AudioRing,
    fade_out: Arc<AtomicBool>,
    sample_rate: u32,
    /// Cap on buffered samples (a quarter second); older audio is dropped.
    capacity: usize,
}

/// Host audio output following whichever session is active.
pub struct AudioOutput {
    subsystem: sdl2::AudioSubsystem,
    volume: f32,
    stream: Option<Stream>,
}

impl AudioOutput {
    pub fn new(subsystem: sdl2::AudioSubsystem, volume: f32) -> Self {
        Self {
            subsystem,
            volume,
            stream: None,
        }
    }

    /// Make sure a device is open at `sample_rate`. A rate of 0 (engine has
    /// no audio) closes the device.
    pub fn sync(&mut self, sample_rate: u32) {
        if self.stream.as_ref().map(|s| s.sample_rate) == Some(sample_rate) {
            return;
        }
        self.close();
        if sample_rate == 0 {
            return;
        }

        let ring: AudioRing = Arc::new(Mutex::new(VecDeque::with_capacity(4096)));
        let fade_out = Arc::new(AtomicBool::new(false));

        let desired_spec = AudioSpecDesired {
            freq: Some(sample_rate as i32),
            channels: Some(1),
            samples: Some(512), // ~11.6 ms at 44100 Hz
        };

        let volume = self.volume;
        let opened = self
            .subsystem
            .open_playback(None, &desired_spec, |_spec| AudioPlayer {
                buffer: Arc::clone(&ring),
                envelope: Envelope::new(volume),
                fading_out: Arc::clone(&fade_out),
            });

        match opened {
            Ok(device) => {
                debug!(sample_rate, "audio device opened");
                // Device starts paused; `queue` resumes it once enough
                // samples are buffered.
                self.stream = Some(Stream {
                    device,
                    ring,
                    fade_out,
                    sample_rate,
                    capacity: (sample_rate as usize / 4).max(2 * PREROLL_SAMPLES),
                });
            }
            Err(e) => warn!(error = %e, sample_rate, "could not open audio device"),
        }
    }

    /// Append samples to the playback ring.
    pub fn queue(&mut self, samples: &[i16]) {
        let Some(stream) = &self.stream else {
            return;
        };
        let buffered = {
            let Ok(mut ring) = stream.ring.lock() else {
                return;
            };
            ring.extend(samples.iter().copied());
            let excess = ring.len().saturating_sub(stream.capacity);
            ring.drain(..excess);
            ring.len()
        };
        if buffered >= PREROLL_SAMPLES
            && stream.device.status() != sdl2::audio::AudioStatus::Playing
        {
            stream.device.resume();
        }
    }

    /// Fade out and release the device.
    pub fn close(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        stream.fade_out.store(true, Ordering::Relaxed);
        if stream.device.status() == sdl2::audio::AudioStatus::Playing {
            std::thread::sleep(fade_out_duration());
        }
        stream.device.pause();
        debug!(sample_rate = stream.sample_rate, "audio device closed");
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.close();
    }
}

/// Duration to sleep after signalling fade-out, allowing the callback
/// to ramp down before the device is paused.
fn fade_out_duration() -> Duration {
    // FADE_SAMPLES at 44100 Hz is ~5.8 ms; round up to 10 ms.
    Duration::from_millis(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_in_from_silence() {
        let mut env = Envelope::new(1.0);
        assert_eq!(env.apply(1000, false), 0);
        for _ in 1..FADE_SAMPLES {
            env.apply(1000, false);
        }
        assert_eq!(env.apply(1000, false), 1000);
    }

    #[test]
    fn fades_out_to_silence() {
        let mut env = Envelope::new(1.0);
        for _ in 0..FADE_SAMPLES {
            env.apply(0, false);
        }
        assert_eq!(env.apply(1000, true), 1000);
        for _ in 1..FADE_SAMPLES {
            env.apply(1000, true);
        }
        assert_eq!(env.apply(1000, true), 0);
    }

    #[test]
    fn volume_scales_samples() {
        let mut env = Envelope::new(0.5);
        for _ in 0..FADE_SAMPLES {
            env.apply(0, false);
        }
        assert_eq!(env.apply(1000, false), 500);
    }
}
