use std::path::{Path, PathBuf};
use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::messagebox::{MessageBoxFlag, show_simple_message_box};
use sdl2::mouse::MouseButton;
use tracing::{debug, error, info, warn};
use zpaceway_core::input::ButtonState;
use zpaceway_shell::bridge::RegistrySource;
use zpaceway_shell::config::Config;
use zpaceway_shell::controller::{AppController, user_message};
use zpaceway_shell::error::ShellError;
use zpaceway_shell::input::{Edge, Gesture};
use zpaceway_shell::layout::{Control, HandheldLayout};
use zpaceway_shell::press::HeldControls;
use zpaceway_shell::rom_loader::{LocalFile, RomFile, RomLoader};

use crate::audio::AudioOutput;
use crate::input::KeyMap;
use crate::video::{ScreenBuffer, Video};

const TITLE: &str = "Zpaceway";

/// `which` of mouse events SDL synthesizes from touches; those arrive
/// again as finger events.
const TOUCH_MOUSE_ID: u32 = u32::MAX;

type Controller = AppController<RegistrySource, ScreenBuffer>;

/// What is holding a control down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Source {
    Key(Scancode),
    Mouse(MouseButton),
    Finger(i64),
}

impl Source {
    fn begin(self) -> Gesture {
        match self {
            Source::Key(_) => Gesture::KeyDown,
            Source::Mouse(_) => Gesture::PointerDown,
            Source::Finger(_) => Gesture::TouchStart,
        }
    }

    fn end(self) -> Gesture {
        match self {
            Source::Key(_) => Gesture::KeyUp,
            Source::Mouse(_) => Gesture::PointerUp,
            Source::Finger(_) => Gesture::TouchEnd,
        }
    }
}

/// Window, controller and per-source press tracking for one run.
struct Shell {
    video: Video,
    layout: HandheldLayout,
    controller: Controller,
    held: HeldControls<Source>,
}

impl Shell {
    /// Press or release `control`. Returns true when LOAD was released.
    fn gesture(&mut self, control: Control, gesture: Gesture) -> bool {
        match control {
            Control::Button(button) => {
                self.controller.gesture(button, gesture);
                false
            }
            Control::Load => gesture.edge() == Edge::End,
        }
    }

    fn press(&mut self, source: Source, control: Control) {
        if let Some(previous) = self.held.begin(source, control) {
            self.gesture(previous, source.end());
        }
        self.gesture(control, source.begin());
    }

    /// End whatever `source` pressed. Returns true when that was LOAD.
    fn release(&mut self, source: Source) -> bool {
        match self.held.end(source) {
            Some(control) => self.gesture(control, source.end()),
            None => false,
        }
    }

    /// Release events are lost once the window is unfocused.
    fn release_all(&mut self) {
        for (source, control) in self.held.end_all() {
            if let Control::Button(button) = control {
                self.controller.gesture(button, source.end());
            }
        }
    }

    fn load_path(&mut self, path: &Path) {
        let mut file = LocalFile::new(path);
        match self.controller.load(&mut file, self.layout.screen()) {
            Ok(id) => {
                info!(session = %id, path = %path.display(), "ROM loaded");
                self.video.set_title(&format!("{TITLE} - {}", file.name()));
            }
            Err(e) => self.report(&e),
        }
    }

    fn pick_and_load(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Load ROM")
            .add_filter("Game Boy ROM", &["gb", "zip"])
            .add_filter("All files", &["*"])
            .pick_file();
        match picked {
            Some(path) => self.load_path(&path),
            None => debug!("file selection cancelled"),
        }
    }

    fn report(&mut self, e: &ShellError) {
        error!(error = %e, "session failed");
        if self.controller.session().is_none() {
            self.video.set_title(TITLE);
        }
        if let Err(err) = show_simple_message_box(
            MessageBoxFlag::ERROR,
            TITLE,
            &user_message(e),
            self.video.window(),
        ) {
            warn!(error = %err, "could not show message box");
        }
    }

    fn held_buttons(&mut self) -> ButtonState {
        self.controller
            .session_mut()
            .map(|s| *s.buttons())
            .unwrap_or_default()
    }
}

pub fn run(config: &Config, initial_rom: Option<PathBuf>, mute: bool) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let sdl_video = sdl_context.video()?;

    let (width, height) = HandheldLayout::window_size(config.video.scale);
    let video = Video::new(&sdl_video, TITLE, width, height)?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut audio = if mute || !config.audio.enabled {
        None
    } else {
        match sdl_context.audio() {
            Ok(subsystem) => Some(AudioOutput::new(subsystem, config.audio.volume)),
            Err(e) => {
                warn!(error = %e, "audio unavailable, continuing without sound");
                None
            }
        }
    };

    let key_map = KeyMap::from_config(&config.input);

    let mut controller = AppController::new(
        RomLoader::new(config.rom.extract_zip),
        RegistrySource::new(config.engine.name.clone()),
        ScreenBuffer::new(),
    );
    controller.set_smoothing(config.video.smoothing);

    let mut shell = Shell {
        video,
        layout: HandheldLayout::new(width, height),
        controller,
        held: HeldControls::new(),
    };

    if let Some(path) = initial_rom {
        shell.load_path(&path);
    }

    let mut samples = Vec::new();
    let mut last = Instant::now();

    'main: loop {
        let mut open_picker = false;
        let mut dropped = None;

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button) = key_map.get(sc) {
                        shell.press(Source::Key(sc), Control::Button(button));
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    shell.release(Source::Key(sc));
                }

                Event::MouseButtonDown {
                    which,
                    mouse_btn,
                    x,
                    y,
                    ..
                } if which != TOUCH_MOUSE_ID => {
                    if let Some(control) = shell.layout.hit_test(x, y) {
                        shell.press(Source::Mouse(mouse_btn), control);
                    }
                }

                Event::MouseButtonUp {
                    which, mouse_btn, ..
                } if which != TOUCH_MOUSE_ID => {
                    open_picker |= shell.release(Source::Mouse(mouse_btn));
                }

                Event::FingerDown {
                    finger_id, x, y, ..
                } => {
                    if let Some(control) = shell.layout.hit_test_normalized(x, y) {
                        shell.press(Source::Finger(finger_id), control);
                    }
                }

                Event::FingerUp { finger_id, .. } => {
                    open_picker |= shell.release(Source::Finger(finger_id));
                }

                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => shell.release_all(),

                Event::DropFile { filename, .. } => dropped = Some(PathBuf::from(filename)),

                _ => {}
            }
        }

        if open_picker || dropped.is_some() {
            match dropped {
                Some(path) => shell.load_path(&path),
                None => shell.pick_and_load(),
            }
            // Time spent in the dialog is not emulated.
            last = Instant::now();
        }

        let now = Instant::now();
        if let Err(e) = shell.controller.service(now - last) {
            shell.report(&e);
        }
        last = now;

        if let Some(audio) = audio.as_mut() {
            let rate = shell
                .controller
                .session()
                .map_or(0, |s| s.audio_sample_rate());
            audio.sync(rate);
            samples.clear();
            shell.controller.drain_audio(&mut samples);
            audio.queue(&samples);
        }

        let held = shell.held_buttons();
        let live = shell.controller.session().is_some();
        let display = shell.controller.display();
        let screen = live.then(|| display.target());
        shell.video.present(&shell.layout, screen, held)?;
        drop(display);

        // Frame pacing comes from VSync (set in Video::new via present_vsync)
    }

    Ok(())
}
