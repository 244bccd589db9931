//! Application controller: file selection → ROM → session → display/input.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use tracing::{error, info};
use zpaceway_core::frame::Frame;
use zpaceway_core::input::Button;

use crate::bridge::{EngineBridge, EngineSource, Session, SessionId};
use crate::display::{DisplayGeometry, DisplaySurface, PaintTarget};
use crate::error::ShellError;
use crate::input::{Gesture, InputBridge};
use crate::rom_loader::{RomFile, RomLoader};

/// Owns the single active session and wires it to the display and input.
pub struct AppController<S, T> {
    loader: RomLoader,
    bridge: EngineBridge<S>,
    display: Rc<RefCell<DisplaySurface<T>>>,
    input: InputBridge,
    session: Option<Session>,
    smoothing: bool,
}

impl<S, T> AppController<S, T>
where
    S: EngineSource,
    T: PaintTarget + 'static,
{
    pub fn new(loader: RomLoader, source: S, target: T) -> Self {
        Self {
            loader,
            bridge: EngineBridge::new(source),
            display: Rc::new(RefCell::new(DisplaySurface::new(target))),
            input: InputBridge::new(),
            session: None,
            smoothing: false,
        }
    }

    /// Allow filtered scaling on sessions started from now on.
    pub fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    /// Read `file`, start a session on it and make it the active one.
    ///
    /// `container` is the screen box to present in, captured once here. On
    /// any failure the current session (if any) stays active.
    pub fn load(
        &mut self,
        file: &mut dyn RomFile,
        container: DisplayGeometry,
    ) -> Result<SessionId, ShellError> {
        let rom = self.loader.load(file)?;
        let mut session = self.bridge.start(rom)?;

        // The old session must stop painting before the new one is wired up.
        self.teardown();

        session.buttons().clear();
        self.display
            .borrow_mut()
            .configure(session.native_size(), container, self.smoothing);

        let display = Rc::clone(&self.display);
        session.on_frame(Box::new(move |frame: &Frame<'_>| {
            display.borrow_mut().blit(frame);
        }));

        let id = session.id();
        self.session = Some(session);
        Ok(id)
    }

    /// Stop and drop the active session, if any.
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }

    /// Forward a gesture on `button`. No-op without a session.
    pub fn gesture(&mut self, button: Button, gesture: Gesture) -> bool {
        let state = self.session.as_mut().map(Session::buttons);
        self.input.apply(state, button, gesture)
    }

    /// Give the active session's engine `elapsed` time to run.
    ///
    /// A runtime emulation error ends the session and is returned.
    pub fn service(&mut self, elapsed: Duration) -> Result<(), ShellError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if let Err(e) = session.service(elapsed) {
            error!(session = %session.id(), error = %e, "emulation error, ending session");
            self.teardown();
            return Err(e.into());
        }
        Ok(())
    }

    /// Move the active session's pending audio into `out`.
    pub fn drain_audio(&mut self, out: &mut Vec<i16>) {
        if let Some(session) = self.session.as_mut() {
            session.drain_audio(out);
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn display(&self) -> Ref<'_, DisplaySurface<T>> {
        self.display.borrow()
    }

    pub fn display_mut(&self) -> RefMut<'_, DisplaySurface<T>> {
        self.display.borrow_mut()
    }

    /// Number of frame sinks currently holding the display.
    pub fn frame_sinks(&self) -> usize {
        Rc::strong_count(&self.display) - 1
    }

    pub fn input(&self) -> &InputBridge {
        &self.input
    }

    pub fn engine_acquired(&self) -> bool {
        self.bridge.is_acquired()
    }
}

impl<S, T> Drop for AppController<S, T> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            info!(session = %session.id(), "shutting down");
            session.stop();
        }
    }
}

/// Message for showing a failure to the user.
pub fn user_message(error: &ShellError) -> String {
    match error {
        ShellError::Read(e) => format!("The file could not be read ({e}). Please choose it again."),
        ShellError::Acquire(e) => format!("The emulation engine is unavailable: {e}"),
        ShellError::Emulation(e) => format!("The game could not run: {e}"),
    }
}
