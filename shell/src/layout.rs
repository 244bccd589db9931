//! Handheld face layout: where the screen and each control sit in the window.
//!
//! Positions are authored in a fixed design space of
//! [`DESIGN_WIDTH`]×[`DESIGN_HEIGHT`] units and scaled uniformly (centered) to
//! whatever window size the host has.

use zpaceway_core::input::Button;

use crate::display::DisplayGeometry;

pub const DESIGN_WIDTH: u32 = 200;
pub const DESIGN_HEIGHT: u32 = 320;

/// Something on the handheld face that reacts to presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Button(Button),
    /// Opens the file picker.
    Load,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::Button(Button::A) => "A",
            Control::Button(Button::B) => "B",
            Control::Button(Button::Select) => "SELECT",
            Control::Button(Button::Start) => "START",
            Control::Button(_) => "",
            Control::Load => "LOAD",
        }
    }
}

/// Design-space boxes: (x, y, w, h).
const SCREEN: (i32, i32, u32, u32) = (20, 20, 160, 144);
const LOGO: (i32, i32, u32, u32) = (20, 170, 160, 10);
const CONTROLS: [(Control, (i32, i32, u32, u32)); 9] = [
    (Control::Button(Button::Left), (25, 211, 18, 18)),
    (Control::Button(Button::Right), (61, 211, 18, 18)),
    (Control::Button(Button::Up), (43, 193, 18, 18)),
    (Control::Button(Button::Down), (43, 229, 18, 18)),
    (Control::Button(Button::B), (116, 214, 26, 26)),
    (Control::Button(Button::A), (150, 200, 26, 26)),
    (Control::Button(Button::Select), (36, 278, 36, 12)),
    (Control::Load, (82, 278, 36, 12)),
    (Control::Button(Button::Start), (128, 278, 36, 12)),
];

#[derive(Clone, Debug, PartialEq)]
pub struct HandheldLayout {
    window: (u32, u32),
    body: DisplayGeometry,
    screen: DisplayGeometry,
    logo: DisplayGeometry,
    controls: Vec<(Control, DisplayGeometry)>,
}

impl HandheldLayout {
    /// Lay the face out inside a `width`×`height` window.
    pub fn new(width: u32, height: u32) -> Self {
        let scale = (width as f32 / DESIGN_WIDTH as f32).min(height as f32 / DESIGN_HEIGHT as f32);
        let body_w = (DESIGN_WIDTH as f32 * scale).round() as u32;
        let body_h = (DESIGN_HEIGHT as f32 * scale).round() as u32;
        let origin_x = (width.saturating_sub(body_w) / 2) as i32;
        let origin_y = (height.saturating_sub(body_h) / 2) as i32;

        let place = |(x, y, w, h): (i32, i32, u32, u32)| {
            DisplayGeometry::new(
                origin_x + (x as f32 * scale).round() as i32,
                origin_y + (y as f32 * scale).round() as i32,
                (w as f32 * scale).round() as u32,
                (h as f32 * scale).round() as u32,
            )
        };

        Self {
            window: (width, height),
            body: DisplayGeometry::new(origin_x, origin_y, body_w, body_h),
            screen: place(SCREEN),
            logo: place(LOGO),
            controls: CONTROLS
                .iter()
                .map(|&(control, rect)| (control, place(rect)))
                .collect(),
        }
    }

    /// Window size for an integer design scale.
    pub fn window_size(scale: u32) -> (u32, u32) {
        (DESIGN_WIDTH * scale, DESIGN_HEIGHT * scale)
    }

    pub fn window(&self) -> (u32, u32) {
        self.window
    }

    /// Outline of the handheld body.
    pub fn body(&self) -> DisplayGeometry {
        self.body
    }

    /// The screen container the display is presented in.
    pub fn screen(&self) -> DisplayGeometry {
        self.screen
    }

    /// Strip below the screen carrying the brand name.
    pub fn logo(&self) -> DisplayGeometry {
        self.logo
    }

    /// Design units to window pixels.
    pub fn scale(&self) -> f32 {
        self.body.width as f32 / DESIGN_WIDTH as f32
    }

    pub fn controls(&self) -> &[(Control, DisplayGeometry)] {
        &self.controls
    }

    /// The control under window point (x, y), if any.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<Control> {
        self.controls
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|&(control, _)| control)
    }

    /// Hit-test a touch point given in normalized [0, 1] window coordinates.
    pub fn hit_test_normalized(&self, x: f32, y: f32) -> Option<Control> {
        let px = (x * self.window.0 as f32) as i32;
        let py = (y * self.window.1 as f32) as i32;
        self.hit_test(px, py)
    }
}
