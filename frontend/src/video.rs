use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use zpaceway_core::frame::{self, Frame};
use zpaceway_core::input::ButtonState;
use zpaceway_shell::display::{DisplayGeometry, PaintTarget};
use zpaceway_shell::layout::{Control, HandheldLayout};

use crate::labels;

const BODY: Color = Color::RGB(0x2B, 0x2D, 0x42);
const BEZEL: Color = Color::RGB(0x14, 0x15, 0x22);
const SCREEN_OFF: Color = Color::RGB(0x5A, 0x6B, 0x4F);
const CONTROL: Color = Color::RGB(0x8D, 0x99, 0xAE);
const CONTROL_PRESSED: Color = Color::RGB(0xEF, 0x23, 0x3C);
const LABEL: Color = Color::RGB(0xED, 0xF2, 0xF4);

/// Backing store the display surface paints into; uploaded on present.
#[derive(Default)]
pub struct ScreenBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    presentation: DisplayGeometry,
    smoothing: bool,
}

impl ScreenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl PaintTarget for ScreenBuffer {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; frame::buffer_len(width, height)];
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_presentation(&mut self, geometry: DisplayGeometry) {
        self.presentation = geometry;
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    fn put_frame(&mut self, frame: &Frame<'_>) {
        self.pixels.copy_from_slice(frame.pixels());
    }
}

pub struct Video {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
}

impl Video {
    /// Create an SDL window and renderer of the given size.
    pub fn new(
        sdl_video: &sdl2::VideoSubsystem,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let window = sdl_video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();

        Ok(Self {
            canvas,
            texture_creator,
        })
    }

    pub fn window(&self) -> &Window {
        self.canvas.window()
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.canvas.window_mut().set_title(title) {
            tracing::warn!(error = %e, "could not set window title");
        }
    }

    /// Draw the handheld face, the screen contents (if a session is live)
    /// and present.
    pub fn present(
        &mut self,
        layout: &HandheldLayout,
        screen: Option<&ScreenBuffer>,
        held: ButtonState,
    ) -> Result<(), String> {
        self.canvas.set_draw_color(BEZEL);
        self.canvas.clear();

        self.canvas.set_draw_color(BODY);
        self.canvas.fill_rect(rect(layout.body()))?;

        let container = layout.screen();
        let pad = (4.0 * layout.scale()) as i32;
        self.canvas.set_draw_color(BEZEL);
        self.canvas.fill_rect(Rect::new(
            container.x - pad,
            container.y - pad,
            container.width + 2 * pad as u32,
            container.height + 2 * pad as u32,
        ))?;

        match screen {
            Some(screen) if !screen.is_empty() => self.draw_screen(screen)?,
            _ => {
                self.canvas.set_draw_color(SCREEN_OFF);
                self.canvas.fill_rect(rect(container))?;
            }
        }

        self.draw_text(layout.logo(), "ZPACEWAY", layout.scale())?;

        for &(control, area) in layout.controls() {
            let pressed = matches!(control, Control::Button(b) if held.is_pressed(b));
            self.canvas
                .set_draw_color(if pressed { CONTROL_PRESSED } else { CONTROL });
            self.canvas.fill_rect(rect(area))?;
            self.draw_text(area, control.label(), layout.scale())?;
        }

        self.canvas.present();
        Ok(())
    }

    /// Upload the RGB24 backing store and scale it into its presentation box.
    fn draw_screen(&mut self, screen: &ScreenBuffer) -> Result<(), String> {
        // Must be set before the texture is created.
        sdl2::hint::set(
            "SDL_RENDER_SCALE_QUALITY",
            if screen.smoothing { "linear" } else { "nearest" },
        );

        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, screen.width, screen.height)
            .map_err(|e| e.to_string())?;

        texture
            .update(
                None,
                &screen.pixels,
                screen.width as usize * frame::BYTES_PER_PIXEL,
            )
            .map_err(|e| e.to_string())?;

        self.canvas
            .copy(&texture, None, Some(rect(screen.presentation)))
    }

    /// Centre `text` in `area` using the label font.
    fn draw_text(&mut self, area: DisplayGeometry, text: &str, scale: f32) -> Result<(), String> {
        let px = (scale * 0.75).round().max(1.0) as i32;
        let width = labels::text_width(text) as i32 * px;
        let height = labels::GLYPH_H as i32 * px;
        let x0 = area.x + (area.width as i32 - width) / 2;
        let y0 = area.y + (area.height as i32 - height) / 2;

        self.canvas.set_draw_color(LABEL);
        for (x, y) in labels::text_pixels(text) {
            self.canvas.fill_rect(Rect::new(
                x0 + x as i32 * px,
                y0 + y as i32 * px,
                px as u32,
                px as u32,
            ))?;
        }
        Ok(())
    }
}

fn rect(geometry: DisplayGeometry) -> Rect {
    Rect::new(geometry.x, geometry.y, geometry.width, geometry.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_resize_is_idempotent() {
        let mut screen = ScreenBuffer::new();
        screen.set_backing_size(160, 144);
        let pixels = vec![9u8; frame::buffer_len(160, 144)];
        screen.put_frame(&Frame::new(160, 144, &pixels).unwrap());

        screen.set_backing_size(160, 144);
        assert_eq!(screen.backing_size(), (160, 144));
        assert!(screen.pixels.iter().all(|&p| p == 9));
    }
}
