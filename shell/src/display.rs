//! Paint surface for delivered frames.
//!
//! The backing store is fixed to the engine's native resolution when a
//! session starts and is scaled (nearest-neighbour) into the container box
//! captured at the same moment.

use tracing::{debug, warn};
use zpaceway_core::frame::Frame;

/// Presentation box in host window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayGeometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

/// Host raster target that frames are painted into.
pub trait PaintTarget {
    /// Set the backing store resolution. Setting the current size again must
    /// leave the contents untouched.
    fn set_backing_size(&mut self, width: u32, height: u32);

    fn backing_size(&self) -> (u32, u32);

    /// Where and how large the backing store is shown.
    fn set_presentation(&mut self, geometry: DisplayGeometry);

    /// Enable or disable filtered scaling.
    fn set_smoothing(&mut self, enabled: bool);

    /// Copy `frame` over the whole backing store.
    fn put_frame(&mut self, frame: &Frame<'_>);
}

pub struct DisplaySurface<T> {
    target: T,
    native: Option<(u32, u32)>,
    geometry: Option<DisplayGeometry>,
    frames_painted: u64,
}

impl<T: PaintTarget> DisplaySurface<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            native: None,
            geometry: None,
            frames_painted: 0,
        }
    }

    /// Lock the backing store to `native` and present it in `container`.
    /// Called once per session start.
    pub fn configure(&mut self, native: (u32, u32), container: DisplayGeometry, smoothing: bool) {
        let (width, height) = native;
        self.target.set_backing_size(width, height);
        self.target.set_presentation(container);
        self.target.set_smoothing(smoothing);
        self.native = Some(native);
        self.geometry = Some(container);
        self.frames_painted = 0;
        debug!(width, height, ?container, "display configured");
    }

    /// Paint one frame at full bleed. Last write wins.
    ///
    /// Every delivered frame is painted; there is no pacing here. The size
    /// check only rejects frames that break the engine contract (a size
    /// other than the native one the backing store was fixed to), since the
    /// target cannot hold them.
    pub fn blit(&mut self, frame: &Frame<'_>) {
        let Some((width, height)) = self.native else {
            warn!("frame delivered before the display was configured");
            return;
        };
        if frame.size() != (width, height) {
            warn!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                width,
                height,
                "frame size does not match the engine's native size"
            );
            return;
        }

        // Something else may have resized the backing store.
        self.target.set_backing_size(width, height);
        self.target.put_frame(frame);
        self.frames_painted += 1;
    }

    /// Native resolution fixed at the last `configure`.
    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.native
    }

    /// Container box captured at the last `configure`.
    pub fn geometry(&self) -> Option<DisplayGeometry> {
        self.geometry
    }

    /// Frames painted since the last `configure`.
    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}
