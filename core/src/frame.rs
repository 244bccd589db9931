/// Bytes per pixel in a [`Frame`] (R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

/// One rendered image at the engine's native resolution.
///
/// Pixels are stored left-to-right, top-to-bottom, 3 bytes per pixel (R, G, B).
/// A frame borrows the engine's pixel store, so it cannot outlive the sink
/// call it was delivered to.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wrap an RGB24 pixel slice. Returns `None` if the slice length does not
    /// match `width * height * 3`.
    pub fn new(width: u32, height: u32, pixels: &'a [u8]) -> Option<Self> {
        if pixels.len() != buffer_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// RGB value at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }
}

/// Size in bytes of an RGB24 buffer of the given dimensions.
pub fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_length() {
        let pixels = vec![0u8; buffer_len(4, 4) - 1];
        assert!(Frame::new(4, 4, &pixels).is_none());
    }

    #[test]
    fn reads_pixels_row_major() {
        let mut pixels = vec![0u8; buffer_len(2, 2)];
        // (1, 1) is the fourth pixel
        pixels[9..12].copy_from_slice(&[1, 2, 3]);
        let frame = Frame::new(2, 2, &pixels).unwrap();
        assert_eq!(frame.pixel(1, 1), Some([1, 2, 3]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pitch(), 6);
    }
}
