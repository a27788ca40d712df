//! RGBA canvas for composited frames.

use std::path::Path;

use bevy_math::IVec2;
use image::RgbaImage;

use crate::error::TileResult;
use crate::tile_image::TileImage;

use super::compositor::Canvas;

/// Row-major RGBA8 frame buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Raw RGBA bytes, 4 per pixel.
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl PixelBuffer {
    /// Transparent black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn with_color(width: usize, height: usize, color: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(color);
        buffer
    }

    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 4]) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.data[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// Transparent black outside the buffer.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            [
                self.data[idx],
                self.data[idx + 1],
                self.data[idx + 2],
                self.data[idx + 3],
            ]
        } else {
            [0, 0, 0, 0]
        }
    }

    /// Composite `color` over the pixel at (x, y) (Porter-Duff source over).
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        match color[3] {
            0 => {}
            255 => self.set_pixel(x, y, color),
            _ => {
                let blended = source_over(color, self.get_pixel(x, y));
                self.set_pixel(x, y, blended);
            }
        }
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy into an `image` buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width as u32, self.height as u32);
        image.copy_from_slice(&self.data);
        image
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> TileResult<()> {
        self.to_rgba_image().save(path)?;
        Ok(())
    }
}

impl Canvas for PixelBuffer {
    fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    /// Composite `image` with its top left corner at `position`, clipping
    /// whatever falls outside the buffer.
    fn blit(&mut self, image: &TileImage, position: IVec2) {
        let x0 = position.x.max(0);
        let y0 = position.y.max(0);
        let x1 = (position.x + image.width() as i32).min(self.width as i32);
        let y1 = (position.y + image.height() as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let opaque = image.is_opaque();
        for y in y0..y1 {
            let src_y = (y - position.y) as usize;
            for x in x0..x1 {
                let src_x = (x - position.x) as usize;
                let color = image.rgba_at(src_x, src_y);
                if opaque {
                    self.set_pixel(x as usize, y as usize, color);
                } else {
                    self.blend_pixel(x as usize, y as usize, color);
                }
            }
        }
    }
}

/// Source-over blend of two non-premultiplied RGBA colors.
fn source_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a == 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.data.len(), 48);
        assert_eq!(buf.get_pixel(3, 2), [0, 0, 0, 0]);
        assert_eq!(buf.size(), IVec2::new(4, 3));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set_pixel(5, 0, [255; 4]);
        buf.blend_pixel(0, 5, [255; 4]);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_blend_extremes() {
        let mut buf = PixelBuffer::with_color(1, 1, [100, 100, 100, 255]);
        buf.blend_pixel(0, 0, [200, 0, 0, 0]);
        assert_eq!(buf.get_pixel(0, 0), [100, 100, 100, 255]);
        buf.blend_pixel(0, 0, [200, 0, 0, 255]);
        assert_eq!(buf.get_pixel(0, 0), [200, 0, 0, 255]);
    }

    #[test]
    fn test_blend_half_white_over_black() {
        let mut buf = PixelBuffer::with_color(1, 1, [0, 0, 0, 255]);
        buf.blend_pixel(0, 0, [255, 255, 255, 128]);
        let [r, g, b, a] = buf.get_pixel(0, 0);
        assert_eq!(r, 128);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_blit_opaque() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.blit(&TileImage::filled(2, 2, [9, 8, 7], 255), IVec2::new(1, 1));
        assert_eq!(buf.get_pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(buf.get_pixel(1, 1), [9, 8, 7, 255]);
        assert_eq!(buf.get_pixel(2, 2), [9, 8, 7, 255]);
        assert_eq!(buf.get_pixel(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_blit_clips_negative_and_overflowing_positions() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.blit(&TileImage::filled(2, 2, [1, 1, 1], 255), IVec2::new(-1, -1));
        buf.blit(&TileImage::filled(2, 2, [2, 2, 2], 255), IVec2::new(2, 2));
        buf.blit(&TileImage::filled(2, 2, [3, 3, 3], 255), IVec2::new(10, -10));
        assert_eq!(buf.get_pixel(0, 0), [1, 1, 1, 255]);
        assert_eq!(buf.get_pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(buf.get_pixel(2, 2), [2, 2, 2, 255]);
    }

    #[test]
    fn test_blit_translucent_blends() {
        let mut buf = PixelBuffer::with_color(1, 1, [0, 0, 0, 255]);
        buf.blit(&TileImage::filled(1, 1, [255, 255, 255], 0), IVec2::ZERO);
        assert_eq!(buf.get_pixel(0, 0), [0, 0, 0, 255]);
        buf.blit(&TileImage::filled(1, 1, [255, 0, 0], 128), IVec2::ZERO);
        assert_eq!(buf.get_pixel(0, 0), [128, 0, 0, 255]);
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut buf = PixelBuffer::new(3, 2);
        buf.set_pixel(2, 1, [10, 20, 30, 40]);
        buf.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.get_pixel(2, 1).0, [10, 20, 30, 40]);
        assert_eq!(loaded.dimensions(), (3, 2));
    }
}
