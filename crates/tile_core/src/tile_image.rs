//! Generated sprite buffers.

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::context::NeighborContext;
use crate::error::{TileError, TileResult};
use crate::palette::Rgb;
use crate::tile::TileType;

/// A sprite as separate RGB and alpha buffers, both row-major.
///
/// `rgb` holds `height x width` RGB triples and `alpha` holds `height x width`
/// alpha values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileImage {
    width: usize,
    height: usize,
    rgb: Vec<Rgb>,
    alpha: Vec<u8>,
}

impl TileImage {
    /// Assemble an image from its buffers. Fails if a buffer has the wrong length.
    pub fn from_parts(
        width: usize,
        height: usize,
        rgb: Vec<Rgb>,
        alpha: Vec<u8>,
    ) -> TileResult<Self> {
        let expected = width * height;
        for actual in [rgb.len(), alpha.len()] {
            if actual != expected {
                return Err(TileError::BufferSize { expected, actual });
            }
        }
        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// A single-color image.
    pub fn filled(width: usize, height: usize, rgb: Rgb, alpha: u8) -> Self {
        Self {
            width,
            height,
            rgb: vec![rgb; width * height],
            alpha: vec![alpha; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgb(&self) -> &[Rgb] {
        &self.rgb
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// RGBA color at (x, y). Callers must stay in bounds.
    #[inline]
    pub fn rgba_at(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = y * self.width + x;
        let [r, g, b] = self.rgb[idx];
        [r, g, b, self.alpha[idx]]
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha.iter().all(|&a| a == 255)
    }

    /// Interleave into an RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img: RgbaImage = ImageBuffer::new(self.width as u32, self.height as u32);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba(self.rgba_at(x as usize, y as usize));
        }
        img
    }

    /// Split an RGBA image into RGB and alpha buffers.
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut rgb = Vec::with_capacity((width * height) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.push([r, g, b]);
            alpha.push(a);
        }
        Self {
            width: width as usize,
            height: height as usize,
            rgb,
            alpha,
        }
    }

    /// File stem for an exported sprite, e.g. `"roof_0_1_1"`.
    pub fn export_name(tile_type: TileType, context: &NeighborContext) -> String {
        let mut name = tile_type.name().to_string();
        for value in context.as_slice() {
            name.push('_');
            name.push_str(&value.to_string());
        }
        name
    }
}
