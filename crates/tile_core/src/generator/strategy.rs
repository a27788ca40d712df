//! Image strategies: how a generator's outputs become a sprite.
//!
//! Two strategies share the `ImageStrategy` contract:
//!
//! - `WholeTileStrategy`: one `activate` call per context; the output is a
//!   row-major `height x width` matrix of scalars quantized through the palette
//! - `PerPixelStrategy`: one `activate` call per pixel; the output is an RGB
//!   triple snapped to the nearest palette color, then nudged back toward the
//!   raw output

use crate::context::NeighborContext;
use crate::coords::TileDimensions;
use crate::error::{TileError, TileResult};
use crate::palette::{
    matrix_to_rgb_and_alpha, nearest_palette_rgb, nudge_toward, to_rgb8, Palette, ValueRange,
};
use crate::tile::TileType;
use crate::tile_image::TileImage;

use super::Generator;

/// Default fraction of the distance a snapped color moves back toward the raw output.
pub const DEFAULT_NUDGE_FACTOR: f64 = 0.2;

/// Everything a strategy needs to produce one sprite.
pub struct ImageRequest<'a> {
    pub tile_type: TileType,
    pub generator: &'a dyn Generator,
    pub context: NeighborContext,
    pub dimensions: TileDimensions,
    pub palette: &'a Palette,
    pub value_range: ValueRange,
}

/// Produces a sprite from a generator and a neighbor context.
pub trait ImageStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Generate the sprite for one request.
    fn generate(&self, request: &ImageRequest<'_>) -> TileResult<TileImage>;

    /// Length of the input vector handed to the generator.
    fn input_len(&self, tile_type: TileType) -> usize;

    /// Minimum length of one generator output.
    fn output_len(&self, dimensions: TileDimensions) -> usize;
}

/// One generator call per context, emitting `width * height` scalars.
#[derive(Clone, Copy, Debug, Default)]
pub struct WholeTileStrategy;

impl ImageStrategy for WholeTileStrategy {
    fn name(&self) -> &str {
        "whole_tile"
    }

    fn generate(&self, request: &ImageRequest<'_>) -> TileResult<TileImage> {
        let width = request.dimensions.width as usize;
        let height = request.dimensions.height as usize;
        let output = request.generator.activate(&request.context.to_input());
        let (rgb, alpha) =
            matrix_to_rgb_and_alpha(&output, width, height, request.palette, request.value_range)?;
        TileImage::from_parts(width, height, rgb, alpha)
    }

    fn input_len(&self, tile_type: TileType) -> usize {
        tile_type.context_len()
    }

    fn output_len(&self, dimensions: TileDimensions) -> usize {
        dimensions.pixel_count()
    }
}

/// One generator call per pixel, emitting an RGB triple in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerPixelStrategy {
    /// How far the snapped palette color moves toward the raw output.
    pub nudge_factor: f64,
    /// Also feed `1 - x` and `1 - y` to the generator.
    pub mirrored_coordinates: bool,
    /// Alpha of every generated pixel.
    pub alpha: u8,
}

impl Default for PerPixelStrategy {
    fn default() -> Self {
        Self {
            nudge_factor: DEFAULT_NUDGE_FACTOR,
            mirrored_coordinates: true,
            alpha: 255,
        }
    }
}

impl PerPixelStrategy {
    /// Input vector for the pixel at (x, y).
    pub fn pixel_input(
        &self,
        context: &NeighborContext,
        x: usize,
        y: usize,
        dimensions: TileDimensions,
        tile_type: TileType,
    ) -> Vec<f64> {
        per_pixel_input(
            context,
            x,
            y,
            dimensions,
            tile_type,
            self.mirrored_coordinates,
        )
    }
}

impl ImageStrategy for PerPixelStrategy {
    fn name(&self) -> &str {
        "per_pixel"
    }

    fn generate(&self, request: &ImageRequest<'_>) -> TileResult<TileImage> {
        let dims = request.dimensions;
        let width = dims.width as usize;
        let height = dims.height as usize;
        let mut rgb = Vec::with_capacity(dims.pixel_count());
        for y in 0..height {
            for x in 0..width {
                let input = self.pixel_input(&request.context, x, y, dims, request.tile_type);
                let output = request.generator.activate(&input);
                if output.len() < 3 {
                    return Err(TileError::GeneratorOutput {
                        expected: 3,
                        actual: output.len(),
                    });
                }
                let raw = [output[0] * 255.0, output[1] * 255.0, output[2] * 255.0];
                let [r, g, b] = nearest_palette_rgb(raw, request.palette);
                let snapped = [r as f64, g as f64, b as f64];
                rgb.push(to_rgb8(nudge_toward(snapped, raw, self.nudge_factor)));
            }
        }
        TileImage::from_parts(width, height, rgb, vec![self.alpha; width * height])
    }

    fn input_len(&self, tile_type: TileType) -> usize {
        let coordinates = if self.mirrored_coordinates { 4 } else { 2 };
        tile_type.context_len() + coordinates + 8
    }

    fn output_len(&self, _dimensions: TileDimensions) -> usize {
        3
    }
}

/// Position of `index` along an axis of `len` pixels, in `(0, 1]`.
pub fn normalized_coordinate(index: usize, len: usize) -> f64 {
    (index + 1) as f64 / len as f64
}

/// Flags marking pixels on or next to the two ends of an axis.
///
/// Floor tiles tile seamlessly and always get zeros.
pub fn edge_proximity(index: usize, len: usize, tile_type: TileType) -> [f64; 4] {
    if !tile_type.is_border_sensitive() {
        return [0.0; 4];
    }
    if index == 0 {
        [1.0, 1.0, 0.0, 0.0]
    } else if index == 1 {
        [1.0, 0.0, 0.0, 0.0]
    } else if index + 1 == len {
        [0.0, 0.0, 1.0, 1.0]
    } else if index + 2 == len {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [0.0; 4]
    }
}

/// Generator input for one pixel: context, (x, y), optionally (1 - x, 1 - y),
/// then the x and y edge flags.
pub fn per_pixel_input(
    context: &NeighborContext,
    x: usize,
    y: usize,
    dimensions: TileDimensions,
    tile_type: TileType,
    mirrored: bool,
) -> Vec<f64> {
    let width = dimensions.width as usize;
    let height = dimensions.height as usize;
    let nx = normalized_coordinate(x, width);
    let ny = normalized_coordinate(y, height);

    let mut input = context.to_input();
    input.reserve(12);
    input.extend([nx, ny]);
    if mirrored {
        input.extend([1.0 - nx, 1.0 - ny]);
    }
    input.extend(edge_proximity(x, width, tile_type));
    input.extend(edge_proximity(y, height, tile_type));
    input
}
