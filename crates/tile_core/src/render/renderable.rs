//! Draw instructions.

use std::sync::Arc;

use bevy_math::IVec2;

use crate::context::NeighborContext;
use crate::generator::GeneratorId;
use crate::tile::TileType;
use crate::tile_image::TileImage;

/// Layer of floor sprites.
pub const FLOOR_LAYER: i32 = 0;
/// Layer of wall and roof sprites, drawn above every floor.
pub const BLOCK_LAYER: i32 = 1;

/// Draw order key: lower layers first, then lower `y_sort_key` first.
///
/// The derived ordering compares `layer` before `y_sort_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority {
    pub layer: i32,
    pub y_sort_key: i32,
}

impl Priority {
    pub const fn new(layer: i32, y_sort_key: i32) -> Self {
        Self { layer, y_sort_key }
    }
}

/// Where a renderable's pixels come from.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// A sprite in the tile cache.
    Cached {
        tile_type: TileType,
        generator_id: GeneratorId,
        context: NeighborContext,
    },
    /// A sprite owned by the renderable itself.
    Inline(Arc<TileImage>),
}

/// One sprite to draw, with its top left position and priority.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub source: ImageSource,
    pub position: IVec2,
    pub priority: Priority,
}

impl Renderable {
    pub fn cached(
        tile_type: TileType,
        generator_id: GeneratorId,
        context: NeighborContext,
        position: IVec2,
        priority: Priority,
    ) -> Self {
        Self {
            source: ImageSource::Cached {
                tile_type,
                generator_id,
                context,
            },
            position,
            priority,
        }
    }

    pub fn inline(image: Arc<TileImage>, position: IVec2, priority: Priority) -> Self {
        Self {
            source: ImageSource::Inline(image),
            position,
            priority,
        }
    }

    /// Tile type of a cached source.
    pub fn tile_type(&self) -> Option<TileType> {
        match self.source {
            ImageSource::Cached { tile_type, .. } => Some(tile_type),
            ImageSource::Inline(_) => None,
        }
    }
}
