//! Procedural tile sprites for top-down grids.
//!
//! Generators turn a cell's neighbor context into a sprite; the tile cache
//! stores one sprite per (tile type, generator, context); the render module
//! turns a grid into ordered draw instructions and composites them.

pub mod cache;
pub mod config;
pub mod context;
pub mod coords;
pub mod error;
pub mod generator;
pub mod grid;
pub mod palette;
pub mod render;
pub mod tile;
pub mod tile_image;

pub use cache::{TileCacheBuilder, TileImageCache, TilePrototype};
pub use config::{StrategyConfig, TileSetConfig, TileTypeConfig};
pub use context::{
    cell_context, cell_context_ignoring_absent, contexts_for, distinct_contexts, CellContext,
    NeighborContext,
};
pub use coords::{bottom_left_of_cell, top_left_of_cell, GridCell, TileDimensions};
pub use error::{TileError, TileResult};
pub use generator::{
    DenseNetwork, FnGenerator, Generator, GeneratorId, GeneratorRegistry, ImageStrategy,
    PerPixelStrategy, WholeTileStrategy,
};
pub use grid::{CellKind, ObliqueSlot, TileGrid};
pub use palette::{Palette, ValueRange};
pub use render::{
    collect_renderables, order_by_priority, render_grid, Canvas, Compositor, PixelBuffer,
    Priority, Renderable, RenderableCollector, TileSelection, TilesetGallery,
};
pub use tile::TileType;
pub use tile_image::TileImage;
