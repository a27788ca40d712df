//! Frame assembly for tile grids.
//!
//! Rendering a grid is a three step pass:
//!
//! - `RenderableCollector` walks the grid and emits positioned, prioritized
//!   draw instructions that reference sprites in the tile cache
//! - `order_by_priority` sorts them back to front
//! - `Compositor` resolves each source and blits it onto a `Canvas`
//!
//! # Example
//!
//! ```ignore
//! let renderables = collect_renderables(&grid, &config, &selection, IVec2::new(100, 100))?;
//! let frame = Compositor::new(&cache).render_frame(renderables, 640, 480)?;
//! frame.save_png("frame.png")?;
//! ```

mod collector;
mod compositor;
mod gallery;
mod order;
mod pixel_buffer;
mod renderable;

pub use collector::{collect_renderables, RenderableCollector, TileSelection};
pub use compositor::{Canvas, Compositor, ImageResolver};
pub use gallery::{GalleryLayout, GalleryPanel, TilesetGallery};
pub use order::{order_by_priority, ordered};
pub use pixel_buffer::PixelBuffer;
pub use renderable::{ImageSource, Priority, Renderable, BLOCK_LAYER, FLOOR_LAYER};

use bevy_math::IVec2;

use crate::cache::TileImageCache;
use crate::config::TileSetConfig;
use crate::error::TileResult;
use crate::grid::TileGrid;

/// Render `grid` with one tile set onto a frame spanning (0, 0) to the grid's
/// bottom right corner. Roofs of the first row stick out above the grid, so
/// `origin.y` should leave room for them.
pub fn render_grid(
    grid: &TileGrid,
    cache: &TileImageCache,
    config: &TileSetConfig,
    selection: &TileSelection,
    origin: IVec2,
) -> TileResult<PixelBuffer> {
    let renderables = collect_renderables(grid, config, selection, origin)?;
    let width = origin.x + grid.columns() as i32 * config.cell.width as i32;
    let height = origin.y + grid.rows() as i32 * config.cell.height as i32;
    Compositor::new(cache).render_frame(
        renderables,
        width.max(0) as usize,
        height.max(0) as usize,
    )
}
