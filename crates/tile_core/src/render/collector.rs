//! Grid to renderables.
//!
//! Floors fill their cell. A wall sprite sits on the bottom edge of its cell
//! and the roof sprite sits directly above the wall, so tall blocks overlap
//! the row behind them:
//!
//! ```text
//!   cell top ->  +--------+   <- roof top (wall top - roof height)
//!                |  roof  |
//!   wall top ->  +--------+
//!                |  wall  |
//!   cell bottom  +--------+
//! ```
//!
//! Every sprite sorts by its own bottom edge in screen pixels. For a roof that
//! is the wall top.

use bevy_math::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::TileSetConfig;
use crate::context::{cell_context, cell_context_ignoring_absent, CellContext};
use crate::coords::{top_left_of_cell, GridCell, TileDimensions};
use crate::error::{TileError, TileResult};
use crate::generator::GeneratorId;
use crate::grid::{CellKind, TileGrid};
use crate::tile::TileType;

use super::renderable::{Priority, Renderable, BLOCK_LAYER, FLOOR_LAYER};

/// The generator drawing each tile type, i.e. one tile set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSelection {
    pub floor: GeneratorId,
    pub wall: GeneratorId,
    pub roof: GeneratorId,
}

impl TileSelection {
    /// The same generator id for every tile type.
    pub const fn uniform(id: GeneratorId) -> Self {
        Self {
            floor: id,
            wall: id,
            roof: id,
        }
    }

    pub fn get(&self, tile_type: TileType) -> GeneratorId {
        match tile_type {
            TileType::Floor => self.floor,
            TileType::Wall => self.wall,
            TileType::Roof => self.roof,
        }
    }
}

/// Produces renderables for a grid placed at `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderableCollector {
    pub origin: IVec2,
    pub cell: TileDimensions,
    pub wall: TileDimensions,
    pub roof: TileDimensions,
    /// Leave absent cells empty instead of failing. Absent neighbors then
    /// read as floor.
    pub skip_absent: bool,
}

impl RenderableCollector {
    pub fn new(
        origin: IVec2,
        cell: TileDimensions,
        wall: TileDimensions,
        roof: TileDimensions,
    ) -> Self {
        Self {
            origin,
            cell,
            wall,
            roof,
            skip_absent: false,
        }
    }

    /// Cell, wall and roof sizes from `config`.
    pub fn from_config(config: &TileSetConfig, origin: IVec2) -> Self {
        Self::new(
            origin,
            config.cell,
            config.dimensions(TileType::Wall),
            config.dimensions(TileType::Roof),
        )
    }

    pub fn with_origin(self, origin: IVec2) -> Self {
        Self { origin, ..self }
    }

    pub fn skipping_absent(self) -> Self {
        Self {
            skip_absent: true,
            ..self
        }
    }

    /// Renderables for every cell of `grid`, row-major.
    ///
    /// Each floor cell yields one floor renderable; each wall cell yields its
    /// wall then its roof. An absent cell aborts the collection with
    /// `InvalidCellKind` unless `skip_absent` is set, in which case it is left
    /// empty and its neighbors see it as floor.
    pub fn collect(
        &self,
        grid: &TileGrid,
        selection: &TileSelection,
    ) -> TileResult<Vec<Renderable>> {
        let mut out = Vec::with_capacity(grid.rows() * grid.columns());
        for (row, column, kind) in grid.iter() {
            if kind == CellKind::Absent {
                if self.skip_absent {
                    continue;
                }
                return Err(TileError::InvalidCellKind {
                    row,
                    column,
                    value: kind.value() as i32,
                });
            }
            let top_left = top_left_of_cell(GridCell::new(row, column), self.cell, self.origin);
            let context = if self.skip_absent {
                cell_context_ignoring_absent(grid, row, column)?
            } else {
                cell_context(grid, row, column)?
            };
            match context {
                CellContext::Floor(context) => {
                    out.push(Renderable::cached(
                        TileType::Floor,
                        selection.floor,
                        context,
                        top_left,
                        Priority::new(FLOOR_LAYER, top_left.y + self.cell.height as i32),
                    ));
                }
                CellContext::Wall { wall, roof } => {
                    let wall_y = top_left.y + self.cell.height as i32 - self.wall.height as i32;
                    let roof_y = wall_y - self.roof.height as i32;
                    out.push(Renderable::cached(
                        TileType::Wall,
                        selection.wall,
                        wall,
                        IVec2::new(top_left.x, wall_y),
                        Priority::new(BLOCK_LAYER, wall_y + self.wall.height as i32),
                    ));
                    out.push(Renderable::cached(
                        TileType::Roof,
                        selection.roof,
                        roof,
                        IVec2::new(top_left.x, roof_y),
                        Priority::new(BLOCK_LAYER, wall_y),
                    ));
                }
            }
        }
        Ok(out)
    }
}

/// Collect renderables for `grid` with the sizes from `config`.
pub fn collect_renderables(
    grid: &TileGrid,
    config: &TileSetConfig,
    selection: &TileSelection,
    origin: IVec2,
) -> TileResult<Vec<Renderable>> {
    RenderableCollector::from_config(config, origin).collect(grid, selection)
}
