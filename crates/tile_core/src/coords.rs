//! Grid cell to screen position arithmetic.
//!
//! All functions take their arguments by value and return new positions.
//! Screen y grows downwards.

use bevy_math::IVec2;
use serde::{Deserialize, Serialize};

/// A cell in a grid, addressed by row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Width and height of a cell or sprite, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDimensions {
    pub width: u32,
    pub height: u32,
}

impl TileDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in a sprite of these dimensions.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Dimensions as a signed vector, for position arithmetic.
    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }
}

/// Pixel position of the top left corner of `cell`.
pub fn top_left_of_cell(cell: GridCell, dimensions: TileDimensions, origin: IVec2) -> IVec2 {
    let dims = dimensions.as_ivec2();
    IVec2::new(
        origin.x + dims.x * cell.column as i32,
        origin.y + dims.y * cell.row as i32,
    )
}

/// Pixel position of the bottom left corner of `cell`.
pub fn bottom_left_of_cell(cell: GridCell, dimensions: TileDimensions, origin: IVec2) -> IVec2 {
    let dims = dimensions.as_ivec2();
    IVec2::new(
        origin.x + dims.x * cell.column as i32,
        origin.y + dims.y * (cell.row as i32 + 1),
    )
}
