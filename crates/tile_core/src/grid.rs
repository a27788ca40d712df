//! Level grids of cell kinds.
//!
//! A `TileGrid` is a rectangular, row-major grid of `CellKind`s. Grids can be
//! built from integer rows or decoded from RGBA level images, where each pixel
//! maps to one cell:
//!
//! | RGBA               | Cell             |
//! |--------------------|------------------|
//! | `(0, 0, 0, 0)`     | `Absent` (-1)    |
//! | `(0, 0, 0, 255)`   | `Floor` (0)      |
//! | `(255, 255, 255, 255)` | `Wall` (1)   |
//!
//! Any other pixel is an `UnmappedPaletteColor` error.

use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TileError, TileResult};

const ABSENT_RGBA: [u8; 4] = [0, 0, 0, 0];
const FLOOR_RGBA: [u8; 4] = [0, 0, 0, 255];
const WALL_RGBA: [u8; 4] = [255, 255, 255, 255];

/// Contents of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing here (-1).
    Absent,
    /// Passable floor (0).
    Floor,
    /// Impassable wall (1).
    Wall,
}

impl CellKind {
    /// Integer value used in contexts and generator inputs.
    pub fn value(self) -> i8 {
        match self {
            CellKind::Absent => -1,
            CellKind::Floor => 0,
            CellKind::Wall => 1,
        }
    }

    /// Convert a raw grid value, reporting the cell it came from on failure.
    pub fn from_value(value: i32, row: usize, column: usize) -> TileResult<Self> {
        CellKind::try_from(value).map_err(|value| TileError::InvalidCellKind { row, column, value })
    }

    /// Decode a level image pixel.
    pub fn from_rgba(rgba: [u8; 4]) -> Option<Self> {
        match rgba {
            ABSENT_RGBA => Some(CellKind::Absent),
            FLOOR_RGBA => Some(CellKind::Floor),
            WALL_RGBA => Some(CellKind::Wall),
            _ => None,
        }
    }

    /// Encode as a level image pixel.
    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            CellKind::Absent => ABSENT_RGBA,
            CellKind::Floor => FLOOR_RGBA,
            CellKind::Wall => WALL_RGBA,
        }
    }
}

impl TryFrom<i32> for CellKind {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(CellKind::Absent),
            0 => Ok(CellKind::Floor),
            1 => Ok(CellKind::Wall),
            other => Err(other),
        }
    }
}

/// A rectangular grid of cell kinds, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    rows: usize,
    columns: usize,
    cells: Vec<CellKind>,
}

impl TileGrid {
    /// Create a grid filled with one cell kind.
    pub fn filled(rows: usize, columns: usize, kind: CellKind) -> Self {
        Self {
            rows,
            columns,
            cells: vec![kind; rows * columns],
        }
    }

    /// Create an all-floor grid.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::filled(rows, columns, CellKind::Floor)
    }

    /// Build a grid from rows of raw integer values.
    ///
    /// Fails on ragged rows and on values outside {-1, 0, 1}.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> TileResult<Self> {
        let columns = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * columns);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != columns {
                return Err(TileError::RaggedGrid {
                    row,
                    expected: columns,
                    actual: values.len(),
                });
            }
            for (column, &value) in values.iter().enumerate() {
                cells.push(CellKind::from_value(value, row, column)?);
            }
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    /// Decode a level image into a grid, one cell per pixel.
    pub fn from_rgba_image(image: &RgbaImage) -> TileResult<Self> {
        let (width, height) = image.dimensions();
        let mut cells = Vec::with_capacity((width * height) as usize);
        for (y, row) in image.rows().enumerate() {
            for (x, pixel) in row.enumerate() {
                let kind = CellKind::from_rgba(pixel.0).ok_or(TileError::UnmappedPaletteColor {
                    row: y,
                    column: x,
                    rgba: pixel.0,
                })?;
                cells.push(kind);
            }
        }
        Ok(Self {
            rows: height as usize,
            columns: width as usize,
            cells,
        })
    }

    /// Load and decode a PNG level image.
    pub fn load_png(path: impl AsRef<Path>) -> TileResult<Self> {
        let image = image::open(path)?.to_rgba8();
        Self::from_rgba_image(&image)
    }

    /// Encode the grid as a level image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img: RgbaImage = ImageBuffer::new(self.columns as u32, self.rows as u32);
        for (row, column, kind) in self.iter() {
            img.put_pixel(column as u32, row as u32, Rgba(kind.to_rgba()));
        }
        img
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Get the cell at (row, column), or `None` outside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<CellKind> {
        if row < self.rows && column < self.columns {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    /// Set the cell at (row, column).
    ///
    /// Does nothing if coordinates are out of bounds.
    pub fn set(&mut self, row: usize, column: usize, kind: CellKind) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = kind;
        }
    }

    /// Value at signed coordinates; anything outside the grid reads as floor (0).
    #[inline]
    pub fn value_at(&self, row: isize, column: isize) -> i8 {
        if row < 0 || column < 0 {
            return 0;
        }
        self.get(row as usize, column as usize)
            .map(CellKind::value)
            .unwrap_or(0)
    }

    /// Iterate cells in row-major order as (row, column, kind).
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &kind)| (i / columns, i % columns, kind))
    }

    /// Map a top-down grid onto the sprite slots of a 2/3 oblique projection.
    ///
    /// A flat 1x1 square is drawn as a 1 x 2/3 rectangle and a wall face as
    /// 1 x 1/3, so an n x m grid becomes (2n + 1) x m slots. A wall at map row
    /// r puts `Wall` at slot row 2(r + 1) and `Roof` in the two slot rows
    /// above it. A floor fills slot rows 2(r + 1) and 2(r + 1) - 1.
    pub fn oblique_sprite_grid(&self) -> TileResult<Vec<Vec<ObliqueSlot>>> {
        let mut out = vec![vec![ObliqueSlot::Empty; self.columns]; 2 * self.rows + 1];
        for (row, column, kind) in self.iter() {
            let out_row = (row + 1) * 2;
            match kind {
                CellKind::Wall => {
                    out[out_row][column] = ObliqueSlot::Wall;
                    out[out_row - 1][column] = ObliqueSlot::Roof;
                    out[out_row - 2][column] = ObliqueSlot::Roof;
                }
                CellKind::Floor => {
                    out[out_row][column] = ObliqueSlot::Floor;
                    out[out_row - 1][column] = ObliqueSlot::Floor;
                }
                CellKind::Absent => {
                    return Err(TileError::InvalidCellKind {
                        row,
                        column,
                        value: kind.value() as i32,
                    })
                }
            }
        }
        Ok(out)
    }
}

/// A sprite slot in an oblique projection grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObliqueSlot {
    Empty,
    Floor,
    Wall,
    Roof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ObliqueSlot::{Empty as E, Floor as F, Roof as R, Wall as W};

    #[test]
    fn test_from_rows() {
        let grid = TileGrid::from_rows(&[vec![0, 1, -1], vec![1, 0, 0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.get(0, 1), Some(CellKind::Wall));
        assert_eq!(grid.get(0, 2), Some(CellKind::Absent));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_from_rows_rejects_unknown_values() {
        let err = TileGrid::from_rows(&[vec![0, 0], vec![0, 2]]).unwrap_err();
        assert!(matches!(
            err,
            TileError::InvalidCellKind {
                row: 1,
                column: 1,
                value: 2
            }
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = TileGrid::from_rows(&[vec![0, 0, 0], vec![0, 0]]).unwrap_err();
        assert!(matches!(
            err,
            TileError::RaggedGrid {
                row: 1,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_value_at_out_of_bounds_is_floor() {
        let grid = TileGrid::filled(2, 2, CellKind::Wall);
        assert_eq!(grid.value_at(0, 0), 1);
        assert_eq!(grid.value_at(-1, 0), 0);
        assert_eq!(grid.value_at(0, -1), 0);
        assert_eq!(grid.value_at(2, 0), 0);
        assert_eq!(grid.value_at(0, 2), 0);
        assert_eq!(grid.value_at(-5, 9), 0);
    }

    #[test]
    fn test_iter_row_major() {
        let grid = TileGrid::from_rows(&[[0, 1], [1, 0]]).unwrap();
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, CellKind::Floor),
                (0, 1, CellKind::Wall),
                (1, 0, CellKind::Wall),
                (1, 1, CellKind::Floor),
            ]
        );
    }

    #[test]
    fn test_rgba_decode() {
        let mut img: RgbaImage = ImageBuffer::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 0, Rgba([255, 255, 255, 255]));
        let grid = TileGrid::from_rgba_image(&img).unwrap();
        assert_eq!(grid.get(0, 0), Some(CellKind::Absent));
        assert_eq!(grid.get(0, 1), Some(CellKind::Floor));
        assert_eq!(grid.get(0, 2), Some(CellKind::Wall));
        assert_eq!(TileGrid::from_rgba_image(&grid.to_rgba_image()).unwrap(), grid);
    }

    #[test]
    fn test_rgba_decode_unmapped_color() {
        let mut img: RgbaImage = ImageBuffer::new(2, 2);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 255]);
        }
        img.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let err = TileGrid::from_rgba_image(&img).unwrap_err();
        assert!(matches!(
            err,
            TileError::UnmappedPaletteColor {
                row: 0,
                column: 1,
                rgba: [255, 0, 0, 255]
            }
        ));
    }

    #[test]
    fn test_oblique_no_walls() {
        let grid = TileGrid::new(3, 3);
        let result = grid.oblique_sprite_grid().unwrap();
        let mut expected = vec![vec![E, E, E]];
        expected.extend(std::iter::repeat(vec![F, F, F]).take(6));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_oblique_one_wall_in_middle() {
        let grid = TileGrid::from_rows(&[[0, 0, 0], [0, 1, 0], [0, 0, 0]]).unwrap();
        let result = grid.oblique_sprite_grid().unwrap();
        assert_eq!(
            result,
            vec![
                vec![E, E, E],
                vec![F, F, F],
                vec![F, R, F],
                vec![F, R, F],
                vec![F, W, F],
                vec![F, F, F],
                vec![F, F, F],
            ]
        );
    }

    #[test]
    fn test_oblique_walls_in_middle_column() {
        let grid = TileGrid::from_rows(&[[0, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();
        let result = grid.oblique_sprite_grid().unwrap();
        assert_eq!(
            result,
            vec![
                vec![E, R, E],
                vec![F, R, F],
                vec![F, R, F],
                vec![F, R, F],
                vec![F, R, F],
                vec![F, R, F],
                vec![F, W, F],
            ]
        );
    }

    #[test]
    fn test_oblique_rejects_absent() {
        let grid = TileGrid::from_rows(&[[0, -1]]).unwrap();
        assert!(matches!(
            grid.oblique_sprite_grid(),
            Err(TileError::InvalidCellKind {
                row: 0,
                column: 1,
                value: -1
            })
        ));
    }
}
