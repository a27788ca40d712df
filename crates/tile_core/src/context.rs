//! Neighbor contexts.
//!
//! A tile's sprite depends on the passability of the cells around it. The
//! context of a cell is a short tuple of neighbor values, read from the 3x3
//! window centered on the cell with everything outside the grid treated as
//! floor (0):
//!
//! - Floor: `[west, north, east]`
//! - Wall: `[west, east]`
//! - Roof (drawn above a wall): `[west, south, east]`

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{TileError, TileResult};
use crate::grid::{CellKind, TileGrid};
use crate::tile::TileType;

/// Immutable neighbor tuple used as a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeighborContext {
    len: u8,
    cells: [i8; 3],
}

impl NeighborContext {
    /// Two-value context (wall).
    pub const fn pair(west: i8, east: i8) -> Self {
        Self {
            len: 2,
            cells: [west, east, 0],
        }
    }

    /// Three-value context (floor, roof).
    pub const fn triple(west: i8, middle: i8, east: i8) -> Self {
        Self {
            len: 3,
            cells: [west, middle, east],
        }
    }

    /// Build from a slice of two or three values.
    pub fn from_slice(values: &[i8]) -> Option<Self> {
        match *values {
            [w, e] => Some(Self::pair(w, e)),
            [w, m, e] => Some(Self::triple(w, m, e)),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.cells[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Context values as generator inputs.
    pub fn to_input(&self) -> Vec<f64> {
        self.as_slice().iter().map(|&v| v as f64).collect()
    }
}

impl std::fmt::Display for NeighborContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// The context(s) a cell is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellContext {
    Floor(NeighborContext),
    Wall {
        wall: NeighborContext,
        roof: NeighborContext,
    },
}

/// The 3x3 window of values centered on (row, column), rows top to bottom.
pub fn neighborhood_3x3(grid: &TileGrid, row: usize, column: usize) -> [[i8; 3]; 3] {
    let (r, c) = (row as isize, column as isize);
    let mut window = [[0; 3]; 3];
    for (dr, window_row) in window.iter_mut().enumerate() {
        for (dc, value) in window_row.iter_mut().enumerate() {
            *value = grid.value_at(r + dr as isize - 1, c + dc as isize - 1);
        }
    }
    window
}

/// Derive a cell's context from its 3x3 window.
///
/// `row` and `column` only label the error for non-tile centers.
pub fn context_from_window(
    window: &[[i8; 3]; 3],
    row: usize,
    column: usize,
) -> TileResult<CellContext> {
    let west = window[1][0];
    let east = window[1][2];
    match window[1][1] {
        0 => Ok(CellContext::Floor(NeighborContext::triple(
            west,
            window[0][1],
            east,
        ))),
        1 => Ok(CellContext::Wall {
            wall: NeighborContext::pair(west, east),
            roof: NeighborContext::triple(west, window[2][1], east),
        }),
        value => Err(TileError::InvalidCellKind {
            row,
            column,
            value: value as i32,
        }),
    }
}

/// Derive a cell's context with direct lookups.
///
/// Equivalent to `context_from_window(&neighborhood_3x3(..))` without building
/// the window.
pub fn cell_context(grid: &TileGrid, row: usize, column: usize) -> TileResult<CellContext> {
    context_with(grid, row, column, |r, c| grid.value_at(r, c))
}

/// Like [`cell_context`], but absent neighbors read as floor (0), the same as
/// cells outside the grid. The center itself must still be a floor or wall.
pub fn cell_context_ignoring_absent(
    grid: &TileGrid,
    row: usize,
    column: usize,
) -> TileResult<CellContext> {
    context_with(grid, row, column, |r, c| grid.value_at(r, c).max(0))
}

fn context_with(
    grid: &TileGrid,
    row: usize,
    column: usize,
    neighbor: impl Fn(isize, isize) -> i8,
) -> TileResult<CellContext> {
    let (r, c) = (row as isize, column as isize);
    let west = neighbor(r, c - 1);
    let east = neighbor(r, c + 1);
    match grid.value_at(r, c) {
        0 => Ok(CellContext::Floor(NeighborContext::triple(
            west,
            neighbor(r - 1, c),
            east,
        ))),
        1 => Ok(CellContext::Wall {
            wall: NeighborContext::pair(west, east),
            roof: NeighborContext::triple(west, neighbor(r + 1, c), east),
        }),
        value => Err(TileError::InvalidCellKind {
            row,
            column,
            value: value as i32,
        }),
    }
}

/// The declared set of contexts a tile type is generated for.
///
/// Neighbor values are 0 (passable) or 1 (impassable).
pub fn contexts_for(tile_type: TileType) -> Vec<NeighborContext> {
    match tile_type {
        TileType::Wall => vec![
            NeighborContext::pair(0, 0),
            NeighborContext::pair(1, 0),
            NeighborContext::pair(0, 1),
            NeighborContext::pair(1, 1),
        ],
        TileType::Floor | TileType::Roof => vec![
            NeighborContext::triple(0, 0, 0),
            NeighborContext::triple(1, 0, 0),
            NeighborContext::triple(0, 1, 0),
            NeighborContext::triple(0, 0, 1),
            NeighborContext::triple(0, 1, 1),
            NeighborContext::triple(1, 0, 1),
            NeighborContext::triple(1, 1, 0),
            NeighborContext::triple(1, 1, 1),
        ],
    }
}

/// Collect the distinct contexts each tile type needs to draw `grid`.
///
/// Absent cells draw nothing and are skipped; as neighbors they read as floor.
pub fn distinct_contexts(
    grid: &TileGrid,
) -> TileResult<BTreeMap<TileType, BTreeSet<NeighborContext>>> {
    let mut out: BTreeMap<TileType, BTreeSet<NeighborContext>> = BTreeMap::new();
    for (row, column, kind) in grid.iter() {
        if kind == CellKind::Absent {
            continue;
        }
        match cell_context_ignoring_absent(grid, row, column)? {
            CellContext::Floor(ctx) => {
                out.entry(TileType::Floor).or_default().insert(ctx);
            }
            CellContext::Wall { wall, roof } => {
                out.entry(TileType::Wall).or_default().insert(wall);
                out.entry(TileType::Roof).or_default().insert(roof);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[i32]]) -> TileGrid {
        TileGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_neighborhood_corner_pads_with_floor() {
        let g = grid(&[&[1, 1], &[1, 1]]);
        let window = neighborhood_3x3(&g, 0, 0);
        assert_eq!(window, [[0, 0, 0], [0, 1, 1], [0, 1, 1]]);
    }

    #[test]
    fn test_floor_context() {
        let g = grid(&[&[0, 1, 0], &[1, 0, 0], &[0, 0, 0]]);
        let ctx = cell_context(&g, 1, 1).unwrap();
        assert_eq!(ctx, CellContext::Floor(NeighborContext::triple(1, 1, 0)));
    }

    #[test]
    fn test_wall_and_roof_context() {
        let g = grid(&[&[0, 0, 0], &[1, 1, 0], &[0, 1, 0]]);
        let ctx = cell_context(&g, 1, 1).unwrap();
        assert_eq!(
            ctx,
            CellContext::Wall {
                wall: NeighborContext::pair(1, 0),
                roof: NeighborContext::triple(1, 1, 0),
            }
        );
    }

    #[test]
    fn test_direct_lookup_matches_window() {
        let g = grid(&[&[0, 1, 0, 1], &[1, 1, 0, 0], &[0, 1, 1, 0]]);
        for (row, column, _) in g.iter() {
            let window = neighborhood_3x3(&g, row, column);
            assert_eq!(
                cell_context(&g, row, column).unwrap(),
                context_from_window(&window, row, column).unwrap()
            );
        }
    }

    #[test]
    fn test_absent_center_is_invalid() {
        let g = grid(&[&[0, -1]]);
        assert!(matches!(
            cell_context(&g, 0, 1),
            Err(TileError::InvalidCellKind {
                row: 0,
                column: 1,
                value: -1
            })
        ));
    }

    #[test]
    fn test_absent_neighbors_read_as_floor_when_ignored() {
        let g = grid(&[&[-1, -1, 0], &[0, 1, -1], &[0, -1, 0]]);
        assert_eq!(
            cell_context(&g, 1, 1).unwrap(),
            CellContext::Wall {
                wall: NeighborContext::pair(0, -1),
                roof: NeighborContext::triple(0, -1, -1),
            }
        );
        assert_eq!(
            cell_context_ignoring_absent(&g, 1, 1).unwrap(),
            CellContext::Wall {
                wall: NeighborContext::pair(0, 0),
                roof: NeighborContext::triple(0, 0, 0),
            }
        );
        assert_eq!(
            cell_context_ignoring_absent(&g, 1, 0).unwrap(),
            CellContext::Floor(NeighborContext::triple(0, 0, 1))
        );
        assert!(matches!(
            cell_context_ignoring_absent(&g, 0, 0),
            Err(TileError::InvalidCellKind { value: -1, .. })
        ));
    }

    #[test]
    fn test_distinct_contexts_skip_absent_cells() {
        let g = grid(&[&[0, -1], &[1, 0]]);
        let contexts = distinct_contexts(&g).unwrap();
        let declared: BTreeSet<_> = TileType::ALL
            .iter()
            .flat_map(|&t| contexts_for(t).into_iter().map(move |c| (t, c)))
            .collect();
        for (tile_type, set) in &contexts {
            for ctx in set {
                assert!(declared.contains(&(*tile_type, *ctx)));
            }
        }
    }

    #[test]
    fn test_window_rejects_unknown_center() {
        let window = [[0, 0, 0], [0, 5, 0], [0, 0, 0]];
        assert!(matches!(
            context_from_window(&window, 4, 2),
            Err(TileError::InvalidCellKind {
                row: 4,
                column: 2,
                value: 5
            })
        ));
    }

    #[test]
    fn test_declared_contexts() {
        assert_eq!(contexts_for(TileType::Wall).len(), 4);
        assert_eq!(contexts_for(TileType::Floor).len(), 8);
        assert_eq!(contexts_for(TileType::Roof).len(), 8);
        let unique: BTreeSet<_> = contexts_for(TileType::Floor).into_iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_distinct_contexts_single_wall() {
        let g = grid(&[&[0, 0, 0], &[0, 1, 0], &[0, 0, 0]]);
        let contexts = distinct_contexts(&g).unwrap();
        let floor = &contexts[&TileType::Floor];
        // Plain floor, floor below the wall, floors beside the wall.
        assert!(floor.contains(&NeighborContext::triple(0, 0, 0)));
        assert!(floor.contains(&NeighborContext::triple(0, 1, 0)));
        assert!(floor.contains(&NeighborContext::triple(0, 0, 1)));
        assert!(floor.contains(&NeighborContext::triple(1, 0, 0)));
        assert_eq!(floor.len(), 4);
        assert_eq!(contexts[&TileType::Wall].len(), 1);
        assert_eq!(contexts[&TileType::Roof].len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(NeighborContext::pair(1, 0).to_string(), "(1, 0)");
        assert_eq!(NeighborContext::triple(0, 1, 1).to_string(), "(0, 1, 1)");
        assert_eq!(NeighborContext::from_slice(&[1]), None);
    }
}
