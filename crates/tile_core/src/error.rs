//! Error types for the tile pipeline.
//!
//! Every failure the pipeline can report is a `TileError`. All of them are
//! fatal for the call that detected them: generation and rendering are
//! deterministic, so nothing is retried and no partial result is returned.

use crate::context::NeighborContext;
use crate::generator::GeneratorId;
use crate::tile::TileType;

/// Errors raised while decoding grids, building the tile cache or rendering.
#[derive(Debug)]
pub enum TileError {
    /// A grid cell holds a value that cannot be used where a tile is required.
    InvalidCellKind {
        row: usize,
        column: usize,
        value: i32,
    },
    /// A pixel of a level image has no entry in the decode palette.
    UnmappedPaletteColor {
        row: usize,
        column: usize,
        rgba: [u8; 4],
    },
    /// No cached image exists for the requested tile type, generator and context.
    MissingCacheEntry {
        tile_type: TileType,
        generator_id: GeneratorId,
        context: NeighborContext,
    },
    /// A tile type name could not be parsed.
    UnknownTileType(String),
    /// A palette with no colors was supplied.
    EmptyPalette,
    /// A generator returned fewer values than the image strategy needs.
    GeneratorOutput { expected: usize, actual: usize },
    /// Grid rows do not all have the same length.
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A pixel or weight buffer has the wrong length for its dimensions.
    BufferSize { expected: usize, actual: usize },
    /// A palette color string is not valid hex.
    InvalidHexColor(String),
    /// Configuration (de)serialization failed.
    Json(serde_json::Error),
    /// Reading or writing an image failed.
    Image(image::ImageError),
    /// File system error.
    Io(std::io::Error),
}

impl std::fmt::Display for TileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileError::InvalidCellKind { row, column, value } => write!(
                f,
                "Invalid cell kind {} at row {}, column {}",
                value, row, column
            ),
            TileError::UnmappedPaletteColor { row, column, rgba } => write!(
                f,
                "Unmapped palette color {:?} at row {}, column {}",
                rgba, row, column
            ),
            TileError::MissingCacheEntry {
                tile_type,
                generator_id,
                context,
            } => write!(
                f,
                "No cached {} image for generator {} and context {}",
                tile_type, generator_id, context
            ),
            TileError::UnknownTileType(name) => write!(f, "Unknown tile type: {}", name),
            TileError::EmptyPalette => write!(f, "Palette must contain at least one color"),
            TileError::GeneratorOutput { expected, actual } => write!(
                f,
                "Generator returned {} values, expected at least {}",
                actual, expected
            ),
            TileError::RaggedGrid {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, actual, expected
            ),
            TileError::BufferSize { expected, actual } => write!(
                f,
                "Buffer has {} entries, expected {}",
                actual, expected
            ),
            TileError::InvalidHexColor(hex) => write!(f, "Invalid hex color: {}", hex),
            TileError::Json(e) => write!(f, "JSON error: {}", e),
            TileError::Image(e) => write!(f, "Image error: {}", e),
            TileError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileError::Json(e) => Some(e),
            TileError::Image(e) => Some(e),
            TileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TileError {
    fn from(e: serde_json::Error) -> Self {
        TileError::Json(e)
    }
}

impl From<image::ImageError> for TileError {
    fn from(e: image::ImageError) -> Self {
        TileError::Image(e)
    }
}

impl From<std::io::Error> for TileError {
    fn from(e: std::io::Error) -> Self {
        TileError::Io(e)
    }
}

/// Result type for tile pipeline operations.
pub type TileResult<T> = Result<T, TileError>;
