//! Tile set configuration.
//!
//! A `TileSetConfig` names everything the cache builder and the renderable
//! collector need besides the grid and the generators: cell size, sprite
//! dimensions, palettes, value ranges and the image strategy. It can be built
//! in code from one of the presets or loaded from JSON:
//!
//! ```json
//! {
//!   "cell": { "width": 32, "height": 20 },
//!   "floor": { "dimensions": { "width": 32, "height": 20 },
//!              "palette": ["393224", "74695B", "869894", "818B8D"] },
//!   "wall": { ... },
//!   "roof": { ... },
//!   "strategy": { "mode": "per_pixel", "nudge_factor": 0.2 }
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::coords::TileDimensions;
use crate::error::TileResult;
use crate::generator::{ImageStrategy, PerPixelStrategy, WholeTileStrategy, DEFAULT_NUDGE_FACTOR};
use crate::palette::{Palette, ValueRange};
use crate::tile::TileType;

/// Default cell size in pixels.
pub const CELL_DIMENSIONS: TileDimensions = TileDimensions::new(32, 20);
pub const FLOOR_DIMENSIONS: TileDimensions = TileDimensions::new(32, 20);
pub const WALL_DIMENSIONS: TileDimensions = TileDimensions::new(32, 12);
pub const ROOF_DIMENSIONS: TileDimensions = TileDimensions::new(32, 20);

/// Sprite settings for one tile type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileTypeConfig {
    pub dimensions: TileDimensions,
    pub palette: Palette,
    #[serde(default)]
    pub value_range: ValueRange,
}

impl TileTypeConfig {
    pub fn new(dimensions: TileDimensions, palette: Palette) -> Self {
        Self {
            dimensions,
            palette,
            value_range: ValueRange::UNIT,
        }
    }
}

/// Which `ImageStrategy` the cache builder uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StrategyConfig {
    #[default]
    WholeTile,
    PerPixel {
        #[serde(default = "default_nudge_factor")]
        nudge_factor: f64,
        #[serde(default = "default_true")]
        mirrored_coordinates: bool,
        #[serde(default = "default_alpha")]
        alpha: u8,
    },
}

fn default_nudge_factor() -> f64 {
    DEFAULT_NUDGE_FACTOR
}

fn default_true() -> bool {
    true
}

fn default_alpha() -> u8 {
    255
}

impl StrategyConfig {
    /// The per-pixel strategy with its default tunables.
    pub fn per_pixel() -> Self {
        let defaults = PerPixelStrategy::default();
        StrategyConfig::PerPixel {
            nudge_factor: defaults.nudge_factor,
            mirrored_coordinates: defaults.mirrored_coordinates,
            alpha: defaults.alpha,
        }
    }

    pub fn build_strategy(&self) -> Box<dyn ImageStrategy> {
        match *self {
            StrategyConfig::WholeTile => Box::new(WholeTileStrategy),
            StrategyConfig::PerPixel {
                nudge_factor,
                mirrored_coordinates,
                alpha,
            } => Box::new(PerPixelStrategy {
                nudge_factor,
                mirrored_coordinates,
                alpha,
            }),
        }
    }
}

/// Complete description of a tile set.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSetConfig {
    /// Grid cell size; floors fill a cell, walls sit on its bottom edge.
    pub cell: TileDimensions,
    pub floor: TileTypeConfig,
    pub wall: TileTypeConfig,
    pub roof: TileTypeConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

fn slate_roof() -> Palette {
    Palette::from_array([
        [0x91, 0x99, 0xA7, 255],
        [0x37, 0x60, 0xC5, 255],
        [0x6C, 0x70, 0xB2, 255],
        [0x23, 0x20, 0x28, 255],
    ])
}

impl TileSetConfig {
    /// Settings for `tile_type`.
    pub fn tile(&self, tile_type: TileType) -> &TileTypeConfig {
        match tile_type {
            TileType::Floor => &self.floor,
            TileType::Wall => &self.wall,
            TileType::Roof => &self.roof,
        }
    }

    pub fn dimensions(&self, tile_type: TileType) -> TileDimensions {
        self.tile(tile_type).dimensions
    }

    /// Replace the image strategy.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Earthy floors, warm walls, blue roofs.
    pub fn sand_and_terracotta() -> Self {
        Self::with_palettes(
            Palette::from_array([
                [0x39, 0x32, 0x24, 255],
                [0x74, 0x69, 0x5B, 255],
                [0x86, 0x98, 0x94, 255],
                [0x81, 0x8B, 0x8D, 255],
            ]),
            Palette::from_array([
                [0xD7, 0xA8, 0x47, 255],
                [0xB1, 0xA7, 0x7C, 255],
                [0x98, 0x6D, 0x54, 255],
                [0x37, 0x23, 0x13, 255],
            ]),
            slate_roof(),
        )
    }

    /// Muted pastel floors and walls.
    pub fn pastel() -> Self {
        Self::with_palettes(
            Palette::from_array([
                [0xBE, 0x90, 0x5A, 255],
                [0x4B, 0xA9, 0x8E, 255],
                [0xA5, 0x5C, 0x4A, 255],
                [0x2D, 0x20, 0x28, 255],
            ]),
            Palette::from_array([
                [0x88, 0x7E, 0x84, 255],
                [0xD6, 0xB7, 0x85, 255],
                [0x9C, 0x59, 0x7F, 255],
                [0x41, 0x41, 0x5A, 255],
            ]),
            slate_roof(),
        )
    }

    /// Brown floors, orange walls and a three-color blue roof.
    pub fn classic() -> Self {
        Self::with_palettes(
            Palette::from_array([
                [117, 65, 29, 255],
                [156, 130, 70, 255],
                [145, 131, 97, 255],
                [102, 99, 93, 255],
            ]),
            Palette::from_array([
                [252, 186, 3, 255],
                [252, 169, 3, 255],
                [252, 119, 3, 255],
                [171, 77, 14, 255],
            ]),
            Palette::from_array([[10, 20, 50, 255], [20, 10, 100, 255], [50, 10, 200, 255]]),
        )
    }

    fn with_palettes(floor: Palette, wall: Palette, roof: Palette) -> Self {
        Self {
            cell: CELL_DIMENSIONS,
            floor: TileTypeConfig::new(FLOOR_DIMENSIONS, floor),
            wall: TileTypeConfig::new(WALL_DIMENSIONS, wall),
            roof: TileTypeConfig::new(ROOF_DIMENSIONS, roof),
            strategy: StrategyConfig::default(),
        }
    }

    pub fn from_json_str(json: &str) -> TileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> TileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> TileResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
