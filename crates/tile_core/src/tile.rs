//! Tile types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TileError;

/// The kinds of sprite a grid can be drawn with.
///
/// A floor cell is drawn with one floor sprite. A wall cell is drawn with a
/// wall sprite and a roof sprite stacked above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    Floor,
    Wall,
    Roof,
}

impl TileType {
    /// All tile types, in cache build order.
    pub const ALL: [TileType; 3] = [TileType::Floor, TileType::Wall, TileType::Roof];

    /// Lowercase name, used in logs and export file names.
    pub fn name(self) -> &'static str {
        match self {
            TileType::Floor => "floor",
            TileType::Wall => "wall",
            TileType::Roof => "roof",
        }
    }

    /// Number of neighbor values in this tile type's context.
    ///
    /// Wall: [west, east]. Floor: [west, north, east]. Roof: [west, south, east].
    pub fn context_len(self) -> usize {
        match self {
            TileType::Wall => 2,
            TileType::Floor | TileType::Roof => 3,
        }
    }

    /// Whether per-pixel generation feeds edge-proximity flags for this type.
    pub fn is_border_sensitive(self) -> bool {
        !matches!(self, TileType::Floor)
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TileType {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(TileType::Floor),
            "wall" => Ok(TileType::Wall),
            "roof" => Ok(TileType::Roof),
            _ => Err(TileError::UnknownTileType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_type() {
        assert_eq!("floor".parse::<TileType>().unwrap(), TileType::Floor);
        assert_eq!(" Wall ".parse::<TileType>().unwrap(), TileType::Wall);
        assert!(matches!(
            "ceiling".parse::<TileType>(),
            Err(TileError::UnknownTileType(_))
        ));
    }

    #[test]
    fn test_context_len() {
        assert_eq!(TileType::Wall.context_len(), 2);
        assert_eq!(TileType::Floor.context_len(), 3);
        assert_eq!(TileType::Roof.context_len(), 3);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TileType::Roof).unwrap();
        assert_eq!(json, "\"roof\"");
        let back: TileType = serde_json::from_str("\"wall\"").unwrap();
        assert_eq!(back, TileType::Wall);
    }
}
