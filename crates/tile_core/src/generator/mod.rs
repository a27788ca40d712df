//! Generators and image strategies.
//!
//! A generator is an externally owned function from an input vector to an
//! output vector. The pipeline never trains or mutates generators; it only
//! calls `activate` while building the tile cache.
//!
//! - `Generator` trait: `activate(&[f64]) -> Vec<f64>`
//! - `GeneratorRegistry`: tile type -> list of (id, generator)
//! - `ImageStrategy`: turns a generator and a neighbor context into a sprite
//!
//! # Example
//!
//! ```ignore
//! let mut registry = GeneratorRegistry::new();
//! registry.insert(TileType::Floor, GeneratorId(0), FnGenerator::new(|input| {
//!     vec![input.iter().sum::<f64>() / 3.0; 32 * 20]
//! }));
//! ```

mod network;
mod strategy;

pub use network::DenseNetwork;
pub use strategy::{
    edge_proximity, normalized_coordinate, per_pixel_input, ImageRequest, ImageStrategy,
    PerPixelStrategy, WholeTileStrategy, DEFAULT_NUDGE_FACTOR,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tile::TileType;

/// A function of a context vector, treated as pure for one cache build.
pub trait Generator: Send + Sync {
    /// Evaluate the generator on `input`.
    fn activate(&self, input: &[f64]) -> Vec<f64>;
}

/// Identity of one generator within its tile type's population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneratorId(pub u64);

impl std::fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generator handle shared between the registry and cached prototypes.
pub type SharedGenerator = Arc<dyn Generator>;

/// Adapts a closure into a `Generator`.
pub struct FnGenerator<F> {
    func: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Generator for FnGenerator<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn activate(&self, input: &[f64]) -> Vec<f64> {
        (self.func)(input)
    }
}

/// The generator population, per tile type, in insertion order.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    entries: BTreeMap<TileType, Vec<(GeneratorId, SharedGenerator)>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator. An existing entry with the same id is replaced.
    pub fn insert<G: Generator + 'static>(
        &mut self,
        tile_type: TileType,
        id: GeneratorId,
        generator: G,
    ) {
        self.insert_shared(tile_type, id, Arc::new(generator));
    }

    /// Register an already shared generator.
    pub fn insert_shared(
        &mut self,
        tile_type: TileType,
        id: GeneratorId,
        generator: SharedGenerator,
    ) {
        let list = self.entries.entry(tile_type).or_default();
        match list.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = generator,
            None => list.push((id, generator)),
        }
    }

    /// Generators registered for `tile_type`.
    pub fn generators(&self, tile_type: TileType) -> &[(GeneratorId, SharedGenerator)] {
        self.entries
            .get(&tile_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ids(&self, tile_type: TileType) -> Vec<GeneratorId> {
        self.generators(tile_type).iter().map(|(id, _)| *id).collect()
    }

    /// Total number of generators over all tile types.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (tile_type, list) in &self.entries {
            let ids: Vec<u64> = list.iter().map(|(id, _)| id.0).collect();
            map.entry(tile_type, &ids);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_generator_activates() {
        let g = FnGenerator::new(|input: &[f64]| input.iter().map(|v| v * 2.0).collect());
        assert_eq!(g.activate(&[1.0, 2.5]), vec![2.0, 5.0]);
    }

    #[test]
    fn test_registry_keeps_order_and_replaces() {
        let mut registry = GeneratorRegistry::new();
        registry.insert(TileType::Wall, GeneratorId(7), FnGenerator::new(|_: &[f64]| vec![0.0]));
        registry.insert(TileType::Wall, GeneratorId(2), FnGenerator::new(|_: &[f64]| vec![0.0]));
        registry.insert(TileType::Wall, GeneratorId(7), FnGenerator::new(|_: &[f64]| vec![1.0]));

        assert_eq!(registry.ids(TileType::Wall), vec![GeneratorId(7), GeneratorId(2)]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.generators(TileType::Wall)[0].1.activate(&[]), vec![1.0]);
        assert!(registry.generators(TileType::Roof).is_empty());
    }

    #[test]
    fn test_generator_id_display() {
        assert_eq!(GeneratorId(42).to_string(), "42");
    }
}
