//! Tile prototype cache.
//!
//! The cache holds one `TilePrototype` per (tile type, generator id), each
//! with a sprite for every declared neighbor context. It is rebuilt wholesale
//! by `TileCacheBuilder` whenever the generator population advances and is
//! read-only in between; renderables only carry keys into it.

mod builder;
mod prototype;

pub use builder::TileCacheBuilder;
pub use prototype::TilePrototype;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bevy_ecs::prelude::Resource;

use crate::context::NeighborContext;
use crate::error::{TileError, TileResult};
use crate::generator::GeneratorId;
use crate::render::TileSelection;
use crate::tile::TileType;
use crate::tile_image::TileImage;

/// Generated sprites for one generation of the generator population.
#[derive(Resource, Debug, Default)]
pub struct TileImageCache {
    generation: u64,
    prototypes: HashMap<(TileType, GeneratorId), TilePrototype>,
    /// Generator ids per tile type, in registry order.
    order: BTreeMap<TileType, Vec<GeneratorId>>,
}

impl TileImageCache {
    /// An empty cache for `generation`.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub(crate) fn insert(&mut self, prototype: TilePrototype) {
        let key = (prototype.tile_type, prototype.generator_id);
        if self.prototypes.insert(key, prototype).is_none() {
            self.order.entry(key.0).or_default().push(key.1);
        }
    }

    /// Generation this cache was built for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sprite for (tile type, generator, context).
    ///
    /// A missing entry means the caller asked for something the build never
    /// declared, so it is reported rather than generated on demand.
    pub fn lookup(
        &self,
        tile_type: TileType,
        generator_id: GeneratorId,
        context: &NeighborContext,
    ) -> TileResult<&Arc<TileImage>> {
        self.prototypes
            .get(&(tile_type, generator_id))
            .and_then(|prototype| prototype.image(context))
            .ok_or(TileError::MissingCacheEntry {
                tile_type,
                generator_id,
                context: *context,
            })
    }

    pub fn prototype(
        &self,
        tile_type: TileType,
        generator_id: GeneratorId,
    ) -> Option<&TilePrototype> {
        self.prototypes.get(&(tile_type, generator_id))
    }

    /// Generator ids cached for `tile_type`, in registry order.
    pub fn generator_ids(&self, tile_type: TileType) -> &[GeneratorId] {
        self.order.get(&tile_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }

    /// Total number of cached sprites.
    pub fn image_count(&self) -> usize {
        self.prototypes.values().map(TilePrototype::image_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Pair up the i-th floor, wall and roof generators into tile sets.
    ///
    /// Stops at the shortest population.
    pub fn zipped_selections(&self) -> Vec<TileSelection> {
        let floors = self.generator_ids(TileType::Floor);
        let walls = self.generator_ids(TileType::Wall);
        let roofs = self.generator_ids(TileType::Roof);
        floors
            .iter()
            .zip(walls)
            .zip(roofs)
            .map(|((&floor, &wall), &roof)| TileSelection { floor, wall, roof })
            .collect()
    }
}
