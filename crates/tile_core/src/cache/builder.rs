use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bevy_log::{debug, info};
use rayon::prelude::*;

use crate::config::TileSetConfig;
use crate::context::{contexts_for, NeighborContext};
use crate::error::TileResult;
use crate::generator::{
    GeneratorId, GeneratorRegistry, ImageRequest, ImageStrategy, SharedGenerator,
};
use crate::tile::TileType;
use crate::tile_image::TileImage;

use super::{TileImageCache, TilePrototype};

type JobOutput = (TileType, GeneratorId, NeighborContext, TileImage);

/// One sprite to generate.
struct Job<'a> {
    tile_type: TileType,
    generator_id: GeneratorId,
    generator: &'a SharedGenerator,
    context: NeighborContext,
}

/// Builds a `TileImageCache` from a generator registry.
///
/// Every (tile type, generator, context) triple is an independent job; jobs
/// run on the rayon pool unless `sequential()` is requested, and results are
/// assembled into prototypes only after all of them finished.
pub struct TileCacheBuilder {
    config: TileSetConfig,
    strategy: Box<dyn ImageStrategy>,
    contexts: BTreeMap<TileType, Vec<NeighborContext>>,
    parallel: bool,
}

impl TileCacheBuilder {
    /// A builder using the strategy named in `config`.
    pub fn new(config: TileSetConfig) -> Self {
        let strategy = config.strategy.build_strategy();
        Self {
            config,
            strategy,
            contexts: TileType::ALL
                .iter()
                .map(|&t| (t, contexts_for(t)))
                .collect(),
            parallel: true,
        }
    }

    /// Override the strategy from the config.
    pub fn with_strategy(mut self, strategy: impl ImageStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Generate `contexts` for `tile_type` instead of its declared set.
    pub fn with_contexts(mut self, tile_type: TileType, contexts: Vec<NeighborContext>) -> Self {
        self.contexts.insert(tile_type, contexts);
        self
    }

    /// Run all jobs on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn config(&self) -> &TileSetConfig {
        &self.config
    }

    pub fn strategy(&self) -> &dyn ImageStrategy {
        self.strategy.as_ref()
    }

    /// Generate every sprite for every registered generator.
    ///
    /// Any failing job fails the whole build; no partial cache is returned.
    pub fn build(
        &self,
        registry: &GeneratorRegistry,
        generation: u64,
    ) -> TileResult<TileImageCache> {
        let jobs = self.jobs(registry);
        debug!(
            "Generating {} tile images with the {} strategy",
            jobs.len(),
            self.strategy.name()
        );

        let images: Vec<JobOutput> = if self.parallel {
            jobs.par_iter()
                .map(|job| self.run(job))
                .collect::<TileResult<_>>()?
        } else {
            jobs.iter()
                .map(|job| self.run(job))
                .collect::<TileResult<_>>()?
        };

        let mut grouped: HashMap<(TileType, GeneratorId), HashMap<_, _>> = HashMap::new();
        for (tile_type, generator_id, context, image) in images {
            grouped
                .entry((tile_type, generator_id))
                .or_default()
                .insert(context, Arc::new(image));
        }

        let mut cache = TileImageCache::new(generation);
        for tile_type in TileType::ALL {
            let tile = self.config.tile(tile_type);
            for (generator_id, generator) in registry.generators(tile_type) {
                let images = grouped
                    .remove(&(tile_type, *generator_id))
                    .unwrap_or_default();
                debug!(
                    "Cached {} {} images for generator {}",
                    images.len(),
                    tile_type,
                    generator_id
                );
                cache.insert(TilePrototype::new(
                    tile_type,
                    tile.dimensions,
                    *generator_id,
                    Arc::clone(generator),
                    tile.palette.clone(),
                    images,
                ));
            }
        }

        info!(
            "Built tile cache for generation {}: {} prototypes, {} images",
            generation,
            cache.prototype_count(),
            cache.image_count()
        );
        Ok(cache)
    }

    fn jobs<'a>(&self, registry: &'a GeneratorRegistry) -> Vec<Job<'a>> {
        let mut jobs = Vec::new();
        for tile_type in TileType::ALL {
            let contexts = self.contexts.get(&tile_type).map(Vec::as_slice).unwrap_or(&[]);
            for (generator_id, generator) in registry.generators(tile_type) {
                jobs.extend(contexts.iter().map(|&context| Job {
                    tile_type,
                    generator_id: *generator_id,
                    generator,
                    context,
                }));
            }
        }
        jobs
    }

    fn run(&self, job: &Job<'_>) -> TileResult<JobOutput> {
        let tile = self.config.tile(job.tile_type);
        let request = ImageRequest {
            tile_type: job.tile_type,
            generator: job.generator.as_ref(),
            context: job.context,
            dimensions: tile.dimensions,
            palette: &tile.palette,
            value_range: tile.value_range,
        };
        let image = self.strategy.generate(&request)?;
        Ok((job.tile_type, job.generator_id, job.context, image))
    }
}
