use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_log::info;

use crate::context::NeighborContext;
use crate::coords::TileDimensions;
use crate::error::TileResult;
use crate::generator::{GeneratorId, SharedGenerator};
use crate::palette::Palette;
use crate::tile::TileType;
use crate::tile_image::TileImage;

/// Every sprite one generator produced for one tile type, keyed by context.
///
/// Built once per generation and never modified afterwards.
#[derive(Clone)]
pub struct TilePrototype {
    pub tile_type: TileType,
    pub dimensions: TileDimensions,
    pub generator_id: GeneratorId,
    pub generator: SharedGenerator,
    pub palette: Palette,
    images: HashMap<NeighborContext, Arc<TileImage>>,
}

impl TilePrototype {
    pub fn new(
        tile_type: TileType,
        dimensions: TileDimensions,
        generator_id: GeneratorId,
        generator: SharedGenerator,
        palette: Palette,
        images: HashMap<NeighborContext, Arc<TileImage>>,
    ) -> Self {
        Self {
            tile_type,
            dimensions,
            generator_id,
            generator,
            palette,
            images,
        }
    }

    /// The sprite for `context`, if it was generated.
    pub fn image(&self, context: &NeighborContext) -> Option<&Arc<TileImage>> {
        self.images.get(context)
    }

    /// Generated contexts, sorted.
    pub fn contexts(&self) -> Vec<NeighborContext> {
        let mut contexts: Vec<_> = self.images.keys().copied().collect();
        contexts.sort();
        contexts
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Write every sprite to `dir` as `{tile}_{context}.png`, creating `dir`
    /// if needed. Returns the written paths in context order.
    pub fn export_pngs(&self, dir: impl AsRef<Path>) -> TileResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.images.len());
        for context in self.contexts() {
            if let Some(image) = self.images.get(&context) {
                let path = dir.join(format!(
                    "{}.png",
                    TileImage::export_name(self.tile_type, &context)
                ));
                image.to_rgba_image().save(&path)?;
                written.push(path);
            }
        }
        info!(
            "Exported {} {} sprites of generator {} to {}",
            written.len(),
            self.tile_type,
            self.generator_id,
            dir.display()
        );
        Ok(written)
    }
}

impl std::fmt::Debug for TilePrototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TilePrototype")
            .field("tile_type", &self.tile_type)
            .field("dimensions", &self.dimensions)
            .field("generator_id", &self.generator_id)
            .field("palette", &self.palette)
            .field("contexts", &self.contexts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FnGenerator;

    #[test]
    fn test_export_pngs() {
        let images = [
            (NeighborContext::pair(1, 0), [255, 0, 0]),
            (NeighborContext::pair(0, 0), [0, 255, 0]),
        ]
        .into_iter()
        .map(|(ctx, rgb)| (ctx, Arc::new(TileImage::filled(3, 2, rgb, 255))))
        .collect();
        let prototype = TilePrototype::new(
            TileType::Wall,
            TileDimensions::new(3, 2),
            GeneratorId(4),
            Arc::new(FnGenerator::new(|_: &[f64]| vec![0.0; 6])),
            Palette::from_array([[0, 0, 0, 255]]),
            images,
        );

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("wall");
        let written = prototype.export_pngs(&out).unwrap();
        assert_eq!(
            written,
            vec![out.join("wall_0_0.png"), out.join("wall_1_0.png")]
        );
        let red = image::open(&written[1]).unwrap().to_rgba8();
        assert_eq!(red.dimensions(), (3, 2));
        assert_eq!(red.get_pixel(2, 1).0, [255, 0, 0, 255]);
    }
}
