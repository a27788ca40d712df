//! Drawing ordered renderables onto a canvas.

use std::sync::Arc;

use bevy_log::debug;
use bevy_math::IVec2;

use crate::cache::TileImageCache;
use crate::context::NeighborContext;
use crate::error::TileResult;
use crate::generator::GeneratorId;
use crate::tile::TileType;
use crate::tile_image::TileImage;

use super::order::order_by_priority;
use super::pixel_buffer::PixelBuffer;
use super::renderable::{ImageSource, Renderable};

/// A draw target that accepts sprites with per-pixel alpha.
pub trait Canvas {
    /// Width and height in pixels.
    fn size(&self) -> IVec2;

    /// Draw `image` with its top left corner at `position`.
    fn blit(&mut self, image: &TileImage, position: IVec2);
}

/// Resolves cached image sources to pixels.
pub trait ImageResolver {
    fn lookup(
        &self,
        tile_type: TileType,
        generator_id: GeneratorId,
        context: &NeighborContext,
    ) -> TileResult<&Arc<TileImage>>;
}

impl ImageResolver for TileImageCache {
    fn lookup(
        &self,
        tile_type: TileType,
        generator_id: GeneratorId,
        context: &NeighborContext,
    ) -> TileResult<&Arc<TileImage>> {
        TileImageCache::lookup(self, tile_type, generator_id, context)
    }
}

/// Draws renderables in the order given, resolving cached sources.
pub struct Compositor<'a> {
    resolver: &'a dyn ImageResolver,
    background: [u8; 4],
}

impl<'a> Compositor<'a> {
    pub fn new(resolver: &'a dyn ImageResolver) -> Self {
        Self {
            resolver,
            background: [0, 0, 0, 255],
        }
    }

    /// Color a fresh frame is cleared to. Opaque black by default.
    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }

    fn resolve<'r>(&'r self, renderable: &'r Renderable) -> TileResult<&'r TileImage> {
        match &renderable.source {
            ImageSource::Cached {
                tile_type,
                generator_id,
                context,
            } => Ok(self
                .resolver
                .lookup(*tile_type, *generator_id, context)?
                .as_ref()),
            ImageSource::Inline(image) => Ok(image.as_ref()),
        }
    }

    /// Draw `renderables` onto `canvas` in slice order.
    ///
    /// Every source is resolved before the first blit, so a missing cache
    /// entry leaves the canvas untouched.
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        renderables: &[Renderable],
    ) -> TileResult<()> {
        let images = renderables
            .iter()
            .map(|r| self.resolve(r))
            .collect::<TileResult<Vec<_>>>()?;
        for (image, renderable) in images.into_iter().zip(renderables) {
            canvas.blit(image, renderable.position);
        }
        Ok(())
    }

    /// Order `renderables` and draw them onto a new `width x height` frame.
    pub fn render_frame(
        &self,
        mut renderables: Vec<Renderable>,
        width: usize,
        height: usize,
    ) -> TileResult<PixelBuffer> {
        order_by_priority(&mut renderables);
        let mut frame = PixelBuffer::with_color(width, height, self.background);
        self.draw(&mut frame, &renderables)?;
        debug!(
            "Composited {} renderables into a {}x{} frame",
            renderables.len(),
            width,
            height
        );
        Ok(frame)
    }
}
