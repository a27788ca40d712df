//! Side-by-side previews of several tile sets.
//!
//! A gallery draws the same grid once per tile set, each inside its own panel.
//! Panels are laid out row-major on a `rows x columns` grid; panel `i` shows
//! the `i`-th selection. Each panel carries a selected flag that a host UI
//! toggles by hit-testing pointer positions against the panel rectangles.

use std::path::{Path, PathBuf};

use bevy_log::{debug, info};
use bevy_math::IVec2;

use crate::cache::TileImageCache;
use crate::config::TileSetConfig;
use crate::coords::{top_left_of_cell, GridCell, TileDimensions};
use crate::error::TileResult;
use crate::grid::TileGrid;
use crate::tile::TileType;

use super::collector::{RenderableCollector, TileSelection};
use super::compositor::Compositor;
use super::pixel_buffer::PixelBuffer;
use super::renderable::Renderable;

/// Border color of selected panels.
const SELECTED_BORDER: [u8; 4] = [190, 190, 190, 200];
const BORDER_WIDTH: i32 = 2;

/// Placement of the panel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalleryLayout {
    pub rows: usize,
    pub columns: usize,
    /// Size of one panel.
    pub panel: TileDimensions,
    /// Top left corner of the first panel.
    pub origin: IVec2,
    /// Offset of the tile grid inside its panel.
    pub inner_border: IVec2,
}

impl GalleryLayout {
    /// Panels sized to fit `grid` with a small margin, stacked in one column.
    pub fn stacked(grid: &TileGrid, config: &TileSetConfig, rows: usize) -> Self {
        Self {
            rows,
            columns: 1,
            panel: TileDimensions::new(
                grid.columns() as u32 * config.cell.width + 10,
                grid.rows() as u32 * config.cell.height + 30,
            ),
            origin: IVec2::new(15, 15),
            inner_border: IVec2::new(5, 20),
        }
    }

    pub fn panel_count(&self) -> usize {
        self.rows * self.columns
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalleryPanel {
    pub selection: TileSelection,
    pub top_left: IVec2,
    pub selected: bool,
}

impl GalleryPanel {
    fn contains(&self, point: IVec2, size: TileDimensions) -> bool {
        let rel = point - self.top_left;
        rel.x >= 0 && rel.y >= 0 && rel.x < size.width as i32 && rel.y < size.height as i32
    }
}

/// A grid of panels, each previewing one tile set.
#[derive(Clone, Debug)]
pub struct TilesetGallery {
    grid: TileGrid,
    collector: RenderableCollector,
    layout: GalleryLayout,
    panels: Vec<GalleryPanel>,
}

impl TilesetGallery {
    /// Lay out one panel per selection, up to the layout's capacity.
    pub fn new(
        grid: TileGrid,
        config: &TileSetConfig,
        layout: GalleryLayout,
        selections: &[TileSelection],
    ) -> Self {
        let panels = selections
            .iter()
            .take(layout.panel_count())
            .enumerate()
            .map(|(i, &selection)| GalleryPanel {
                selection,
                top_left: top_left_of_cell(
                    GridCell::new(i / layout.columns, i % layout.columns),
                    layout.panel,
                    layout.origin,
                ),
                selected: false,
            })
            .collect();
        Self {
            grid,
            collector: RenderableCollector::from_config(config, IVec2::ZERO),
            layout,
            panels,
        }
    }

    /// One panel per zipped generator selection of `cache`.
    pub fn from_cache(
        grid: TileGrid,
        config: &TileSetConfig,
        layout: GalleryLayout,
        cache: &TileImageCache,
    ) -> Self {
        Self::new(grid, config, layout, &cache.zipped_selections())
    }

    pub fn layout(&self) -> &GalleryLayout {
        &self.layout
    }

    pub fn panels(&self) -> &[GalleryPanel] {
        &self.panels
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Width and height that fit every panel plus the origin margin on both sides.
    pub fn canvas_size(&self) -> (usize, usize) {
        let width = 2 * self.layout.origin.x
            + self.layout.columns as i32 * self.layout.panel.width as i32;
        let height =
            2 * self.layout.origin.y + self.layout.rows as i32 * self.layout.panel.height as i32;
        (width.max(0) as usize, height.max(0) as usize)
    }

    /// Renderables for every panel, concatenated in panel order.
    pub fn collect_renderables(&self) -> TileResult<Vec<Renderable>> {
        let mut out = Vec::new();
        for panel in &self.panels {
            let origin = panel.top_left + self.layout.inner_border;
            let collector = self.collector.with_origin(origin);
            out.extend(collector.collect(&self.grid, &panel.selection)?);
        }
        Ok(out)
    }

    /// Index of the panel containing `point`, if any.
    pub fn panel_at(&self, point: IVec2) -> Option<usize> {
        self.panels
            .iter()
            .position(|panel| panel.contains(point, self.layout.panel))
    }

    /// Flip the selected flag of panel `index`. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let panel = self.panels.get_mut(index)?;
        panel.selected = !panel.selected;
        debug!("Panel {} selected: {}", index, panel.selected);
        Some(panel.selected)
    }

    /// Toggle whichever panel contains `point`. Returns its index.
    pub fn toggle_at(&mut self, point: IVec2) -> Option<usize> {
        let index = self.panel_at(point)?;
        self.toggle(index);
        Some(index)
    }

    /// Selections of all selected panels, in panel order.
    pub fn selected(&self) -> Vec<TileSelection> {
        self.panels
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.selection)
            .collect()
    }

    /// Per-panel score for the generator population: 1 if selected, else 0.
    pub fn scores(&self) -> Vec<(TileSelection, f64)> {
        self.panels
            .iter()
            .map(|p| (p.selection, if p.selected { 1.0 } else { 0.0 }))
            .collect()
    }

    /// Composite every panel, then outline the selected ones.
    pub fn render(&self, cache: &TileImageCache) -> TileResult<PixelBuffer> {
        let (width, height) = self.canvas_size();
        let mut frame =
            Compositor::new(cache).render_frame(self.collect_renderables()?, width, height)?;
        for panel in self.panels.iter().filter(|p| p.selected) {
            outline(&mut frame, panel.top_left, self.layout.panel);
        }
        Ok(frame)
    }

    /// Export the sprites of every selected panel, one directory per panel.
    pub fn export_selected(
        &self,
        cache: &TileImageCache,
        dir: impl AsRef<Path>,
    ) -> TileResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (index, panel) in self.panels.iter().enumerate() {
            if !panel.selected {
                continue;
            }
            let panel_dir = dir.as_ref().join(format!("panel_{}", index));
            for tile_type in TileType::ALL {
                let generator_id = panel.selection.get(tile_type);
                if let Some(prototype) = cache.prototype(tile_type, generator_id) {
                    written.extend(prototype.export_pngs(&panel_dir)?);
                }
            }
        }
        info!("Exported {} sprites", written.len());
        Ok(written)
    }
}

fn outline(frame: &mut PixelBuffer, top_left: IVec2, size: TileDimensions) {
    let (w, h) = (size.width as i32, size.height as i32);
    for y in top_left.y..top_left.y + h {
        for x in top_left.x..top_left.x + w {
            let dx = (x - top_left.x).min(top_left.x + w - 1 - x);
            let dy = (y - top_left.y).min(top_left.y + h - 1 - y);
            if (dx < BORDER_WIDTH || dy < BORDER_WIDTH) && x >= 0 && y >= 0 {
                frame.blend_pixel(x as usize, y as usize, SELECTED_BORDER);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorId;

    fn selections(n: u64) -> Vec<TileSelection> {
        (0..n).map(|i| TileSelection::uniform(GeneratorId(i))).collect()
    }

    fn layout() -> GalleryLayout {
        GalleryLayout {
            rows: 2,
            columns: 2,
            panel: TileDimensions::new(116, 80),
            origin: IVec2::new(100, 100),
            inner_border: IVec2::new(10, 10),
        }
    }

    fn one_wall() -> TileGrid {
        TileGrid::from_rows(&[[0, 0, 0], [0, 1, 0], [0, 0, 0]]).unwrap()
    }

    #[test]
    fn test_panels_laid_out_row_major() {
        let gallery = TilesetGallery::new(
            one_wall(),
            &TileSetConfig::classic(),
            layout(),
            &selections(3),
        );
        let tops: Vec<_> = gallery.panels().iter().map(|p| p.top_left).collect();
        assert_eq!(
            tops,
            vec![IVec2::new(100, 100), IVec2::new(216, 100), IVec2::new(100, 180)]
        );
        assert_eq!(gallery.canvas_size(), (432, 360));
    }

    #[test]
    fn test_extra_selections_are_dropped() {
        let gallery = TilesetGallery::new(
            one_wall(),
            &TileSetConfig::classic(),
            layout(),
            &selections(9),
        );
        assert_eq!(gallery.panels().len(), 4);
    }

    #[test]
    fn test_renderables_offset_per_panel() {
        let gallery = TilesetGallery::new(
            one_wall(),
            &TileSetConfig::classic(),
            layout(),
            &selections(2),
        );
        let renderables = gallery.collect_renderables().unwrap();
        assert_eq!(renderables.len(), 20);
        assert_eq!(renderables[0].position, IVec2::new(110, 110));
        assert_eq!(renderables[10].position, IVec2::new(226, 110));
        assert_eq!(
            renderables[10].source,
            crate::render::ImageSource::Cached {
                tile_type: TileType::Floor,
                generator_id: GeneratorId(1),
                context: crate::context::NeighborContext::triple(0, 0, 0),
            }
        );
    }

    #[test]
    fn test_hit_testing_and_toggle() {
        let mut gallery = TilesetGallery::new(
            one_wall(),
            &TileSetConfig::classic(),
            layout(),
            &selections(4),
        );
        assert_eq!(gallery.panel_at(IVec2::new(100, 100)), Some(0));
        assert_eq!(gallery.panel_at(IVec2::new(215, 179)), Some(0));
        assert_eq!(gallery.panel_at(IVec2::new(216, 179)), Some(1));
        assert_eq!(gallery.panel_at(IVec2::new(300, 250)), Some(3));
        assert_eq!(gallery.panel_at(IVec2::new(99, 100)), None);
        assert_eq!(gallery.panel_at(IVec2::new(400, 300)), None);

        assert_eq!(gallery.toggle_at(IVec2::new(120, 200)), Some(2));
        assert_eq!(gallery.selected(), vec![TileSelection::uniform(GeneratorId(2))]);
        assert_eq!(gallery.toggle(2), Some(false));
        assert!(gallery.selected().is_empty());
        assert_eq!(gallery.toggle(7), None);

        gallery.toggle(1);
        let scores: Vec<f64> = gallery.scores().iter().map(|(_, s)| *s).collect();
        assert_eq!(scores, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stacked_layout_fits_grid() {
        let grid = TileGrid::new(3, 25);
        let layout = GalleryLayout::stacked(&grid, &TileSetConfig::classic(), 9);
        assert_eq!(layout.panel, TileDimensions::new(810, 90));
        assert_eq!(layout.panel_count(), 9);
    }

    #[test]
    fn test_outline_draws_border_only() {
        let mut frame = PixelBuffer::with_color(10, 10, [0, 0, 0, 255]);
        outline(&mut frame, IVec2::new(1, 1), TileDimensions::new(8, 8));
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0, 255]);
        assert_ne!(frame.get_pixel(1, 1), [0, 0, 0, 255]);
        assert_ne!(frame.get_pixel(2, 5), [0, 0, 0, 255]);
        assert_eq!(frame.get_pixel(3, 3), [0, 0, 0, 255]);
        assert_ne!(frame.get_pixel(7, 8), [0, 0, 0, 255]);
    }
}
