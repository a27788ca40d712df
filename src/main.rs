//! Headless tile studio demo.
//!
//! Builds a population of random generators per tile type, generates the tile
//! cache, lays out one gallery panel per tile set and writes the composite to
//! a PNG.
//!
//! ```text
//! tile_studio [--out gallery.png] [--seed 7] [--population 9]
//!             [--palette sand|pastel|classic] [--config tiles.json]
//!             [--per-pixel] [--level level.png] [--select 0,3]
//!             [--export dir]
//! ```

use std::path::PathBuf;

use bevy_log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tile_core::render::GalleryLayout;
use tile_core::{
    distinct_contexts, DenseNetwork, GeneratorId, GeneratorRegistry, StrategyConfig,
    TileCacheBuilder, TileGrid, TileResult, TileSetConfig, TileType, TilesetGallery,
};

/// Level used when no `--level` image is given.
const SAMPLE_LEVEL: [[i32; 25]; 3] = [
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 1, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 0, 0, 1, 0, 0],
];

const HIDDEN_LAYERS: [usize; 2] = [8, 8];

#[derive(Debug)]
struct DemoArgs {
    out: PathBuf,
    seed: u64,
    population: usize,
    palette: String,
    config: Option<PathBuf>,
    per_pixel: bool,
    level: Option<PathBuf>,
    select: Vec<usize>,
    export: Option<PathBuf>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            out: PathBuf::from("gallery.png"),
            seed: 7,
            population: 9,
            palette: "sand".to_string(),
            config: None,
            per_pixel: false,
            level: None,
            select: Vec::new(),
            export: None,
        }
    }
}

impl DemoArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{} needs a value", flag));
            match flag.as_str() {
                "--out" => parsed.out = PathBuf::from(value()?),
                "--seed" => parsed.seed = parse_number(&value()?)?,
                "--population" => parsed.population = parse_number(&value()?)?,
                "--palette" => parsed.palette = value()?,
                "--config" => parsed.config = Some(PathBuf::from(value()?)),
                "--per-pixel" => parsed.per_pixel = true,
                "--level" => parsed.level = Some(PathBuf::from(value()?)),
                "--select" => {
                    parsed.select = value()?
                        .split(',')
                        .map(|s| parse_number(s.trim()))
                        .collect::<Result<_, _>>()?
                }
                "--export" => parsed.export = Some(PathBuf::from(value()?)),
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }
        Ok(parsed)
    }

    fn tile_set(&self) -> TileResult<TileSetConfig> {
        let config = match &self.config {
            Some(path) => TileSetConfig::load(path)?,
            None => match self.palette.as_str() {
                "pastel" => TileSetConfig::pastel(),
                "classic" => TileSetConfig::classic(),
                _ => TileSetConfig::sand_and_terracotta(),
            },
        };
        Ok(if self.per_pixel {
            config.with_strategy(StrategyConfig::per_pixel())
        } else {
            config
        })
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("Expected a number, got {:?}", text))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Random networks sized for the configured strategy.
fn random_registry(builder: &TileCacheBuilder, population: usize, seed: u64) -> GeneratorRegistry {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut registry = GeneratorRegistry::new();
    for tile_type in TileType::ALL {
        let inputs = builder.strategy().input_len(tile_type);
        let outputs = builder
            .strategy()
            .output_len(builder.config().dimensions(tile_type));
        for id in 0..population as u64 {
            let network = DenseNetwork::random(inputs, &HIDDEN_LAYERS, outputs, rng.gen());
            registry.insert(tile_type, GeneratorId(id), network);
        }
    }
    registry
}

fn run(args: DemoArgs) -> TileResult<()> {
    let config = args.tile_set()?;
    let grid = match &args.level {
        Some(path) => TileGrid::load_png(path)?,
        None => TileGrid::from_rows(&SAMPLE_LEVEL)?,
    };
    let contexts = distinct_contexts(&grid)?;
    info!(
        "Level is {}x{} cells using {} floor, {} wall and {} roof contexts",
        grid.rows(),
        grid.columns(),
        contexts.get(&TileType::Floor).map_or(0, |c| c.len()),
        contexts.get(&TileType::Wall).map_or(0, |c| c.len()),
        contexts.get(&TileType::Roof).map_or(0, |c| c.len()),
    );

    let builder = TileCacheBuilder::new(config.clone());
    let registry = random_registry(&builder, args.population, args.seed);
    let cache = builder.build(&registry, 0)?;

    let layout = GalleryLayout::stacked(&grid, &config, args.population);
    let mut gallery = TilesetGallery::from_cache(grid, &config, layout, &cache);
    for &index in &args.select {
        gallery.toggle(index);
    }

    let frame = gallery.render(&cache)?;
    frame.save_png(&args.out)?;
    info!(
        "Wrote {}x{} gallery to {}",
        frame.width,
        frame.height,
        args.out.display()
    );

    if let Some(dir) = &args.export {
        gallery.export_selected(&cache, dir)?;
    }
    Ok(())
}

fn main() {
    init_tracing();
    let args = match DemoArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            error!("{}", message);
            std::process::exit(2);
        }
    };
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
