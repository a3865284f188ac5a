//! Headless entry point: build a grid, run scripted sculpt strokes, save.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use glam::{UVec3, Vec3};
use tracing::{error, info, warn};
use voxsculpt_app::platform::PlatformDirs;
use voxsculpt_app::script::{procedural_from_config, stroke_rays};
use voxsculpt_app::{SculptSession, SculptTicker, SessionError};
use voxsculpt_config::{CliArgs, Config};
use voxsculpt_voxel::VoxelGrid;

/// Simulated frame time for the scripted run: a 120 Hz display.
const FRAME_DT: f64 = 1.0 / 120.0;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    voxsculpt_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> Result<(), SessionError> {
    let size = UVec3::from_array(config.grid.size);
    let color = Vec3::from_array(config.brush.color);
    let block_size = config.grid.occlusion_block_size;

    let mut session = initial_session(args, config, size, color, block_size)?;
    info!(
        size = %session.grid().size(),
        filled = session.grid().filled_count(),
        occlusion_blocks = session.occlusion().as_slice().len(),
        "session ready"
    );

    if args.strokes > 0 {
        let value = if args.erase { Vec3::ZERO } else { color };
        run_strokes(&mut session, config, args.strokes, value);
    }

    if args.save.is_some() {
        let path = PathBuf::from(&config.storage.save_path);
        session.save_flat(&path, config.storage.format)?;
    }
    Ok(())
}

fn initial_session(
    args: &CliArgs,
    config: &Config,
    size: UVec3,
    color: Vec3,
    block_size: u32,
) -> Result<SculptSession<Vec3>, SessionError> {
    if let Some(path) = &args.vox {
        let bytes = std::fs::read(path)?;
        let mut session = SculptSession::new(VoxelGrid::<Vec3>::new(UVec3::ZERO), block_size);
        session.load_from_model(&bytes)?;
        info!(path = %path.display(), "imported vox model");
        return Ok(session);
    }

    if let Some(path) = &args.load {
        let mut session = SculptSession::new(VoxelGrid::<Vec3>::new(size), block_size);
        session.load_flat(path, config.storage.format)?;
        return Ok(session);
    }

    let seed = config.generator.seed.unwrap_or_else(rand::random);
    let recipe = procedural_from_config(&config.generator, seed);
    info!(generator = recipe.name(), seed, "generating initial grid");
    Ok(SculptSession::new(recipe.generate(size, color), block_size))
}

fn run_strokes(session: &mut SculptSession<Vec3>, config: &Config, count: u32, value: Vec3) {
    let start = Instant::now();
    let mut ticker = SculptTicker::new(config.brush.tick_rate_hz);
    let mut rays = stroke_rays(session.grid().size(), count);

    let (mut hits, mut misses, mut changed, mut blocks) = (0_u32, 0_u32, 0_usize, 0_usize);
    let mut frames = 0_u64;
    let mut pending = rays.next();
    while let Some((origin, direction)) = pending {
        frames += 1;
        if !ticker.advance(FRAME_DT) {
            continue;
        }
        match session.pick_and_sculpt(
            origin,
            direction,
            config.trace.max_steps,
            config.brush.radius,
            value,
        ) {
            Some(report) => {
                hits += 1;
                changed += report.edit.changed.len();
                blocks += report.blocks_updated;
            }
            None => misses += 1,
        }
        pending = rays.next();
    }

    if misses > 0 {
        warn!(misses, "some stroke rays hit nothing");
    }
    info!(
        strokes = hits + misses,
        hits,
        frames,
        changed_voxels = changed,
        occlusion_blocks_updated = blocks,
        filled = session.grid().filled_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "scripted strokes finished"
    );
}

