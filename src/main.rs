//! # GPU Game of Life
//!
//! Opens a window and evolves a toroidal Game of Life grid on the GPU.
//!
//! ## Usage
//!
//! ```text
//! gpu-life [config.json]
//! ```
//!
//! Without a path the default configuration is used (32×32 grid, 8×8 tiles,
//! 200ms ticks, ~40% initial density). Set `RUST_LOG=debug` for more detail.

use anyhow::Context;
use gpu_life::{LifeApp, SimulationConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => SimulationConfig::default(),
    };
    log::info!(
        "Grid {}x{}, tiles {}x{}, tick every {}ms, seed density {}",
        config.grid_size,
        config.grid_size,
        config.tile_size,
        config.tile_size,
        config.tick_interval_ms,
        config.seed_density
    );

    let app = LifeApp::new(config).context("Failed to start the simulation")?;
    app.run().context("Simulation stopped")?;

    Ok(())
}
