//! Engine binary for the Terminus station core.
//!
//! Loads configuration and a scenario, builds every station through the
//! lifecycle, runs the global catchment recompute, logs a report, and shuts
//! down through bulk pool cleanup.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `terminus-config.yaml` (or `TERMINUS_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the empty world and station state
//! 4. Load and apply the scenario (first argument, or `TERMINUS_SCENARIO`)
//! 5. Recompute every catchment and log the report
//! 6. Clean the station pool

mod error;
mod report;

use std::path::{Path, PathBuf};

use terminus_core::config::SimulationConfig;
use terminus_core::scenario::Scenario;
use terminus_core::{SimulationState, StationLifecycle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::TeardownLog;

const DEFAULT_CONFIG: &str = "terminus-config.yaml";
const DEFAULT_SCENARIO: &str = "scenarios/fenwick.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or scenario operation fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
        )
        .with_target(true)
        .init();

    info!(
        world_name = %config.world.name,
        seed = config.world.seed,
        size_x = config.world.size_x,
        size_y = config.world.size_y,
        station_spread = config.station.station_spread,
        catchment_increase = config.station.catchment_increase,
        "Configuration loaded"
    );

    run(&config)?;
    Ok(())
}

fn run(config: &SimulationConfig) -> Result<(), EngineError> {
    // 3. Create state.
    let state = SimulationState::new(config)?;
    let mut lifecycle = StationLifecycle::new(state);
    lifecycle.register_hook(Box::new(TeardownLog::new()));
    info!("World created");

    // 4. Load and apply the scenario.
    let scenario_path = scenario_path();
    let scenario = Scenario::from_file(&scenario_path)?;
    let stations = scenario.apply(&mut lifecycle)?;
    info!(
        path = %scenario_path.display(),
        stations = stations.len(),
        "Scenario applied"
    );

    // 5. Authoritative recompute, then report.
    lifecycle.recompute_all()?;
    report::log_catchment_report(lifecycle.state());

    // 6. Shutdown.
    let discarded = lifecycle.clean_pool();
    info!(discarded, "terminus-engine shutdown complete");
    Ok(())
}

/// Load the simulation configuration.
///
/// Uses `TERMINUS_CONFIG` if set, else `terminus-config.yaml` in the
/// working directory. A missing default file falls back to defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    if let Ok(path) = std::env::var("TERMINUS_CONFIG") {
        return Ok(SimulationConfig::from_file(Path::new(&path))?);
    }
    let config_path = Path::new(DEFAULT_CONFIG);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

fn scenario_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TERMINUS_SCENARIO").ok())
        .map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from)
}
