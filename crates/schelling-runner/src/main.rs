//! Command-line runner for the Schelling segregation simulation.

mod census_log;
mod telemetry;

use anyhow::{Context, Result};
use schelling_core::RunnerConfig;
use schelling_world::Simulation;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    info!(
        size = config.simulation.size,
        threshold = config.simulation.threshold,
        seed = ?config.simulation.seed,
        max_steps = ?config.max_steps,
        "Starting Schelling simulation"
    );

    let mut simulation = Simulation::new(config.simulation.clone())?;
    simulation.add_observer(Box::new(census_log::CensusLogger::new(
        config.log_every,
        config.simulation.neighbourhood_radius,
    )));

    let token = CancellationToken::new();
    let run_token = token.clone();
    let max_steps = config.max_steps;

    let mut run = tokio::task::spawn_blocking(move || {
        let mut steps = 0u64;
        let mut stop = || {
            steps += 1;
            run_token.is_cancelled() || max_steps.is_some_and(|max| steps >= max)
        };
        simulation.run(&mut stop)
    });

    let summary = tokio::select! {
        joined = &mut run => joined?,
        _ = shutdown_signal() => {
            token.cancel();
            run.await?
        }
    };

    info!(steps = summary.steps, "Goodbye!");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Configuration file from the first argument or `SCHELLING_CONFIG`; defaults otherwise
fn load_config() -> Result<RunnerConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SCHELLING_CONFIG").ok());

    match path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            RunnerConfig::load(&path).with_context(|| format!("failed to load config {}", path))
        }
        None => Ok(RunnerConfig::default()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
