//! # engine_app — demo host
//!
//! Binary entry point. Drives the scheduler from a fixed-rate frame loop
//! over a small world of moving bodies.
//!
//! ## Startup Sequence
//!
//! 1. Read [`TickConfig`] from the environment.
//! 2. Register the demo systems.
//! 3. Restore the active set from `ENGINE_SNAPSHOT` if that file exists,
//!    otherwise activate the defaults.
//! 4. Run the tick loop until `ENGINE_MAX_TICKS` or Ctrl-C.
//! 5. Save the active set back to `ENGINE_SNAPSHOT`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use engine_app::config::TickConfig;
use engine_app::tick::TickLoop;
use engine_app::{components, systems};
use engine_system::Snapshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

const BODY_COUNT: usize = 12;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let config = TickConfig::from_env()?;
    info!(?config, "engine host starting");

    let snapshot_path = config.snapshot_path.clone();
    let mut tick_loop = TickLoop::new(config);
    components::populate(tick_loop.world_mut(), BODY_COUNT)?;
    systems::register_all(tick_loop.scheduler_mut())?;

    let restored = match snapshot_path.as_deref() {
        Some(path) if path.exists() => restore(&mut tick_loop, path)?,
        _ => 0,
    };
    if restored == 0 {
        let reference_time = tick_loop.reference_time();
        systems::activate_defaults(tick_loop.scheduler_mut(), reference_time)?;
        info!("activated default systems");
    }

    tick_loop.run_async().await?;

    if let Some(path) = snapshot_path.as_deref() {
        tick_loop.scheduler_mut().renormalize();
        save(&tick_loop, path)?;
    }

    info!(ticks = tick_loop.tick_id(), "engine host shut down");
    Ok(())
}

fn restore(tick_loop: &mut TickLoop, path: &Path) -> Result<usize> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_json_str(&json)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    let reference_time = tick_loop.reference_time();
    let restored = tick_loop.scheduler_mut().restore(&snapshot, reference_time)?;
    info!(path = %path.display(), restored, "restored active systems");
    Ok(restored)
}

fn save(tick_loop: &TickLoop, path: &Path) -> Result<()> {
    let json = tick_loop.scheduler().snapshot().to_json_string()?;
    fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        systems = tick_loop.scheduler().active_entries().len(),
        "saved active systems"
    );
    Ok(())
}
