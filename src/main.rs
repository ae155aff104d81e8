use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use runa_runner::config::RunnerConfig;
use runa_runner::game::headless::HeadlessHost;
use runa_runner::game::host::{Axis, AxisInput, SceneHost};
use runa_runner::game::runner::LaneRunner;
use runa_runner::game::state::{FrameContext, InputSnapshot, PrefabRef};

/// Scripted look and strafe input so the headless run exercises every system
fn drive_input(host: &mut HeadlessHost, frame: u64, tick_rate: u32) {
    let t = frame as f32 / tick_rate as f32;
    host.set_axis(Axis::MouseX, (t * 0.7).sin() * 0.2);
    host.set_axis(Axis::MouseY, (t * 0.3).cos() * 0.05);
    host.set_axis(Axis::Horizontal, (t * 0.5).sin());
    host.set_axis(Axis::Vertical, 0.0);

    for axis in Axis::ALL {
        trace!(axis = axis.name(), value = host.read_axis(axis), "scripted input");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Runa Runner v{}", env!("CARGO_PKG_VERSION"));

    let config = RunnerConfig::load_or_default();
    info!(
        "Configuration loaded: {} obstacle / {} clear prefabs, {} Hz, max_frames={:?}",
        config.tile_pools.obstacle.len(),
        config.tile_pools.clear.len(),
        config.tick_rate,
        config.max_frames
    );

    let mut host = HeadlessHost::new();
    let player = host.spawn(&PrefabRef::from("player"), None)?;
    let camera = host.spawn(&PrefabRef::from("camera"), Some(player))?;

    let mut runner = LaneRunner::new(config.clone());
    runner.bind_player(player);
    runner.bind_camera(camera);
    runner.initialize(&host)?;

    let mut ticker = interval(Duration::from_secs_f32(1.0 / config.tick_rate as f32));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;

                drive_input(&mut host, runner.frame(), config.tick_rate);
                let ctx = FrameContext::new(dt, InputSnapshot::poll(&host));
                for event in runner.step(&mut host, &ctx)? {
                    debug!(?event, "lane event");
                }

                if config.max_frames.is_some_and(|max| runner.frame() >= max) {
                    info!("Reached {} frames", runner.frame());
                    break;
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(
        "Runner stopped after {} frames, {} rows generated, {} live objects ({} spawned, {} destroyed)",
        runner.frame(),
        runner.rows_generated(),
        host.live_objects(),
        host.spawned_total(),
        host.destroyed_total()
    );
    info!("Final lane: {}", serde_json::to_string(&runner.snapshot())?);

    Ok(())
}
