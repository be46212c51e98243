use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{info, LevelFilter};
use signal_hook::consts::{SIGINT, SIGTERM};
use thread_priority::{ThreadBuilder, ThreadPriority};

use autopilot::config::AutopilotParameters;
use autopilot::log::Logger;
use autopilot::mock::SimulatedDrone;
use autopilot::telemetry::Telemetry;
use autopilot::Autopilot;

const PHYSICS_PERIOD: Duration = Duration::from_millis(50);

fn target(args: &mut impl Iterator<Item = String>, name: &str) -> Result<i16> {
    let arg = args.next().ok_or_else(|| anyhow!("Missing {}", name))?;
    arg.parse().with_context(|| format!("Invalid {}: {}", name, arg))
}

fn main() -> Result<()> {
    let mut log_sink = Logger::init(LevelFilter::Info);

    let mut args = std::env::args().skip(1);
    let height = target(&mut args, "target height [dm]")?;
    let yaw = target(&mut args, "target yaw [deg]")?;

    let params = AutopilotParameters::load()?;
    info!("Parameters: {:?}", params);

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, stop.clone()).context("Registering SIGINT")?;
    signal_hook::flag::register(SIGTERM, stop.clone()).context("Registering SIGTERM")?;

    let telemetry = Arc::new(Telemetry::default());
    let drone = Arc::new(SimulatedDrone::new(telemetry.clone(), &params));
    let autopilot = Autopilot::new(params, telemetry.clone(), drone.clone());

    let physics_stop = Arc::new(AtomicBool::new(false));
    let physics = {
        let physics_stop = physics_stop.clone();
        ThreadBuilder::default()
            .name("physics")
            .priority(ThreadPriority::Max)
            .spawn_careless(move || drone.run(PHYSICS_PERIOD, &physics_stop))
            .context("Starting simulated drone")?
    };

    let climb = autopilot.auto_fly_to_height(height)?;
    let turn = autopilot.auto_turn_to_yaw(yaw)?;

    let (mut climbed, mut turned) = (false, false);
    while !(climbed && turned) {
        if stop.swap(false, Ordering::Relaxed) {
            info!("Interrupted, cancelling");
            autopilot.cancel_auto_fly_to_height();
            autopilot.cancel_auto_turn();
        }
        climbed |= climb.try_done();
        turned |= turn.try_done();
        log_sink.handle_logs();
        thread::sleep(Duration::from_millis(10));
    }

    physics_stop.store(true, Ordering::Relaxed);
    let _ = physics.join();
    info!("Final state: {:?}", telemetry.snapshot());
    log_sink.handle_logs();

    Ok(())
}
