// ==============================================================================
// main.rs — HEADLESS DEMO LOOP
// ==============================================================================
// Drives the full stack without a window: real frame times feed the ticker,
// the ticker yields fixed simulation steps, a scripted driver stands in for
// the keyboard, and telemetry goes to tracing instead of an on-screen panel.
// The once-per-second status line extrapolates the pose exactly the way a
// renderer would, using the ticker's interpolation fraction.
// ==============================================================================

use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use drivesim::{
    PhysicsConstants, Steer, TickInput, Ticker, TraceSink, VehicleDynamics, roadster,
};

const DEMO_DURATION: f32 = 20.0; // simulated seconds

/// Held key state for one tick of the scripted driver.
#[derive(Default, Clone, Copy)]
struct HeldControls {
    throttle: bool,
    reverse: bool,
    handbrake: bool,
    steer: Steer,
    gear_down: bool,
    toggle_automatic: bool,
}

/// What the "driver" is doing at simulated time `t`.
fn script(t: f32) -> HeldControls {
    let mut held = HeldControls::default();
    match t {
        t if t < 1.0 => {}
        t if t < 8.0 => held.throttle = true,
        t if t < 12.0 => {
            held.throttle = true;
            held.steer = Steer::Right;
        }
        t if t < 17.0 => held.reverse = true, // brake to a stop, then back up
        t if t < 18.0 => held.handbrake = true,
        t if t < 18.5 => held.toggle_automatic = true, // drop to manual
        t if t < 19.0 => {
            held.throttle = true;
            held.gear_down = true;
        }
        _ => held.throttle = true,
    }
    held
}

/// Edge-trigger derivation: commands fire only on the tick the key goes down.
fn tick_input(current: HeldControls, previous: HeldControls) -> TickInput {
    TickInput {
        throttle: current.throttle,
        reverse: current.reverse,
        handbrake: current.handbrake,
        steer: current.steer,
        gear_up: false,
        gear_down: current.gear_down && !previous.gear_down,
        toggle_automatic: current.toggle_automatic && !previous.toggle_automatic,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut car = VehicleDynamics::new(roadster(), PhysicsConstants::default(), 0.0)?;
    let mut ticker = Ticker::new(1.0 / 60.0, 5);
    let mut sink = TraceSink;
    let mut previous = HeldControls::default();

    tracing::info!("starting headless drive, {DEMO_DURATION} simulated seconds");

    let mut last_frame = Instant::now();
    let mut last_report = 0.0_f32;

    while ticker.simulated_time() < DEMO_DURATION {
        let now = Instant::now();
        let frame_delta = (now - last_frame).as_secs_f32();
        last_frame = now;

        ticker.tick(frame_delta);
        while ticker.poll_fixed_tick() {
            let current = script(ticker.simulated_time());
            let input = tick_input(current, previous);
            previous = current;

            car.step(&input, ticker.fixed_delta_time());
            car.emit_telemetry(&mut sink);
        }

        if ticker.simulated_time() - last_report >= 1.0 {
            last_report = ticker.simulated_time();
            // same extrapolation a renderer would draw with
            let pose = car.position()
                + car.velocity() * ticker.fixed_delta_time() * ticker.interpolation();
            let telemetry = car.telemetry();
            tracing::info!(
                t = ticker.simulated_time(),
                x = pose.x,
                y = pose.y,
                kmh = telemetry.speed * 3.6,
                rpm = telemetry.engine_rpm,
                gear = telemetry.gear,
                fps = ticker.fps(),
                "status"
            );
        }

        std::thread::sleep(Duration::from_millis(2));
    }

    tracing::info!(
        frames = ticker.frame_count(),
        ticks = ticker.fixed_tick_count(),
        "demo finished"
    );
    Ok(())
}
