use anyhow::Result;
use clap::Parser;
use rand::prelude::*;
use std::f64::consts::FRAC_PI_2;
use waypoint_follower::{Controller, ControllerInit, Waypoint};

#[derive(Parser)]
struct Opts {
    /// Number of simulation frames to run.
    #[clap(long, default_value = "600")]
    pub ticks: u64,
    /// Simulated frame period in seconds.
    #[clap(long, default_value = "0.05")]
    pub time_step: f64,
    /// Seed for the route's cruise speeds.
    #[clap(long)]
    pub seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let Opts {
        ticks,
        time_step,
        seed,
    } = Opts::parse();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Straight route with varying cruise speeds, two meters apart.
    let route: Vec<Waypoint> = (0..400)
        .map(|i| Waypoint::new(i as f64 * 2.0, 0.0, rng.gen_range(8.0..15.0)))
        .collect();

    let mut controller: Controller = ControllerInit::new(route).build();

    // Minimal kinematic stand-in for the simulator.
    let (mut x, mut y, mut yaw, mut speed) = (0.0, 0.0, -FRAC_PI_2, 0.0);

    for frame in 1..=ticks {
        let timestamp = frame as f64 * time_step;
        controller.update_values(x, y, yaw, speed, timestamp, frame);
        controller.update_controls()?;
        let (throttle, steer, brake) = controller.get_commands();

        // Crude vehicle dynamics: pedals as acceleration with linear drag.
        speed += (throttle * 4.0 - brake * 8.0 - 0.05 * speed) * time_step;
        speed = speed.max(0.0);
        yaw -= steer * speed / 3.0 * time_step;
        let heading = -yaw - FRAC_PI_2;
        x += heading.cos() * speed * time_step;
        y += heading.sin() * speed * time_step;

        if frame % 50 == 0 {
            println!(
                "t={timestamp:6.2}  pos=({x:7.2}, {y:6.2})  speed={speed:5.2}  \
                 throttle={throttle:.3}  steer={steer:+.3}  brake={brake:.3}"
            );
        }
    }

    Ok(())
}
