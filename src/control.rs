use crate::{
    error::ControlError,
    output::Output,
    speed_control::{SpeedControl, SpeedController, SpeedControllerInit},
    steer_control::{SteerController, SteerControllerInit},
    waypoint::{self, Waypoint},
};
use log::debug;
use noisy_float::types::R64;

#[derive(Debug, Clone)]
pub struct ControllerInit {
    pub route: Vec<Waypoint>,
    pub speed_controller: SpeedControllerInit,
    pub steer_controller: SteerControllerInit,
    /// Symmetric bound on the accumulated speed error. Unbounded when unset,
    /// which matches the historical behavior.
    pub integral_limit: Option<f64>,
}

impl ControllerInit {
    pub fn new(route: Vec<Waypoint>) -> Self {
        Self {
            route,
            speed_controller: SpeedControllerInit::default(),
            steer_controller: SteerControllerInit::default(),
            integral_limit: None,
        }
    }

    pub fn build(self) -> Controller {
        let Self {
            route,
            speed_controller,
            steer_controller,
            integral_limit,
        } = self;

        Controller {
            state: VehicleState::default(),
            vars: PersistentState::default(),
            route,
            speed_controller: speed_controller.build(),
            steer_controller: steer_controller.build(),
            integral_limit,
            output: Output::default(),
            warmed_up: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub speed: f64,
    pub timestamp: f64,
    pub frame: u64,
}

/// Values carried from one control tick to the next.
#[derive(Debug, Clone, Default)]
pub struct PersistentState {
    pub previous_speed: f64,
    pub accumulated_speed_error: f64,
    pub step: u64,
}

#[derive(Debug)]
pub struct Controller {
    state: VehicleState,
    vars: PersistentState,
    route: Vec<Waypoint>,
    speed_controller: SpeedController,
    steer_controller: SteerController,
    integral_limit: Option<f64>,
    output: Output,
    warmed_up: bool,
}

impl Controller {
    /// Overwrites the vehicle state for the coming tick. The first non-zero
    /// frame index arms the control loop for good; the frame before it only
    /// seeds the previous-speed reference.
    pub fn update_values(
        &mut self,
        x: f64,
        y: f64,
        yaw: f64,
        speed: f64,
        timestamp: f64,
        frame: u64,
    ) {
        self.state = VehicleState {
            x,
            y,
            yaw,
            speed,
            timestamp,
            frame,
        };
        if frame != 0 {
            self.warmed_up = true;
        }
    }

    /// Replaces the route wholesale. An empty route is caught by the next
    /// `update_controls` call.
    pub fn update_waypoints(&mut self, route: Vec<Waypoint>) {
        self.route = route;
    }

    /// Runs one control tick: desired speed from the nearest waypoint, then
    /// the speed and pursuit loops once warmed up, then the tick bookkeeping.
    pub fn update_controls(&mut self) -> Result<(), ControlError> {
        let VehicleState {
            x,
            y,
            yaw,
            speed,
            timestamp,
            ..
        } = self.state;

        ensure_finite("x", x)?;
        ensure_finite("y", y)?;
        ensure_finite("yaw", yaw)?;
        ensure_finite("speed", speed)?;

        let target_speed = waypoint::desired_speed(&self.route, x, y)?;

        if self.warmed_up {
            let SpeedControl { throttle, brake } = self.speed_controller.step(
                target_speed,
                speed,
                self.vars.previous_speed,
                self.vars.accumulated_speed_error,
            );

            let lookahead = waypoint::lookahead(&self.route, self.vars.step)?;
            let steer_angle =
                self.steer_controller
                    .step(x, y, yaw, target_speed, lookahead, self.vars.step);

            self.output.set_throttle(throttle);
            self.output.set_steer(steer_angle);
            self.output.set_brake(brake);

            debug!(
                "t={timestamp:.3} step={} target={target_speed:.2} speed={speed:.2} \
                 throttle={:.3} steer={:.3}",
                self.vars.step,
                self.output.throttle(),
                self.output.steer(),
            );
        }

        // Bookkeeping runs on every tick, warm or cold.
        let accumulated = self.vars.accumulated_speed_error + (target_speed - speed);
        self.vars.accumulated_speed_error = match self.integral_limit {
            Some(limit) => accumulated.clamp(-limit, limit),
            None => accumulated,
        };
        self.vars.previous_speed = speed;
        self.vars.step += 1;

        Ok(())
    }

    /// Latest `(throttle, steer, brake)` commands. Pure read.
    pub fn get_commands(&self) -> (f64, f64, f64) {
        let output = &self.output;
        (output.throttle(), output.steer(), output.brake())
    }

    pub fn output(&self) -> &Output {
        &self.output
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ControlError> {
    match R64::try_new(value) {
        Some(_) => Ok(()),
        None => Err(ControlError::NonFinitePose { field, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn route() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0.0, 0.0, 5.0),
            Waypoint::new(50.0, 0.0, 8.0),
            Waypoint::new(100.0, 0.0, 3.0),
        ]
    }

    fn controller() -> Controller {
        ControllerInit::new(route()).build()
    }

    #[test]
    fn commands_stay_zero_until_the_first_nonzero_frame() {
        let mut controller = controller();
        for _ in 0..5 {
            controller.update_values(1.0, 0.0, -FRAC_PI_2, 2.0, 0.1, 0);
            controller.update_controls().unwrap();
            assert_eq!(controller.get_commands(), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn warm_up_is_sticky() {
        let mut controller = controller();
        controller.update_values(0.0, 0.0, -FRAC_PI_2, 0.0, 0.0, 1);
        controller.update_controls().unwrap();
        assert!(controller.get_commands().0 > 0.0);

        // A later zero frame index must not drop back to the cold state.
        controller.update_values(0.0, 0.0, -FRAC_PI_2, 1.0, 0.1, 0);
        controller.update_controls().unwrap();
        assert!(controller.get_commands().0 > 0.0);
    }

    #[test]
    fn commands_stay_within_their_ranges() {
        let mut controller = controller();
        for frame in 1..200u64 {
            let x = frame as f64 * 0.7;
            let yaw = (frame as f64 * 0.31).sin() * 3.0;
            let speed = (frame % 30) as f64;
            controller.update_values(x, -4.0, yaw, speed, frame as f64 * 0.05, frame);
            controller.update_controls().unwrap();
            let (throttle, steer, brake) = controller.get_commands();
            assert!((0.0..=1.0).contains(&throttle));
            assert!((-1.0..=1.0).contains(&steer));
            assert!((0.0..=1.0).contains(&brake));
        }
    }

    #[test]
    fn get_commands_is_idempotent() {
        let mut controller = controller();
        controller.update_values(3.0, 0.0, -FRAC_PI_2, 1.0, 0.0, 1);
        controller.update_controls().unwrap();
        let first = controller.get_commands();
        for _ in 0..10 {
            assert_eq!(controller.get_commands(), first);
        }
    }

    #[test]
    fn replaying_the_same_inputs_reproduces_the_same_outputs() {
        let run = || {
            let mut controller = controller();
            (1..150u64)
                .map(|frame| {
                    let x = frame as f64 * 0.5;
                    controller.update_values(x, 0.2, -FRAC_PI_2 + 0.1, 4.0, frame as f64, frame);
                    controller.update_controls().unwrap();
                    controller.get_commands()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn accumulated_error_raises_the_throttle_over_time() {
        let mut controller = controller();
        // Cold tick seeds the previous-speed reference.
        controller.update_values(0.0, 0.0, -FRAC_PI_2, 4.5, 0.0, 0);
        controller.update_controls().unwrap();
        // Constant small speed error: only the integral term grows.
        controller.update_values(0.0, 0.0, -FRAC_PI_2, 4.5, 0.05, 1);
        controller.update_controls().unwrap();
        let (first, ..) = controller.get_commands();
        for frame in 2..20u64 {
            controller.update_values(0.0, 0.0, -FRAC_PI_2, 4.5, frame as f64, frame);
            controller.update_controls().unwrap();
        }
        let (later, ..) = controller.get_commands();
        assert!(later > first);
    }

    #[test]
    fn integral_limit_caps_the_accumulated_error() {
        let mut init = ControllerInit::new(route());
        init.integral_limit = Some(1.0);
        let mut bounded = init.build();
        let mut unbounded = controller();
        for frame in 1..100u64 {
            bounded.update_values(0.0, 0.0, -FRAC_PI_2, 0.0, frame as f64, frame);
            bounded.update_controls().unwrap();
            unbounded.update_values(0.0, 0.0, -FRAC_PI_2, 0.0, frame as f64, frame);
            unbounded.update_controls().unwrap();
        }
        assert_abs_diff_eq!(bounded.vars.accumulated_speed_error, 1.0);
        assert_abs_diff_eq!(unbounded.vars.accumulated_speed_error, 99.0 * 5.0);
    }

    #[test]
    fn empty_route_fails_fast() {
        let mut controller = ControllerInit::new(Vec::new()).build();
        controller.update_values(0.0, 0.0, 0.0, 0.0, 0.0, 1);
        assert_eq!(controller.update_controls(), Err(ControlError::EmptyRoute));

        let mut controller = self::controller();
        controller.update_waypoints(Vec::new());
        controller.update_values(0.0, 0.0, 0.0, 0.0, 0.0, 1);
        assert_eq!(controller.update_controls(), Err(ControlError::EmptyRoute));
    }

    #[test]
    fn non_finite_pose_is_rejected_before_any_control_math() {
        let mut controller = controller();
        controller.update_values(f64::NAN, 0.0, 0.0, 0.0, 0.0, 1);
        assert!(matches!(
            controller.update_controls(),
            Err(ControlError::NonFinitePose { field: "x", value }) if value.is_nan()
        ));
        assert_eq!(controller.get_commands(), (0.0, 0.0, 0.0));

        controller.update_values(0.0, 0.0, 0.0, f64::INFINITY, 0.0, 1);
        assert_eq!(
            controller.update_controls(),
            Err(ControlError::NonFinitePose {
                field: "speed",
                value: f64::INFINITY,
            })
        );
    }
}
