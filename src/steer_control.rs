use crate::{
    constants::{
        LOOKAHEAD_BASE_M, LOOKAHEAD_GAIN, MAX_STEER_RAD, MIN_PURSUIT_SPEED_MS, REAR_AXLE_OFFSET_M,
        STARTUP_HOLD_STEPS, STEER_DEADBAND_RAD,
    },
    waypoint::Waypoint,
};
use log::trace;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct SteerControllerInit {
    pub lookahead_base: f64,
    pub lookahead_gain: f64,
    pub rear_axle_offset: f64,
    pub max_steer: f64,
    pub deadband: f64,
    pub min_speed: f64,
    pub startup_hold_steps: u64,
}

impl Default for SteerControllerInit {
    fn default() -> Self {
        Self {
            lookahead_base: LOOKAHEAD_BASE_M,
            lookahead_gain: LOOKAHEAD_GAIN,
            rear_axle_offset: REAR_AXLE_OFFSET_M,
            max_steer: MAX_STEER_RAD,
            deadband: STEER_DEADBAND_RAD,
            min_speed: MIN_PURSUIT_SPEED_MS,
            startup_hold_steps: STARTUP_HOLD_STEPS,
        }
    }
}

impl SteerControllerInit {
    pub fn build(&self) -> SteerController {
        let Self {
            lookahead_base,
            lookahead_gain,
            rear_axle_offset,
            max_steer,
            deadband,
            min_speed,
            startup_hold_steps,
        } = *self;
        SteerController {
            lookahead_base,
            lookahead_gain,
            rear_axle_offset,
            max_steer,
            deadband,
            min_speed,
            startup_hold_steps,
        }
    }
}

#[derive(Debug)]
pub struct SteerController {
    lookahead_base: f64,
    lookahead_gain: f64,
    rear_axle_offset: f64,
    max_steer: f64,
    deadband: f64,
    min_speed: f64,
    startup_hold_steps: u64,
}

impl SteerController {
    /// Pure-pursuit steering angle in radians toward the lookahead waypoint.
    ///
    /// The heading is measured against the route frame and the bearing uses
    /// atan2 with swapped arguments; the two conventions only hold together,
    /// so neither may change independently.
    pub fn step(
        &self,
        x: f64,
        y: f64,
        yaw: f64,
        target_speed: f64,
        lookahead: Waypoint,
        step: u64,
    ) -> f64 {
        let Self {
            lookahead_base,
            lookahead_gain,
            rear_axle_offset,
            max_steer,
            deadband,
            min_speed,
            startup_hold_steps,
        } = *self;

        let mut heading = -yaw - FRAC_PI_2;
        if heading.abs() < deadband {
            heading = 0.0;
        }

        // Rear axle reference point of the pursuit geometry.
        let rear_x = x - heading.cos() * rear_axle_offset;
        let rear_y = y - heading.sin() * rear_axle_offset;
        trace!(
            "pursuing ({:.2}, {:.2}) from rear axle ({rear_x:.2}, {rear_y:.2})",
            lookahead.x,
            lookahead.y
        );

        let alpha = (lookahead.x - x).atan2(lookahead.y - y) - heading;

        // A low target speed would over-amplify the angle.
        let speed = target_speed.max(min_speed);
        let mut angle = (2.0 * lookahead_base * alpha.sin() / (lookahead_gain * speed)).atan();

        // Hold the wheel straight until the speed loop settles.
        if step < startup_hold_steps {
            angle = 0.0;
        }

        angle = angle.clamp(-max_steer, max_steer);
        if angle.abs() < deadband {
            angle = 0.0;
        }
        angle
    }
}
