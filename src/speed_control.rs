use crate::constants::{PEDAL_NORMALIZATION, SPEED_KI, SPEED_KP, SPEED_KV};

#[derive(Debug, Clone)]
pub struct SpeedControllerInit {
    pub kp: f64,
    pub ki: f64,
    /// Applied to the raw speed delta between ticks, not the error delta.
    pub kv: f64,
    pub normalization: f64,
}

impl Default for SpeedControllerInit {
    fn default() -> Self {
        Self {
            kp: SPEED_KP,
            ki: SPEED_KI,
            kv: SPEED_KV,
            normalization: PEDAL_NORMALIZATION,
        }
    }
}

impl SpeedControllerInit {
    pub fn build(&self) -> SpeedController {
        let Self {
            kp,
            ki,
            kv,
            normalization,
        } = *self;
        SpeedController {
            kp,
            ki,
            kv,
            normalization,
        }
    }
}

#[derive(Debug)]
pub struct SpeedController {
    kp: f64,
    ki: f64,
    kv: f64,
    normalization: f64,
}

impl SpeedController {
    pub fn step(
        &self,
        target_speed: f64,
        current_speed: f64,
        previous_speed: f64,
        accumulated_error: f64,
    ) -> SpeedControl {
        let Self {
            kp,
            ki,
            kv,
            normalization,
        } = *self;

        let raw = kp * (target_speed - current_speed)
            + kv * (current_speed - previous_speed)
            + ki * accumulated_error;
        let throttle = (raw / normalization).clamp(0.0, 1.0);

        // No active braking; the vehicle slows down on its own.
        SpeedControl {
            throttle,
            brake: 0.0,
        }
    }
}

pub struct SpeedControl {
    pub throttle: f64,
    pub brake: f64,
}
