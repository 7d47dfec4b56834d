use std::f64::consts::PI;

// Longitudinal loop. Gains assume a 0-25 m/s operating range.
pub const SPEED_KP: f64 = 0.6;
pub const SPEED_KI: f64 = 0.01;
/// Gain on the raw speed delta between ticks (not the error delta).
pub const SPEED_KV: f64 = 1.0;
/// Converts the raw control signal into a 0-1 pedal fraction.
pub const PEDAL_NORMALIZATION: f64 = 16.25 / 2.0 / 5.0;

// Pure-pursuit geometry.
pub const LOOKAHEAD_BASE_M: f64 = 3.0;
pub const LOOKAHEAD_GAIN: f64 = 0.8;
pub const REAR_AXLE_OFFSET_M: f64 = 1.5;
pub const MAX_STEER_RAD: f64 = 0.3;
pub const STEER_DEADBAND_RAD: f64 = 0.05;
/// Below this target speed the pursuit formula over-amplifies the angle.
pub const MIN_PURSUIT_SPEED_MS: f64 = 10.0;
/// Steering is held at zero while the speed loop settles.
pub const STARTUP_HOLD_STEPS: u64 = 100;

/// The lookahead waypoint advances once per this many control ticks.
pub const LOOKAHEAD_ADVANCE_TICKS: u64 = 3;

pub const MAX_PHYSICAL_STEER_DEGREES: f64 = 70.0;
/// Maps a steering angle in radians onto the normalized [-1, 1] command.
pub const RAD_TO_STEER: f64 = 180.0 / MAX_PHYSICAL_STEER_DEGREES / PI;
