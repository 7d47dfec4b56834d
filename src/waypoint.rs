use crate::{constants::LOOKAHEAD_ADVANCE_TICKS, error::ControlError};
use noisy_float::types::r64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub target_speed: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, target_speed: f64) -> Self {
        Self { x, y, target_speed }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Cruise speed taken from the waypoint nearest to the vehicle. Ties go to
/// the earlier waypoint; the terminal waypoint keeps its own target speed.
pub fn desired_speed(route: &[Waypoint], x: f64, y: f64) -> Result<f64, ControlError> {
    let nearest = route
        .iter()
        .min_by_key(|waypoint| r64(waypoint.distance_to(x, y)))
        .ok_or(ControlError::EmptyRoute)?;
    Ok(nearest.target_speed)
}

/// Lookahead target for steering. Advances one waypoint every
/// `LOOKAHEAD_ADVANCE_TICKS` control ticks and holds the last waypoint once
/// the route is exhausted.
pub fn lookahead(route: &[Waypoint], step: u64) -> Result<Waypoint, ControlError> {
    let last = route.len().checked_sub(1).ok_or(ControlError::EmptyRoute)?;
    let index = (step / LOOKAHEAD_ADVANCE_TICKS) as usize;
    Ok(route[index.min(last)])
}
