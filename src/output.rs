use crate::constants::RAD_TO_STEER;

/// Actuator commands, kept inside their legal ranges by the setters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    throttle: f64,
    steer: f64,
    brake: f64,
}

impl Output {
    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Takes a steering angle in radians and stores the normalized command.
    pub fn set_steer(&mut self, steer_radians: f64) {
        self.steer = (steer_radians * RAD_TO_STEER).clamp(-1.0, 1.0);
    }

    pub fn set_brake(&mut self, brake: f64) {
        self.brake = brake.clamp(0.0, 1.0);
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn steer(&self) -> f64 {
        self.steer
    }

    pub fn brake(&self) -> f64 {
        self.brake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_with_all_commands_at_zero() {
        let output = Output::default();
        assert_eq!((output.throttle(), output.steer(), output.brake()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn pedals_clamp_to_the_unit_interval() {
        let mut output = Output::default();
        output.set_throttle(1.7);
        output.set_brake(-0.3);
        assert_abs_diff_eq!(output.throttle(), 1.0);
        assert_abs_diff_eq!(output.brake(), 0.0);
    }

    #[test]
    fn steering_converts_radians_to_the_normalized_range() {
        let mut output = Output::default();
        output.set_steer(0.3);
        assert_abs_diff_eq!(output.steer(), 0.3 * RAD_TO_STEER, epsilon = 1e-12);
    }

    #[test]
    fn steering_clamps_after_conversion() {
        let mut output = Output::default();
        output.set_steer(2.0);
        assert_abs_diff_eq!(output.steer(), 1.0);
        output.set_steer(-2.0);
        assert_abs_diff_eq!(output.steer(), -1.0);
    }
}
