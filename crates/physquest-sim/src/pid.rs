//! Discrete PID controller shared by the tank and pendulum quests.
//!
//! The derivative is taken on the error difference between consecutive
//! updates. The integral can be clamped and, with anti-windup enabled, is
//! frozen while the output is saturated in the direction the error pushes it.

use serde::{Deserialize, Serialize};

use physquest_core::error::SimError;

/// Controller gains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        SimError::check_finite("kp", self.kp)?;
        SimError::check_finite("ki", self.ki)?;
        SimError::check_finite("kd", self.kd)?;
        Ok(())
    }
}

/// Everything one update computed, for plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    /// Control signal after output clamping.
    pub output: f64,
    /// Control signal before clamping.
    pub raw: f64,
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
}

impl PidOutput {
    pub fn saturated(&self) -> bool {
        self.output != self.raw
    }
}

#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    integral: f64,
    previous_error: f64,
    initial_previous_error: f64,
    integral_limit: f64,
    output_min: f64,
    output_max: f64,
    anti_windup: bool,
}

impl PidController {
    /// Unbounded controller with no anti-windup.
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            previous_error: 0.0,
            initial_previous_error: 0.0,
            integral_limit: f64::INFINITY,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
            anti_windup: false,
        }
    }

    pub fn with_output_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self
    }

    pub fn with_integral_limit(mut self, limit: f64) -> Self {
        self.integral_limit = limit.abs();
        self
    }

    pub fn with_anti_windup(mut self, enabled: bool) -> Self {
        self.anti_windup = enabled;
        self
    }

    /// Error assumed before the first update, so the first derivative is
    /// measured against it. Also used after `reset`.
    pub fn with_previous_error(mut self, error: f64) -> Self {
        self.previous_error = error;
        self.initial_previous_error = error;
        self
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = self.initial_previous_error;
    }

    /// Compute the control signal for `error` after `dt` seconds.
    pub fn update(&mut self, error: f64, dt: f64, feedforward: f64) -> PidOutput {
        let PidGains { kp, ki, kd } = self.gains;

        let derivative = (error - self.previous_error) / dt;
        self.previous_error = error;

        let candidate = self.integral + error * dt;
        let integrate = if self.anti_windup {
            let raw = feedforward + kp * error + ki * candidate + kd * derivative;
            let winding_up = raw > self.output_max && ki * error > 0.0;
            let winding_down = raw < self.output_min && ki * error < 0.0;
            !(winding_up || winding_down)
        } else {
            true
        };
        if integrate {
            self.integral = candidate;
        }
        self.integral = self.integral.clamp(-self.integral_limit, self.integral_limit);

        let raw = feedforward + kp * error + ki * self.integral + kd * derivative;
        PidOutput {
            output: raw.clamp(self.output_min, self.output_max),
            raw,
            error,
            integral: self.integral,
            derivative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_only_tracks_error() {
        let mut pid = PidController::new(PidGains::new(2.0, 0.0, 0.0));
        let out = pid.update(0.5, 0.1, 0.0);
        assert_eq!(out.output, 1.0);
        // Derivative is measured from the default previous error of zero.
        assert!((out.derivative - 5.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_previous_error_suppresses_first_kick() {
        let mut pid = PidController::new(PidGains::new(0.0, 0.0, 1.0)).with_previous_error(0.5);
        let out = pid.update(0.5, 0.1, 0.0);
        assert_eq!(out.derivative, 0.0);
        assert_eq!(out.output, 0.0);
    }

    #[test]
    fn integral_is_clamped() {
        let mut pid = PidController::new(PidGains::new(0.0, 1.0, 0.0)).with_integral_limit(1.0);
        for _ in 0..100 {
            pid.update(1.0, 0.1, 0.0);
        }
        assert_eq!(pid.integral(), 1.0);
    }

    #[test]
    fn anti_windup_freezes_integral_while_saturated() {
        let mut pid = PidController::new(PidGains::new(1.0, 1.0, 0.0))
            .with_output_limits(0.0, 0.5)
            .with_anti_windup(true);
        for _ in 0..50 {
            let out = pid.update(1.0, 0.1, 0.0);
            assert!(out.saturated());
            assert_eq!(out.output, 0.5);
        }
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn anti_windup_allows_unwinding() {
        let mut pid = PidController::new(PidGains::new(0.0, 1.0, 0.0))
            .with_output_limits(0.0, 10.0)
            .with_anti_windup(true);
        pid.update(1.0, 1.0, 0.0);
        assert_eq!(pid.integral(), 1.0);
        // A step that would drive the output below its floor is not integrated.
        let out = pid.update(-3.0, 1.0, 0.0);
        assert_eq!(pid.integral(), 1.0);
        assert_eq!(out.output, 1.0);
        let out = pid.update(-0.5, 1.0, 0.0);
        assert_eq!(pid.integral(), 0.5);
        assert_eq!(out.output, 0.5);
    }

    #[test]
    fn reset_restores_seeded_state() {
        let mut pid = PidController::new(PidGains::new(1.0, 1.0, 1.0)).with_previous_error(0.25);
        pid.update(1.0, 0.1, 0.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        let out = pid.update(0.25, 0.1, 0.0);
        assert_eq!(out.derivative, 0.0);
    }

    #[test]
    fn rejects_non_finite_gains() {
        assert!(PidGains::new(f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(PidGains::new(1.0, 0.1, 0.1).validate().is_ok());
    }
}
