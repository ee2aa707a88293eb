//! Projectile motion (quest 3).
//!
//! The flight is closed-form; stepping only reveals the precomputed
//! trajectory one sample at a time so the front end can animate it.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use physquest_core::constants::*;
use physquest_core::enums::{QuestId, StepOutcome};
use physquest_core::error::{parse_answer, InputError, SimError};
use physquest_core::state::ProjectileFrame;
use physquest_core::types::{SimTime, Verdict};

use crate::engine::Simulation;

/// The landing sample can dip a hair below ground through rounding.
const GROUND_EPSILON: f64 = 1e-9;

/// Flight time until the projectile returns to launch height (may be negative
/// for downward launches).
pub fn time_of_flight(speed: f64, angle_deg: f64, gravity: f64) -> f64 {
    2.0 * speed * angle_deg.to_radians().sin() / gravity
}

/// Position at time `t` after launch.
pub fn position_at(speed: f64, angle_deg: f64, gravity: f64, t: f64) -> DVec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    DVec2::new(
        speed * cos * t,
        speed * sin * t - 0.5 * gravity * t * t,
    )
}

/// Horizontal distance covered by the flight.
pub fn range(speed: f64, angle_deg: f64, gravity: f64) -> f64 {
    let flight = time_of_flight(speed, angle_deg, gravity).max(0.0);
    position_at(speed, angle_deg, gravity, flight).x
}

/// The low and high launch angles (degrees) that land at `distance`, or
/// `None` when the target is out of reach at this speed.
pub fn launch_angles_for(speed: f64, distance: f64, gravity: f64) -> Option<(f64, f64)> {
    let ratio = gravity * distance / (speed * speed);
    if !(0.0..=1.0).contains(&ratio) {
        return None;
    }
    let low = 0.5 * ratio.asin().to_degrees();
    Some((low, 90.0 - low))
}

/// Draw a target distance from the quest's range.
pub fn random_target<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(PROJECTILE_TARGET_MIN..PROJECTILE_TARGET_MAX)
}

/// Parse the launch angle typed by the player.
pub fn parse_angle(input: &str) -> Result<f64, InputError> {
    parse_answer("angle", input)
}

/// Message shown for an angle that does not parse.
pub fn angle_input_message(_err: &InputError) -> &'static str {
    "Please enter a valid angle."
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileParams {
    pub speed: f64,
    pub angle_deg: f64,
    pub target_distance: f64,
    pub gravity: f64,
    pub samples: usize,
}

impl ProjectileParams {
    pub fn new(angle_deg: f64, speed: f64, target_distance: f64) -> Self {
        Self {
            speed,
            angle_deg,
            target_distance,
            gravity: PROJECTILE_GRAVITY,
            samples: PROJECTILE_SAMPLES,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        SimError::check_positive("speed", self.speed)?;
        SimError::check_finite("angle_deg", self.angle_deg)?;
        SimError::check_positive("target_distance", self.target_distance)?;
        SimError::check_positive("gravity", self.gravity)?;
        if self.samples < 2 {
            return Err(SimError::InvalidParameter {
                name: "samples",
                value: self.samples as f64,
                reason: "must be at least 2",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProjectileLaunch {
    params: ProjectileParams,
    trajectory: Vec<DVec2>,
    revealed: usize,
    time: SimTime,
}

impl ProjectileLaunch {
    pub fn new(params: ProjectileParams) -> Result<Self, SimError> {
        params.validate()?;
        let trajectory = Self::sample_trajectory(&params);
        Ok(Self {
            params,
            trajectory,
            revealed: 0,
            time: SimTime::default(),
        })
    }

    fn sample_trajectory(p: &ProjectileParams) -> Vec<DVec2> {
        let flight = time_of_flight(p.speed, p.angle_deg, p.gravity).max(0.0);
        let last = (p.samples - 1) as f64;
        (0..p.samples)
            .map(|i| position_at(p.speed, p.angle_deg, p.gravity, flight * i as f64 / last))
            .collect()
    }

    pub fn params(&self) -> &ProjectileParams {
        &self.params
    }

    /// Full precomputed trajectory.
    pub fn trajectory(&self) -> &[DVec2] {
        &self.trajectory
    }

    pub fn revealed(&self) -> &[DVec2] {
        &self.trajectory[..self.revealed]
    }

    pub fn range(&self) -> f64 {
        range(self.params.speed, self.params.angle_deg, self.params.gravity)
    }

    pub fn time_of_flight(&self) -> f64 {
        time_of_flight(self.params.speed, self.params.angle_deg, self.params.gravity)
    }

    pub fn miss_distance(&self) -> f64 {
        (self.range() - self.params.target_distance).abs()
    }

    pub fn set_angle(&mut self, angle_deg: f64) -> Result<(), SimError> {
        SimError::check_finite("angle_deg", angle_deg)?;
        self.params.angle_deg = angle_deg;
        self.trajectory = Self::sample_trajectory(&self.params);
        self.reset();
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), SimError> {
        SimError::check_positive("speed", speed)?;
        self.params.speed = speed;
        self.trajectory = Self::sample_trajectory(&self.params);
        self.reset();
        Ok(())
    }
}

impl Simulation for ProjectileLaunch {
    type Frame = ProjectileFrame;

    fn quest(&self) -> QuestId {
        QuestId::Projectile
    }

    fn dt(&self) -> f64 {
        PROJECTILE_FRAME_SECS
    }

    fn time(&self) -> SimTime {
        self.time
    }

    fn reset(&mut self) {
        self.revealed = 0;
        self.time = SimTime::default();
    }

    fn step(&mut self) -> StepOutcome {
        let Some(next) = self.trajectory.get(self.revealed) else {
            return StepOutcome::Finished;
        };
        if next.y < -GROUND_EPSILON {
            return StepOutcome::Finished;
        }
        self.revealed += 1;
        self.time.advance(PROJECTILE_FRAME_SECS);
        if self.revealed == self.trajectory.len() {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    fn frame(&self) -> ProjectileFrame {
        ProjectileFrame {
            time: self.time,
            target_distance: self.params.target_distance,
            speed: self.params.speed,
            angle_deg: self.params.angle_deg,
            range: self.range(),
            time_of_flight: self.time_of_flight().max(0.0),
            revealed: self.revealed().to_vec(),
        }
    }

    fn verdict(&self) -> Verdict {
        if self.miss_distance() < PROJECTILE_HIT_TOLERANCE {
            Verdict::success("Hit! You've successfully hit the target!")
        } else {
            Verdict::failure("Missed! Try adjusting your angle or speed.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_angles_land_on_target() {
        let (low, high) = launch_angles_for(50.0, 200.0, PROJECTILE_GRAVITY).unwrap();
        assert!((range(50.0, low, PROJECTILE_GRAVITY) - 200.0).abs() < 1e-9);
        assert!((range(50.0, high, PROJECTILE_GRAVITY) - 200.0).abs() < 1e-9);
        assert!(low < 45.0 && high > 45.0);
    }

    #[test]
    fn unreachable_target_has_no_angle() {
        // Max range at 10 m/s is about 10.2 m.
        assert!(launch_angles_for(10.0, 100.0, PROJECTILE_GRAVITY).is_none());
    }

    #[test]
    fn downward_launch_has_zero_range() {
        assert_eq!(range(50.0, -10.0, PROJECTILE_GRAVITY), 0.0);
    }

    #[test]
    fn parse_angle_rejects_text() {
        let err = parse_angle("forty-five").unwrap_err();
        assert_eq!(angle_input_message(&err), "Please enter a valid angle.");
        assert_eq!(parse_angle(" 45 ").unwrap(), 45.0);
    }
}
