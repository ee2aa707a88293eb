//! Mass-spring-damper (quest 5).
//!
//! m·x'' + K_d·x' + K_s·(x − x_target) = 0, integrated with semi-implicit
//! Euler: velocity first, then position from the new velocity.

use serde::{Deserialize, Serialize};

use physquest_core::constants::*;
use physquest_core::enums::{QuestId, StepOutcome};
use physquest_core::error::SimError;
use physquest_core::state::{SpringFrame, SpringSeries};
use physquest_core::types::{steps_for, SimTime, Verdict};

use crate::engine::Simulation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringParams {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub initial_position: f64,
    pub target_position: f64,
    pub dt: f64,
    pub duration_secs: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: SPRING_DEFAULT_MASS,
            stiffness: SPRING_DEFAULT_STIFFNESS,
            damping: SPRING_DEFAULT_DAMPING,
            initial_position: SPRING_DEFAULT_X0,
            target_position: SPRING_TARGET_POSITION,
            dt: SPRING_DT,
            duration_secs: SPRING_DURATION_SECS,
        }
    }
}

impl SpringParams {
    pub fn validate(&self) -> Result<(), SimError> {
        SimError::check_positive("mass", self.mass)?;
        SimError::check_positive("stiffness", self.stiffness)?;
        SimError::check_finite("damping", self.damping)?;
        if self.damping < 0.0 {
            return Err(SimError::InvalidParameter {
                name: "damping",
                value: self.damping,
                reason: "must not be negative",
            });
        }
        SimError::check_finite("initial_position", self.initial_position)?;
        SimError::check_finite("target_position", self.target_position)?;
        SimError::check_positive("dt", self.dt)?;
        SimError::check_positive("duration_secs", self.duration_secs)?;
        Ok(())
    }
}

/// Damping coefficient at which the system is critically damped.
pub fn critical_damping(mass: f64, stiffness: f64) -> f64 {
    2.0 * (mass * stiffness).sqrt()
}

#[derive(Debug, Clone)]
pub struct MassSpringDamper {
    params: SpringParams,
    position: f64,
    velocity: f64,
    time: SimTime,
    total_steps: u64,
    series: SpringSeries,
}

impl MassSpringDamper {
    pub fn new(params: SpringParams) -> Result<Self, SimError> {
        params.validate()?;
        let total_steps = steps_for(params.duration_secs, params.dt);
        Ok(Self {
            position: params.initial_position,
            velocity: 0.0,
            time: SimTime::default(),
            total_steps,
            series: SpringSeries::starting_at(params.initial_position),
            params,
        })
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn series(&self) -> &SpringSeries {
        &self.series
    }

    fn acceleration(&self) -> f64 {
        let p = &self.params;
        (-p.damping * self.velocity - p.stiffness * (self.position - p.target_position)) / p.mass
    }
}

impl Simulation for MassSpringDamper {
    type Frame = SpringFrame;

    fn quest(&self) -> QuestId {
        QuestId::MassSpringDamper
    }

    fn dt(&self) -> f64 {
        self.params.dt
    }

    fn time(&self) -> SimTime {
        self.time
    }

    fn reset(&mut self) {
        self.position = self.params.initial_position;
        self.velocity = 0.0;
        self.time = SimTime::default();
        self.series = SpringSeries::starting_at(self.params.initial_position);
    }

    fn step(&mut self) -> StepOutcome {
        if self.time.tick >= self.total_steps {
            return StepOutcome::Finished;
        }
        let dt = self.params.dt;
        let acceleration = self.acceleration();
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        self.time.advance(dt);
        self.series
            .push(self.time.elapsed_secs, self.position, self.velocity);

        if self.time.tick >= self.total_steps {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    fn frame(&self) -> SpringFrame {
        SpringFrame {
            time: self.time,
            target_position: self.params.target_position,
            series: self.series.clone(),
        }
    }

    fn verdict(&self) -> Verdict {
        let position_error = (self.position - self.params.target_position).abs();
        if self.velocity.abs() < SPRING_VELOCITY_THRESHOLD
            && position_error < SPRING_POSITION_TOLERANCE
        {
            Verdict::success("Success! The mass has stopped at the target position.")
        } else {
            Verdict::failure("Adjust parameters to stop the mass at the target position.")
        }
    }
}
