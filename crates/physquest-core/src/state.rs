//! Simulation state and frame snapshots: what the front end plots after each step.
//!
//! Each quest keeps its own time series. Series are appended once per step
//! and cleared when the simulation restarts; nothing is shared across quests.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::SimTime;

/// Projectile flight as revealed so far by the animation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectileFrame {
    pub time: SimTime,
    pub target_distance: f64,
    /// Launch speed (m/s).
    pub speed: f64,
    /// Launch angle (degrees).
    pub angle_deg: f64,
    /// Analytic landing distance (meters).
    pub range: f64,
    /// Analytic flight time (seconds).
    pub time_of_flight: f64,
    /// Trajectory samples revealed so far (x = downrange, y = height).
    pub revealed: Vec<DVec2>,
}

/// Water tank time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TankSeries {
    pub times: Vec<f64>,
    pub levels: Vec<f64>,
    /// Valve coefficient (control signal) per step.
    pub kv: Vec<f64>,
    pub errors: Vec<f64>,
    pub integrals: Vec<f64>,
    pub derivatives: Vec<f64>,
}

impl TankSeries {
    /// Series holding only the initial sample.
    pub fn starting_at(level: f64) -> Self {
        Self {
            times: vec![0.0],
            levels: vec![level],
            kv: vec![0.0],
            errors: vec![0.0],
            integrals: vec![0.0],
            derivatives: vec![0.0],
        }
    }

    pub fn push(&mut self, sample: TankSample) {
        self.times.push(sample.time);
        self.levels.push(sample.level);
        self.kv.push(sample.kv);
        self.errors.push(sample.error);
        self.integrals.push(sample.integral);
        self.derivatives.push(sample.derivative);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// One controller step of the water tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TankSample {
    pub time: f64,
    pub level: f64,
    pub kv: f64,
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TankFrame {
    pub time: SimTime,
    pub target_level: f64,
    pub series: TankSeries,
}

/// Mass-spring-damper time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpringSeries {
    pub times: Vec<f64>,
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
}

impl SpringSeries {
    pub fn starting_at(position: f64) -> Self {
        Self {
            times: vec![0.0],
            positions: vec![position],
            velocities: vec![0.0],
        }
    }

    pub fn push(&mut self, time: f64, position: f64, velocity: f64) {
        self.times.push(time);
        self.positions.push(position);
        self.velocities.push(velocity);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpringFrame {
    pub time: SimTime,
    pub target_position: f64,
    pub series: SpringSeries,
}

/// Cart-pendulum time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendulumSeries {
    pub times: Vec<f64>,
    pub cart_positions: Vec<f64>,
    pub cart_velocities: Vec<f64>,
    /// Angle from upright (radians).
    pub angles: Vec<f64>,
    pub angular_velocities: Vec<f64>,
    pub forces: Vec<f64>,
}

impl PendulumSeries {
    pub fn starting_at(angle: f64) -> Self {
        Self {
            times: vec![0.0],
            cart_positions: vec![0.0],
            cart_velocities: vec![0.0],
            angles: vec![angle],
            angular_velocities: vec![0.0],
            forces: vec![0.0],
        }
    }

    pub fn push(&mut self, time: f64, state: CartPoleState, force: f64) {
        self.times.push(time);
        self.cart_positions.push(state.x);
        self.cart_velocities.push(state.x_dot);
        self.angles.push(state.theta);
        self.angular_velocities.push(state.theta_dot);
        self.forces.push(force);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Instantaneous cart-pendulum state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendulumFrame {
    pub time: SimTime,
    /// Cart pivot position for the animation.
    pub pivot: DVec2,
    /// Pendulum center of mass for the animation.
    pub bob: DVec2,
    /// Set once |θ| exceeded the fall angle.
    pub fallen: bool,
    pub series: PendulumSeries,
}

/// Per-epoch training metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingSeries {
    pub train_losses: Vec<f64>,
    pub val_losses: Vec<f64>,
    pub train_accuracies: Vec<f64>,
    pub val_accuracies: Vec<f64>,
}

impl TrainingSeries {
    pub fn push(&mut self, epoch: EpochMetrics) {
        self.train_losses.push(epoch.train_loss);
        self.val_losses.push(epoch.val_loss);
        self.train_accuracies.push(epoch.train_accuracy);
        self.val_accuracies.push(epoch.val_accuracy);
    }

    pub fn epochs(&self) -> usize {
        self.train_losses.len()
    }
}

/// Metrics recorded after one training epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub train_loss: f64,
    pub val_loss: f64,
    pub train_accuracy: f64,
    pub val_accuracy: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingFrame {
    pub time: SimTime,
    pub epochs_planned: usize,
    pub series: TrainingSeries,
}
