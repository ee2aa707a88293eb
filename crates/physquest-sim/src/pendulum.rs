//! Inverted pendulum on a cart (quest 6).
//!
//! A PID on the angle error pushes the cart. The run ends early if the
//! pendulum falls past horizontal.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use physquest_core::constants::*;
use physquest_core::enums::{PendulumModel, QuestId, StepOutcome};
use physquest_core::error::SimError;
use physquest_core::state::{CartPoleState, PendulumFrame, PendulumSeries};
use physquest_core::types::{steps_for, SimTime, Verdict};

use crate::engine::Simulation;
use crate::pid::{PidController, PidGains};

/// Height of the pivot above the track (top of the cart).
const PIVOT_HEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendulumParams {
    pub gains: PidGains,
    pub model: PendulumModel,
    pub cart_mass: f64,
    pub pole_mass: f64,
    pub length: f64,
    pub gravity: f64,
    pub initial_angle: f64,
    pub force_limit: f64,
    pub dt: f64,
    pub duration_secs: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            gains: PidGains::new(
                PENDULUM_DEFAULT_KP,
                PENDULUM_DEFAULT_KI,
                PENDULUM_DEFAULT_KD,
            ),
            model: PendulumModel::Linearized,
            cart_mass: PENDULUM_CART_MASS,
            pole_mass: PENDULUM_POLE_MASS,
            length: PENDULUM_LENGTH,
            gravity: PENDULUM_GRAVITY,
            initial_angle: PENDULUM_INITIAL_ANGLE,
            force_limit: PENDULUM_FORCE_LIMIT,
            dt: PENDULUM_DT,
            duration_secs: PENDULUM_DURATION_SECS,
        }
    }
}

impl PendulumParams {
    pub fn with_gains(gains: PidGains, model: PendulumModel) -> Self {
        Self {
            gains,
            model,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.gains.validate()?;
        SimError::check_positive("cart_mass", self.cart_mass)?;
        SimError::check_positive("pole_mass", self.pole_mass)?;
        SimError::check_positive("length", self.length)?;
        SimError::check_positive("gravity", self.gravity)?;
        SimError::check_finite("initial_angle", self.initial_angle)?;
        SimError::check_positive("force_limit", self.force_limit)?;
        SimError::check_positive("dt", self.dt)?;
        SimError::check_positive("duration_secs", self.duration_secs)?;
        Ok(())
    }

    /// Cart and pole accelerations (x'', θ'') under force `u`.
    ///
    /// Positive force tips the pendulum toward positive θ in both models.
    /// The nonlinear model deliberately departs from the textbook cart-pole,
    /// whose θ'' takes −u: here θ'' takes +u while x'' keeps +u, so it is not
    /// a physically consistent cart-pole, but one set of gains balances both.
    pub fn accelerations(&self, s: &CartPoleState, u: f64) -> (f64, f64) {
        let total_mass = self.cart_mass + self.pole_mass;
        let (g, l) = (self.gravity, self.length);
        match self.model {
            PendulumModel::Linearized => {
                let theta_dd = (g * s.theta + u / total_mass) / l;
                let x_dd = u / total_mass;
                (x_dd, theta_dd)
            }
            PendulumModel::Nonlinear => {
                let (sin, cos) = s.theta.sin_cos();
                let pole_ml = self.pole_mass * l;
                let temp = (u - pole_ml * s.theta_dot * s.theta_dot * sin) / total_mass;
                let theta_dd = (g * sin + cos * temp)
                    / (l * (4.0 / 3.0 - self.pole_mass * cos * cos / total_mass));
                let x_dd =
                    (u + pole_ml * (s.theta_dot * s.theta_dot * sin - theta_dd * cos)) / total_mass;
                (x_dd, theta_dd)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvertedPendulum {
    params: PendulumParams,
    controller: PidController,
    state: CartPoleState,
    time: SimTime,
    total_steps: u64,
    series: PendulumSeries,
    fallen: bool,
}

impl InvertedPendulum {
    pub fn new(params: PendulumParams) -> Result<Self, SimError> {
        params.validate()?;
        let controller = PidController::new(params.gains)
            .with_output_limits(-params.force_limit, params.force_limit);
        let total_steps = steps_for(params.duration_secs, params.dt);
        Ok(Self {
            controller,
            state: Self::initial_state(&params),
            time: SimTime::default(),
            total_steps,
            series: PendulumSeries::starting_at(params.initial_angle),
            fallen: false,
            params,
        })
    }

    fn initial_state(params: &PendulumParams) -> CartPoleState {
        CartPoleState {
            theta: params.initial_angle,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    pub fn set_gains(&mut self, gains: PidGains) -> Result<(), SimError> {
        gains.validate()?;
        self.params.gains = gains;
        self.controller.set_gains(gains);
        Ok(())
    }

    pub fn state(&self) -> CartPoleState {
        self.state
    }

    pub fn has_fallen(&self) -> bool {
        self.fallen
    }

    pub fn series(&self) -> &PendulumSeries {
        &self.series
    }

    /// True when every sample in the trailing window is inside the upright band.
    pub fn stayed_upright(&self) -> bool {
        let window_start = self.time.elapsed_secs - PENDULUM_UPRIGHT_WINDOW_SECS;
        self.series
            .times
            .iter()
            .zip(&self.series.angles)
            // Sample times are multiples of dt; allow for rounding at the window edge.
            .filter(|(t, _)| **t >= window_start - 1e-9)
            .all(|(_, theta)| theta.abs() < PENDULUM_UPRIGHT_TOLERANCE)
    }
}

impl Simulation for InvertedPendulum {
    type Frame = PendulumFrame;

    fn quest(&self) -> QuestId {
        QuestId::InvertedPendulum
    }

    fn dt(&self) -> f64 {
        self.params.dt
    }

    fn time(&self) -> SimTime {
        self.time
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.state = Self::initial_state(&self.params);
        self.time = SimTime::default();
        self.series = PendulumSeries::starting_at(self.params.initial_angle);
        self.fallen = false;
    }

    fn step(&mut self) -> StepOutcome {
        if self.fallen || self.time.tick >= self.total_steps {
            return StepOutcome::Finished;
        }
        let dt = self.params.dt;
        let error = -self.state.theta;
        let force = self.controller.update(error, dt, 0.0).output;

        let (x_dd, theta_dd) = self.params.accelerations(&self.state, force);
        let s = &mut self.state;
        s.theta_dot += theta_dd * dt;
        s.theta += s.theta_dot * dt;
        s.x_dot += x_dd * dt;
        s.x += s.x_dot * dt;

        self.time.advance(dt);
        self.series.push(self.time.elapsed_secs, self.state, force);

        if self.state.theta.abs() > PENDULUM_FALL_ANGLE {
            self.fallen = true;
            tracing::debug!(tick = self.time.tick, theta = self.state.theta, "pendulum fell");
            return StepOutcome::Finished;
        }
        if self.time.tick >= self.total_steps {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    fn frame(&self) -> PendulumFrame {
        let pivot = DVec2::new(self.state.x, PIVOT_HEIGHT);
        let (sin, cos) = self.state.theta.sin_cos();
        PendulumFrame {
            time: self.time,
            pivot,
            bob: pivot + self.params.length * DVec2::new(sin, cos),
            fallen: self.fallen,
            series: self.series.clone(),
        }
    }

    fn verdict(&self) -> Verdict {
        if !self.fallen && self.stayed_upright() {
            Verdict::success("Success! You've balanced the pendulum.")
        } else {
            Verdict::failure("The pendulum fell. Try adjusting the controller gains.")
        }
    }
}
