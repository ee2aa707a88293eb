//! Water tank level control (quest 4).
//!
//! A single tank with constant inflow drains through a valve whose
//! coefficient Kv is the controller output: Q_out = Kv·√level. The PID
//! adds to a feedforward Kv that holds the target level at equilibrium.

use serde::{Deserialize, Serialize};

use physquest_core::constants::*;
use physquest_core::enums::{QuestId, StepOutcome};
use physquest_core::error::SimError;
use physquest_core::state::{TankFrame, TankSample, TankSeries};
use physquest_core::types::{steps_for, SimTime, Verdict};

use crate::engine::Simulation;
use crate::pid::{PidController, PidGains};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankParams {
    pub gains: PidGains,
    pub target_level: f64,
    pub inflow: f64,
    pub area: f64,
    pub kv_max: f64,
    pub dt: f64,
    pub duration_secs: f64,
}

impl Default for TankParams {
    fn default() -> Self {
        Self {
            gains: PidGains::new(TANK_DEFAULT_KP, TANK_DEFAULT_KI, TANK_DEFAULT_KD),
            target_level: TANK_TARGET_LEVEL,
            inflow: TANK_INFLOW,
            area: TANK_AREA,
            kv_max: TANK_KV_MAX,
            dt: TANK_DT,
            duration_secs: TANK_DURATION_SECS,
        }
    }
}

impl TankParams {
    pub fn with_gains(gains: PidGains) -> Self {
        Self {
            gains,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.gains.validate()?;
        SimError::check_positive("target_level", self.target_level)?;
        if self.target_level > 1.0 {
            return Err(SimError::InvalidParameter {
                name: "target_level",
                value: self.target_level,
                reason: "must not exceed the tank height of 1.0",
            });
        }
        SimError::check_finite("inflow", self.inflow)?;
        if self.inflow < 0.0 {
            return Err(SimError::InvalidParameter {
                name: "inflow",
                value: self.inflow,
                reason: "must not be negative",
            });
        }
        SimError::check_positive("area", self.area)?;
        SimError::check_positive("kv_max", self.kv_max)?;
        SimError::check_positive("dt", self.dt)?;
        SimError::check_positive("duration_secs", self.duration_secs)?;
        Ok(())
    }

    /// Valve coefficient that balances inflow at the target level.
    pub fn feedforward(&self) -> f64 {
        self.inflow / self.target_level.sqrt()
    }
}

/// PID-controlled tank simulation.
#[derive(Debug, Clone)]
pub struct WaterTank {
    params: TankParams,
    controller: PidController,
    level: f64,
    time: SimTime,
    total_steps: u64,
    series: TankSeries,
}

impl WaterTank {
    pub fn new(params: TankParams) -> Result<Self, SimError> {
        params.validate()?;
        let controller = Self::build_controller(&params);
        let total_steps = steps_for(params.duration_secs, params.dt);
        Ok(Self {
            params,
            controller,
            level: 0.0,
            time: SimTime::default(),
            total_steps,
            series: TankSeries::starting_at(0.0),
        })
    }

    fn build_controller(params: &TankParams) -> PidController {
        // Previous error starts at the initial error, so the first recorded
        // derivative is 0 rather than target / dt.
        PidController::new(params.gains)
            .with_output_limits(0.0, params.kv_max)
            .with_integral_limit(TANK_INTEGRAL_LIMIT)
            .with_anti_windup(true)
            .with_previous_error(params.target_level)
    }

    pub fn params(&self) -> &TankParams {
        &self.params
    }

    /// Change gains; takes effect on the next step, even mid-run.
    pub fn set_gains(&mut self, gains: PidGains) -> Result<(), SimError> {
        gains.validate()?;
        self.params.gains = gains;
        self.controller.set_gains(gains);
        Ok(())
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn series(&self) -> &TankSeries {
        &self.series
    }

    /// True when the trailing settle window sits inside the tolerance band.
    pub fn is_settled(&self) -> bool {
        let levels = &self.series.levels;
        let window = &levels[levels.len().saturating_sub(TANK_SETTLE_SAMPLES)..];
        window
            .iter()
            .all(|level| (level - self.params.target_level).abs() < TANK_LEVEL_TOLERANCE)
    }
}

impl Simulation for WaterTank {
    type Frame = TankFrame;

    fn quest(&self) -> QuestId {
        QuestId::WaterTank
    }

    fn dt(&self) -> f64 {
        self.params.dt
    }

    fn time(&self) -> SimTime {
        self.time
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.level = 0.0;
        self.time = SimTime::default();
        self.series = TankSeries::starting_at(0.0);
    }

    fn step(&mut self) -> StepOutcome {
        if self.time.tick >= self.total_steps {
            return StepOutcome::Finished;
        }
        let p = &self.params;
        let error = p.target_level - self.level;
        let control = self.controller.update(error, p.dt, p.feedforward());
        let kv = control.output;

        let outflow = kv * self.level.max(0.0).sqrt();
        let dlevel_dt = (p.inflow - outflow) / p.area;
        self.level = (self.level + dlevel_dt * p.dt).clamp(0.0, 1.0);

        self.time.advance(p.dt);
        self.series.push(TankSample {
            time: self.time.elapsed_secs,
            level: self.level,
            kv,
            error,
            integral: control.integral,
            derivative: control.derivative,
        });

        if self.time.tick >= self.total_steps {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    fn frame(&self) -> TankFrame {
        TankFrame {
            time: self.time,
            target_level: self.params.target_level,
            series: self.series.clone(),
        }
    }

    fn verdict(&self) -> Verdict {
        if self.is_settled() {
            Verdict::success("Success! The water level is stable.")
        } else {
            Verdict::failure("Try adjusting Kp to stabilize the level.")
        }
    }
}
