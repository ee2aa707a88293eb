//! Builds each quest from configuration and CLI overrides, runs it, and
//! scores the result.

use std::fs;

use anyhow::Context;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use validator::Validate;

use physquest_campaign::{catalog::QuestDef, Player};
use physquest_core::enums::{PendulumModel, QuestId};
use physquest_core::types::Verdict;
use physquest_sim::digits::{DigitDataset, DigitTraining, TrainingParams};
use physquest_sim::engine::{Simulation, SimulationEngine};
use physquest_sim::geometry;
use physquest_sim::pendulum::{InvertedPendulum, PendulumParams};
use physquest_sim::pid::PidGains;
use physquest_sim::projectile::{self, ProjectileLaunch, ProjectileParams};
use physquest_sim::spring::{MassSpringDamper, SpringParams};
use physquest_sim::tank::{TankParams, WaterTank};

use crate::cli::{
    AnglesArgs, Cli, Commands, DigitsArgs, GainArgs, HypotenuseArgs, PendulumArgs, ProjectileArgs,
};
use crate::config::PhysQuestConfig;
use crate::error::ConfigError;
use crate::game_loop::{self, Pacing};

/// Result of one quest attempt.
#[derive(Debug, Clone, Serialize)]
pub struct QuestOutcome {
    pub quest: QuestId,
    pub verdict: Verdict,
    pub points_awarded: u32,
    pub total_points: u32,
    /// Final frame (or computed answer for the puzzle quests).
    pub frame: serde_json::Value,
}

/// Fold command-line flags into the loaded configuration and re-validate.
pub fn apply_overrides(config: &mut PhysQuestConfig, cli: &Cli) -> anyhow::Result<()> {
    if let Some(name) = &cli.player {
        config.player.name = name.clone();
    }
    if let Some(seed) = cli.seed {
        config.run.seed = seed;
    }
    if let Some(time_scale) = cli.time_scale {
        config.run.time_scale = time_scale;
    }
    config.run.fast |= cli.fast;

    match &cli.command {
        Commands::Projectile(ProjectileArgs {
            speed: Some(speed), ..
        }) => config.projectile.speed = *speed,
        Commands::Tank(gains) => {
            override_gains(gains, &mut config.tank.kp, &mut config.tank.ki, &mut config.tank.kd)
        }
        Commands::Spring(args) => {
            let spring = &mut config.spring;
            spring.mass = args.mass.unwrap_or(spring.mass);
            spring.stiffness = args.stiffness.unwrap_or(spring.stiffness);
            spring.damping = args.damping.unwrap_or(spring.damping);
            spring.x0 = args.x0.unwrap_or(spring.x0);
        }
        Commands::Pendulum(PendulumArgs { gains, nonlinear }) => {
            let pendulum = &mut config.pendulum;
            override_gains(gains, &mut pendulum.kp, &mut pendulum.ki, &mut pendulum.kd);
            if *nonlinear {
                pendulum.model = PendulumModel::Nonlinear;
            }
        }
        Commands::Digits(args) => {
            let digits = &mut config.digits;
            digits.learning_rate = args.learning_rate.unwrap_or(digits.learning_rate);
            digits.hidden = args.hidden.unwrap_or(digits.hidden);
            digits.epochs = args.epochs.unwrap_or(digits.epochs);
            digits.init_scale = args.init_scale.unwrap_or(digits.init_scale);
        }
        _ => {}
    }

    config
        .validate()
        .map_err(ConfigError::from)
        .context("invalid quest parameters")
}

fn override_gains(gains: &GainArgs, kp: &mut f64, ki: &mut f64, kd: &mut f64) {
    *kp = gains.kp.unwrap_or(*kp);
    *ki = gains.ki.unwrap_or(*ki);
    *kd = gains.kd.unwrap_or(*kd);
}

/// Run the selected quest. Returns `None` for commands that are not quests.
pub fn run(cli: &Cli, config: &PhysQuestConfig) -> anyhow::Result<Option<QuestOutcome>> {
    let pacing = Pacing::new(config.run.fast, config.run.time_scale);
    let (quest, verdict, frame) = match &cli.command {
        Commands::Quests => return Ok(None),
        Commands::Hypotenuse(args) => run_hypotenuse(args)?,
        Commands::Angles(args) => run_angles(args)?,
        Commands::Projectile(args) => run_projectile(args, config, pacing)?,
        Commands::Tank(_) => {
            let tank = &config.tank;
            let sim = WaterTank::new(TankParams::with_gains(PidGains::new(tank.kp, tank.ki, tank.kd)))?;
            run_simulation(sim, pacing)?
        }
        Commands::Spring(_) => run_spring(config, pacing)?,
        Commands::Pendulum(_) => {
            let p = &config.pendulum;
            let params = PendulumParams::with_gains(PidGains::new(p.kp, p.ki, p.kd), p.model);
            run_simulation(InvertedPendulum::new(params)?, pacing)?
        }
        Commands::Digits(args) => run_digits(args, config, pacing)?,
    };

    let mut player = Player::new(config.player.name.clone());
    let points_awarded = if verdict.success {
        player.record_completion(&QuestDef::new(quest))
    } else {
        0
    };
    Ok(Some(QuestOutcome {
        quest,
        verdict,
        points_awarded,
        total_points: player.points,
        frame,
    }))
}

type Attempt = (QuestId, Verdict, serde_json::Value);

fn run_simulation<S: Simulation>(sim: S, pacing: Pacing) -> anyhow::Result<Attempt> {
    let quest = sim.quest();
    let mut engine = SimulationEngine::new(sim);
    let tick = game_loop::run_to_end(&mut engine, pacing);
    let verdict = tick
        .verdict
        .with_context(|| format!("{quest:?} run ended without a verdict"))?;
    Ok((quest, verdict, serde_json::to_value(&tick.frame)?))
}

fn check_sides(args: &impl Validate) -> anyhow::Result<()> {
    args.validate()
        .map_err(ConfigError::from)
        .context("invalid triangle sides")
}

fn run_hypotenuse(args: &HypotenuseArgs) -> anyhow::Result<Attempt> {
    check_sides(args)?;
    let c = geometry::hypotenuse(args.a, args.b)?;
    let verdict = Verdict::success(format!("The hypotenuse is {c:.2}."));
    let frame = serde_json::json!({ "a": args.a, "b": args.b, "hypotenuse": c });
    Ok((QuestId::Hypotenuse, verdict, frame))
}

fn run_angles(args: &AnglesArgs) -> anyhow::Result<Attempt> {
    check_sides(args)?;
    let verdict = geometry::check_angles(args.a, args.b, &args.alpha, &args.beta)?;
    let frame = serde_json::json!({ "a": args.a, "b": args.b, "alpha": args.alpha, "beta": args.beta });
    Ok((QuestId::TriangleAngles, verdict, frame))
}

fn run_projectile(
    args: &ProjectileArgs,
    config: &PhysQuestConfig,
    pacing: Pacing,
) -> anyhow::Result<Attempt> {
    let angle = match projectile::parse_angle(&args.angle) {
        Ok(angle) => angle,
        Err(err) => {
            tracing::debug!(%err, "rejected angle");
            let verdict = Verdict::failure(projectile::angle_input_message(&err));
            return Ok((QuestId::Projectile, verdict, serde_json::Value::Null));
        }
    };
    let target = match args.target {
        Some(target) => target,
        None => projectile::random_target(&mut ChaCha8Rng::seed_from_u64(config.run.seed)),
    };
    let launch = ProjectileLaunch::new(ProjectileParams::new(angle, config.projectile.speed, target))?;
    run_simulation(launch, pacing)
}

fn run_spring(config: &PhysQuestConfig, pacing: Pacing) -> anyhow::Result<Attempt> {
    let s = &config.spring;
    let params = SpringParams {
        mass: s.mass,
        stiffness: s.stiffness,
        damping: s.damping,
        initial_position: s.x0,
        ..Default::default()
    };
    run_simulation(MassSpringDamper::new(params)?, pacing)
}

fn run_digits(args: &DigitsArgs, config: &PhysQuestConfig, pacing: Pacing) -> anyhow::Result<Attempt> {
    let d = &config.digits;
    let dataset = match &args.dataset {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading dataset {}", path.display()))?;
            DigitDataset::from_json_str(&json)
                .with_context(|| format!("loading dataset {}", path.display()))?
        }
        None => DigitDataset::synthetic(d.samples_per_class, config.run.seed),
    };
    tracing::info!(samples = dataset.len(), "digit dataset ready");
    let params = TrainingParams {
        learning_rate: d.learning_rate,
        hidden: d.hidden,
        epochs: d.epochs,
        init_scale: d.init_scale,
        seed: config.run.seed,
    };
    run_simulation(DigitTraining::new(params, &dataset)?, pacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn outcome(args: &[&str]) -> anyhow::Result<Option<QuestOutcome>> {
        let cli = Cli::parse_from(args);
        let mut config = PhysQuestConfig::default();
        apply_overrides(&mut config, &cli)?;
        run(&cli, &config)
    }

    #[test]
    fn quests_listing_is_not_an_attempt() {
        assert!(outcome(&["physquest", "quests"]).unwrap().is_none());
    }

    #[test]
    fn hypotenuse_always_completes() {
        let result = outcome(&["physquest", "hypotenuse", "--a", "3", "--b", "4"]).unwrap().unwrap();
        assert!(result.verdict.success);
        assert_eq!(result.points_awarded, 10);
        assert_eq!(result.frame["hypotenuse"], 5.0);
    }

    #[test]
    fn triangle_sides_outside_range_are_rejected() {
        let err = outcome(&["physquest", "hypotenuse", "--a", "12", "--b", "4"]).unwrap_err();
        assert!(format!("{err:#}").contains("invalid triangle sides"));
        assert!(outcome(&["physquest", "angles", "--a", "15", "--b", "4", "--alpha", "75", "--beta", "15"]).is_ok());
    }

    #[test]
    fn wrong_angles_score_nothing() {
        let result = outcome(&["physquest", "angles", "--a", "3", "--b", "4", "--alpha", "10", "--beta", "80"])
            .unwrap()
            .unwrap();
        assert!(!result.verdict.success);
        assert_eq!(result.points_awarded, 0);
        assert_eq!(result.total_points, 0);
    }

    #[test]
    fn unparseable_angle_is_a_failed_attempt() {
        let result = outcome(&["physquest", "--fast", "projectile", "--angle", "steep"]).unwrap().unwrap();
        assert_eq!(result.verdict.message, "Please enter a valid angle.");
    }

    #[test]
    fn tank_with_feedforward_only_awards_points() {
        let result = outcome(&["physquest", "--fast", "tank", "--kp", "0", "--ki", "0", "--kd", "0"])
            .unwrap()
            .unwrap();
        assert!(result.verdict.success);
        assert_eq!(result.quest, QuestId::WaterTank);
        assert_eq!(result.points_awarded, 40);
        assert_eq!(result.frame["series"]["levels"].as_array().unwrap().len(), 501);
    }

    #[test]
    fn critically_damped_spring_succeeds() {
        let result = outcome(&["physquest", "--fast", "spring", "--damping", "2"]).unwrap().unwrap();
        assert!(result.verdict.success, "{}", result.verdict.message);
        assert_eq!(result.points_awarded, 50);
    }

    #[test]
    fn out_of_range_gain_is_rejected() {
        let err = outcome(&["physquest", "--fast", "pendulum", "--kp", "500"]).unwrap_err();
        assert!(format!("{err:#}").contains("pendulum.kp"));
    }

    #[test]
    fn digit_flags_fold_into_config() {
        let cli = Cli::parse_from([
            "physquest", "digits", "--init-scale", "0.1", "--learning-rate", "1", "--hidden", "200",
            "--epochs", "50",
        ]);
        let mut config = PhysQuestConfig::default();
        apply_overrides(&mut config, &cli).unwrap();
        assert_eq!(config.digits.init_scale, 0.1);
        assert_eq!(config.digits.learning_rate, 1.0);
        assert_eq!(config.digits.hidden, 200);
        assert_eq!(config.digits.epochs, 50);

        let too_large = Cli::parse_from(["physquest", "digits", "--init-scale", "5"]);
        let err = apply_overrides(&mut PhysQuestConfig::default(), &too_large).unwrap_err();
        assert!(format!("{err:#}").contains("digits.init_scale"));
    }

    #[test]
    fn missing_dataset_file_is_an_error() {
        let err = outcome(&["physquest", "--fast", "digits", "--dataset", "no/such/file.json"]).unwrap_err();
        assert!(format!("{err:#}").contains("reading dataset"));
    }
}
