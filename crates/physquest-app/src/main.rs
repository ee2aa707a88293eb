use std::process::ExitCode;

use clap::Parser;

use physquest_app::cli::Cli;
use physquest_app::config::PhysQuestConfig;
use physquest_app::logging;
use physquest_app::quests::{self, QuestOutcome};
use physquest_campaign::catalog;

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the attempt (if any) succeeded.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut config = PhysQuestConfig::load(cli.config.as_deref())?;
    quests::apply_overrides(&mut config, cli)?;

    match quests::run(cli, &config)? {
        None => {
            print_catalog(cli.json)?;
            Ok(true)
        }
        Some(outcome) => {
            print_outcome(&outcome, cli.json)?;
            Ok(outcome.verdict.success)
        }
    }
}

fn print_catalog(json: bool) -> anyhow::Result<()> {
    let quests = catalog::catalog();
    if json {
        println!("{}", serde_json::to_string_pretty(&quests)?);
        return Ok(());
    }
    for quest in &quests {
        println!(
            "{:>2}. {} (difficulty {}, {} points)",
            quest.id.number(),
            quest.description,
            quest.difficulty,
            quest.reward()
        );
    }
    Ok(())
}

fn print_outcome(outcome: &QuestOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome.verdict.message);
        println!(
            "Points awarded: {}. Total points: {}.",
            outcome.points_awarded, outcome.total_points
        );
    }
    Ok(())
}
