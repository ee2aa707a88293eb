//! Simulation engine: the stepping loop shared by every quest.
//!
//! `SimulationEngine` owns one simulation, a run phase and a command queue.
//! Each `tick()` drains queued commands, advances the simulation by exactly
//! one step while running, and returns the frame to plot. Completely
//! headless, so runs are reproducible in tests.

use std::collections::VecDeque;

use serde::Serialize;

use physquest_core::commands::QuestCommand;
use physquest_core::enums::{QuestId, RunPhase, StepOutcome};
use physquest_core::types::{SimTime, Verdict};

/// A time-stepped quest simulation.
pub trait Simulation {
    /// Snapshot published after every step.
    type Frame: Serialize + Clone;

    fn quest(&self) -> QuestId;

    /// Seconds represented by one step (also the pacing interval when animated).
    fn dt(&self) -> f64;

    fn time(&self) -> SimTime;

    /// Restore the initial state, discarding all recorded series.
    fn reset(&mut self);

    /// Advance by one step.
    fn step(&mut self) -> StepOutcome;

    fn frame(&self) -> Self::Frame;

    /// Evaluate the success predicate on the current state.
    fn verdict(&self) -> Verdict;
}

/// Result of one engine tick.
#[derive(Debug, Clone, Serialize)]
pub struct Tick<F> {
    pub phase: RunPhase,
    pub frame: F,
    /// Present only on the tick the run finished.
    pub verdict: Option<Verdict>,
}

/// Drives a single simulation. One run at a time.
pub struct SimulationEngine<S: Simulation> {
    sim: S,
    phase: RunPhase,
    command_queue: VecDeque<QuestCommand>,
    verdict: Option<Verdict>,
}

impl<S: Simulation> SimulationEngine<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            phase: RunPhase::Idle,
            command_queue: VecDeque::new(),
            verdict: None,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: QuestCommand) {
        self.command_queue.push_back(command);
    }

    /// Process queued commands, then advance one step if running.
    pub fn tick(&mut self) -> Tick<S::Frame> {
        self.process_commands();

        let mut finished_now = None;
        if self.phase == RunPhase::Running && self.sim.step() == StepOutcome::Finished {
            let verdict = self.sim.verdict();
            tracing::info!(
                quest = ?self.sim.quest(),
                tick = self.sim.time().tick,
                success = verdict.success,
                message = %verdict.message,
                "run finished"
            );
            self.phase = RunPhase::Finished;
            self.verdict = Some(verdict.clone());
            finished_now = Some(verdict);
        }

        Tick {
            phase: self.phase,
            frame: self.sim.frame(),
            verdict: finished_now,
        }
    }

    /// Start a run (if idle) and tick until it is no longer running.
    ///
    /// Returns the verdict, or `None` if the run was stopped by a queued command.
    pub fn run_to_completion(&mut self) -> Option<Verdict> {
        self.queue_command(QuestCommand::Start);
        loop {
            self.tick();
            if self.phase != RunPhase::Running {
                break;
            }
        }
        self.verdict.clone()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Verdict of the last finished run.
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    /// Mutable access for parameter changes (gains may change mid-run).
    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: QuestCommand) {
        match command {
            QuestCommand::Start => {
                if self.phase == RunPhase::Running {
                    tracing::debug!(quest = ?self.sim.quest(), "start ignored, run in progress");
                    return;
                }
                self.sim.reset();
                self.verdict = None;
                self.phase = RunPhase::Running;
                tracing::debug!(quest = ?self.sim.quest(), "run started");
            }
            QuestCommand::Stop => {
                if self.phase == RunPhase::Running {
                    self.phase = RunPhase::Stopped;
                    tracing::debug!(quest = ?self.sim.quest(), tick = self.sim.time().tick, "run stopped");
                }
            }
            QuestCommand::Reset => {
                self.sim.reset();
                self.verdict = None;
                self.phase = RunPhase::Idle;
                tracing::debug!(quest = ?self.sim.quest(), "run reset");
            }
        }
    }
}
