//! Game loop: drives one quest run, one engine tick per simulation step,
//! paced to wall-clock time.
//!
//! Commands arrive via an `mpsc` channel and are forwarded to the engine at
//! tick boundaries. The loop returns as soon as the run is no longer running.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use physquest_core::commands::QuestCommand;
use physquest_core::enums::RunPhase;
use physquest_sim::engine::{Simulation, SimulationEngine, Tick};

/// Commands sent to a running game loop from another thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A run-control command to forward to the engine.
    Quest(QuestCommand),
    /// Halt the run and return.
    Shutdown,
}

/// How ticks are spaced in wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Tick as fast as possible.
    Unpaced,
    /// One tick per `dt / time_scale` seconds.
    RealTime { time_scale: f64 },
}

impl Pacing {
    pub fn new(fast: bool, time_scale: f64) -> Self {
        if fast {
            Pacing::Unpaced
        } else {
            Pacing::RealTime { time_scale }
        }
    }

    /// Wall-clock interval between ticks for a simulation step of `dt` seconds.
    pub fn tick_duration(&self, dt: f64) -> Option<Duration> {
        match *self {
            Pacing::Unpaced => None,
            Pacing::RealTime { time_scale } => {
                let scale = if time_scale > 0.001 { time_scale } else { 1.0 };
                Some(Duration::from_secs_f64(dt / scale))
            }
        }
    }
}

/// Start a run and tick it until it finishes, with no outside control.
///
/// The CLI uses this; embedders that need to stop or reset a run mid-flight
/// drive [`run_game_loop`] with their own command channel.
pub fn run_to_end<S: Simulation>(engine: &mut SimulationEngine<S>, pacing: Pacing) -> Tick<S::Frame> {
    let (_cmd_tx, cmd_rx) = mpsc::channel();
    run_game_loop(engine, pacing, &cmd_rx)
}

/// Start a run and tick it until it is no longer running.
///
/// Returns the last tick, which carries the verdict if the run finished.
pub fn run_game_loop<S: Simulation>(
    engine: &mut SimulationEngine<S>,
    pacing: Pacing,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
) -> Tick<S::Frame> {
    let tick_duration = pacing.tick_duration(engine.simulation().dt());
    let mut next_tick_time = Instant::now();
    engine.queue_command(QuestCommand::Start);

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Quest(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => engine.queue_command(QuestCommand::Stop),
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        // 2. Advance one tick
        let tick = engine.tick();
        if tick.phase != RunPhase::Running {
            return tick;
        }

        // 3. Sleep until the next tick
        let Some(tick_duration) = tick_duration else {
            continue;
        };
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
