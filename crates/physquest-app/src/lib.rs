//! PhysQuest command-line front end.
//!
//! Loads layered configuration, builds the selected quest, runs it through
//! the paced game loop and scores the attempt.

pub mod cli;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod logging;
pub mod quests;

pub use physquest_core as core;
