//! Core types and definitions for the PhysQuest simulations.
//!
//! This crate defines the vocabulary shared across all other crates:
//! commands, frame snapshots, verdicts, errors and tuning constants.
//! It has no dependency on any front end or runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod error;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
