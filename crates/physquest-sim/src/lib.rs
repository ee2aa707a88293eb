//! Simulation engine for PhysQuest.
//!
//! Each quest is a self-contained, fixed-timestep simulation. The
//! `SimulationEngine` drives any of them one step per tick, processes
//! run-control commands at tick boundaries and evaluates the verdict
//! when a run ends.

pub mod digits;
pub mod engine;
pub mod geometry;
pub mod pendulum;
pub mod pid;
pub mod projectile;
pub mod spring;
pub mod tank;

pub use physquest_core as core;
pub use engine::{Simulation, SimulationEngine, Tick};
