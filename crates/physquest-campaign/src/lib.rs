//! Player progress and the quest catalog.
//!
//! Plain data: the caller runs a quest, then reports the verdict here.

pub mod catalog;
pub mod player;

pub use catalog::{catalog, QuestDef};
pub use player::Player;

#[cfg(test)]
mod tests;
