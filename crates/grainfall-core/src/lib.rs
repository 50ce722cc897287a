//! Falling-sand simulation core.
//!
//! Grains fall under gravity across a fixed grid, lock onto stable support,
//! and are released again when the grain beneath them moves. Fans emit wind
//! particles that shove grains sideways. Nothing here draws or reads input;
//! a host feeds intents into [`Simulation`] and reads its state back.

pub mod config;
pub mod error;
pub mod grain;
pub mod grid;
pub mod ruleset;
pub mod simulation;
pub mod stability;
pub mod unlock;
pub mod wind;

pub use config::{DriftMode, SandConfig};
pub use error::ConfigError;
pub use grain::{Grain, GrainId};
pub use ruleset::Ruleset;
pub use simulation::Simulation;
