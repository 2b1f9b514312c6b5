//! Rock Raider - an Asteroids-style arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pools, collisions, timers)
//! - `runner`: Frame pacing and host glue
//! - `input`: Keyboard state to per-frame input snapshots
//! - `render`, `audio`, `hud`: Intents for the host's presentation layers
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod error;
pub mod hud;
pub mod input;
pub mod math;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use runner::{FrameOutcome, FramePacer, Runner};
pub use settings::Settings;
