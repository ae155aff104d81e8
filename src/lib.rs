//! Runa Runner
//!
//! Gameplay core for an endless-runner lane: procedural tile rows scrolling
//! toward a first-person camera with smoothed mouse-look and kinematic
//! player movement. Rendering, physics and input devices are reached through
//! the host traits in [`game::host`]; [`game::headless::HeadlessHost`] is an
//! in-memory implementation for tests and the headless binary.

pub mod config;
pub mod error;
pub mod game;
