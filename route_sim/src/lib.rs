//! Route Simulator Library
//!
//! Consumers of the route planner used for manual testing and demos.
//!
//! # Module Structure
//!
//! - [`axis`] - Simulated motor axis (move, jog, home, hard limits)
//! - [`script`] - Timed command scripts for a simulated axis
//! - [`track`] - Multi-axis slew-and-track harness
//! - [`config`] - TOML configuration for both runners
//! - [`error`] - Top-level error type

pub mod axis;
pub mod config;
pub mod error;
pub mod script;
pub mod track;
