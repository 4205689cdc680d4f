//! Simulator configuration.
//!
//! Two TOML layouts share the same `[shared]` and `[route]` sections:
//!
//! ```toml
//! # sim.toml: one simulated axis plus a command script
//! [shared]
//! service_name = "route-sim-01"
//!
//! [route]
//! tsync = 0.0
//! tcoast = 0.0
//!
//! [axis]
//! amax = 1.0
//! vmax = 1.0
//! low_limit = -10000.0
//! high_limit = 10000.0
//!
//! [run]
//! tick = 0.1
//! duration = 20.0
//!
//! [[command]]
//! at = 0.0
//! action = "move"
//! position = 5.0
//! ```
//!
//! ```toml
//! # track.toml: multi-axis tracking harness
//! [shared]
//! service_name = "route-track-01"
//!
//! [[axes]]
//! amax = 0.12
//! vmax = 0.6
//! sky_rate = 0.0027
//!
//! [[targets]]
//! duration = 10.0
//! offsets = [{ position = -0.0278, rate = 0.0028 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use route_planner::consts::MAX_AXES;
use route_planner::types::{AxisLimits, RouteParameters};

use crate::script::ScriptCommand;

// ─── Errors ─────────────────────────────────────────────────────────

/// Failure while loading or validating a configuration file.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found")]
    FileNotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

// ─── Shared ─────────────────────────────────────────────────────────

/// Log verbosity, lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` section common to every simulator config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    /// Instance name, echoed in the startup log line.
    pub service_name: String,
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(invalid("service_name cannot be empty"));
        }
        Ok(())
    }
}

/// Load any deserializable config from a TOML file.
///
/// A missing file is `FileNotFound`; unreadable or malformed content is
/// `ParseError`. Semantic checks are left to each config's `validate()`.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Route ──────────────────────────────────────────────────────────

/// `[route]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteConfig {
    /// Arrival time quantum [s]; zero disables.
    #[serde(default)]
    pub tsync: f64,
    /// Short-path horizon and tail coast [s].
    #[serde(default)]
    pub tcoast: f64,
}

impl RouteConfig {
    /// Route parameters with no routed axes yet.
    pub fn parameters(&self) -> RouteParameters {
        RouteParameters::new(self.tsync, self.tcoast)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tsync >= 0.0) {
            return Err(invalid(format!("route.tsync must be >= 0, got {}", self.tsync)));
        }
        if !(self.tcoast >= 0.0) {
            return Err(invalid(format!("route.tcoast must be >= 0, got {}", self.tcoast)));
        }
        Ok(())
    }
}

fn check_limits(what: &str, amax: f64, vmax: f64) -> Result<(), ConfigError> {
    if !(amax > 0.0) {
        return Err(invalid(format!("{what}.amax must be > 0, got {amax}")));
    }
    if !(vmax > 0.0) {
        return Err(invalid(format!("{what}.vmax must be > 0, got {vmax}")));
    }
    Ok(())
}

// ─── Simulated Axis ─────────────────────────────────────────────────

const fn default_limit() -> f64 {
    1.0
}
const fn default_low_limit() -> f64 {
    -10_000.0
}
const fn default_high_limit() -> f64 {
    10_000.0
}
const fn default_tick() -> f64 {
    0.1
}
const fn default_duration() -> f64 {
    10.0
}

/// `[axis]` section of `sim.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_limit")]
    pub amax: f64,
    #[serde(default = "default_limit")]
    pub vmax: f64,
    /// Raw start position.
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_low_limit")]
    pub low_limit: f64,
    #[serde(default = "default_high_limit")]
    pub high_limit: f64,
    /// Raw home switch position.
    #[serde(default)]
    pub home: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            amax: default_limit(),
            vmax: default_limit(),
            start: 0.0,
            low_limit: default_low_limit(),
            high_limit: default_high_limit(),
            home: 0.0,
        }
    }
}

impl AxisConfig {
    pub fn limits(&self) -> AxisLimits {
        AxisLimits::new(self.amax, self.vmax)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_limits("axis", self.amax, self.vmax)?;
        if !(self.low_limit < self.high_limit) {
            return Err(invalid(format!(
                "axis.low_limit ({}) must be below axis.high_limit ({})",
                self.low_limit, self.high_limit
            )));
        }
        Ok(())
    }
}

/// `[run]` section: simulated clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Control tick [s].
    #[serde(default = "default_tick")]
    pub tick: f64,
    /// Simulated run length [s].
    #[serde(default = "default_duration")]
    pub duration: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick: default_tick(),
            duration: default_duration(),
        }
    }
}

/// Full `sim.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub axis: AxisConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default, rename = "command")]
    pub commands: Vec<ScriptCommand>,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.route.validate()?;
        self.axis.validate()?;
        if !(self.run.tick > 0.0) {
            return Err(invalid(format!("run.tick must be > 0, got {}", self.run.tick)));
        }
        if !(self.run.duration >= 0.0) {
            return Err(invalid(format!(
                "run.duration must be >= 0, got {}",
                self.run.duration
            )));
        }
        if let Some(cmd) = self.commands.iter().find(|c| !(c.at >= 0.0)) {
            return Err(invalid(format!("command time must be >= 0, got {}", cmd.at)));
        }
        Ok(())
    }
}

// ─── Tracking Harness ───────────────────────────────────────────────

const fn default_track_tick() -> f64 {
    0.05
}
const fn default_max_slew() -> f64 {
    600.0
}

/// One `[[axes]]` entry of `track.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackAxisConfig {
    pub amax: f64,
    pub vmax: f64,
    /// Rate every target on this axis moves at [units/s].
    #[serde(default)]
    pub sky_rate: f64,
}

/// Per-axis target offset: position at the segment reference time plus rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OffsetConfig {
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub rate: f64,
}

/// One `[[targets]]` segment: slew onto the offsets, then track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub offsets: Vec<OffsetConfig>,
    /// Tracking time after the slew completes [s].
    pub duration: f64,
}

/// Full `track.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default = "default_track_tick")]
    pub tick: f64,
    /// Longest a single slew may take before the run is aborted [s].
    #[serde(default = "default_max_slew")]
    pub max_slew: f64,
    pub axes: Vec<TrackAxisConfig>,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl TrackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.route.validate()?;
        if !(self.tick > 0.0) {
            return Err(invalid(format!("tick must be > 0, got {}", self.tick)));
        }
        if !(self.max_slew > 0.0) {
            return Err(invalid(format!("max_slew must be > 0, got {}", self.max_slew)));
        }
        if self.axes.is_empty() || self.axes.len() > MAX_AXES {
            return Err(invalid(format!(
                "between 1 and {MAX_AXES} axes required, got {}",
                self.axes.len()
            )));
        }
        for (i, axis) in self.axes.iter().enumerate() {
            check_limits(&format!("axes[{i}]"), axis.amax, axis.vmax)?;
        }
        for (i, target) in self.targets.iter().enumerate() {
            if target.offsets.len() != self.axes.len() {
                return Err(invalid(format!(
                    "targets[{i}] has {} offsets for {} axes",
                    target.offsets.len(),
                    self.axes.len()
                )));
            }
            if !(target.duration >= 0.0) {
                return Err(invalid(format!(
                    "targets[{i}].duration must be >= 0, got {}",
                    target.duration
                )));
            }
            // A target moving at or above Vmax can never be caught.
            for (j, (axis, offset)) in self.axes.iter().zip(&target.offsets).enumerate() {
                let rate = axis.sky_rate + offset.rate;
                if !(rate.abs() < axis.vmax) {
                    return Err(invalid(format!(
                        "targets[{i}] axis {j} moves at {rate}, not below vmax {}",
                        axis.vmax
                    )));
                }
            }
        }
        Ok(())
    }

    /// Route parameters routing every configured axis, in order.
    pub fn parameters(&self) -> Result<RouteParameters, route_planner::error::RouteError> {
        self.axes
            .iter()
            .enumerate()
            .try_fold(self.route.parameters(), |params, (i, axis)| {
                params.route_axis(i, AxisLimits::new(axis.amax, axis.vmax))
            })
    }
}
