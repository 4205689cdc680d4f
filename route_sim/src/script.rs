//! Timed command scripts for a [`SimAxis`].
//!
//! Commands fire on the first tick whose start time is at or after their
//! `at` time, in file order for equal times. A refused command is logged
//! and the run continues, the way a motor controller rejects a command
//! without faulting.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use route_planner::error::RouteError;

use crate::axis::{AxisStatus, SimAxis};
use crate::config::SimConfig;

/// One motion command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Move {
        position: f64,
        #[serde(default)]
        relative: bool,
        #[serde(default)]
        max_velocity: f64,
        #[serde(default)]
        acceleration: f64,
    },
    Jog {
        velocity: f64,
        #[serde(default)]
        acceleration: f64,
    },
    Stop {
        #[serde(default)]
        acceleration: f64,
    },
    Home {
        max_velocity: f64,
        #[serde(default)]
        acceleration: f64,
        #[serde(default)]
        forwards: bool,
    },
    SetPosition {
        position: f64,
    },
}

/// `[[command]]` entry: an action and when to issue it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptCommand {
    /// Simulated time the command is issued at [s].
    pub at: f64,
    #[serde(flatten)]
    pub action: Action,
}

impl Action {
    /// Issue the command. Returns false if the axis refused it.
    pub fn apply(&self, axis: &mut SimAxis) -> bool {
        let result = match *self {
            Self::Move {
                position,
                relative,
                max_velocity,
                acceleration,
            } => axis.move_to(position, relative, max_velocity, acceleration),
            Self::Jog {
                velocity,
                acceleration,
            } => axis.jog(velocity, acceleration),
            Self::Stop { acceleration } => {
                axis.stop(acceleration);
                Ok(())
            }
            Self::Home {
                max_velocity,
                acceleration,
                forwards,
            } => axis.home(max_velocity, acceleration, forwards),
            Self::SetPosition { position } => {
                axis.set_position(position);
                Ok(())
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(time = axis.time(), action = ?self, "command refused: {e}");
                false
            }
        }
    }
}

/// Run the configured script and return one status per tick.
pub fn run_script(config: &SimConfig) -> Result<Vec<AxisStatus>, RouteError> {
    let mut axis = SimAxis::new(&config.axis, &config.route)?;

    let mut commands = config.commands.clone();
    commands.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = commands.iter().peekable();

    let tick = config.run.tick;
    let ticks = (config.run.duration / tick).round() as usize;
    let mut trace = Vec::with_capacity(ticks);

    info!(
        service = %config.shared.service_name,
        ticks,
        commands = commands.len(),
        "script started"
    );

    for _ in 0..ticks {
        while let Some(cmd) = pending.next_if(|c| c.at <= axis.time()) {
            cmd.action.apply(&mut axis);
        }
        trace.push(axis.process(tick)?);
    }

    Ok(trace)
}
