//! Route Planner Library
//!
//! Multi-axis trajectory planner built from four-phase trapezoidal velocity
//! profiles. Each control tick the caller hands the planner a target
//! (endpoint position, velocity and arrival time per axis) and the time the
//! next demand is wanted for; the planner replans only when needed and
//! returns a smooth demand that respects per-axis acceleration and velocity
//! limits, with every routed axis arriving together.
//!
//! # Module Structure
//!
//! - [`path`] - Single-axis path: solver, velocity-capped planner, sampler
//! - [`route`] - Stateful multi-axis route engine
//! - [`types`] - Limits, samples, maneuver states, reroute modes, parameters
//! - [`error`] - Status codes and parameter errors
//! - [`consts`] - Storage size and tolerances
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use route_planner::prelude::*;
//!
//! let params = RouteParameters::new(0.0, 0.0)
//!     .route_axis(0, AxisLimits::new(2.0, 3.0))
//!     .unwrap();
//! let start = ManeuverState::at(0.0);
//! let mut route = Route::new(&start, params).unwrap();
//!
//! let mut endpoint = ManeuverState::at(0.0).with_axis(0, 10.0, 0.0);
//! let mut next = ManeuverState::at(0.1);
//! let status = route
//!     .advance(RerouteMode::NewRoute, &mut endpoint, &mut next)
//!     .unwrap();
//! assert!(status.is_ok());
//! assert!(endpoint.time > 4.0);
//! ```

pub mod consts;
pub mod error;
pub mod path;
pub mod prelude;
pub mod route;
pub mod types;
