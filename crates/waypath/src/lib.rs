//! # Waypath
//!
//! Smooth 2D paths through an ordered list of waypoints.
//!
//! A path is built from a natural cubic spline (second derivative zero at both
//! ends), fitted independently over `x(t)` and `y(t)` where `t` is the
//! cumulative chord length between consecutive waypoints. Nothing in this crate
//! is random: the same waypoints always give the same curve.
//!
//! ## Quick Start
//!
//! ```
//! use waypath::{CubicSpline2D, Location};
//!
//! let spline = CubicSpline2D::new(&[
//!     Location::new(0.0, 10.0),
//!     Location::new(20.0, 5.0),
//!     Location::new(40.0, 15.0),
//!     Location::new(60.0, 10.0),
//! ])?;
//!
//! let samples = spline.sample(101);
//! assert_eq!(samples.len(), 101);
//! assert!(samples[0].approx_eq(Location::new(0.0, 10.0), 1e-9));
//! # Ok::<(), waypath::SplineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod error;
pub mod linalg;
pub mod location;
pub mod spline;

// Re-exports for convenience
pub use bounds::Bounds;
pub use error::SplineError;
pub use location::Location;
pub use spline::{CubicSpline1D, CubicSpline2D};
