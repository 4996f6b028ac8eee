//! Ray hit tests used to decide where AR content goes.
//!
//! All functions are pure: they take a world-space [`Ray3`](arplace_core::Ray3)
//! plus read-only tracking data and return zero or more hits. "Nothing was
//! hit" is an ordinary outcome and is reported as `None` or an empty `Vec`,
//! never as an error. Errors are reserved for invalid query parameters
//! ([`HitTestError`]).
//!
//! - [`anchor`]: bounded plane hits against detected surface anchors.
//! - [`plane`]: infinite plane intersections.
//! - [`feature`]: cone-constrained and unconstrained feature-cloud probes.

pub mod anchor;
pub mod feature;
pub mod plane;

pub use anchor::*;
pub use feature::*;
pub use plane::*;

use arplace_core::Real;
use thiserror::Error;

/// Invalid hit-test query parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum HitTestError {
    /// Cone half-angle must lie in `(0, 180]` degrees.
    #[error("cone half-angle must be in (0, 180] degrees, got {0}")]
    InvalidConeAngle(Real),
    /// Distance bounds must satisfy `0 <= min <= max`.
    #[error("invalid distance range [{min}, {max}]")]
    InvalidDistanceRange { min: Real, max: Real },
    /// At least one result must be requested.
    #[error("max_results must be at least 1")]
    ZeroMaxResults,
    /// Downward slope threshold must be finite and within `[0, 1)`.
    #[error("min downward slope must be in [0, 1), got {0}")]
    InvalidSlope(Real),
}
