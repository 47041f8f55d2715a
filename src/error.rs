//! Simulation-specific error types.
//!
//! Systems should propagate errors through these types rather than panicking
//! where practical, enabling graceful degradation instead of hard crashes.
//! The trajectory fit in particular returns [`SimError::DegenerateTrajectory`]
//! instead of producing an undefined control point when the start and end
//! velocity rays are parallel.

use std::fmt;

/// Top-level error enum for the cannonade simulation.
#[derive(Debug)]
pub enum SimError {
    /// The start and end velocity rays of a trajectory are parallel, so no
    /// Bezier control point exists.  Happens for perfectly vertical shots.
    DegenerateTrajectory,

    /// A direction angle was requested from a zero-length velocity vector.
    ZeroLengthDirection,

    /// Physics constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateTrajectory => write!(
                f,
                "trajectory velocity rays are parallel; no control point exists"
            ),
            SimError::ZeroLengthDirection => {
                write!(f, "cannot derive a direction from a zero-length velocity")
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `elasticity` is outside `[0, 1]`.
///
/// Values above 1.0 add energy on every bounce and the ball never settles.
pub fn validate_elasticity(value: f32) -> SimResult<()> {
    if !(0.0..=1.0).contains(&value) {
        Err(SimError::UnsafeConstant {
            name: "ELASTICITY",
            value,
            safe_range: "[0.0, 1.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `radius` is not strictly positive.
pub fn validate_radius(value: f32) -> SimResult<()> {
    if value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "CANNONBALL_RADIUS",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elasticity_bounds_enforced() {
        assert!(validate_elasticity(0.0).is_ok());
        assert!(validate_elasticity(1.0).is_ok());
        assert!(validate_elasticity(-0.1).is_err());
        assert!(validate_elasticity(1.1).is_err());
    }

    #[test]
    fn radius_must_be_positive() {
        assert!(validate_radius(0.2).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(-1.0).is_err());
    }

    #[test]
    fn errors_display_the_offending_constant() {
        let err = validate_elasticity(2.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ELASTICITY"));
        assert!(msg.contains("2"));
    }
}
