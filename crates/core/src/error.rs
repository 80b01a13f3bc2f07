//! Error types for the fire-front core.

use crate::front::FireId;
use crate::analysis::ZoneId;

/// Common result type for core operations
pub type Result<T> = std::result::Result<T, FireError>;

/// Unified error type for the growth model and the coordination engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FireError {
    /// A terrain query fell outside the field's coverage
    #[error("location ({x:.1}, {y:.1}) is outside terrain coverage")]
    OutOfDomain { x: f32, y: f32 },

    /// A weather reading failed range validation and was not ingested
    #[error("invalid weather sample: {field} = {value} ({reason})")]
    InvalidWeatherSample {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// A sector radius shrank without a containment action
    #[error(
        "fire {fire} sector {sector} regressed from {previous:.2} m to {attempted:.2} m"
    )]
    InconsistentFireState {
        fire: FireId,
        sector: usize,
        previous: f32,
        attempted: f32,
    },

    /// No active fire with this id
    #[error("unknown fire {0}")]
    UnknownFire(FireId),

    /// No structure zone with this id
    #[error("unknown structure zone {0}")]
    UnknownZone(ZoneId),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FireError {
    /// Whether the error breaks a model invariant rather than reporting bad input
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, FireError::InconsistentFireState { .. })
    }
}
