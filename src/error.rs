//! Error taxonomy shared by the composition engine, the gateway and the HTTP layer.

use rocket::http::Status as HttpStatus;
use thiserror::Error;

/// Result type alias for army-builder operations.
pub type Result<T> = std::result::Result<T, ArmyError>;

/// Everything that can go wrong while editing, saving or loading an army.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmyError {
    /// The referenced unit id is absent from the catalog snapshot.
    #[error("Unit {0} not found in catalog")]
    UnitNotFound(String),

    /// A line-level update targeted a unit that is not in the army.
    #[error("Unit {0} is not part of the army")]
    UnitNotInArmy(String),

    /// A required field is missing; blocks the save.
    #[error("Invalid army: {reason}")]
    InvalidArmy { reason: String },

    /// Missing content kind, home node or record.
    #[error("{0} not found")]
    NotFound(String),

    /// The underlying write or publish step failed.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl ArmyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ArmyError::InvalidArmy {
            reason: reason.into(),
        }
    }

    /// HTTP status class each failure is reported with.
    pub fn http_status(&self) -> HttpStatus {
        match self {
            ArmyError::UnitNotFound(_) | ArmyError::UnitNotInArmy(_) | ArmyError::NotFound(_) => {
                HttpStatus::NotFound
            }
            ArmyError::InvalidArmy { .. } => HttpStatus::BadRequest,
            ArmyError::Persistence(_) => HttpStatus::InternalServerError,
        }
    }
}
