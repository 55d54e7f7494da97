use thiserror::Error;

use crate::scoring::ProcedureError;

/// Reasons a record cannot be constructed. No partial record ever reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("no violation selected")]
    NoViolationSelected,

    #[error("unknown violation '{0}'")]
    UnknownViolation(String),

    #[error("unknown positive rule '{0}'")]
    UnknownPositiveRule(String),

    #[error("behavior description is required")]
    EmptyDetails,

    #[error("observer name is required")]
    EmptyObserver,

    #[error("points must be between {min} and {max}, got {points}")]
    PointsOutOfRange { points: u32, min: u32, max: u32 },

    #[error("name and phone are both required")]
    MissingStudentField,

    #[error("phone must contain digits only")]
    InvalidPhone,

    #[error(transparent)]
    Procedure(#[from] ProcedureError),
}
