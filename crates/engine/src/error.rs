//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an invoice candidate misses a required field.
//!   Raised before any I/O.
//! - [`KeyNotFound`] thrown when a vendor, invoice or resume token is unknown.
//! - [`Database`] thrown when the store is unreachable or rejects a write.
//! - [`Recalculation`] thrown when a store failure happens while refreshing an
//!   aggregate. After a commit it is downgraded to a
//!   [`RecalculationFailure`] in the commit report.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
//!  [`Recalculation`]: EngineError::Recalculation
//!  [`RecalculationFailure`]: crate::RecalculationFailure
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid invoice: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("failed to recompute {target}: {source}")]
    Recalculation {
        target: String,
        #[source]
        source: Box<EngineError>,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Wrap a store failure that happened while refreshing `target`.
    pub(crate) fn recalculation(target: impl Into<String>, source: EngineError) -> Self {
        Self::Recalculation {
            target: target.into(),
            source: Box::new(source),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (
                Self::Recalculation {
                    target: a,
                    source: sa,
                },
                Self::Recalculation {
                    target: b,
                    source: sb,
                },
            ) => a == b && sa == sb,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
