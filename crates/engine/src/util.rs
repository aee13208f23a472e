//! Internal helpers for validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, Invoice, Money, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank values become `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Ceilings may be absent or zero (unlimited) but never negative.
pub(crate) fn validate_limit(limit: Option<Money>) -> ResultEngine<()> {
    if let Some(limit) = limit
        && limit.minor() < 0
    {
        return Err(EngineError::InvalidAmount(format!(
            "limit must be >= 0, got {limit}"
        )));
    }
    Ok(())
}

/// Exact sum of invoice amounts.
pub(crate) fn sum_amounts(invoices: &[Invoice]) -> ResultEngine<Money> {
    invoices.iter().try_fold(Money::ZERO, |acc, invoice| {
        acc.checked_add(invoice.amount)
            .ok_or_else(|| EngineError::InvalidAmount("total too large".to_string()))
    })
}
