//! Command structs for engine operations.
//!
//! An [`InvoiceCandidate`] carries what a caller submits. It is only turned
//! into an [`Invoice`] after validation, before any store is touched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Invoice, InvoiceStatus, Money, ResultEngine,
    util::{normalize_optional_text, normalize_required},
};

/// Submit a new invoice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCandidate {
    pub vendor_id: String,
    pub invoice_number: String,
    pub amount: Money,
    pub invoice_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub payment_method: String,
    pub description: Option<String>,
    pub payment_date: Option<NaiveDate>,
}

impl InvoiceCandidate {
    #[must_use]
    pub fn new(
        vendor_id: impl Into<String>,
        invoice_number: impl Into<String>,
        amount: Money,
        invoice_date: NaiveDate,
    ) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            invoice_number: invoice_number.into(),
            amount,
            invoice_date: Some(invoice_date),
            status: Some(InvoiceStatus::Pending),
            payment_method: String::new(),
            description: None,
            payment_date: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn payment_date(mut self, payment_date: NaiveDate) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    /// Validate the candidate and build the record that will be stored.
    ///
    /// Runs before any I/O: a rejected candidate leaves no trace.
    pub fn into_invoice(self, created_at: DateTime<Utc>) -> ResultEngine<Invoice> {
        let vendor_id = normalize_required(&self.vendor_id, "vendor id")?;
        let invoice_number = normalize_required(&self.invoice_number, "invoice number")?;
        let payment_method = normalize_required(&self.payment_method, "payment method")?;
        let status = self
            .status
            .ok_or_else(|| EngineError::Validation("status is required".to_string()))?;
        let invoice_date = self
            .invoice_date
            .ok_or_else(|| EngineError::Validation("invoice date is required".to_string()))?;
        if !self.amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }

        Ok(Invoice {
            id: Uuid::new_v4(),
            vendor_id,
            invoice_number,
            amount: self.amount,
            invoice_date,
            status,
            payment_method,
            description: normalize_optional_text(self.description.as_deref()),
            payment_date: self.payment_date,
            created_at,
        })
    }
}
