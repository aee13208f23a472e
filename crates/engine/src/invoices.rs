//! Invoice records.
//!
//! An `Invoice` is the source of truth for spend. Vendor and month totals are
//! derived from the set of stored invoices and never the other way around.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, MonthKey, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Received,
    UnderResolution,
    InAccounting,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Received => "received",
            Self::UnderResolution => "under_resolution",
            Self::InAccounting => "in_accounting",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "received" => Ok(Self::Received),
            "under_resolution" => Ok(Self::UnderResolution),
            "in_accounting" => Ok(Self::InAccounting),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::Validation(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

/// A stored invoice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub vendor_id: String,
    pub invoice_number: String,
    pub amount: Money,
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    pub payment_method: String,
    pub description: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Month bucket this invoice counts towards.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.invoice_date)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vendor_id: String,
    pub invoice_number: String,
    pub amount_minor: i64,
    pub invoice_date: Date,
    pub status: String,
    pub payment_method: String,
    pub description: Option<String>,
    pub payment_date: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invoice> for ActiveModel {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: ActiveValue::Set(invoice.id.to_string()),
            vendor_id: ActiveValue::Set(invoice.vendor_id.clone()),
            invoice_number: ActiveValue::Set(invoice.invoice_number.clone()),
            amount_minor: ActiveValue::Set(invoice.amount.minor()),
            invoice_date: ActiveValue::Set(invoice.invoice_date),
            status: ActiveValue::Set(invoice.status.as_str().to_string()),
            payment_method: ActiveValue::Set(invoice.payment_method.clone()),
            description: ActiveValue::Set(invoice.description.clone()),
            payment_date: ActiveValue::Set(invoice.payment_date),
            created_at: ActiveValue::Set(invoice.created_at),
        }
    }
}

impl TryFrom<Model> for Invoice {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "invoice")?,
            vendor_id: model.vendor_id,
            invoice_number: model.invoice_number,
            amount: Money::new(model.amount_minor),
            invoice_date: model.invoice_date,
            status: InvoiceStatus::try_from(model.status.as_str())?,
            payment_method: model.payment_method,
            description: model.description,
            payment_date: model.payment_date,
            created_at: model.created_at,
        })
    }
}
