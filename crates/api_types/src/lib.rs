use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod invoice {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Pending,
        Received,
        UnderResolution,
        InAccounting,
        Paid,
    }

    /// Request body for submitting an invoice.
    ///
    /// Every field is optional on the wire so a missing one is reported as a
    /// validation error instead of a deserialization failure.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvoiceNew {
        pub vendor_id: Option<String>,
        pub invoice_number: Option<String>,
        /// Must be > 0.
        pub amount_minor: Option<i64>,
        /// `YYYY-MM-DD`.
        pub invoice_date: Option<NaiveDate>,
        pub status: Option<InvoiceStatus>,
        pub payment_method: Option<String>,
        pub description: Option<String>,
        pub payment_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: Uuid,
        pub vendor_id: String,
        pub invoice_number: String,
        pub amount_minor: i64,
        pub invoice_date: NaiveDate,
        pub status: InvoiceStatus,
        pub payment_method: String,
        pub description: Option<String>,
        pub payment_date: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecalculationWarning {
        pub target: String,
        pub message: String,
    }

    /// Response of a committed invoice (submit or confirmed resume).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceCommitted {
        pub invoice: InvoiceView,
        pub vendor_total_minor: Option<i64>,
        pub month_total_minor: Option<i64>,
        /// Non-empty when some total could not be refreshed and may be
        /// temporarily inaccurate.
        pub recalculation_warnings: Vec<RecalculationWarning>,
    }

    /// Response of a submission that needs confirmation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceWarnPending {
        pub messages: Vec<String>,
        pub resume_token: Uuid,
    }

    /// Response of a submission rejected by a ceiling.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceBlocked {
        pub reasons: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceResume {
        pub resume_token: Uuid,
        pub proceed: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceDeclined {
        pub messages: Vec<String>,
    }
}

pub mod vendor {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorNew {
        pub name: String,
        /// Absent or 0 means unlimited.
        pub limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorLimit {
        pub limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorView {
        pub id: String,
        pub name: String,
        pub limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorTotal {
        pub vendor_id: String,
        pub total_minor: i64,
    }
}

pub mod month {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthLimit {
        /// Absent or 0 means unlimited.
        pub limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthTotal {
        /// Storage key, e.g. `2024-01`.
        pub key: String,
        pub year: i32,
        /// 0 = January.
        pub month_index: u32,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthRepair {
        /// Any day of the month to recompute.
        pub date: NaiveDate,
    }
}
