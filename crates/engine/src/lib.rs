//! Invoice ledger engine.
//!
//! Keeps per-vendor and per-month spend totals derived from stored invoices
//! and gates new invoices against the configured ceilings.

pub use commands::InvoiceCandidate;
pub use error::EngineError;
pub use guard::{BudgetCheck, Decision, evaluate};
pub use invoices::{Invoice, InvoiceStatus};
pub use money::Money;
pub use month_totals::{MonthAggregate, MonthKey};
pub use ops::{
    CommitReport, DEFAULT_PENDING_TTL, Engine, EngineBuilder, RecalculationFailure, Resumption,
    Submission,
};
pub use store::{AggregateStore, InvoiceStore, LedgerStore, LimitRegistry, SqlStore, WriteMode};
pub use vendor_totals::VendorAggregate;
pub use vendors::Vendor;

pub mod guard;
pub mod invoices;
pub mod month_limits;
pub mod month_totals;
pub mod store;
pub mod vendor_totals;
pub mod vendors;

mod commands;
mod error;
mod money;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
