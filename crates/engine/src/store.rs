//! Storage seams of the engine.
//!
//! The engine reaches invoices, aggregates and limits only through these
//! traits. [`SqlStore`] implements all of them on top of a sea-orm
//! connection; tests wrap it to inject failures.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Invoice, Money, MonthAggregate, MonthKey, ResultEngine, Vendor, VendorAggregate};

pub use sql::SqlStore;

mod sql;

/// How an aggregate write treats an existing row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole row.
    Overwrite,
    /// Upsert only the fields the value carries; anything else is preserved.
    Merge,
}

/// Persisted invoice records.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create_invoice(&self, invoice: &Invoice) -> ResultEngine<Uuid>;

    async fn invoice(&self, id: Uuid) -> ResultEngine<Option<Invoice>>;

    async fn invoices_for_vendor(&self, vendor_id: &str) -> ResultEngine<Vec<Invoice>>;

    /// Invoices dated within `[from, to]`, both ends included.
    async fn invoices_between(&self, from: NaiveDate, to: NaiveDate)
    -> ResultEngine<Vec<Invoice>>;

    /// Returns `false` when no invoice had that id.
    async fn delete_invoice(&self, id: Uuid) -> ResultEngine<bool>;
}

/// Cached vendor and month totals.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn vendor_aggregate(&self, vendor_id: &str) -> ResultEngine<Option<VendorAggregate>>;

    async fn month_aggregate(&self, key: MonthKey) -> ResultEngine<Option<MonthAggregate>>;

    async fn put_vendor_aggregate(
        &self,
        aggregate: &VendorAggregate,
        mode: WriteMode,
    ) -> ResultEngine<()>;

    async fn put_month_aggregate(
        &self,
        aggregate: &MonthAggregate,
        mode: WriteMode,
    ) -> ResultEngine<()>;
}

/// Vendor records and month ceilings.
#[async_trait]
pub trait LimitRegistry: Send + Sync {
    async fn vendor(&self, vendor_id: &str) -> ResultEngine<Option<Vendor>>;

    async fn put_vendor(&self, vendor: &Vendor) -> ResultEngine<()>;

    async fn month_limit(&self, month_index: u32) -> ResultEngine<Option<Money>>;

    async fn set_month_limit(&self, month_index: u32, limit: Option<Money>) -> ResultEngine<()>;
}

/// Everything the engine needs from persistence.
pub trait LedgerStore: InvoiceStore + AggregateStore + LimitRegistry {}

impl<T> LedgerStore for T where T: InvoiceStore + AggregateStore + LimitRegistry {}
