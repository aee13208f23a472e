use chrono::Utc;
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Vendor,
    month_totals::validate_month_index,
    store::LedgerStore,
    util::{normalize_required, validate_limit},
};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Register a vendor and return its id.
    pub async fn register_vendor(&self, name: &str, limit: Option<Money>) -> ResultEngine<String> {
        let name = normalize_required(name, "vendor name")?;
        validate_limit(limit)?;
        let vendor = Vendor {
            id: Uuid::new_v4().to_string(),
            name,
            limit,
            created_at: Utc::now(),
        };
        self.store.put_vendor(&vendor).await?;
        tracing::info!(vendor_id = %vendor.id, name = %vendor.name, "vendor registered");
        Ok(vendor.id)
    }

    pub async fn vendor(&self, vendor_id: &str) -> ResultEngine<Vendor> {
        self.store
            .vendor(vendor_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("vendor {vendor_id}")))
    }

    /// Change a vendor's ceiling. `None` or zero removes it.
    pub async fn set_vendor_limit(
        &self,
        vendor_id: &str,
        limit: Option<Money>,
    ) -> ResultEngine<Vendor> {
        validate_limit(limit)?;
        let mut vendor = self.vendor(vendor_id).await?;
        vendor.limit = limit;
        self.store.put_vendor(&vendor).await?;
        Ok(vendor)
    }

    /// Set the ceiling of a calendar month (0 = January) for every year.
    pub async fn set_month_limit(&self, month_index: u32, limit: Option<Money>) -> ResultEngine<()> {
        validate_month_index(month_index)?;
        validate_limit(limit)?;
        self.store.set_month_limit(month_index, limit).await
    }

    pub async fn month_limit(&self, month_index: u32) -> ResultEngine<Option<Money>> {
        validate_month_index(month_index)?;
        self.store.month_limit(month_index).await
    }
}
