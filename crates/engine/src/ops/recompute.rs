use chrono::NaiveDate;

use crate::{
    EngineError, MonthAggregate, MonthKey, ResultEngine, VendorAggregate,
    store::{LedgerStore, WriteMode},
    util::{normalize_required, sum_amounts},
};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Recomputes a vendor's total from the ledger and **overwrites** the
    /// cached aggregate.
    ///
    /// - Scans every invoice of the vendor; never applies deltas.
    /// - Idempotent: with unchanged invoices it writes the same value again.
    /// - Shrinks the total correctly after invoices were deleted.
    ///
    /// Store failures are reported as [`EngineError::Recalculation`].
    pub async fn recompute_vendor_total(&self, vendor_id: &str) -> ResultEngine<VendorAggregate> {
        self.rescan_vendor(vendor_id)
            .await
            .map_err(|err| EngineError::recalculation(format!("vendor total {vendor_id}"), err))
    }

    /// Recomputes the total of the month containing `date` and **merges** it
    /// into the cached aggregate keyed `"{year}-{MM}"`.
    ///
    /// Invoices dated from the first to the last calendar day of the month
    /// are included, both ends inclusive.
    ///
    /// Store failures are reported as [`EngineError::Recalculation`].
    pub async fn recompute_month_total(&self, date: NaiveDate) -> ResultEngine<MonthAggregate> {
        let key = MonthKey::from_date(date);
        self.rescan_month(key)
            .await
            .map_err(|err| EngineError::recalculation(format!("month total {key}"), err))
    }

    /// Manual repair of a vendor total, e.g. after invoices were edited or
    /// deleted outside the commit flow.
    pub async fn repair_vendor_total(&self, vendor_id: &str) -> ResultEngine<VendorAggregate> {
        let vendor_id = normalize_required(vendor_id, "vendor id")?;
        let aggregate = self.recompute_vendor_total(&vendor_id).await?;
        tracing::info!(vendor_id = %vendor_id, total = %aggregate.total, "repaired vendor total");
        Ok(aggregate)
    }

    /// Manual repair of the total of the month containing `date`.
    pub async fn repair_month_total(&self, date: NaiveDate) -> ResultEngine<MonthAggregate> {
        let aggregate = self.recompute_month_total(date).await?;
        tracing::info!(month = %aggregate.key(), total = %aggregate.total, "repaired month total");
        Ok(aggregate)
    }

    async fn rescan_vendor(&self, vendor_id: &str) -> ResultEngine<VendorAggregate> {
        let invoices = self.store.invoices_for_vendor(vendor_id).await?;
        let aggregate = VendorAggregate {
            vendor_id: vendor_id.to_string(),
            total: sum_amounts(&invoices)?,
        };
        self.store
            .put_vendor_aggregate(&aggregate, WriteMode::Overwrite)
            .await?;
        tracing::debug!(
            vendor_id,
            invoices = invoices.len(),
            total = %aggregate.total,
            "recomputed vendor total"
        );
        Ok(aggregate)
    }

    async fn rescan_month(&self, key: MonthKey) -> ResultEngine<MonthAggregate> {
        let (first_day, last_day) = key.bounds()?;
        let invoices = self.store.invoices_between(first_day, last_day).await?;
        let aggregate = MonthAggregate::new(key, sum_amounts(&invoices)?);
        self.store
            .put_month_aggregate(&aggregate, WriteMode::Merge)
            .await?;
        tracing::debug!(
            month = %key,
            invoices = invoices.len(),
            total = %aggregate.total,
            "recomputed month total"
        );
        Ok(aggregate)
    }
}
