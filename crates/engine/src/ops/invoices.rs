use uuid::Uuid;

use crate::{EngineError, Invoice, Money, MonthKey, ResultEngine, store::LedgerStore};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    pub async fn invoice(&self, invoice_id: Uuid) -> ResultEngine<Invoice> {
        self.store
            .invoice(invoice_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("invoice {invoice_id}")))
    }

    /// Delete an invoice.
    ///
    /// Totals are **not** refreshed: they drift until the next recompute of
    /// the vendor or month (a repair call or a later commit for the same key).
    pub async fn delete_invoice(&self, invoice_id: Uuid) -> ResultEngine<()> {
        if !self.store.delete_invoice(invoice_id).await? {
            return Err(EngineError::KeyNotFound(format!("invoice {invoice_id}")));
        }
        tracing::info!(%invoice_id, "invoice deleted");
        Ok(())
    }

    /// Cached total of a vendor; zero before its first recompute.
    pub async fn vendor_total(&self, vendor_id: &str) -> ResultEngine<Money> {
        Ok(self
            .store
            .vendor_aggregate(vendor_id)
            .await?
            .map(|aggregate| aggregate.total)
            .unwrap_or_default())
    }

    /// Cached total of a month; zero before its first recompute.
    pub async fn month_total(&self, month: MonthKey) -> ResultEngine<Money> {
        Ok(self
            .store
            .month_aggregate(month)
            .await?
            .map(|aggregate| aggregate.total)
            .unwrap_or_default())
    }
}
