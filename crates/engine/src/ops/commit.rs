use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    BudgetCheck, Decision, EngineError, Invoice, InvoiceCandidate, MonthAggregate, ResultEngine,
    VendorAggregate, guard,
    store::LedgerStore,
};

use super::{Engine, PendingInvoice};

/// A refresh that failed after the invoice was already persisted.
///
/// The invoice stands; the named aggregate is stale until the next successful
/// recompute of that key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecalculationFailure {
    pub target: String,
    pub message: String,
}

impl From<EngineError> for RecalculationFailure {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Recalculation { target, source } => Self {
                target,
                message: source.to_string(),
            },
            other => Self {
                target: "aggregate".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub invoice: Invoice,
    /// Fresh vendor aggregate, `None` if its recompute failed.
    pub vendor_total: Option<VendorAggregate>,
    /// Fresh month aggregate, `None` if its recompute failed.
    pub month_total: Option<MonthAggregate>,
    pub recalculation_failures: Vec<RecalculationFailure>,
}

impl CommitReport {
    /// `true` when some total could not be refreshed and may be inaccurate.
    pub fn totals_stale(&self) -> bool {
        !self.recalculation_failures.is_empty()
    }
}

/// Result of [`Engine::submit_invoice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Committed(CommitReport),
    /// A ceiling would be exceeded; nothing was written.
    Blocked(Vec<String>),
    /// The invoice is close to a ceiling. Nothing was written yet: call
    /// [`Engine::resume`] with `token` to confirm or decline.
    WarnPending { messages: Vec<String>, token: Uuid },
}

/// Result of [`Engine::resume`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resumption {
    Committed(CommitReport),
    /// The caller declined the warning; nothing was written.
    Declined(Vec<String>),
}

impl<S: LedgerStore> Engine<S> {
    /// Submit a new invoice through the budget guard.
    ///
    /// 1. Validates the candidate (no I/O on failure).
    /// 2. Reads the vendor and month ceilings and the cached totals.
    /// 3. Blocks, parks on a warning, or persists and refreshes both totals.
    ///
    /// The check and the write are not atomic: concurrent submissions for the
    /// same vendor or month can overshoot a ceiling. Totals converge on the
    /// next recompute.
    pub async fn submit_invoice(&self, candidate: InvoiceCandidate) -> ResultEngine<Submission> {
        let invoice = candidate.into_invoice(Utc::now())?;

        let vendor = self.store.vendor(&invoice.vendor_id).await?;
        let vendor_total = self
            .store
            .vendor_aggregate(&invoice.vendor_id)
            .await?
            .map(|aggregate| aggregate.total)
            .unwrap_or_default();

        let month = invoice.month();
        let month_limit = self.store.month_limit(month.month_index()).await?;
        let month_total = self
            .store
            .month_aggregate(month)
            .await?
            .map(|aggregate| aggregate.total)
            .unwrap_or_default();

        let decision = guard::evaluate(&BudgetCheck {
            amount: invoice.amount,
            vendor_name: vendor
                .as_ref()
                .map_or(invoice.vendor_id.as_str(), |v| v.name.as_str()),
            vendor_limit: vendor.as_ref().and_then(|v| v.effective_limit()),
            vendor_total,
            month,
            month_limit,
            month_total,
        });

        match decision {
            Decision::Allow => Ok(Submission::Committed(self.commit(invoice).await?)),
            Decision::Block(reasons) => {
                tracing::info!(
                    vendor_id = %invoice.vendor_id,
                    invoice_number = %invoice.invoice_number,
                    ?reasons,
                    "invoice blocked by budget guard"
                );
                Ok(Submission::Blocked(reasons))
            }
            Decision::Warn(messages) => {
                let token = Uuid::new_v4();
                tracing::info!(
                    vendor_id = %invoice.vendor_id,
                    invoice_number = %invoice.invoice_number,
                    %token,
                    "invoice awaiting confirmation"
                );
                let now = Instant::now();
                let mut pending = self.pending.lock().await;
                pending.retain(|_, parked| !parked.is_expired(self.pending_ttl, now));
                pending.insert(
                    token,
                    PendingInvoice {
                        invoice,
                        messages: messages.clone(),
                        inserted_at: now,
                    },
                );
                Ok(Submission::WarnPending { messages, token })
            }
        }
    }

    /// Confirm (`proceed = true`) or decline an invoice parked on a warning.
    ///
    /// Tokens are single use and expire after the engine's pending TTL. A
    /// confirmed invoice is committed as evaluated at submission time,
    /// without a second guard pass. If the invoice cannot be persisted the
    /// token stays valid for a retry.
    pub async fn resume(&self, token: Uuid, proceed: bool) -> ResultEngine<Resumption> {
        let not_found = || EngineError::KeyNotFound(format!("resume token {token}"));
        let pending = self.pending.lock().await.remove(&token).ok_or_else(not_found)?;
        if pending.is_expired(self.pending_ttl, Instant::now()) {
            tracing::info!(%token, "resume token expired");
            return Err(not_found());
        }

        if !proceed {
            tracing::info!(%token, "invoice declined after warning");
            return Ok(Resumption::Declined(pending.messages));
        }

        if let Err(err) = self.store.create_invoice(&pending.invoice).await {
            tracing::warn!(%token, "failed to persist confirmed invoice: {err}");
            self.pending.lock().await.insert(token, pending);
            return Err(err);
        }
        Ok(Resumption::Committed(self.refresh_totals(pending.invoice).await))
    }

    /// Number of invoices waiting on a confirmation, expired ones included
    /// until they are swept.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Persist, then refresh the vendor and the month totals.
    async fn commit(&self, invoice: Invoice) -> ResultEngine<CommitReport> {
        self.store.create_invoice(&invoice).await?;
        Ok(self.refresh_totals(invoice).await)
    }

    /// Refresh both totals after `invoice` was persisted.
    ///
    /// Failures are collected in the report; the invoice stays committed.
    async fn refresh_totals(&self, invoice: Invoice) -> CommitReport {
        tracing::info!(
            invoice_id = %invoice.id,
            vendor_id = %invoice.vendor_id,
            amount = %invoice.amount,
            "invoice committed"
        );

        let mut recalculation_failures = Vec::new();

        let vendor_total = match self.recompute_vendor_total(&invoice.vendor_id).await {
            Ok(aggregate) => Some(aggregate),
            Err(err) => {
                tracing::warn!("{err}");
                recalculation_failures.push(RecalculationFailure::from(err));
                None
            }
        };

        let month_total = match self.recompute_month_total(invoice.invoice_date).await {
            Ok(aggregate) => Some(aggregate),
            Err(err) => {
                tracing::warn!("{err}");
                recalculation_failures.push(RecalculationFailure::from(err));
                None
            }
        };

        CommitReport {
            invoice,
            vendor_total,
            month_total,
            recalculation_failures,
        }
    }
}
