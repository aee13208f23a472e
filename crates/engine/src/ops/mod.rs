use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{Invoice, ResultEngine, store::SqlStore};

mod commit;
mod invoices;
mod recompute;
mod registry;

pub use commit::{CommitReport, RecalculationFailure, Resumption, Submission};

/// An invoice that passed validation and drew warnings, waiting for the
/// caller to confirm or decline it.
#[derive(Debug)]
struct PendingInvoice {
    invoice: Invoice,
    messages: Vec<String>,
    inserted_at: Instant,
}

impl PendingInvoice {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// How long a warned invoice waits for confirmation by default.
pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(15 * 60);

/// Invoice ledger engine.
///
/// Holds the store and the invoices parked on a warning. Aggregates are never
/// cached in memory: every read goes to the store.
#[derive(Debug)]
pub struct Engine<S = SqlStore> {
    store: S,
    pending: Mutex<HashMap<Uuid, PendingInvoice>>,
    pending_ttl: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S> Engine<S> {
    /// Build an engine on top of any store.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            pending: Mutex::new(HashMap::new()),
            pending_ttl: DEFAULT_PENDING_TTL,
        }
    }

    /// Change how long a warned invoice can wait for [`Engine::resume`].
    /// Expired entries are dropped on the next warning or resume.
    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    pending_ttl: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Lifetime of a resume token, [`DEFAULT_PENDING_TTL`] when unset.
    pub fn pending_ttl(mut self, ttl: Duration) -> EngineBuilder {
        self.pending_ttl = Some(ttl);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine::with_store(SqlStore::new(self.database))
            .with_pending_ttl(self.pending_ttl.unwrap_or(DEFAULT_PENDING_TTL)))
    }
}
