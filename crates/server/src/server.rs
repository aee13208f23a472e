use axum::{
    Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{invoices, months, vendors};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Build the HTTP router. Authentication is handled in front of this
/// service.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/invoices", post(invoices::submit))
        .route("/invoices/resume", post(invoices::resume))
        .route(
            "/invoices/{id}",
            get(invoices::get).delete(invoices::delete),
        )
        .route("/vendors", post(vendors::vendor_new))
        .route("/vendors/{id}", get(vendors::get))
        .route("/vendors/{id}/limit", put(vendors::set_limit))
        .route("/vendors/{id}/total", get(vendors::total))
        .route("/vendors/{id}/repair", post(vendors::repair))
        .route(
            "/month-limits/{month_index}",
            get(months::get_limit).put(months::set_limit),
        )
        .route("/months/{year}/{month_index}/total", get(months::total))
        .route("/months/repair", post(months::repair))
        .with_state(ServerState { engine })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

