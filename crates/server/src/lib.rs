use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod invoices;
mod months;
mod server;
mod vendors;

pub mod types {
    pub mod invoice {
        pub use api_types::invoice::{
            InvoiceBlocked, InvoiceCommitted, InvoiceDeclined, InvoiceNew, InvoiceResume,
            InvoiceStatus, InvoiceView, InvoiceWarnPending, RecalculationWarning,
        };
    }

    pub mod vendor {
        pub use api_types::vendor::{VendorCreated, VendorLimit, VendorNew, VendorTotal, VendorView};
    }

    pub mod month {
        pub use api_types::month::{MonthLimit, MonthRepair, MonthTotal};
    }
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) | EngineError::InvalidId(_) | EngineError::Recalculation { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::Validation(_) | EngineError::InvalidAmount(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::InvalidId(id) => {
            tracing::error!("stored id is not valid: {id}");
            "internal server error".to_string()
        }
        EngineError::Recalculation { target, source } => {
            tracing::error!("failed to recompute {target}: {source}");
            format!("failed to recompute {target}")
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("boom".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn recalculation_hides_source_detail() {
        let err = EngineError::Recalculation {
            target: "vendor total v".to_string(),
            source: Box::new(EngineError::Database(DbErr::Custom("secret".to_string()))),
        };
        assert_eq!(message_for_engine_error(err), "failed to recompute vendor total v");
    }
}
