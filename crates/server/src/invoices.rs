//! Invoice API endpoints

use api_types::invoice::{
    InvoiceBlocked, InvoiceCommitted, InvoiceDeclined, InvoiceNew, InvoiceResume, InvoiceStatus,
    InvoiceView, InvoiceWarnPending, RecalculationWarning,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{CommitReport, Invoice, InvoiceCandidate, Money, Resumption, Submission};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn status_to_engine(status: InvoiceStatus) -> engine::InvoiceStatus {
    match status {
        InvoiceStatus::Pending => engine::InvoiceStatus::Pending,
        InvoiceStatus::Received => engine::InvoiceStatus::Received,
        InvoiceStatus::UnderResolution => engine::InvoiceStatus::UnderResolution,
        InvoiceStatus::InAccounting => engine::InvoiceStatus::InAccounting,
        InvoiceStatus::Paid => engine::InvoiceStatus::Paid,
    }
}

fn status_from_engine(status: engine::InvoiceStatus) -> InvoiceStatus {
    match status {
        engine::InvoiceStatus::Pending => InvoiceStatus::Pending,
        engine::InvoiceStatus::Received => InvoiceStatus::Received,
        engine::InvoiceStatus::UnderResolution => InvoiceStatus::UnderResolution,
        engine::InvoiceStatus::InAccounting => InvoiceStatus::InAccounting,
        engine::InvoiceStatus::Paid => InvoiceStatus::Paid,
    }
}

/// Missing fields are left empty so the engine reports them.
fn candidate_from(payload: InvoiceNew) -> InvoiceCandidate {
    InvoiceCandidate {
        vendor_id: payload.vendor_id.unwrap_or_default(),
        invoice_number: payload.invoice_number.unwrap_or_default(),
        amount: Money::new(payload.amount_minor.unwrap_or_default()),
        invoice_date: payload.invoice_date,
        status: payload.status.map(status_to_engine),
        payment_method: payload.payment_method.unwrap_or_default(),
        description: payload.description,
        payment_date: payload.payment_date,
    }
}

fn invoice_view(invoice: Invoice) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        vendor_id: invoice.vendor_id,
        invoice_number: invoice.invoice_number,
        amount_minor: invoice.amount.minor(),
        invoice_date: invoice.invoice_date,
        status: status_from_engine(invoice.status),
        payment_method: invoice.payment_method,
        description: invoice.description,
        payment_date: invoice.payment_date,
        created_at: invoice.created_at,
    }
}

fn committed(report: CommitReport) -> Response {
    let body = InvoiceCommitted {
        invoice: invoice_view(report.invoice),
        vendor_total_minor: report.vendor_total.map(|aggregate| aggregate.total.minor()),
        month_total_minor: report.month_total.map(|aggregate| aggregate.total.minor()),
        recalculation_warnings: report
            .recalculation_failures
            .into_iter()
            .map(|failure| RecalculationWarning {
                target: failure.target,
                message: failure.message,
            })
            .collect(),
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Handle invoice submissions.
///
/// 201 when committed, 200 with a resume token when a ceiling is close,
/// 422 when a ceiling would be exceeded.
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceNew>,
) -> Result<Response, ServerError> {
    let response = match state.engine.submit_invoice(candidate_from(payload)).await? {
        Submission::Committed(report) => committed(report),
        Submission::Blocked(reasons) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(InvoiceBlocked { reasons })).into_response()
        }
        Submission::WarnPending { messages, token } => (
            StatusCode::OK,
            Json(InvoiceWarnPending {
                messages,
                resume_token: token,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

/// Handle the confirmation of an invoice parked on a warning.
pub async fn resume(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceResume>,
) -> Result<Response, ServerError> {
    let response = match state
        .engine
        .resume(payload.resume_token, payload.proceed)
        .await?
    {
        Resumption::Committed(report) => committed(report),
        Resumption::Declined(messages) => {
            (StatusCode::OK, Json(InvoiceDeclined { messages })).into_response()
        }
    };
    Ok(response)
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceView>, ServerError> {
    let invoice = state.engine.invoice(id).await?;
    Ok(Json(invoice_view(invoice)))
}

/// Delete an invoice. Totals are left untouched until the next repair.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
