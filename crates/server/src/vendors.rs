//! Vendor API endpoints

use api_types::vendor::{VendorCreated, VendorLimit, VendorNew, VendorTotal, VendorView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, Vendor};

use crate::{ServerError, server::ServerState};

fn vendor_view(vendor: Vendor) -> VendorView {
    VendorView {
        id: vendor.id,
        name: vendor.name,
        limit_minor: vendor.limit.map(Money::minor),
    }
}

/// Handle requests for registering a new vendor
pub async fn vendor_new(
    State(state): State<ServerState>,
    Json(payload): Json<VendorNew>,
) -> Result<(StatusCode, Json<VendorCreated>), ServerError> {
    let id = state
        .engine
        .register_vendor(&payload.name, payload.limit_minor.map(Money::new))
        .await?;

    Ok((StatusCode::CREATED, Json(VendorCreated { id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<VendorView>, ServerError> {
    let vendor = state.engine.vendor(&id).await?;
    Ok(Json(vendor_view(vendor)))
}

/// Replace the vendor ceiling. Absent or 0 removes it.
pub async fn set_limit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<VendorLimit>,
) -> Result<Json<VendorView>, ServerError> {
    let vendor = state
        .engine
        .set_vendor_limit(&id, payload.limit_minor.map(Money::new))
        .await?;
    Ok(Json(vendor_view(vendor)))
}

/// Cached total, 0 when never computed.
pub async fn total(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<VendorTotal>, ServerError> {
    let total = state.engine.vendor_total(&id).await?;
    Ok(Json(VendorTotal {
        vendor_id: id,
        total_minor: total.minor(),
    }))
}

/// Rebuild the vendor total from its invoices.
pub async fn repair(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<VendorTotal>, ServerError> {
    let aggregate = state.engine.repair_vendor_total(&id).await?;
    Ok(Json(VendorTotal {
        vendor_id: aggregate.vendor_id,
        total_minor: aggregate.total.minor(),
    }))
}
