//! Month API endpoints

use api_types::month::{MonthLimit, MonthRepair, MonthTotal};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::{Money, MonthAggregate, MonthKey};

use crate::{ServerError, server::ServerState};

fn month_total(key: MonthKey, total: Money) -> MonthTotal {
    MonthTotal {
        key: key.to_string(),
        year: key.year(),
        month_index: key.month_index(),
        total_minor: total.minor(),
    }
}

fn aggregate_view(aggregate: MonthAggregate) -> MonthTotal {
    month_total(aggregate.key(), aggregate.total)
}

pub async fn get_limit(
    State(state): State<ServerState>,
    Path(month_index): Path<u32>,
) -> Result<Json<MonthLimit>, ServerError> {
    let limit = state.engine.month_limit(month_index).await?;
    Ok(Json(MonthLimit {
        limit_minor: limit.map(Money::minor),
    }))
}

/// Set the ceiling of a month (0 = January). It applies to every year.
pub async fn set_limit(
    State(state): State<ServerState>,
    Path(month_index): Path<u32>,
    Json(payload): Json<MonthLimit>,
) -> Result<Json<MonthLimit>, ServerError> {
    state
        .engine
        .set_month_limit(month_index, payload.limit_minor.map(Money::new))
        .await?;
    Ok(Json(payload))
}

/// Cached total, 0 when never computed.
pub async fn total(
    State(state): State<ServerState>,
    Path((year, month_index)): Path<(i32, u32)>,
) -> Result<Json<MonthTotal>, ServerError> {
    let key = MonthKey::new(year, month_index)?;
    let total = state.engine.month_total(key).await?;
    Ok(Json(month_total(key, total)))
}

/// Rebuild the total of the month containing `date`.
pub async fn repair(
    State(state): State<ServerState>,
    Json(payload): Json<MonthRepair>,
) -> Result<Json<MonthTotal>, ServerError> {
    let aggregate = state.engine.repair_month_total(payload.date).await?;
    Ok(Json(aggregate_view(aggregate)))
}
