//! GET listing handler: one route serves every mounted resource.

use crate::error::AppError;
use crate::search::ListParams;
use crate::service::ListingService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let descriptor = state
        .resources
        .by_name(&resource)
        .ok_or_else(|| AppError::NotFound(resource))?;
    let request = ListParams::from_query(&params);
    let envelope = ListingService::search(
        &state.pool,
        state.resources.dialect.as_ref(),
        descriptor,
        &request,
    )
    .await?;
    Ok(Json(envelope))
}
