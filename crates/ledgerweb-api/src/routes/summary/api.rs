//! Yearly summary JSON

use axum::extract::{Path, State};
use axum::Json;
use ledgerweb_core::YearlySummary;

use crate::{ApiResult, AppState};

pub async fn api_summary(state: State<AppState>, Path(year): Path<i32>) -> ApiResult<Json<YearlySummary>> {
    Ok(Json(state.ledger.summarize(year).await?))
}
