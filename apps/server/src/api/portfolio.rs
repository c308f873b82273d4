use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use trackfolio_core::portfolio::PortfolioSummary;

use crate::{error::ApiResult, main_lib::AppState};

async fn get_portfolio_summary(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.portfolio_service.get_summary(&user_id)?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/portfolio/{user_id}/summary", get(get_portfolio_summary))
}
