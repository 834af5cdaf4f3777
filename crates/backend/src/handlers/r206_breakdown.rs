use axum::{extract::Query, Json};
use contracts::reports::r206_breakdown::{BreakdownRequest, BreakdownResponse};
use contracts::shared::api::ErrorBody;

use crate::reports::r206_breakdown::service;

pub async fn get(
    Query(request): Query<BreakdownRequest>,
) -> Result<Json<BreakdownResponse>, Json<ErrorBody>> {
    tracing::info!(
        "Breakdown requested (action={:?}, metric={:?}, branch={:?})",
        request.action,
        request.metric,
        request.branch
    );
    match service::get_breakdown(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Breakdown failed: {}", e);
            Err(Json(ErrorBody::new(e.to_string())))
        }
    }
}
