use axum::{extract::Query, Json};
use contracts::reports::r200_summary::{SummaryRequest, SummaryResponse};

use crate::reports::r200_summary::service;

pub async fn get(Query(request): Query<SummaryRequest>) -> Json<SummaryResponse> {
    tracing::info!(
        "Summary report requested (from={:?}, to={:?}, branch={:?}, filter={:?})",
        request.from_date,
        request.to_date,
        request.branch,
        request.customer_filter
    );
    match service::get_summary(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Summary report failed: {}", e);
            Json(SummaryResponse::failed(e.to_string()))
        }
    }
}
