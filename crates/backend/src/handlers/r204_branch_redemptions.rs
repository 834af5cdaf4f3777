use axum::{extract::Query, Json};
use contracts::reports::r204_branch_redemptions::{
    BranchRedemptionsRequest, BranchRedemptionsResponse,
};

use crate::reports::r204_branch_redemptions::service;

pub async fn get(
    Query(request): Query<BranchRedemptionsRequest>,
) -> Json<BranchRedemptionsResponse> {
    tracing::info!(
        "Branch redemptions report requested (from={:?}, to={:?})",
        request.from_date,
        request.to_date
    );
    match service::get_branch_redemptions(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Branch redemptions report failed: {}", e);
            Json(BranchRedemptionsResponse::failed(e.to_string()))
        }
    }
}
