use axum::Json;
use contracts::reports::r203_rewards_enrollment::RewardsEnrollmentResponse;

use crate::reports::r203_rewards_enrollment::service;

pub async fn get() -> Json<RewardsEnrollmentResponse> {
    tracing::info!("Rewards enrollment report requested");
    match service::get_rewards_enrollment().await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Rewards enrollment report failed: {}", e);
            Json(RewardsEnrollmentResponse::failed(e.to_string()))
        }
    }
}
