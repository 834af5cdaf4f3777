use axum::{extract::Query, Json};
use contracts::reports::r205_enrollment_details::{
    EnrollmentDetailsRequest, EnrollmentDetailsResponse,
};

use crate::reports::r205_enrollment_details::service;

pub async fn get(
    Query(request): Query<EnrollmentDetailsRequest>,
) -> Json<EnrollmentDetailsResponse> {
    tracing::info!(
        "Enrollment details requested (branch={:?}, filter={:?})",
        request.branch_id,
        request.customer_filter
    );
    match service::get_enrollment_details(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Enrollment details report failed: {}", e);
            Json(EnrollmentDetailsResponse::failed(e.to_string()))
        }
    }
}
