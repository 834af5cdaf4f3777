use axum::{extract::Query, Json};
use contracts::reports::forecast::{ForecastRequest, ForecastResponse};
use contracts::shared::api::ErrorBody;
use contracts::shared::filters::BranchFilter;

use crate::usecases::u600_forecast::{get_forecast_client, ForecastScope};

const DEFAULT_FORECAST_MONTHS: u32 = 12;

pub async fn points(
    Query(request): Query<ForecastRequest>,
) -> Result<Json<ForecastResponse>, Json<ErrorBody>> {
    run(ForecastScope::Points, branch_entity(&request), &request).await
}

pub async fn enrollment(
    Query(request): Query<ForecastRequest>,
) -> Result<Json<ForecastResponse>, Json<ErrorBody>> {
    run(ForecastScope::Enrollment, branch_entity(&request), &request).await
}

pub async fn customer_points(
    Query(request): Query<ForecastRequest>,
) -> Result<Json<ForecastResponse>, Json<ErrorBody>> {
    // Scoped by company rather than branch; 0 still means everyone.
    let entity_id = request
        .company
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0);
    run(ForecastScope::CustomerPoints, entity_id, &request).await
}

fn branch_entity(request: &ForecastRequest) -> i64 {
    BranchFilter::parse(request.branch.as_deref()).id().unwrap_or(0)
}

async fn run(
    scope: ForecastScope,
    entity_id: i64,
    request: &ForecastRequest,
) -> Result<Json<ForecastResponse>, Json<ErrorBody>> {
    let months = request.forecast_months.unwrap_or(DEFAULT_FORECAST_MONTHS);
    tracing::info!(
        "Forecast requested (scope={:?}, entity_id={}, months={})",
        scope,
        entity_id,
        months
    );
    match get_forecast_client().run(scope, entity_id, months).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Forecast failed: {}", e);
            Err(Json(ErrorBody::new(e.to_string())))
        }
    }
}
