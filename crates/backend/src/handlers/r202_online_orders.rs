use axum::{extract::Query, Json};
use contracts::reports::r202_online_orders::{OnlineOrdersRequest, OnlineOrdersResponse};

use crate::reports::r202_online_orders::service;

pub async fn get(Query(request): Query<OnlineOrdersRequest>) -> Json<OnlineOrdersResponse> {
    tracing::info!(
        "Online orders report requested (from={:?}, to={:?})",
        request.from_date,
        request.to_date
    );
    match service::get_online_orders(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Online orders report failed: {}", e);
            Json(OnlineOrdersResponse::failed(e.to_string()))
        }
    }
}
