use axum::{extract::Query, Json};
use contracts::reports::r201_order_summary::{OrderSummaryRequest, OrderSummaryResponse};

use crate::reports::r201_order_summary::service;

pub async fn get(Query(request): Query<OrderSummaryRequest>) -> Json<OrderSummaryResponse> {
    tracing::info!(
        "Order summary requested (from={:?}, to={:?})",
        request.from_date,
        request.to_date
    );
    match service::get_order_summary(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!("Order summary failed: {}", e);
            Json(OrderSummaryResponse::failed(e.to_string()))
        }
    }
}
