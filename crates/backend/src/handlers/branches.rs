use axum::Json;
use contracts::reports::branches::BranchListResponse;

use crate::reports::branches;

pub async fn list() -> Json<BranchListResponse> {
    match branches::list_branches().await {
        Ok(branches) => Json(BranchListResponse { branches, error: None }),
        Err(e) => {
            tracing::error!("Failed to list branches: {}", e);
            Json(BranchListResponse { branches: vec![], error: Some(e.to_string()) })
        }
    }
}
