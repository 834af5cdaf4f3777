use serde::{Deserialize, Serialize};

/// One branch in the filter dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRef {
    pub id: i64,
    pub name: String,
}

/// Response for the branch-list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchListResponse {
    pub branches: Vec<BranchRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
