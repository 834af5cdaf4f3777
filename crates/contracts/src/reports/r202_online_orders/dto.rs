use serde::{Deserialize, Serialize};

/// Raw query parameters; dates default to year-to-date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineOrdersRequest {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Confirmed-order counts for one customer segment, split at $350.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SegmentCounts {
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_orders: i64,
}

/// Per-branch row with the three segments side by side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineOrdersRow {
    pub branch_name: String,
    pub all: SegmentCounts,
    pub enrolled: SegmentCounts,
    pub can_enroll_not_enrolled: SegmentCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineOrdersTotals {
    pub all: SegmentCounts,
    pub enrolled: SegmentCounts,
    pub can_enroll_not_enrolled: SegmentCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnlineOrdersResponse {
    pub from_date: String,
    pub to_date: String,
    pub rows: Vec<OnlineOrdersRow>,
    pub totals: OnlineOrdersTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OnlineOrdersResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}
