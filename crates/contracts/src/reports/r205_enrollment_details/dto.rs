use serde::{Deserialize, Serialize};

/// Raw query parameters for the customer drill-down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentDetailsRequest {
    pub branch_id: Option<String>,
    pub customer_filter: Option<String>,
}

/// One customer row. Trailing windows are measured back from today and only
/// count confirmed orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetailRow {
    pub customer_id: i64,
    pub customer_code: String,
    pub customer_name: String,
    pub branch_name: String,
    pub can_enroll: bool,
    pub is_enrolled: bool,
    pub last_order_date: Option<String>,
    pub orders_last_6m: i64,
    pub revenue_last_6m: f64,
    pub orders_last_12m: i64,
    pub revenue_last_12m: f64,
    pub orders_over_350_6m: i64,
    pub orders_over_350_12m: i64,
    pub revenue_over_350_6m: f64,
    pub revenue_over_350_12m: f64,
}

/// Headline counts above the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentDetailsSummary {
    pub enrolled_count: i64,
    /// Eligible, not enrolled, with a confirmed order in the last 6 months.
    pub can_enroll_recent_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentDetailsResponse {
    pub rows: Vec<CustomerDetailRow>,
    pub summary: EnrollmentDetailsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnrollmentDetailsResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}
