use serde::{Deserialize, Serialize};

/// Raw query parameters for the order summary report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSummaryRequest {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub branch: Option<String>,
    pub customer_filter: Option<String>,
    /// The program split is on by default; the page checkbox always sends
    /// "0" or "1", so only an explicit falsy value collapses to branch.
    pub show_programs: Option<String>,
}

impl OrderSummaryRequest {
    pub fn show_programs(&self) -> bool {
        match self.show_programs.as_deref() {
            None => true,
            Some(value) => value == "1" || value == "true",
        }
    }
}

/// One output row. `program_name` is None when rows are collapsed to branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSummaryRow {
    pub branch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub order_count: i64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_revenue: f64,
    pub aov: f64,
}

/// Column-wise sums with AOV recomputed from the summed figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSummaryTotals {
    pub total_orders: i64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_revenue: f64,
    pub aov: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSummaryResponse {
    pub from_date: String,
    pub to_date: String,
    pub show_programs: bool,
    pub rows: Vec<OrderSummaryRow>,
    pub totals: OrderSummaryTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrderSummaryResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_programs_defaults_to_expanded() {
        assert!(OrderSummaryRequest::default().show_programs());
    }

    #[test]
    fn test_show_programs_explicit_values() {
        let request = |raw: &str| OrderSummaryRequest {
            show_programs: Some(raw.to_string()),
            ..Default::default()
        };
        assert!(request("1").show_programs());
        assert!(!request("0").show_programs());
        assert!(!request("off").show_programs());
    }
}
