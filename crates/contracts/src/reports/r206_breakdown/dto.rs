use serde::{Deserialize, Serialize};

/// Raw query parameters for the modal drill-down endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakdownRequest {
    pub action: Option<String>,
    pub metric: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub branch: Option<String>,
}

/// The metric vocabulary the breakdown endpoint can slice per branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownMetric {
    OrdersTotal,
    OrdersRevenue,
    OrdersAov,
    OrdersHigh,
    EnrollmentTotal,
    EnrollmentNotEnrolled,
    EnrollmentPercent,
    EnrollmentOrders6m,
    Enrollment6m,
    Enrollment12m,
    EnrollmentOrders12m,
    PointsEarned,
    PointsAvailable,
    PointsPending,
    PointsCanceled,
    PointsRedeemed,
    RedemptionsValue,
}

impl BreakdownMetric {
    /// None for any metric name outside the vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        use BreakdownMetric::*;
        match raw {
            "orders_total" => Some(OrdersTotal),
            "orders_revenue" => Some(OrdersRevenue),
            "orders_aov" => Some(OrdersAov),
            "orders_high" => Some(OrdersHigh),
            "enrollment_total" => Some(EnrollmentTotal),
            "enrollment_not_enrolled" => Some(EnrollmentNotEnrolled),
            "enrollment_percent" => Some(EnrollmentPercent),
            "enrollment_orders_6m" => Some(EnrollmentOrders6m),
            "enrollment_6m" => Some(Enrollment6m),
            "enrollment_12m" => Some(Enrollment12m),
            "enrollment_orders_12m" => Some(EnrollmentOrders12m),
            "points_earned" => Some(PointsEarned),
            "points_available" => Some(PointsAvailable),
            "points_pending" => Some(PointsPending),
            "points_canceled" => Some(PointsCanceled),
            // Two historical names for the same slice.
            "points_redeemed" | "redemptions_points" => Some(PointsRedeemed),
            "redemptions_value" => Some(RedemptionsValue),
            _ => None,
        }
    }

    /// Ratio metrics are recomputed from summed numerators/denominators
    /// rather than summed per-branch values.
    pub fn is_ratio(&self) -> bool {
        matches!(
            self,
            BreakdownMetric::OrdersAov
                | BreakdownMetric::EnrollmentPercent
                | BreakdownMetric::Enrollment6m
                | BreakdownMetric::Enrollment12m
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub branch_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakdownResponse {
    pub breakdown: Vec<BreakdownEntry>,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(BreakdownMetric::parse("orders_total"), Some(BreakdownMetric::OrdersTotal));
        assert_eq!(
            BreakdownMetric::parse("redemptions_points"),
            Some(BreakdownMetric::PointsRedeemed)
        );
        assert_eq!(
            BreakdownMetric::parse("points_redeemed"),
            Some(BreakdownMetric::PointsRedeemed)
        );
        assert_eq!(BreakdownMetric::parse("points_expired"), None);
        assert_eq!(BreakdownMetric::parse(""), None);
    }

    #[test]
    fn test_ratio_metrics() {
        assert!(BreakdownMetric::OrdersAov.is_ratio());
        assert!(BreakdownMetric::EnrollmentPercent.is_ratio());
        assert!(!BreakdownMetric::OrdersRevenue.is_ratio());
        assert!(!BreakdownMetric::PointsRedeemed.is_ratio());
    }
}
