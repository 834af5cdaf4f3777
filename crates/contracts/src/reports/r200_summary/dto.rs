use serde::{Deserialize, Serialize};

use crate::shared::ratio::{percent, ratio, round1, round2};

/// Raw query parameters for the key-metrics summary report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub branch: Option<String>,
    pub customer_filter: Option<String>,
}

/// Enrollment funnel counts plus derived rates.
///
/// The 6m/12m variants restrict to customers with a confirmed order inside
/// the trailing window; the "active purchaser" rate divides enrolled by
/// (enrolled + eligible-not-enrolled recent purchasers), not by all
/// eligible customers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentMetrics {
    pub total_enrolled: i64,
    pub can_enroll: i64,
    pub can_enroll_not_enrolled: i64,
    pub enrollment_percent: f64,
    pub can_enroll_with_orders_6m: i64,
    pub enrolled_with_orders_6m: i64,
    pub enrollment_percent_6m: f64,
    pub can_enroll_with_orders_12m: i64,
    pub enrolled_with_orders_12m: i64,
    pub enrollment_percent_12m: f64,
}

impl EnrollmentMetrics {
    /// Recomputes the three percentage fields from the counts.
    pub fn derive_rates(&mut self) {
        self.enrollment_percent =
            round1(percent(self.total_enrolled as f64, self.can_enroll as f64));
        self.enrollment_percent_6m = round1(percent(
            self.total_enrolled as f64,
            (self.total_enrolled + self.can_enroll_with_orders_6m) as f64,
        ));
        self.enrollment_percent_12m = round1(percent(
            self.total_enrolled as f64,
            (self.total_enrolled + self.can_enroll_with_orders_12m) as f64,
        ));
    }
}

/// Loyalty-point lifecycle buckets. `total_earned` is date-bounded; the
/// status buckets reflect the current ledger regardless of the range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointsMetrics {
    pub total_earned: i64,
    pub available: i64,
    pub pending: i64,
    pub canceled: i64,
    pub expired: i64,
}

/// Confirmed-order metrics, with >= $350 split and enrolled-customer slices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderMetrics {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub aov: f64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub revenue_enrolled: f64,
    pub orders_enrolled: i64,
    pub orders_enrolled_high: i64,
    pub orders_enrolled_low: i64,
}

impl OrderMetrics {
    pub fn derive_aov(&mut self) {
        self.aov = round2(ratio(self.total_revenue, self.total_orders as f64));
    }
}

/// Redemption activity inside the date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedemptionMetrics {
    pub points_redeemed: i64,
    pub claimed_rewards: f64,
    pub redemption_rate: f64,
}

impl RedemptionMetrics {
    /// redemption_rate = points_redeemed / total_earned * 100.
    pub fn derive_rate(&mut self, total_earned: i64) {
        self.redemption_rate =
            round1(percent(self.points_redeemed as f64, total_earned as f64));
    }
}

/// Per-branch export row: the four metric groups for one display branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchSummary {
    pub branch_id: i64,
    pub branch_name: String,
    pub enrollment: EnrollmentMetrics,
    pub points: PointsMetrics,
    pub orders: OrderMetrics,
    pub redemptions: RedemptionMetrics,
}

/// Response for the key-metrics summary report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub from_date: String,
    pub to_date: String,
    pub branch: String,
    pub customer_filter: String,
    pub enrollment: EnrollmentMetrics,
    pub points: PointsMetrics,
    pub orders: OrderMetrics,
    pub redemptions: RedemptionMetrics,
    pub branches: Vec<BranchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryResponse {
    /// Empty result set carrying only an error banner message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_rates_zero_denominators() {
        let mut metrics = EnrollmentMetrics::default();
        metrics.derive_rates();
        assert_eq!(metrics.enrollment_percent, 0.0);
        assert_eq!(metrics.enrollment_percent_6m, 0.0);
        assert_eq!(metrics.enrollment_percent_12m, 0.0);
    }

    #[test]
    fn test_active_purchaser_rate_uses_recent_purchasers() {
        let mut metrics = EnrollmentMetrics {
            total_enrolled: 30,
            can_enroll: 100,
            can_enroll_with_orders_6m: 10,
            can_enroll_with_orders_12m: 30,
            ..Default::default()
        };
        metrics.derive_rates();
        assert_eq!(metrics.enrollment_percent, 30.0);
        // 30 / (30 + 10), not 30 / 100
        assert_eq!(metrics.enrollment_percent_6m, 75.0);
        assert_eq!(metrics.enrollment_percent_12m, 50.0);
    }

    #[test]
    fn test_aov_zero_orders() {
        let mut orders = OrderMetrics { total_revenue: 500.0, ..Default::default() };
        orders.derive_aov();
        assert_eq!(orders.aov, 0.0);
    }

    #[test]
    fn test_redemption_rate() {
        let mut redemptions =
            RedemptionMetrics { points_redeemed: 250, ..Default::default() };
        redemptions.derive_rate(1000);
        assert_eq!(redemptions.redemption_rate, 25.0);
        redemptions.derive_rate(0);
        assert_eq!(redemptions.redemption_rate, 0.0);
    }
}
