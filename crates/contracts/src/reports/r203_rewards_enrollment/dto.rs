use serde::{Deserialize, Serialize};

use crate::shared::ratio::{percent, round1, round2};

/// Per-branch enrollment funnel. Windows are measured back from today.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub can_enroll_count: i64,
    pub enrolled_count: i64,
    pub can_enroll_not_enrolled_count: i64,
    pub can_enroll_with_orders_6m: i64,
    pub can_enroll_with_orders_12m: i64,
    pub enrollment_percent: f64,
    pub active_purchaser_enrollment_percent_6m: f64,
    pub active_purchaser_enrollment_percent_12m: f64,
}

impl EnrollmentRow {
    pub fn derive_rates(&mut self) {
        self.enrollment_percent = round2(percent(
            self.enrolled_count as f64,
            self.can_enroll_count as f64,
        ));
        self.active_purchaser_enrollment_percent_6m = round1(percent(
            self.enrolled_count as f64,
            (self.enrolled_count + self.can_enroll_with_orders_6m) as f64,
        ));
        self.active_purchaser_enrollment_percent_12m = round1(percent(
            self.enrolled_count as f64,
            (self.enrolled_count + self.can_enroll_with_orders_12m) as f64,
        ));
    }
}

/// Totals row. The headline rate divides by enrolled + not-enrolled rather
/// than the can_enroll column sum, matching the report's footer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentTotals {
    pub can_enroll_count: i64,
    pub enrolled_count: i64,
    pub can_enroll_not_enrolled_count: i64,
    pub can_enroll_with_orders_6m: i64,
    pub can_enroll_with_orders_12m: i64,
    pub enrollment_percent: f64,
    pub active_purchaser_enrollment_percent_6m: f64,
    pub active_purchaser_enrollment_percent_12m: f64,
}

impl EnrollmentTotals {
    pub fn derive_rates(&mut self) {
        let total_can_enroll =
            self.enrolled_count + self.can_enroll_not_enrolled_count;
        self.enrollment_percent =
            round1(percent(self.enrolled_count as f64, total_can_enroll as f64));
        self.active_purchaser_enrollment_percent_6m = round1(percent(
            self.enrolled_count as f64,
            (self.enrolled_count + self.can_enroll_with_orders_6m) as f64,
        ));
        self.active_purchaser_enrollment_percent_12m = round1(percent(
            self.enrolled_count as f64,
            (self.enrolled_count + self.can_enroll_with_orders_12m) as f64,
        ));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardsEnrollmentResponse {
    pub rows: Vec<EnrollmentRow>,
    pub totals: EnrollmentTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RewardsEnrollmentResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_rates_zero_denominators() {
        let mut row = EnrollmentRow::default();
        row.derive_rates();
        assert_eq!(row.enrollment_percent, 0.0);
        assert_eq!(row.active_purchaser_enrollment_percent_6m, 0.0);
        assert_eq!(row.active_purchaser_enrollment_percent_12m, 0.0);
    }

    #[test]
    fn test_totals_rate_uses_funnel_sum() {
        let mut totals = EnrollmentTotals {
            can_enroll_count: 500,
            enrolled_count: 40,
            can_enroll_not_enrolled_count: 60,
            ..Default::default()
        };
        totals.derive_rates();
        // 40 / (40 + 60), not 40 / 500.
        assert_eq!(totals.enrollment_percent, 40.0);
    }
}
