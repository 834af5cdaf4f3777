use serde::{Deserialize, Serialize};

use crate::shared::ratio::{percent, round1};

/// Raw query parameters; dates default to month-to-date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchRedemptionsRequest {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Point lifecycle and redemption figures for one display branch.
///
/// `total_points_earned`, `points_redeemed` and `claimed_rewards` are bounded
/// by the date range; the status buckets reflect the current ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedemptionRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub total_points_earned: i64,
    pub available_points: i64,
    pub pending_points: i64,
    pub canceled_points: i64,
    pub expired_points: i64,
    pub points_redeemed: i64,
    pub claimed_rewards: f64,
    pub redemption_rate: f64,
}

impl RedemptionRow {
    pub fn derive_rate(&mut self) {
        self.redemption_rate = round1(percent(
            self.points_redeemed as f64,
            self.total_points_earned as f64,
        ));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedemptionTotals {
    pub total_points_earned: i64,
    pub available_points: i64,
    pub pending_points: i64,
    pub canceled_points: i64,
    pub expired_points: i64,
    pub points_redeemed: i64,
    pub claimed_rewards: f64,
    pub redemption_rate: f64,
}

impl RedemptionTotals {
    pub fn derive_rate(&mut self) {
        self.redemption_rate = round1(percent(
            self.points_redeemed as f64,
            self.total_points_earned as f64,
        ));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchRedemptionsResponse {
    pub from_date: String,
    pub to_date: String,
    pub rows: Vec<RedemptionRow>,
    pub totals: RedemptionTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BranchRedemptionsResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}
