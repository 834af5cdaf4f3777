use anyhow::Result;
use contracts::reports::r204_branch_redemptions::{
    BranchRedemptionsRequest, BranchRedemptionsResponse, RedemptionRow, RedemptionTotals,
};
use contracts::shared::filters::{DateDefaults, DateRange};

use super::repository;
use crate::reports::aggregate;

/// Point lifecycle and redemptions per branch over a date range.
pub async fn get_branch_redemptions(
    request: &BranchRedemptionsRequest,
) -> Result<BranchRedemptionsResponse> {
    let range = DateRange::resolve_now(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        DateDefaults::MonthToDate,
    );

    let raw = repository::branch_redemptions(&range).await?;

    let keyed: Vec<(String, RedemptionRow)> = raw
        .into_iter()
        .map(|r| {
            let row = RedemptionRow {
                branch_id: r.branch_id,
                branch_name: String::new(),
                total_points_earned: r.total_points_earned,
                available_points: r.available_points,
                pending_points: r.pending_points,
                canceled_points: r.canceled_points,
                expired_points: r.expired_points,
                points_redeemed: r.points_redeemed,
                claimed_rewards: r.claimed_rewards,
                redemption_rate: 0.0,
            };
            (r.branch_name, row)
        })
        .collect();

    let mut totals = RedemptionTotals::default();
    let rows: Vec<RedemptionRow> = aggregate::merge_by_branch(keyed, add_redemption_row)
        .into_iter()
        .map(|(display_name, mut row)| {
            row.branch_name = display_name;
            totals.total_points_earned += row.total_points_earned;
            totals.available_points += row.available_points;
            totals.pending_points += row.pending_points;
            totals.canceled_points += row.canceled_points;
            totals.expired_points += row.expired_points;
            totals.points_redeemed += row.points_redeemed;
            totals.claimed_rewards += row.claimed_rewards;
            row.derive_rate();
            row
        })
        .collect();
    totals.derive_rate();

    Ok(BranchRedemptionsResponse {
        from_date: range.from_str(),
        to_date: range.to_str(),
        rows,
        totals,
        error: None,
    })
}

fn add_redemption_row(acc: &mut RedemptionRow, other: RedemptionRow) {
    acc.total_points_earned += other.total_points_earned;
    acc.available_points += other.available_points;
    acc.pending_points += other.pending_points;
    acc.canceled_points += other.canceled_points;
    acc.expired_points += other.expired_points;
    acc.points_redeemed += other.points_redeemed;
    acc.claimed_rewards += other.claimed_rewards;
}
