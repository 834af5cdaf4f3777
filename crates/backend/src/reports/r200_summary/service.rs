use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use contracts::reports::r200_summary::{
    BranchSummary, EnrollmentMetrics, OrderMetrics, PointsMetrics, RedemptionMetrics,
    SummaryRequest, SummaryResponse,
};
use contracts::shared::filters::{BranchFilter, CustomerSegment, DateDefaults, DateRange};

use super::repository;
use crate::reports::{aggregate, branches};

/// Key-metrics summary: network-wide metric groups plus per-branch rows.
pub async fn get_summary(request: &SummaryRequest) -> Result<SummaryResponse> {
    let range = DateRange::resolve_now(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        DateDefaults::MonthToDate,
    );
    let branch = BranchFilter::parse(request.branch.as_deref());
    let segment = CustomerSegment::parse(request.customer_filter.as_deref());

    let today = Local::now().date_naive();
    let six_months_ago = months_ago(today, 6);
    let twelve_months_ago = months_ago(today, 12);

    let mut enrollment = to_enrollment(
        repository::enrollment_metrics(&six_months_ago, &twelve_months_ago, branch).await?,
    );
    enrollment.derive_rates();

    let points = to_points(repository::points_metrics(&range, branch).await?);

    let mut redemptions = to_redemptions(repository::redemption_metrics(&range, branch).await?);
    redemptions.derive_rate(points.total_earned);

    let mut orders = to_orders(repository::order_metrics(&range, branch, segment).await?);
    orders.derive_aov();

    // Per-branch rows for the export table: queried per source branch, then
    // merged under normalized display names before rates are derived.
    let branch_list = branches::list_branches().await?;
    let mut raw_rows: Vec<(String, BranchSummary)> = Vec::with_capacity(branch_list.len());
    for branch_ref in &branch_list {
        let row_filter = BranchFilter::Id(branch_ref.id);
        let row = BranchSummary {
            branch_id: branch_ref.id,
            branch_name: String::new(),
            enrollment: to_enrollment(
                repository::enrollment_metrics(&six_months_ago, &twelve_months_ago, row_filter)
                    .await?,
            ),
            points: to_points(repository::points_metrics(&range, row_filter).await?),
            orders: to_orders(repository::order_metrics(&range, row_filter, segment).await?),
            redemptions: to_redemptions(
                repository::redemption_metrics(&range, row_filter).await?,
            ),
        };
        raw_rows.push((branch_ref.name.clone(), row));
    }

    let branch_rows = aggregate::merge_by_branch(raw_rows, add_branch_summary)
        .into_iter()
        .map(|(display_name, mut row)| {
            row.branch_name = display_name;
            row.enrollment.derive_rates();
            row.orders.derive_aov();
            row.redemptions.derive_rate(row.points.total_earned);
            row
        })
        .collect();

    Ok(SummaryResponse {
        from_date: range.from_str(),
        to_date: range.to_str(),
        branch: branch.as_query_value(),
        customer_filter: segment.as_query_value().to_string(),
        enrollment,
        points,
        orders,
        redemptions,
        branches: branch_rows,
        error: None,
    })
}

fn months_ago(today: NaiveDate, months: u32) -> String {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

fn to_enrollment(agg: repository::EnrollmentAgg) -> EnrollmentMetrics {
    EnrollmentMetrics {
        total_enrolled: agg.total_enrolled,
        can_enroll: agg.can_enroll,
        can_enroll_not_enrolled: agg.can_enroll_not_enrolled,
        can_enroll_with_orders_6m: agg.can_enroll_with_orders_6m,
        enrolled_with_orders_6m: agg.enrolled_with_orders_6m,
        can_enroll_with_orders_12m: agg.can_enroll_with_orders_12m,
        enrolled_with_orders_12m: agg.enrolled_with_orders_12m,
        ..Default::default()
    }
}

fn to_points(agg: repository::PointsAgg) -> PointsMetrics {
    PointsMetrics {
        total_earned: agg.total_earned,
        available: agg.available,
        pending: agg.pending,
        canceled: agg.canceled,
        expired: agg.expired,
    }
}

fn to_redemptions(agg: repository::RedemptionAgg) -> RedemptionMetrics {
    RedemptionMetrics {
        points_redeemed: agg.points_redeemed,
        claimed_rewards: agg.claimed_rewards,
        ..Default::default()
    }
}

fn to_orders(agg: repository::OrdersAgg) -> OrderMetrics {
    OrderMetrics {
        total_orders: agg.total_orders,
        total_revenue: agg.total_revenue,
        orders_high: agg.orders_high,
        orders_low: agg.orders_low,
        revenue_enrolled: agg.revenue_enrolled,
        orders_enrolled: agg.orders_enrolled,
        orders_enrolled_high: agg.orders_enrolled_high,
        orders_enrolled_low: agg.orders_enrolled_low,
        ..Default::default()
    }
}

/// Additive merge for two branches sharing a display name. Derived rates are
/// recomputed afterwards from the summed counts.
fn add_branch_summary(acc: &mut BranchSummary, other: BranchSummary) {
    let e = &mut acc.enrollment;
    e.total_enrolled += other.enrollment.total_enrolled;
    e.can_enroll += other.enrollment.can_enroll;
    e.can_enroll_not_enrolled += other.enrollment.can_enroll_not_enrolled;
    e.can_enroll_with_orders_6m += other.enrollment.can_enroll_with_orders_6m;
    e.enrolled_with_orders_6m += other.enrollment.enrolled_with_orders_6m;
    e.can_enroll_with_orders_12m += other.enrollment.can_enroll_with_orders_12m;
    e.enrolled_with_orders_12m += other.enrollment.enrolled_with_orders_12m;

    let p = &mut acc.points;
    p.total_earned += other.points.total_earned;
    p.available += other.points.available;
    p.pending += other.points.pending;
    p.canceled += other.points.canceled;
    p.expired += other.points.expired;

    let o = &mut acc.orders;
    o.total_orders += other.orders.total_orders;
    o.total_revenue += other.orders.total_revenue;
    o.orders_high += other.orders.orders_high;
    o.orders_low += other.orders.orders_low;
    o.revenue_enrolled += other.orders.revenue_enrolled;
    o.orders_enrolled += other.orders.orders_enrolled;
    o.orders_enrolled_high += other.orders.orders_enrolled_high;
    o.orders_enrolled_low += other.orders.orders_enrolled_low;

    let r = &mut acc.redemptions;
    r.points_redeemed += other.redemptions.points_redeemed;
    r.claimed_rewards += other.redemptions.claimed_rewards;
}
