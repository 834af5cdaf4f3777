use std::collections::BTreeMap;

use anyhow::Result;
use contracts::reports::r202_online_orders::{
    OnlineOrdersRequest, OnlineOrdersResponse, OnlineOrdersRow, OnlineOrdersTotals,
    SegmentCounts,
};
use contracts::shared::filters::{CustomerSegment, DateDefaults, DateRange};

use super::repository;
use crate::reports::aggregate;

/// Online orders: per-branch confirmed-order counts for the three customer
/// segments side by side, defaulting to year-to-date.
pub async fn get_online_orders(request: &OnlineOrdersRequest) -> Result<OnlineOrdersResponse> {
    let range = DateRange::resolve_now(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        DateDefaults::YearToDate,
    );

    let all = fetch_segment(&range, CustomerSegment::All).await?;
    let enrolled = fetch_segment(&range, CustomerSegment::Enrolled).await?;
    let not_enrolled = fetch_segment(&range, CustomerSegment::CanEnrollNotEnrolled).await?;

    // Union of branch names across segments, sorted.
    let mut rows_by_branch: BTreeMap<String, OnlineOrdersRow> = BTreeMap::new();
    for (name, counts) in all {
        rows_by_branch
            .entry(name.clone())
            .or_insert_with(|| OnlineOrdersRow { branch_name: name, ..Default::default() })
            .all = counts;
    }
    for (name, counts) in enrolled {
        rows_by_branch
            .entry(name.clone())
            .or_insert_with(|| OnlineOrdersRow { branch_name: name, ..Default::default() })
            .enrolled = counts;
    }
    for (name, counts) in not_enrolled {
        rows_by_branch
            .entry(name.clone())
            .or_insert_with(|| OnlineOrdersRow { branch_name: name, ..Default::default() })
            .can_enroll_not_enrolled = counts;
    }

    let rows: Vec<OnlineOrdersRow> = rows_by_branch.into_values().collect();

    let mut totals = OnlineOrdersTotals::default();
    for row in &rows {
        add_counts(&mut totals.all, &row.all);
        add_counts(&mut totals.enrolled, &row.enrolled);
        add_counts(&mut totals.can_enroll_not_enrolled, &row.can_enroll_not_enrolled);
    }

    Ok(OnlineOrdersResponse {
        from_date: range.from_str(),
        to_date: range.to_str(),
        rows,
        totals,
        error: None,
    })
}

async fn fetch_segment(
    range: &DateRange,
    segment: CustomerSegment,
) -> Result<Vec<(String, SegmentCounts)>> {
    let raw = repository::segment_counts(range, segment).await?;
    let rows = raw
        .into_iter()
        .map(|r| {
            (
                r.branch_name,
                SegmentCounts {
                    orders_high: r.orders_high,
                    orders_low: r.orders_low,
                    total_orders: r.total_orders,
                },
            )
        })
        .collect();
    Ok(aggregate::merge_by_branch(rows, |acc: &mut SegmentCounts, v| {
        acc.orders_high += v.orders_high;
        acc.orders_low += v.orders_low;
        acc.total_orders += v.total_orders;
    }))
}

fn add_counts(acc: &mut SegmentCounts, other: &SegmentCounts) {
    acc.orders_high += other.orders_high;
    acc.orders_low += other.orders_low;
    acc.total_orders += other.total_orders;
}
