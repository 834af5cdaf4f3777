use std::collections::BTreeMap;

use anyhow::Result;
use contracts::reports::r201_order_summary::{
    OrderSummaryRequest, OrderSummaryResponse, OrderSummaryRow, OrderSummaryTotals,
};
use contracts::shared::branch::{is_denylisted, normalize_branch_name};
use contracts::shared::filters::{BranchFilter, CustomerSegment, DateDefaults, DateRange};
use contracts::shared::ratio::round2;

use super::repository;
use crate::reports::aggregate::OrderTallies;

/// Orders with no program attached fall under this label.
const LOCAL_SALES_PROGRAM: &str = "Local Branch Sales";

/// This page opens on the full year, not the current month.
const DATE_DEFAULTS: DateDefaults = DateDefaults::YearToDate;

/// A first load shows enrolled customers. Absent and unknown differ:
/// an explicit unknown value still degrades to the unfiltered view.
fn resolve_segment(raw: Option<&str>) -> CustomerSegment {
    match raw {
        None => CustomerSegment::Enrolled,
        raw => CustomerSegment::parse(raw),
    }
}

/// Order summary: confirmed orders per branch, optionally split by program.
pub async fn get_order_summary(request: &OrderSummaryRequest) -> Result<OrderSummaryResponse> {
    let range = DateRange::resolve_now(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        DATE_DEFAULTS,
    );
    let branch = BranchFilter::parse(request.branch.as_deref());
    let segment = resolve_segment(request.customer_filter.as_deref());
    let show_programs = request.show_programs();

    let raw_rows = repository::orders_by_branch_program(&range, branch, segment).await?;

    // Normalize before grouping: rows from two source branches that share a
    // display name are summed, never emitted twice. When programs are
    // hidden the program dimension collapses into the same fold.
    let mut merged: BTreeMap<(String, String), OrderTallies> = BTreeMap::new();
    for row in raw_rows {
        if is_denylisted(&row.branch_name) {
            continue;
        }
        let display = normalize_branch_name(&row.branch_name);
        let program = match row.program_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => LOCAL_SALES_PROGRAM.to_string(),
        };
        let key = if show_programs { (display, program) } else { (display, String::new()) };
        let entry = merged.entry(key).or_default();
        entry.order_count += row.order_count;
        entry.orders_high += row.orders_high;
        entry.orders_low += row.orders_low;
        entry.total_revenue += row.total_revenue;
    }

    let rows: Vec<OrderSummaryRow> = merged
        .into_iter()
        .map(|((branch_name, program), tallies)| OrderSummaryRow {
            branch_name,
            program_name: if show_programs { Some(program) } else { None },
            order_count: tallies.order_count,
            orders_high: tallies.orders_high,
            orders_low: tallies.orders_low,
            total_revenue: tallies.total_revenue,
            aov: round2(tallies.aov()),
        })
        .collect();

    let mut totals = OrderSummaryTotals::default();
    for row in &rows {
        totals.total_orders += row.order_count;
        totals.orders_high += row.orders_high;
        totals.orders_low += row.orders_low;
        totals.total_revenue += row.total_revenue;
    }
    totals.aov = round2(
        OrderTallies {
            order_count: totals.total_orders,
            total_revenue: totals.total_revenue,
            ..Default::default()
        }
        .aov(),
    );

    Ok(OrderSummaryResponse {
        from_date: range.from_str(),
        to_date: range.to_str(),
        show_programs,
        rows,
        totals,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_dates_default_to_year_start() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let range = DateRange::resolve(None, None, DATE_DEFAULTS, today);
        assert_eq!(range.from_str(), "2024-01-01");
        assert_eq!(range.to_str(), "2024-03-15");
    }

    #[test]
    fn test_absent_segment_defaults_to_enrolled() {
        assert_eq!(resolve_segment(None), CustomerSegment::Enrolled);
        assert_eq!(
            resolve_segment(Some("can_enroll_not_enrolled")),
            CustomerSegment::CanEnrollNotEnrolled
        );
        assert_eq!(resolve_segment(Some("bogus")), CustomerSegment::All);
    }
}
