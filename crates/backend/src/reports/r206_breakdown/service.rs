use std::collections::BTreeMap;

use contracts::reports::r206_breakdown::{
    BreakdownEntry, BreakdownMetric, BreakdownRequest, BreakdownResponse,
};
use contracts::shared::filters::{BranchFilter, DateDefaults, DateRange};
use contracts::shared::ratio::{percent, ratio};
use thiserror::Error;

use super::repository::{self, ValueQuery};
use crate::reports::aggregate;

#[derive(Debug, Error)]
pub enum BreakdownError {
    #[error("Invalid action")]
    InvalidAction,
    #[error("Invalid metric")]
    InvalidMetric,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Modal drill-down: one metric sliced per branch.
///
/// Additive metrics are a single query merged under normalized names. Ratio
/// metrics are composed from their numerator and denominator slices so a
/// merged branch pair gets a recomputed ratio, not a summed one, and the
/// total is likewise recomputed from the summed parts.
pub async fn get_breakdown(
    request: &BreakdownRequest,
) -> Result<BreakdownResponse, BreakdownError> {
    if request.action.as_deref() != Some("branch_breakdown") {
        return Err(BreakdownError::InvalidAction);
    }
    let metric = request
        .metric
        .as_deref()
        .and_then(BreakdownMetric::parse)
        .ok_or(BreakdownError::InvalidMetric)?;

    let range = DateRange::resolve_now(
        request.from_date.as_deref(),
        request.to_date.as_deref(),
        DateDefaults::MonthToDate,
    );
    let branch = BranchFilter::parse(request.branch.as_deref());

    let today = chrono::Local::now().date_naive();
    let six = months_ago(today, 6);
    let twelve = months_ago(today, 12);
    let fetch = |query: ValueQuery| fetch_merged(query, &range, &six, &twelve, branch);

    let (mut entries, total) = match metric {
        BreakdownMetric::OrdersAov => compose_ratio(
            fetch(ValueQuery::OrdersRevenue).await?,
            fetch(ValueQuery::OrdersCount).await?,
            RatioKind::Plain,
        ),
        BreakdownMetric::EnrollmentPercent => compose_ratio(
            fetch(ValueQuery::EnrolledCount).await?,
            fetch(ValueQuery::CanEnrollCount).await?,
            RatioKind::Percent,
        ),
        BreakdownMetric::Enrollment6m => {
            let enrolled = fetch(ValueQuery::EnrolledCount).await?;
            let recent = fetch(ValueQuery::CanEnrollRecent6m).await?;
            compose_ratio(enrolled.clone(), sum_slices(enrolled, recent), RatioKind::Percent)
        }
        BreakdownMetric::Enrollment12m => {
            let enrolled = fetch(ValueQuery::EnrolledCount).await?;
            let recent = fetch(ValueQuery::CanEnrollRecent12m).await?;
            compose_ratio(enrolled.clone(), sum_slices(enrolled, recent), RatioKind::Percent)
        }
        additive => {
            let merged = fetch(additive_query(additive)).await?;
            let total: f64 = merged.iter().map(|(_, v)| v).sum();
            let entries = merged
                .into_iter()
                .map(|(branch_name, value)| BreakdownEntry { branch_name, value })
                .collect();
            (entries, total)
        }
    };

    // Largest slice first, like the page's modal chart.
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(BreakdownResponse { breakdown: entries, total })
}

async fn fetch_merged(
    query: ValueQuery,
    range: &DateRange,
    six_months_ago: &str,
    twelve_months_ago: &str,
    branch: BranchFilter,
) -> anyhow::Result<Vec<(String, f64)>> {
    let rows =
        repository::branch_values(query, range, six_months_ago, twelve_months_ago, branch).await?;
    Ok(aggregate::merge_values(rows))
}

fn additive_query(metric: BreakdownMetric) -> ValueQuery {
    match metric {
        BreakdownMetric::OrdersTotal => ValueQuery::OrdersCount,
        BreakdownMetric::OrdersRevenue => ValueQuery::OrdersRevenue,
        BreakdownMetric::OrdersHigh => ValueQuery::OrdersHigh,
        BreakdownMetric::EnrollmentTotal => ValueQuery::EnrolledCount,
        BreakdownMetric::EnrollmentNotEnrolled => ValueQuery::CanEnrollNotEnrolled,
        BreakdownMetric::EnrollmentOrders6m => ValueQuery::EnrolledRecent6m,
        BreakdownMetric::EnrollmentOrders12m => ValueQuery::EnrolledRecent12m,
        BreakdownMetric::PointsEarned => ValueQuery::PointsEarned,
        BreakdownMetric::PointsAvailable => ValueQuery::PointsAvailable,
        BreakdownMetric::PointsPending => ValueQuery::PointsPending,
        BreakdownMetric::PointsCanceled => ValueQuery::PointsCanceled,
        BreakdownMetric::PointsRedeemed => ValueQuery::PointsRedeemed,
        BreakdownMetric::RedemptionsValue => ValueQuery::RedemptionsValue,
        BreakdownMetric::OrdersAov
        | BreakdownMetric::EnrollmentPercent
        | BreakdownMetric::Enrollment6m
        | BreakdownMetric::Enrollment12m => unreachable!("ratio metrics are composed"),
    }
}

enum RatioKind {
    Plain,
    Percent,
}

/// Joins merged numerator and denominator slices by display name. Branches
/// with a zero denominator are dropped; the total is recomputed from the
/// summed parts.
fn compose_ratio(
    numerators: Vec<(String, f64)>,
    denominators: Vec<(String, f64)>,
    kind: RatioKind,
) -> (Vec<BreakdownEntry>, f64) {
    let numerators: BTreeMap<String, f64> = numerators.into_iter().collect();
    let value_of = |num: f64, den: f64| match kind {
        RatioKind::Plain => ratio(num, den),
        RatioKind::Percent => percent(num, den),
    };

    let mut num_sum = 0.0;
    let mut den_sum = 0.0;
    let mut entries = Vec::with_capacity(denominators.len());
    for (branch_name, den) in denominators {
        let num = numerators.get(&branch_name).copied().unwrap_or(0.0);
        num_sum += num;
        den_sum += den;
        if den > 0.0 {
            entries.push(BreakdownEntry { branch_name, value: value_of(num, den) });
        }
    }
    let total = value_of(num_sum, den_sum);
    (entries, total)
}

/// Per-display-name sum of two merged slices.
fn sum_slices(a: Vec<(String, f64)>, b: Vec<(String, f64)>) -> Vec<(String, f64)> {
    let mut merged: BTreeMap<String, f64> = a.into_iter().collect();
    for (name, value) in b {
        *merged.entry(name).or_insert(0.0) += value;
    }
    merged.into_iter().collect()
}

fn months_ago(today: chrono::NaiveDate, months: u32) -> String {
    today
        .checked_sub_months(chrono::Months::new(months))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_ratio_recomputes_total_from_sums() {
        // A: 100 revenue / 2 orders, B: 0 / 0.
        let entries = vec![("A".to_string(), 100.0), ("B".to_string(), 0.0)];
        let counts = vec![("A".to_string(), 2.0), ("B".to_string(), 0.0)];
        let (rows, total) = compose_ratio(entries, counts, RatioKind::Plain);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 50.0);
        assert_eq!(total, 50.0);
    }

    #[test]
    fn test_compose_ratio_percent_zero_denominator() {
        let (rows, total) = compose_ratio(vec![], vec![("A".to_string(), 0.0)], RatioKind::Percent);
        assert!(rows.is_empty());
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_sum_slices_joins_by_name() {
        let a = vec![("Atlanta".to_string(), 3.0)];
        let b = vec![("Atlanta".to_string(), 2.0), ("Miami".to_string(), 1.0)];
        let merged = sum_slices(a, b);
        assert_eq!(
            merged,
            vec![("Atlanta".to_string(), 5.0), ("Miami".to_string(), 1.0)]
        );
    }
}
