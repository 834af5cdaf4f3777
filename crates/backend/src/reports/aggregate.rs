//! Branch-row aggregation shared by the report services.
//!
//! Source rows arrive keyed by raw branch name. Denylisted branches are
//! dropped, names are normalized, and rows landing on the same display name
//! are merged additively. Normalization happens before grouping, so two
//! source branches like "LAX Shipping" and "LAX Shipping (12)" fold into a
//! single output row. Derived ratios are computed only after merging.

use std::collections::BTreeMap;

use contracts::shared::branch::{is_denylisted, normalize_branch_name};
use contracts::shared::ratio::ratio;

/// Additive order tallies for one branch (or branch x program) row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderTallies {
    pub order_count: i64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_revenue: f64,
}

impl OrderTallies {
    pub fn add(&mut self, other: &OrderTallies) {
        self.order_count += other.order_count;
        self.orders_high += other.orders_high;
        self.orders_low += other.orders_low;
        self.total_revenue += other.total_revenue;
    }

    /// AOV from this row's own sums; 0 when there are no orders.
    pub fn aov(&self) -> f64 {
        ratio(self.total_revenue, self.order_count as f64)
    }
}

/// Folds `(raw_branch_name, value)` rows into display-name order, dropping
/// denylisted branches and summing collisions with `add`. The BTreeMap keeps
/// rows sorted by branch name, matching the reports' ordering.
pub fn merge_by_branch<T, F>(rows: Vec<(String, T)>, mut add: F) -> Vec<(String, T)>
where
    F: FnMut(&mut T, T),
{
    let mut merged: BTreeMap<String, T> = BTreeMap::new();
    for (raw_name, value) in rows {
        if is_denylisted(&raw_name) {
            continue;
        }
        let display = normalize_branch_name(&raw_name);
        match merged.get_mut(&display) {
            Some(existing) => add(existing, value),
            None => {
                merged.insert(display, value);
            }
        }
    }
    merged.into_iter().collect()
}

/// Scalar-value variant used by the breakdown endpoint.
pub fn merge_values(rows: Vec<(String, f64)>) -> Vec<(String, f64)> {
    merge_by_branch(rows, |acc, v| *acc += v)
}

/// Column-wise sum of merged tallies. Callers recompute AOV from the result
/// instead of averaging per-row AOVs.
pub fn total_tallies(rows: &[(String, OrderTallies)]) -> OrderTallies {
    let mut totals = OrderTallies::default();
    for (_, tallies) in rows {
        totals.add(tallies);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tallies(count: i64, high: i64, low: i64, revenue: f64) -> OrderTallies {
        OrderTallies { order_count: count, orders_high: high, orders_low: low, total_revenue: revenue }
    }

    #[test]
    fn test_zero_orders_has_zero_aov() {
        assert_eq!(tallies(0, 0, 0, 0.0).aov(), 0.0);
    }

    #[test]
    fn test_collisions_are_summed_not_duplicated() {
        let rows = vec![
            ("LAX Shipping".to_string(), tallies(3, 1, 2, 900.0)),
            ("Mayesh Miami".to_string(), tallies(1, 0, 1, 100.0)),
            ("LAX Shipping (12)".to_string(), tallies(2, 2, 0, 600.0)),
        ];
        let merged = merge_by_branch(rows, |a, b| a.add(&b));
        assert_eq!(merged.len(), 2);
        let (name, lax) = &merged[0];
        assert_eq!(name, "LAX/Shipping");
        assert_eq!(lax.order_count, 5);
        assert_eq!(lax.total_revenue, 1500.0);
        assert_eq!(merged[1].0, "Miami");
    }

    #[test]
    fn test_denylisted_branches_never_emitted() {
        let rows = vec![
            ("Mass Market West".to_string(), tallies(10, 5, 5, 5000.0)),
            ("Twin Cities (3)".to_string(), tallies(4, 0, 4, 400.0)),
            ("Accounts Receivable".to_string(), tallies(1, 0, 1, 50.0)),
            ("Mayesh Atlanta (26)".to_string(), tallies(2, 1, 1, 200.0)),
        ];
        let merged = merge_by_branch(rows, |a, b| a.add(&b));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].0, "Atlanta");
    }

    #[test]
    fn test_totals_recompute_aov_from_sums() {
        // Branch A: 2 orders / $100, branch B: 0 orders / $0.
        let rows = vec![
            ("A".to_string(), tallies(2, 0, 2, 100.0)),
            ("B".to_string(), tallies(0, 0, 0, 0.0)),
        ];
        let totals = total_tallies(&rows);
        // 100 / 2 = 50, not the per-row mean (50 + 0) / 2 = 25.
        assert_eq!(totals.aov(), 50.0);
    }

    #[test]
    fn test_merge_values() {
        let rows = vec![
            ("Mayesh Atlanta".to_string(), 10.0),
            ("Cut Flower".to_string(), 5.0),
            ("Mass Market".to_string(), 99.0),
        ];
        let merged = merge_values(rows);
        assert_eq!(merged, vec![("Atlanta".to_string(), 15.0)]);
    }
}
