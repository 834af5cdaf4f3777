use anyhow::Result;
use contracts::shared::filters::{BranchFilter, DateRange};
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::{
    AVAILABLE_STATUS_SQL, BRANCH_DENYLIST_SQL, CANCELED_STATUS_SQL, PENDING_STATUS_SQL,
};

/// One additive per-branch slice. Every variant maps to a single query
/// returning `(raw_branch_name, value)`; the service composes ratio metrics
/// out of these so merged branches recompute cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueQuery {
    OrdersCount,
    OrdersRevenue,
    OrdersHigh,
    EnrolledCount,
    CanEnrollCount,
    CanEnrollNotEnrolled,
    EnrolledRecent6m,
    EnrolledRecent12m,
    CanEnrollRecent6m,
    CanEnrollRecent12m,
    PointsEarned,
    PointsAvailable,
    PointsPending,
    PointsCanceled,
    PointsRedeemed,
    RedemptionsValue,
}

#[derive(Debug, FromQueryResult)]
struct BranchValueRow {
    branch_name: String,
    value: f64,
}

fn window_exists() -> &'static str {
    "EXISTS (
                SELECT 1 FROM orders o
                WHERE o.company_id = c.id
                  AND o.invoice_date >= ?
                  AND o.order_status_id = 2
            )"
}

fn order_head(expr: &str) -> String {
    format!(
        r#"
        SELECT b.name AS branch_name, CAST({expr} AS REAL) AS value
        FROM orders o
        INNER JOIN branches b ON o.branch_id = b.id
        WHERE o.order_status_id = 2
          AND {BRANCH_DENYLIST_SQL}
          AND DATE(o.invoice_date) >= ?
          AND DATE(o.invoice_date) <= ?"#
    )
}

fn company_head(expr: &str) -> String {
    format!(
        r#"
        SELECT b.name AS branch_name, CAST({expr} AS REAL) AS value
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}"#
    )
}

fn points_head(expr: &str) -> String {
    format!(
        r#"
        SELECT b.name AS branch_name, CAST({expr} AS REAL) AS value
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        LEFT JOIN company_loyalty_points clp ON clp.company_id = c.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}"#
    )
}

fn redemption_head(expr: &str) -> String {
    format!(
        r#"
        SELECT b.name AS branch_name, CAST({expr} AS REAL) AS value
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        INNER JOIN company_redeemed_points crp ON crp.company_id = c.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}
          AND DATE(crp.created_at) >= ?
          AND DATE(crp.created_at) <= ?"#
    )
}

/// Per-branch values for one slice, keyed by raw branch name. Rows arrive
/// unmerged; the service normalizes and merges.
pub async fn branch_values(
    query: ValueQuery,
    range: &DateRange,
    six_months_ago: &str,
    twelve_months_ago: &str,
    branch: BranchFilter,
) -> Result<Vec<(String, f64)>> {
    let db = get_connection();

    let date_params: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    let exists = window_exists();

    // Zero rows are kept for order slices (matching the page tables) but
    // dropped for customer/point slices, where an all-zero branch is noise.
    let (mut sql, mut values, guarded) = match query {
        ValueQuery::OrdersCount => (order_head("COUNT(DISTINCT o.id)"), date_params, false),
        ValueQuery::OrdersRevenue => {
            (order_head("COALESCE(SUM(o.total), 0.0)"), date_params, false)
        }
        ValueQuery::OrdersHigh => (
            order_head("COUNT(DISTINCT CASE WHEN o.total >= 350 THEN o.id END)"),
            date_params,
            false,
        ),
        ValueQuery::EnrolledCount => (
            company_head("COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 THEN c.id END)"),
            vec![],
            true,
        ),
        ValueQuery::CanEnrollCount => (
            company_head("COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 THEN c.id END)"),
            vec![],
            true,
        ),
        ValueQuery::CanEnrollNotEnrolled => (
            company_head(
                "COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 THEN c.id END)",
            ),
            vec![],
            true,
        ),
        ValueQuery::EnrolledRecent6m => (
            company_head(&format!(
                "COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND {exists} THEN c.id END)"
            )),
            vec![six_months_ago.into()],
            true,
        ),
        ValueQuery::EnrolledRecent12m => (
            company_head(&format!(
                "COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND {exists} THEN c.id END)"
            )),
            vec![twelve_months_ago.into()],
            true,
        ),
        ValueQuery::CanEnrollRecent6m => (
            company_head(&format!(
                "COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 AND {exists} THEN c.id END)"
            )),
            vec![six_months_ago.into()],
            true,
        ),
        ValueQuery::CanEnrollRecent12m => (
            company_head(&format!(
                "COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 AND {exists} THEN c.id END)"
            )),
            vec![twelve_months_ago.into()],
            true,
        ),
        ValueQuery::PointsEarned => (
            points_head(
                "COALESCE(SUM(CASE WHEN DATE(clp.created_at) >= ? AND DATE(clp.created_at) <= ? THEN clp.points_earned ELSE 0 END), 0)",
            ),
            date_params,
            true,
        ),
        ValueQuery::PointsAvailable => (
            points_head(&format!(
                "COALESCE(SUM(CASE WHEN clp.point_status_id = {AVAILABLE_STATUS_SQL} THEN (clp.points_earned - clp.points_redeemed) ELSE 0 END), 0)"
            )),
            vec![],
            true,
        ),
        ValueQuery::PointsPending => (
            points_head(&format!(
                "COALESCE(SUM(CASE WHEN clp.point_status_id = {PENDING_STATUS_SQL} THEN clp.points_earned ELSE 0 END), 0)"
            )),
            vec![],
            true,
        ),
        ValueQuery::PointsCanceled => (
            points_head(&format!(
                "COALESCE(SUM(CASE WHEN clp.point_status_id = {CANCELED_STATUS_SQL} THEN clp.points_earned ELSE 0 END), 0)"
            )),
            vec![],
            true,
        ),
        ValueQuery::PointsRedeemed => {
            (redemption_head("COALESCE(SUM(crp.points), 0)"), date_params, true)
        }
        ValueQuery::RedemptionsValue => {
            (redemption_head("COALESCE(SUM(crp.dollars), 0.0)"), date_params, true)
        }
    };

    if let Some(id) = branch.id() {
        sql.push_str("\n          AND b.id = ?");
        values.push(id.into());
    }
    sql.push_str("\n        GROUP BY b.id, b.name");
    if guarded {
        sql.push_str("\n        HAVING value > 0");
    }
    sql.push_str("\n        ORDER BY value DESC");

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let rows = BranchValueRow::find_by_statement(stmt).all(db).await?;
    Ok(rows.into_iter().map(|r| (r.branch_name, r.value)).collect())
}
