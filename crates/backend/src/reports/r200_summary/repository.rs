use anyhow::Result;
use contracts::shared::filters::{BranchFilter, CustomerSegment, DateRange};
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::{
    AVAILABLE_STATUS_SQL, BRANCH_DENYLIST_SQL, CANCELED_STATUS_SQL, EXPIRED_STATUS_SQL,
    PENDING_STATUS_SQL,
};

/// Enrollment funnel counts with trailing-window purchaser variants.
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct EnrollmentAgg {
    pub total_enrolled: i64,
    pub can_enroll: i64,
    pub can_enroll_not_enrolled: i64,
    pub can_enroll_with_orders_6m: i64,
    pub enrolled_with_orders_6m: i64,
    pub can_enroll_with_orders_12m: i64,
    pub enrolled_with_orders_12m: i64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct PointsAgg {
    pub total_earned: i64,
    pub available: i64,
    pub pending: i64,
    pub canceled: i64,
    pub expired: i64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct RedemptionAgg {
    pub points_redeemed: i64,
    pub claimed_rewards: f64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct OrdersAgg {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub revenue_enrolled: f64,
    pub orders_enrolled: i64,
    pub orders_enrolled_high: i64,
    pub orders_enrolled_low: i64,
}

fn window_exists(date_param: &str) -> String {
    format!(
        r#"EXISTS (
                    SELECT 1 FROM orders o
                    WHERE o.company_id = c.id
                      AND o.invoice_date >= {date_param}
                      AND o.order_status_id = 2
                )"#
    )
}

/// Enrollment counts for active customers, network-wide or for one branch.
pub async fn enrollment_metrics(
    six_months_ago: &str,
    twelve_months_ago: &str,
    branch: BranchFilter,
) -> Result<EnrollmentAgg> {
    let db = get_connection();
    let exists = window_exists("?");

    let mut sql = format!(
        r#"
        SELECT
            COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 THEN c.id END) AS total_enrolled,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 THEN c.id END) AS can_enroll,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 THEN c.id END) AS can_enroll_not_enrolled,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 AND {exists} THEN c.id END) AS can_enroll_with_orders_6m,
            COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND {exists} THEN c.id END) AS enrolled_with_orders_6m,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 AND {exists} THEN c.id END) AS can_enroll_with_orders_12m,
            COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND {exists} THEN c.id END) AS enrolled_with_orders_12m
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}
        "#
    );
    let mut values: Vec<Value> = vec![
        six_months_ago.into(),
        six_months_ago.into(),
        twelve_months_ago.into(),
        twelve_months_ago.into(),
    ];
    push_branch_filter(&mut sql, &mut values, branch);

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = EnrollmentAgg::find_by_statement(stmt).one(db).await?;
    Ok(row.unwrap_or_default())
}

/// Point lifecycle buckets; only `total_earned` is date-bounded.
pub async fn points_metrics(range: &DateRange, branch: BranchFilter) -> Result<PointsAgg> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN DATE(clp.created_at) >= ? AND DATE(clp.created_at) <= ? THEN clp.points_earned ELSE 0 END), 0) AS total_earned,
            COALESCE(SUM(CASE WHEN clp.point_status_id = {AVAILABLE_STATUS_SQL} THEN (clp.points_earned - clp.points_redeemed) ELSE 0 END), 0) AS available,
            COALESCE(SUM(CASE WHEN clp.point_status_id = {PENDING_STATUS_SQL} THEN clp.points_earned ELSE 0 END), 0) AS pending,
            COALESCE(SUM(CASE WHEN clp.point_status_id = {CANCELED_STATUS_SQL} THEN clp.points_earned ELSE 0 END), 0) AS canceled,
            COALESCE(SUM(CASE WHEN clp.point_status_id = {EXPIRED_STATUS_SQL} THEN clp.points_earned ELSE 0 END), 0) AS expired
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        LEFT JOIN company_loyalty_points clp ON clp.company_id = c.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}
        "#
    );
    let mut values: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    push_branch_filter(&mut sql, &mut values, branch);

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = PointsAgg::find_by_statement(stmt).one(db).await?;
    Ok(row.unwrap_or_default())
}

/// Points and dollars redeemed inside the date range.
pub async fn redemption_metrics(
    range: &DateRange,
    branch: BranchFilter,
) -> Result<RedemptionAgg> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT
            COALESCE(SUM(crp.points), 0) AS points_redeemed,
            COALESCE(SUM(crp.dollars), 0.0) AS claimed_rewards
        FROM companies c
        INNER JOIN branches b ON c.branch_id = b.id
        INNER JOIN company_redeemed_points crp ON crp.company_id = c.id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}
          AND DATE(crp.created_at) >= ?
          AND DATE(crp.created_at) <= ?
        "#
    );
    let mut values: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    push_branch_filter(&mut sql, &mut values, branch);

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = RedemptionAgg::find_by_statement(stmt).one(db).await?;
    Ok(row.unwrap_or_default())
}

/// Confirmed-order metrics. Restrictive segments inner-join companies and
/// skip the enrolled splits (they would duplicate the whole result set).
pub async fn order_metrics(
    range: &DateRange,
    branch: BranchFilter,
    segment: CustomerSegment,
) -> Result<OrdersAgg> {
    let db = get_connection();

    let mut sql = if segment.requires_company_join() {
        format!(
            r#"
            SELECT
                COUNT(DISTINCT o.id) AS total_orders,
                COALESCE(SUM(o.total), 0.0) AS total_revenue,
                COUNT(DISTINCT CASE WHEN o.total >= 350 THEN o.id END) AS orders_high,
                COUNT(DISTINCT CASE WHEN o.total < 350 THEN o.id END) AS orders_low,
                COALESCE(SUM(CASE WHEN c.is_enrolled_loyalty = 1 THEN o.total ELSE 0 END), 0.0) AS revenue_enrolled,
                0 AS orders_enrolled,
                0 AS orders_enrolled_high,
                0 AS orders_enrolled_low
            FROM orders o
            INNER JOIN branches b ON o.branch_id = b.id
            INNER JOIN companies c ON o.company_id = c.id
            WHERE o.order_status_id = 2
              AND {BRANCH_DENYLIST_SQL}
              AND DATE(o.invoice_date) >= ?
              AND DATE(o.invoice_date) <= ?
            "#
        )
    } else {
        format!(
            r#"
            SELECT
                COUNT(DISTINCT o.id) AS total_orders,
                COALESCE(SUM(o.total), 0.0) AS total_revenue,
                COUNT(DISTINCT CASE WHEN o.total >= 350 THEN o.id END) AS orders_high,
                COUNT(DISTINCT CASE WHEN o.total < 350 THEN o.id END) AS orders_low,
                COALESCE(SUM(CASE WHEN c.is_enrolled_loyalty = 1 THEN o.total ELSE 0 END), 0.0) AS revenue_enrolled,
                COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 THEN o.id END) AS orders_enrolled,
                COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND o.total >= 350 THEN o.id END) AS orders_enrolled_high,
                COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 AND o.total < 350 THEN o.id END) AS orders_enrolled_low
            FROM orders o
            INNER JOIN branches b ON o.branch_id = b.id
            LEFT JOIN companies c ON o.company_id = c.id
            WHERE o.order_status_id = 2
              AND {BRANCH_DENYLIST_SQL}
              AND DATE(o.invoice_date) >= ?
              AND DATE(o.invoice_date) <= ?
            "#
        )
    };
    let mut values: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    push_branch_filter(&mut sql, &mut values, branch);
    sql.push_str(segment.sql_predicate());

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = OrdersAgg::find_by_statement(stmt).one(db).await?;
    Ok(row.unwrap_or_default())
}

fn push_branch_filter(sql: &mut String, values: &mut Vec<Value>, branch: BranchFilter) {
    if let Some(id) = branch.id() {
        sql.push_str(" AND b.id = ?");
        values.push(id.into());
    }
}
