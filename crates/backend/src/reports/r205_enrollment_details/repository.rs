use anyhow::Result;
use contracts::shared::filters::{BranchFilter, CustomerSegment};
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::BRANCH_DENYLIST_SQL;

#[derive(Debug, Clone, FromQueryResult)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub customer_code: String,
    pub customer_name: String,
    pub branch_name: String,
    pub can_enroll: bool,
    pub is_enrolled: bool,
    pub last_order_date: Option<String>,
    pub orders_last_6m: i64,
    pub revenue_last_6m: f64,
    pub orders_last_12m: i64,
    pub revenue_last_12m: f64,
    pub orders_over_350_6m: i64,
    pub orders_over_350_12m: i64,
    pub revenue_over_350_6m: f64,
    pub revenue_over_350_12m: f64,
}

#[derive(Debug, Default, FromQueryResult)]
struct CountRow {
    count: i64,
}

fn window_count(extra: &str) -> String {
    format!(
        "(SELECT COUNT(*) FROM orders o
                WHERE o.company_id = c.id
                  AND o.invoice_date >= ?
                  AND o.order_status_id = 2{extra})"
    )
}

fn window_revenue(extra: &str) -> String {
    format!(
        "(SELECT COALESCE(SUM(o.total), 0.0) FROM orders o
                WHERE o.company_id = c.id
                  AND o.invoice_date >= ?
                  AND o.order_status_id = 2{extra})"
    )
}

/// Customer drill-down: every enrolled customer plus every eligible
/// not-yet-enrolled customer with a confirmed order in the last six months.
/// All trailing windows count confirmed orders only.
pub async fn customer_details(
    six_months_ago: &str,
    twelve_months_ago: &str,
    branch: BranchFilter,
    segment: CustomerSegment,
) -> Result<Vec<CustomerRow>> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT
            c.id AS customer_id,
            c.code AS customer_code,
            c.name AS customer_name,
            b.name AS branch_name,
            c.can_enroll_loyalty AS can_enroll,
            c.is_enrolled_loyalty AS is_enrolled,
            (SELECT MAX(o.invoice_date) FROM orders o
                WHERE o.company_id = c.id AND o.order_status_id = 2) AS last_order_date,
            {orders_6m} AS orders_last_6m,
            {revenue_6m} AS revenue_last_6m,
            {orders_12m} AS orders_last_12m,
            {revenue_12m} AS revenue_last_12m,
            {orders_350_6m} AS orders_over_350_6m,
            {orders_350_12m} AS orders_over_350_12m,
            {revenue_350_6m} AS revenue_over_350_6m,
            {revenue_350_12m} AS revenue_over_350_12m
        FROM companies c
        INNER JOIN branches b ON b.id = c.branch_id
        WHERE c.status = 1
          AND {BRANCH_DENYLIST_SQL}"#,
        orders_6m = window_count(""),
        revenue_6m = window_revenue(""),
        orders_12m = window_count(""),
        revenue_12m = window_revenue(""),
        orders_350_6m = window_count(" AND o.total >= 350"),
        orders_350_12m = window_count(" AND o.total >= 350"),
        revenue_350_6m = window_revenue(" AND o.total >= 350"),
        revenue_350_12m = window_revenue(" AND o.total >= 350"),
    );

    // Placeholder order follows the SELECT list, then the branch filter,
    // then the EXISTS window.
    let mut values: Vec<Value> = vec![
        six_months_ago.into(),
        six_months_ago.into(),
        twelve_months_ago.into(),
        twelve_months_ago.into(),
        six_months_ago.into(),
        twelve_months_ago.into(),
        six_months_ago.into(),
        twelve_months_ago.into(),
    ];
    if let Some(id) = branch.id() {
        sql.push_str("\n          AND c.branch_id = ?");
        values.push(id.into());
    }
    sql.push_str(segment.sql_predicate());
    sql.push_str(
        r#"
          AND (
              c.is_enrolled_loyalty = 1
              OR (
                  c.can_enroll_loyalty = 1
                  AND c.is_enrolled_loyalty = 0
                  AND EXISTS (
                      SELECT 1 FROM orders o
                      WHERE o.company_id = c.id
                        AND o.invoice_date >= ?
                        AND o.order_status_id = 2
                  )
              )
          )
        ORDER BY b.name ASC, c.name ASC
        "#,
    );
    values.push(six_months_ago.into());

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    Ok(CustomerRow::find_by_statement(stmt).all(db).await?)
}

/// Active enrolled customers under the branch filter.
pub async fn enrolled_count(branch: BranchFilter) -> Result<i64> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT COUNT(*) AS count
        FROM companies c
        INNER JOIN branches b ON b.id = c.branch_id
        WHERE c.status = 1
          AND c.is_enrolled_loyalty = 1
          AND {BRANCH_DENYLIST_SQL}"#
    );

    let mut values: Vec<Value> = Vec::new();
    if let Some(id) = branch.id() {
        sql.push_str("\n          AND c.branch_id = ?");
        values.push(id.into());
    }

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = CountRow::find_by_statement(stmt).one(db).await?.unwrap_or_default();
    Ok(row.count)
}

/// Eligible, not enrolled, with a confirmed order since the window start.
pub async fn can_enroll_recent_count(
    six_months_ago: &str,
    branch: BranchFilter,
) -> Result<i64> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT COUNT(*) AS count
        FROM companies c
        INNER JOIN branches b ON b.id = c.branch_id
        WHERE c.status = 1
          AND c.is_enrolled_loyalty = 0
          AND c.can_enroll_loyalty = 1
          AND {BRANCH_DENYLIST_SQL}"#
    );

    let mut values: Vec<Value> = Vec::new();
    if let Some(id) = branch.id() {
        sql.push_str("\n          AND c.branch_id = ?");
        values.push(id.into());
    }
    sql.push_str(
        r#"
          AND EXISTS (
              SELECT 1 FROM orders o
              WHERE o.company_id = c.id
                AND o.invoice_date >= ?
                AND o.order_status_id = 2
          )"#,
    );
    values.push(six_months_ago.into());

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let row = CountRow::find_by_statement(stmt).one(db).await?.unwrap_or_default();
    Ok(row.count)
}
