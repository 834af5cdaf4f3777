use anyhow::Result;
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::BRANCH_DENYLIST_SQL;

#[derive(Debug, Clone, FromQueryResult)]
pub struct BranchEnrollmentRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub can_enroll_count: i64,
    pub enrolled_count: i64,
    pub can_enroll_not_enrolled_count: i64,
    pub can_enroll_with_orders_6m: i64,
    pub can_enroll_with_orders_12m: i64,
}

/// Enrollment funnel per source branch. Branches with neither eligible nor
/// enrolled customers are dropped in SQL.
pub async fn branch_enrollment(
    six_months_ago: &str,
    twelve_months_ago: &str,
) -> Result<Vec<BranchEnrollmentRow>> {
    let db = get_connection();

    let sql = format!(
        r#"
        SELECT
            b.id AS branch_id,
            b.name AS branch_name,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 THEN c.id END) AS can_enroll_count,
            COUNT(DISTINCT CASE WHEN c.is_enrolled_loyalty = 1 THEN c.id END) AS enrolled_count,
            COUNT(DISTINCT CASE WHEN c.can_enroll_loyalty = 1 AND c.is_enrolled_loyalty = 0 THEN c.id END) AS can_enroll_not_enrolled_count,
            COUNT(DISTINCT CASE
                WHEN c.can_enroll_loyalty = 1
                AND c.is_enrolled_loyalty = 0
                AND EXISTS (
                    SELECT 1 FROM orders o
                    WHERE o.company_id = c.id
                      AND o.invoice_date >= ?
                      AND o.order_status_id = 2
                )
                THEN c.id
            END) AS can_enroll_with_orders_6m,
            COUNT(DISTINCT CASE
                WHEN c.can_enroll_loyalty = 1
                AND c.is_enrolled_loyalty = 0
                AND EXISTS (
                    SELECT 1 FROM orders o
                    WHERE o.company_id = c.id
                      AND o.invoice_date >= ?
                      AND o.order_status_id = 2
                )
                THEN c.id
            END) AS can_enroll_with_orders_12m
        FROM branches b
        LEFT JOIN companies c ON b.id = c.branch_id AND c.status = 1
        WHERE {BRANCH_DENYLIST_SQL}
        GROUP BY b.id, b.name
        HAVING can_enroll_count > 0 OR enrolled_count > 0
        ORDER BY b.name ASC
        "#
    );

    let values: Vec<Value> = vec![six_months_ago.into(), twelve_months_ago.into()];
    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    Ok(BranchEnrollmentRow::find_by_statement(stmt).all(db).await?)
}
