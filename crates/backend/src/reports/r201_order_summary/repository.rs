use anyhow::Result;
use contracts::shared::filters::{BranchFilter, CustomerSegment, DateRange};
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::BRANCH_DENYLIST_SQL;

/// One raw branch x program aggregation row, pre-normalization.
#[derive(Debug, Clone, FromQueryResult)]
pub struct OrderProgramRow {
    pub branch_name: String,
    pub program_name: Option<String>,
    pub order_count: i64,
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_revenue: f64,
}

/// Confirmed orders grouped by source branch name and program.
pub async fn orders_by_branch_program(
    range: &DateRange,
    branch: BranchFilter,
    segment: CustomerSegment,
) -> Result<Vec<OrderProgramRow>> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT
            b.name AS branch_name,
            o.program_name AS program_name,
            COUNT(DISTINCT o.id) AS order_count,
            COUNT(DISTINCT CASE WHEN o.total >= 350 THEN o.id END) AS orders_high,
            COUNT(DISTINCT CASE WHEN o.total < 350 THEN o.id END) AS orders_low,
            COALESCE(SUM(o.total), 0.0) AS total_revenue
        FROM orders o
        INNER JOIN branches b ON o.branch_id = b.id
        LEFT JOIN companies c ON o.company_id = c.id
        WHERE o.order_status_id = 2
          AND {BRANCH_DENYLIST_SQL}
          AND DATE(o.invoice_date) >= ?
          AND DATE(o.invoice_date) <= ?
        "#
    );
    let mut values: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    if let Some(id) = branch.id() {
        sql.push_str(" AND b.id = ?");
        values.push(id.into());
    }
    if segment.requires_company_join() {
        sql.push_str(segment.sql_predicate());
    } else {
        sql.push_str(" AND c.status = 1");
    }
    sql.push_str(
        r#"
        GROUP BY b.name, o.program_name
        ORDER BY b.name ASC, o.program_name ASC
        "#,
    );

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    Ok(OrderProgramRow::find_by_statement(stmt).all(db).await?)
}
