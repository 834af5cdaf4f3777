use anyhow::Result;
use contracts::shared::filters::{CustomerSegment, DateRange};
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::BRANCH_DENYLIST_SQL;

#[derive(Debug, Clone, FromQueryResult)]
pub struct SegmentCountRow {
    pub branch_name: String,
    pub orders_high: i64,
    pub orders_low: i64,
    pub total_orders: i64,
}

/// Confirmed-order counts per source branch for one customer segment.
/// Branches without orders in the range are omitted.
pub async fn segment_counts(
    range: &DateRange,
    segment: CustomerSegment,
) -> Result<Vec<SegmentCountRow>> {
    let db = get_connection();

    let mut sql = format!(
        r#"
        SELECT
            b.name AS branch_name,
            COUNT(CASE WHEN o.total >= 350 THEN 1 END) AS orders_high,
            COUNT(CASE WHEN o.total < 350 THEN 1 END) AS orders_low,
            COUNT(*) AS total_orders
        FROM orders o
        INNER JOIN branches b ON o.branch_id = b.id
        LEFT JOIN companies c ON o.company_id = c.id
        WHERE o.order_status_id = 2
          AND {BRANCH_DENYLIST_SQL}
          AND DATE(o.invoice_date) >= ?
          AND DATE(o.invoice_date) <= ?
        "#
    );
    sql.push_str(segment.sql_predicate());
    sql.push_str(
        r#"
        GROUP BY b.id, b.name
        HAVING total_orders > 0
        ORDER BY b.name ASC
        "#,
    );

    let values: Vec<Value> = vec![range.from_str().into(), range.to_str().into()];
    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    Ok(SegmentCountRow::find_by_statement(stmt).all(db).await?)
}
