//! Branch list for the report filter dropdowns.

use anyhow::Result;
use contracts::reports::branches::BranchRef;
use sea_orm::{FromQueryResult, Statement};

use crate::shared::data::db::get_connection;

use super::BRANCH_DENYLIST_SQL;

#[derive(Debug, FromQueryResult)]
struct BranchRow {
    id: i64,
    name: String,
}

/// All reportable branches (denylist applied), ordered by name. Names are
/// returned raw; the id is what downstream filters bind on.
pub async fn list_branches() -> Result<Vec<BranchRef>> {
    let db = get_connection();

    let sql = format!(
        r#"
        SELECT id, name
        FROM branches b
        WHERE {BRANCH_DENYLIST_SQL}
        ORDER BY name ASC
        "#
    );

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, []);
    let rows = BranchRow::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| BranchRef { id: r.id, name: r.name })
        .collect())
}
