use anyhow::Result;
use contracts::shared::filters::DateRange;
use sea_orm::{FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

use super::super::{
    AVAILABLE_STATUS_SQL, BRANCH_DENYLIST_SQL, CANCELED_STATUS_SQL, EXPIRED_STATUS_SQL,
    PENDING_STATUS_SQL,
};

#[derive(Debug, Clone, FromQueryResult)]
pub struct BranchRedemptionRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub total_points_earned: i64,
    pub available_points: i64,
    pub pending_points: i64,
    pub canceled_points: i64,
    pub expired_points: i64,
    pub claimed_rewards: f64,
    pub points_redeemed: i64,
}

/// Point lifecycle per source branch. Earned points and redemptions are
/// bounded by the date range, the status buckets are not. Branches with an
/// all-zero row are dropped in SQL.
pub async fn branch_redemptions(range: &DateRange) -> Result<Vec<BranchRedemptionRow>> {
    let db = get_connection();

    let sql = format!(
        r#"
        SELECT
            b.id AS branch_id,
            b.name AS branch_name,
            COALESCE(lp_stats.total_points_earned, 0) AS total_points_earned,
            COALESCE(ap_stats.available_points, 0) AS available_points,
            COALESCE(pp_stats.pending_points, 0) AS pending_points,
            COALESCE(cp_stats.canceled_points, 0) AS canceled_points,
            COALESCE(ep_stats.expired_points, 0) AS expired_points,
            COALESCE(cr_stats.claimed_rewards, 0.0) AS claimed_rewards,
            COALESCE(cr_stats.points_redeemed, 0) AS points_redeemed
        FROM branches b
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(CASE WHEN DATE(clp.created_at) >= ? AND DATE(clp.created_at) <= ? THEN clp.points_earned ELSE 0 END) AS total_points_earned
            FROM companies c
            INNER JOIN company_loyalty_points clp ON clp.company_id = c.id
            WHERE c.status = 1
            GROUP BY c.branch_id
        ) lp_stats ON b.id = lp_stats.branch_id
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(clp.points_earned - clp.points_redeemed) AS available_points
            FROM companies c
            INNER JOIN company_loyalty_points clp ON clp.company_id = c.id
            WHERE c.status = 1
              AND clp.point_status_id = {AVAILABLE_STATUS_SQL}
            GROUP BY c.branch_id
        ) ap_stats ON b.id = ap_stats.branch_id
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(clp.points_earned) AS pending_points
            FROM companies c
            INNER JOIN company_loyalty_points clp ON clp.company_id = c.id
            WHERE c.status = 1
              AND clp.point_status_id = {PENDING_STATUS_SQL}
            GROUP BY c.branch_id
        ) pp_stats ON b.id = pp_stats.branch_id
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(clp.points_earned) AS canceled_points
            FROM companies c
            INNER JOIN company_loyalty_points clp ON clp.company_id = c.id
            WHERE c.status = 1
              AND clp.point_status_id = {CANCELED_STATUS_SQL}
            GROUP BY c.branch_id
        ) cp_stats ON b.id = cp_stats.branch_id
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(clp.points_earned) AS expired_points
            FROM companies c
            INNER JOIN company_loyalty_points clp ON clp.company_id = c.id
            WHERE c.status = 1
              AND clp.point_status_id = {EXPIRED_STATUS_SQL}
            GROUP BY c.branch_id
        ) ep_stats ON b.id = ep_stats.branch_id
        LEFT JOIN (
            SELECT
                c.branch_id,
                SUM(crp.dollars) AS claimed_rewards,
                SUM(crp.points) AS points_redeemed
            FROM companies c
            INNER JOIN company_redeemed_points crp ON crp.company_id = c.id
            WHERE c.status = 1
              AND DATE(crp.created_at) >= ?
              AND DATE(crp.created_at) <= ?
            GROUP BY c.branch_id
        ) cr_stats ON b.id = cr_stats.branch_id
        WHERE {BRANCH_DENYLIST_SQL}
        GROUP BY b.id, b.name
        HAVING total_points_earned > 0 OR available_points > 0 OR pending_points > 0
            OR canceled_points > 0 OR expired_points > 0
            OR claimed_rewards > 0 OR points_redeemed > 0
        ORDER BY b.name ASC
        "#
    );

    let values: Vec<Value> = vec![
        range.from_str().into(),
        range.to_str().into(),
        range.from_str().into(),
        range.to_str().into(),
    ];
    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    Ok(BranchRedemptionRow::find_by_statement(stmt).all(db).await?)
}
