use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use contracts::reports::r203_rewards_enrollment::{
    EnrollmentRow, EnrollmentTotals, RewardsEnrollmentResponse,
};

use super::repository;
use crate::reports::aggregate;

/// Enrollment funnel per branch with trailing 6 and 12 month purchase windows.
pub async fn get_rewards_enrollment() -> Result<RewardsEnrollmentResponse> {
    let today = Local::now().date_naive();
    let six_months_ago = months_ago(today, 6);
    let twelve_months_ago = months_ago(today, 12);

    let raw = repository::branch_enrollment(&six_months_ago, &twelve_months_ago).await?;

    let keyed: Vec<(String, EnrollmentRow)> = raw
        .into_iter()
        .map(|r| {
            let row = EnrollmentRow {
                branch_id: r.branch_id,
                branch_name: String::new(),
                can_enroll_count: r.can_enroll_count,
                enrolled_count: r.enrolled_count,
                can_enroll_not_enrolled_count: r.can_enroll_not_enrolled_count,
                can_enroll_with_orders_6m: r.can_enroll_with_orders_6m,
                can_enroll_with_orders_12m: r.can_enroll_with_orders_12m,
                ..Default::default()
            };
            (r.branch_name, row)
        })
        .collect();

    let mut totals = EnrollmentTotals::default();
    let rows: Vec<EnrollmentRow> = aggregate::merge_by_branch(keyed, add_enrollment_row)
        .into_iter()
        .map(|(display_name, mut row)| {
            row.branch_name = display_name;
            totals.can_enroll_count += row.can_enroll_count;
            totals.enrolled_count += row.enrolled_count;
            totals.can_enroll_not_enrolled_count += row.can_enroll_not_enrolled_count;
            totals.can_enroll_with_orders_6m += row.can_enroll_with_orders_6m;
            totals.can_enroll_with_orders_12m += row.can_enroll_with_orders_12m;
            row.derive_rates();
            row
        })
        .collect();
    totals.derive_rates();

    Ok(RewardsEnrollmentResponse { rows, totals, error: None })
}

fn months_ago(today: NaiveDate, months: u32) -> String {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

// Keeps the first branch_id seen for a display name.
fn add_enrollment_row(acc: &mut EnrollmentRow, other: EnrollmentRow) {
    acc.can_enroll_count += other.can_enroll_count;
    acc.enrolled_count += other.enrolled_count;
    acc.can_enroll_not_enrolled_count += other.can_enroll_not_enrolled_count;
    acc.can_enroll_with_orders_6m += other.can_enroll_with_orders_6m;
    acc.can_enroll_with_orders_12m += other.can_enroll_with_orders_12m;
}
