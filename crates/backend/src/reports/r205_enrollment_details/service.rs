use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use contracts::reports::r205_enrollment_details::{
    CustomerDetailRow, EnrollmentDetailsRequest, EnrollmentDetailsResponse,
    EnrollmentDetailsSummary,
};
use contracts::shared::branch::normalize_branch_name;
use contracts::shared::filters::{BranchFilter, CustomerSegment};

use super::repository;

/// Customer-level enrollment drill-down with headline counts.
pub async fn get_enrollment_details(
    request: &EnrollmentDetailsRequest,
) -> Result<EnrollmentDetailsResponse> {
    let branch = BranchFilter::parse(request.branch_id.as_deref());
    let segment = CustomerSegment::parse(request.customer_filter.as_deref());

    let today = Local::now().date_naive();
    let six_months_ago = months_ago(today, 6);
    let twelve_months_ago = months_ago(today, 12);

    let raw =
        repository::customer_details(&six_months_ago, &twelve_months_ago, branch, segment)
            .await?;

    // Customer rows are not merged, but branch labels still use the
    // normalized display name.
    let rows: Vec<CustomerDetailRow> = raw
        .into_iter()
        .map(|r| CustomerDetailRow {
            customer_id: r.customer_id,
            customer_code: r.customer_code,
            customer_name: r.customer_name,
            branch_name: normalize_branch_name(&r.branch_name),
            can_enroll: r.can_enroll,
            is_enrolled: r.is_enrolled,
            last_order_date: r.last_order_date,
            orders_last_6m: r.orders_last_6m,
            revenue_last_6m: r.revenue_last_6m,
            orders_last_12m: r.orders_last_12m,
            revenue_last_12m: r.revenue_last_12m,
            orders_over_350_6m: r.orders_over_350_6m,
            orders_over_350_12m: r.orders_over_350_12m,
            revenue_over_350_6m: r.revenue_over_350_6m,
            revenue_over_350_12m: r.revenue_over_350_12m,
        })
        .collect();

    let summary = EnrollmentDetailsSummary {
        enrolled_count: repository::enrolled_count(branch).await?,
        can_enroll_recent_count: repository::can_enroll_recent_count(&six_months_ago, branch)
            .await?,
    };

    Ok(EnrollmentDetailsResponse { rows, summary, error: None })
}

fn months_ago(today: NaiveDate, months: u32) -> String {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}
