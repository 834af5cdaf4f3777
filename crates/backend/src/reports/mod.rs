pub mod aggregate;
pub mod branches;
pub mod r200_summary;
pub mod r201_order_summary;
pub mod r202_online_orders;
pub mod r203_rewards_enrollment;
pub mod r204_branch_redemptions;
pub mod r205_enrollment_details;
pub mod r206_breakdown;

/// WHERE fragment excluding denylisted branches (alias `b`). Mirrors the
/// pure check in `contracts::shared::branch::is_denylisted`; queries embed
/// it so excluded branches never reach the aggregation layer.
pub const BRANCH_DENYLIST_SQL: &str = "LOWER(b.name) NOT LIKE '%mass market%'
          AND LOWER(b.name) NOT LIKE '%twin cities%'
          AND LOWER(b.name) NOT LIKE '%accounts receivable%'";

/// Correlated sub-selects resolving point-status buckets from settings.
pub const AVAILABLE_STATUS_SQL: &str =
    "(SELECT config_value FROM settings WHERE config_key = 'loyalty_available_status_id')";
pub const PENDING_STATUS_SQL: &str =
    "(SELECT config_value FROM settings WHERE config_key = 'loyalty_pending_status_id')";
pub const CANCELED_STATUS_SQL: &str =
    "(SELECT config_value FROM settings WHERE config_key = 'loyalty_canceled_status_id')";
pub const EXPIRED_STATUS_SQL: &str =
    "(SELECT config_value FROM settings WHERE config_key = 'loyalty_expired_status_id')";
