pub mod branches;
pub mod forecasts;
pub mod r200_summary;
pub mod r201_order_summary;
pub mod r202_online_orders;
pub mod r203_rewards_enrollment;
pub mod r204_branch_redemptions;
pub mod r205_enrollment_details;
pub mod r206_breakdown;
pub mod session;
