pub mod reports;
pub mod shared;
