pub mod api;
pub mod branch;
pub mod filters;
pub mod ratio;
