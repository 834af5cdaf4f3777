pub mod u600_forecast;
