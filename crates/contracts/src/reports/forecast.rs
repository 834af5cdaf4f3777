use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw query parameters shared by the forecast endpoints. `branch` scopes
/// the points/enrollment forecasts; `company` scopes the customer forecast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub branch: Option<String>,
    pub company: Option<String>,
    pub forecast_months: Option<u32>,
}

/// One observed point in the history the model was trained on. Metric
/// columns vary per forecast (e.g. `y`, or `earned`/`available`/`redeemed`),
/// so they are carried as a flattened map next to `ds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub ds: String,
    #[serde(flatten)]
    pub values: HashMap<String, f64>,
}

/// One forecast point with its confidence interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Contract of the external forecasting collaborator: a single JSON object
/// on its standard output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub scope: String,
    pub forecast_months: u32,
    pub historical_data: Vec<HistoricalPoint>,
    /// Per-metric forecast series, keyed by metric name.
    pub forecast: HashMap<String, Vec<ForecastPoint>>,
}
