pub mod script_client;

pub use script_client::{ForecastClient, ForecastError, ForecastScope, ScriptForecastClient};

use once_cell::sync::OnceCell;
use std::sync::Arc;

static FORECAST_CLIENT: OnceCell<Arc<dyn ForecastClient>> = OnceCell::new();

/// Installs the process-wide forecast client. Called once at startup.
pub fn initialize_forecast_client(client: Arc<dyn ForecastClient>) {
    if FORECAST_CLIENT.set(client).is_err() {
        tracing::warn!("Forecast client already initialized");
    }
}

pub fn get_forecast_client() -> Arc<dyn ForecastClient> {
    FORECAST_CLIENT
        .get()
        .expect("Forecast client not initialized. Call initialize_forecast_client() first.")
        .clone()
}
