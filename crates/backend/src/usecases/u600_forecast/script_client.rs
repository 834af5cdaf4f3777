use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use contracts::reports::forecast::ForecastResponse;
use thiserror::Error;
use tokio::process::Command;

use crate::shared::config::ForecastConfig;

pub const MIN_FORECAST_MONTHS: u32 = 1;
pub const MAX_FORECAST_MONTHS: u32 = 36;

/// Which out-of-process model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastScope {
    Points,
    Enrollment,
    CustomerPoints,
}

impl ForecastScope {
    pub fn script_name(&self) -> &'static str {
        match self {
            ForecastScope::Points => "points_forecast.py",
            ForecastScope::Enrollment => "enrollment_forecast.py",
            ForecastScope::CustomerPoints => "customer_points_forecast.py",
        }
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to start forecast script: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Forecast script timed out after {0} seconds")]
    Timeout(u64),
    #[error(
        "Failed to execute forecast script. Return code: {code}. Python version: {python_version}. Script: {script}"
    )]
    NonZeroExit { code: i32, python_version: String, script: String },
    #[error("Forecast script returned no valid output. Raw output: {0}")]
    NoJson(String),
    #[error("Invalid JSON response from forecast script: {source}. Output: {snippet}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },
}

/// Seam for the forecast collaborator, so report handlers stay testable
/// without a Python interpreter on the machine.
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Runs one forecast. `entity_id` is a branch or company id, 0 meaning
    /// the whole network.
    async fn run(
        &self,
        scope: ForecastScope,
        entity_id: i64,
        forecast_months: u32,
    ) -> Result<ForecastResponse, ForecastError>;
}

/// Invokes the per-scope Python script and parses the JSON it prints.
pub struct ScriptForecastClient {
    python_path: String,
    script_dir: PathBuf,
    timeout: Duration,
}

impl ScriptForecastClient {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            python_path: config.python_path.clone(),
            script_dir: PathBuf::from(&config.script_dir),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Interpreter version for error messages, "not found" when even that
    /// fails.
    async fn python_version(&self) -> String {
        match Command::new(&self.python_path).arg("--version").output().await {
            Ok(output) => {
                let text = String::from_utf8_lossy(&output.stdout);
                let text = text.trim();
                if text.is_empty() {
                    String::from_utf8_lossy(&output.stderr).trim().to_string()
                } else {
                    text.to_string()
                }
            }
            Err(_) => "not found".to_string(),
        }
    }
}

#[async_trait]
impl ForecastClient for ScriptForecastClient {
    async fn run(
        &self,
        scope: ForecastScope,
        entity_id: i64,
        forecast_months: u32,
    ) -> Result<ForecastResponse, ForecastError> {
        let months = clamp_months(forecast_months);
        let script = self.script_dir.join(scope.script_name());

        tracing::info!(
            "Running forecast script {} (entity_id={}, months={})",
            script.display(),
            entity_id,
            months
        );

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.python_path)
                .arg(&script)
                .arg(entity_id.to_string())
                .arg(months.to_string())
                .output(),
        )
        .await
        .map_err(|_| ForecastError::Timeout(self.timeout.as_secs()))?;
        let output = result?;

        // Scripts print library warnings on stderr and occasionally before
        // the payload, so both streams are scanned for the JSON object.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if text.trim().is_empty() && !output.status.success() {
            return Err(ForecastError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                python_version: self.python_version().await,
                script: scope.script_name().to_string(),
            });
        }

        let json = extract_json(&text)
            .ok_or_else(|| ForecastError::NoJson(snippet(&text)))?;
        serde_json::from_str(json)
            .map_err(|source| ForecastError::InvalidJson { source, snippet: snippet(json) })
    }
}

/// Horizon guard; out-of-range requests are pulled to the nearest bound.
pub fn clamp_months(months: u32) -> u32 {
    months.clamp(MIN_FORECAST_MONTHS, MAX_FORECAST_MONTHS)
}

/// Extracts the JSON object from raw script output by locating the first
/// `{` and the last `}`.
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

fn snippet(text: &str) -> String {
    text.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_strips_warning_noise() {
        let raw = "FutureWarning: prophet deprecation\n{\"scope\": \"points\"}\ntrailing";
        assert_eq!(extract_json(raw), Some("{\"scope\": \"points\"}"));
    }

    #[test]
    fn test_extract_json_spans_nested_braces() {
        let raw = "warn {\"forecast\": {\"y\": []}} done";
        assert_eq!(extract_json(raw), Some("{\"forecast\": {\"y\": []}}"));
    }

    #[test]
    fn test_extract_json_rejects_non_json() {
        assert_eq!(extract_json("Traceback (most recent call last):"), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("} {"), None);
    }

    #[test]
    fn test_clamp_months() {
        assert_eq!(clamp_months(0), 1);
        assert_eq!(clamp_months(12), 12);
        assert_eq!(clamp_months(120), 36);
    }

    #[test]
    fn test_scope_script_names() {
        assert_eq!(ForecastScope::Points.script_name(), "points_forecast.py");
        assert_eq!(ForecastScope::Enrollment.script_name(), "enrollment_forecast.py");
        assert_eq!(
            ForecastScope::CustomerPoints.script_name(),
            "customer_points_forecast.py"
        );
    }
}
