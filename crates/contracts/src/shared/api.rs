use serde::{Deserialize, Serialize};

/// Error body emitted by JSON endpoints that reject a request outright
/// (bad action/metric, forecast failures).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}
