use serde::{Deserialize, Serialize};

/// Fixed body returned for every rejected request.
pub const INVALID_INPUT: &str = "Error: Invalid input";

/// Four iris measurements, accepted as query parameters or form fields.
/// All four are required; missing or non-numeric values fail extraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Measurements {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl Measurements {
    pub fn as_features(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

/// Response body for both endpoints, and the shape of each line in the
/// prediction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub response: String,
}

impl PredictionResponse {
    pub fn new(response: impl Into<String>) -> Self {
        PredictionResponse {
            response: response.into(),
        }
    }
}
