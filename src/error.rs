use thiserror::Error;

/// Error types for the k-means engine and its request adapters
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// No points were supplied
    #[error("Empty dataset: at least one point is required")]
    EmptyDataset,

    /// Points were supplied but none of them yielded a coordinate
    #[error("Could not parse any point from the input")]
    NoParsablePoints,

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Points in one dataset disagree on their number of coordinates
    #[error("Inconsistent dimensions: point {index} has {found} coordinates, expected {expected}")]
    InconsistentDimensions {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call fit() first or supply centroids.")]
    NotFitted,

    /// Dimension mismatch between data and model
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// The request body is not valid JSON for the expected shape
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),
}

impl KMeansError {
    /// HTTP-style status code a boundary layer should answer with.
    ///
    /// Every variant describes a rejected input or a misuse of the model, so
    /// all of them map to 400. Server-side failures live in [`ClassifyError`].
    pub fn status_code(&self) -> u16 {
        match self {
            KMeansError::InvalidK(_)
            | KMeansError::EmptyDataset
            | KMeansError::NoParsablePoints
            | KMeansError::InsufficientData(_)
            | KMeansError::InconsistentDimensions { .. }
            | KMeansError::InvalidConfig(_)
            | KMeansError::NotFitted
            | KMeansError::InvalidDimensions(_)
            | KMeansError::Json(_) => 400,
        }
    }
}

/// Error types for the classifier registry
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// No classifier is registered under this key
    #[error("Model '{0}' is not configured")]
    UnknownModel(String),

    /// The underlying classifier failed to produce a label
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl ClassifyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ClassifyError::UnknownModel(_) => 404,
            ClassifyError::Prediction(_) => 500,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, KMeansError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_are_client_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = vec![
            KMeansError::InvalidK("0".into()),
            KMeansError::EmptyDataset,
            KMeansError::NoParsablePoints,
            KMeansError::InsufficientData("1 < 2".into()),
            KMeansError::InconsistentDimensions {
                index: 1,
                expected: 2,
                found: 3,
            },
            KMeansError::InvalidConfig("max_iters".into()),
            KMeansError::NotFitted,
            KMeansError::InvalidDimensions("2 vs 3".into()),
            KMeansError::Json(json_err),
        ];

        for err in &errors {
            assert_eq!(err.status_code(), 400, "{err}");
        }
    }

    #[test]
    fn test_classify_error_status() {
        assert_eq!(ClassifyError::UnknownModel("svm".into()).status_code(), 404);
        assert_eq!(ClassifyError::Prediction("boom".into()).status_code(), 500);
    }
}
