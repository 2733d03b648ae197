//! Request adapters between a web layer and the engine.
//!
//! These functions take the decoded JSON bodies, enforce the input checks a
//! client should see as validation errors, run the engine and shape the
//! response. Routing and transport are left to the caller.

use crate::algorithm;
use crate::config::KMeansConfig;
use crate::error::{KMeansError, Result};
use crate::parser::{parse_points, to_matrix};
use crate::report::{ClusterResponse, PredictResponse};
use ndarray::Array2;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

fn default_k() -> i64 {
    2
}

fn default_max_iters() -> usize {
    100
}

/// Body of a clustering request
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterRequest {
    #[serde(default)]
    pub points: Vec<Value>,
    /// Signed so that `k < 1` reaches validation instead of failing to decode
    #[serde(default = "default_k")]
    pub k: i64,
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Log every iteration at `info` instead of `debug`
    #[serde(default)]
    pub verbose: bool,
}

impl ClusterRequest {
    pub fn new(points: Vec<Value>, k: i64) -> Self {
        Self {
            points,
            k,
            max_iters: default_max_iters(),
            tolerance: None,
            seed: None,
            verbose: false,
        }
    }

    /// Engine configuration for an already validated `k`
    fn engine_config(&self, k: usize) -> KMeansConfig {
        let mut config = KMeansConfig::new(k)
            .with_max_iters(self.max_iters)
            .with_verbose(self.verbose);
        if let Some(tol) = self.tolerance {
            config = config.with_tol(tol);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// Body of a predict-only request
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub centroids: Vec<Vec<f64>>,
    #[serde(default)]
    pub points: Vec<Value>,
}

/// Validate a clustering request, fit, and build the response.
pub fn cluster(request: &ClusterRequest) -> Result<ClusterResponse> {
    if request.points.is_empty() {
        return Err(KMeansError::EmptyDataset);
    }

    if request.k < 1 {
        return Err(KMeansError::InvalidK(format!(
            "k must be at least 1, got {}",
            request.k
        )));
    }
    let k = usize::try_from(request.k)
        .map_err(|_| KMeansError::InvalidK(format!("k is too large: {}", request.k)))?;

    let points = parse_points(&request.points);
    if points.is_empty() {
        return Err(KMeansError::NoParsablePoints);
    }

    let data = to_matrix(&points)?;

    if points.len() < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of points ({}) must be at least k ({})",
            points.len(),
            k
        )));
    }

    let config = request.engine_config(k);
    let result = algorithm::fit(&data.view(), &config)?;
    info!(
        n_points = points.len(),
        k,
        iterations = result.n_iterations,
        sse = result.sse,
        "clustering finished"
    );

    Ok(ClusterResponse::new(k, &result, points))
}

/// Assign new points against caller-supplied centroids.
pub fn predict(request: &PredictRequest) -> Result<PredictResponse> {
    if request.centroids.is_empty() {
        return Err(KMeansError::NotFitted);
    }
    let centroids = to_matrix(&request.centroids)?;

    if request.points.is_empty() {
        return Err(KMeansError::EmptyDataset);
    }

    let points = parse_points(&request.points);
    if points.is_empty() {
        return Err(KMeansError::NoParsablePoints);
    }
    let data: Array2<f64> = to_matrix(&points)?;

    let labels = algorithm::predict(&centroids.view(), &data.view())?;
    Ok(PredictResponse::new(&labels, points))
}

/// [`cluster`] on a raw JSON body
pub fn cluster_json(body: &str) -> Result<ClusterResponse> {
    let request: ClusterRequest = serde_json::from_str(body)?;
    cluster(&request)
}

/// [`predict`] on a raw JSON body
pub fn predict_json(body: &str) -> Result<PredictResponse> {
    let request: PredictRequest = serde_json::from_str(body)?;
    predict(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn points(v: Value) -> Vec<Value> {
        v.as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn test_cluster_request_defaults() {
        let request: ClusterRequest = serde_json::from_str(r#"{"points": [[1, 2]]}"#).unwrap();
        assert_eq!(request.k, 2);
        assert_eq!(request.max_iters, 100);
        assert!(request.tolerance.is_none());
        assert!(request.seed.is_none());
        assert!(!request.verbose);
    }

    #[test]
    fn test_request_options_reach_engine_config() {
        let request: ClusterRequest = serde_json::from_str(
            r#"{"points": [[1, 2]], "max_iters": 7, "tolerance": 0.5, "seed": 3, "verbose": true}"#,
        )
        .unwrap();

        let config = request.engine_config(2);
        assert_eq!(config.k, 2);
        assert_eq!(config.max_iters, 7);
        assert_eq!(config.tol, 0.5);
        assert_eq!(config.seed, Some(3));
        assert!(config.verbose);

        let quiet = ClusterRequest::new(points(json!([[1, 2]])), 1).engine_config(1);
        assert!(!quiet.verbose);
        assert_eq!(quiet.seed, None);
    }

    #[test]
    fn test_verbose_cluster_matches_quiet_cluster() {
        let data = points(json!([[1, 1], [1.5, 2], [3, 4], [5, 7], [3.5, 5], [4.5, 5], [3.5, 4.5]]));
        let mut quiet = ClusterRequest::new(data, 2);
        quiet.seed = Some(1);
        let mut verbose = quiet.clone();
        verbose.verbose = true;

        let a = cluster(&quiet).unwrap();
        let b = cluster(&verbose).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_cluster_validation_order() {
        let err = cluster(&ClusterRequest::new(vec![], 2)).unwrap_err();
        assert!(matches!(err, KMeansError::EmptyDataset));

        let err = cluster(&ClusterRequest::new(points(json!([[1, 2]])), 0)).unwrap_err();
        assert!(matches!(err, KMeansError::InvalidK(_)));

        let err = cluster(&ClusterRequest::new(points(json!([{"a": "b"}])), 1)).unwrap_err();
        assert!(matches!(err, KMeansError::NoParsablePoints));

        let err = cluster(&ClusterRequest::new(points(json!([[1, 2], [3]])), 1)).unwrap_err();
        assert!(matches!(err, KMeansError::InconsistentDimensions { .. }));

        let err = cluster(&ClusterRequest::new(points(json!([[1, 2], [3, 4]])), 3)).unwrap_err();
        assert!(matches!(err, KMeansError::InsufficientData(_)));
    }

    #[test]
    fn test_cluster_counts_parsed_points_against_k() {
        // Three raw items but only two usable points
        let request = ClusterRequest::new(points(json!([[1, 2], {"name": "x"}, [3, 4]])), 3);
        let err = cluster(&request).unwrap_err();
        assert!(matches!(err, KMeansError::InsufficientData(_)));
    }

    #[test]
    fn test_predict_validation() {
        let err = predict(&PredictRequest {
            centroids: vec![],
            points: points(json!([[1, 2]])),
        })
        .unwrap_err();
        assert!(matches!(err, KMeansError::NotFitted));

        let err = predict(&PredictRequest {
            centroids: vec![vec![0.0, 0.0]],
            points: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, KMeansError::EmptyDataset));

        let err = predict(&PredictRequest {
            centroids: vec![vec![0.0, 0.0], vec![1.0]],
            points: points(json!([[1, 2]])),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            KMeansError::InconsistentDimensions {
                index: 1,
                expected: 2,
                found: 1
            }
        ));

        let err = predict(&PredictRequest {
            centroids: vec![vec![0.0, 0.0]],
            points: points(json!([{"name": "a"}, "text", [true, null]])),
        })
        .unwrap_err();
        assert!(matches!(err, KMeansError::NoParsablePoints));

        let err = predict(&PredictRequest {
            centroids: vec![vec![0.0, 0.0]],
            points: points(json!([[1, 2, 3]])),
        })
        .unwrap_err();
        assert!(matches!(err, KMeansError::InvalidDimensions(_)));
    }

    #[test]
    fn test_predict_json() {
        let body = r#"{
            "centroids": [[1.2, 2.8], [3.0, 1.0]],
            "points": [{"x": 1.1, "y": 2.9}, [3.1, 0.9]]
        }"#;

        let response = predict_json(body).unwrap();
        assert_eq!(response.labels, vec![0, 1]);
        assert_eq!(response.points, vec![vec![1.1, 2.9], vec![3.1, 0.9]]);
    }

    #[test]
    fn test_malformed_json() {
        let err = cluster_json("{not json").unwrap_err();
        assert!(matches!(err, KMeansError::Json(_)));
        assert_eq!(err.status_code(), 400);
    }
}
