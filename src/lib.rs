//! # kmeans-lab
//!
//! From-scratch k-means clustering for a classroom data-mining demo, plus the
//! request and response shapes a web layer needs to expose it.
//!
//! ## Features
//!
//! - **Lloyd iterations with full history**: every assignment step is kept
//!   with its centroids, labels, SSE and per-cluster points, so a UI can
//!   replay the run
//! - **Stateless core**: [`fit`] and [`predict`] are plain functions; a
//!   fitted model is just its centroid matrix
//! - **Permissive point parsing**: `{"x":..,"y":..}` records, generic
//!   records, raw lists, or brace notation such as `x1={1,3}, x2={1.5,3.2}`
//! - **Deterministic when asked**: seed the run, or inject any `rand::Rng`
//!
//! ## Example
//!
//! ```rust
//! use kmeans_lab::{fit, predict, KMeansConfig};
//! use ndarray::array;
//!
//! let data = array![
//!     [1.0, 1.0], [1.5, 2.0], [3.0, 4.0], [5.0, 7.0],
//!     [3.5, 5.0], [4.5, 5.0], [3.5, 4.5],
//! ];
//!
//! let config = KMeansConfig::new(2).with_max_iters(100).with_seed(42);
//! let result = fit(&data.view(), &config).unwrap();
//!
//! assert_eq!(result.centroids.nrows(), 2);
//! assert_eq!(result.history.len(), result.n_iterations);
//!
//! // Predicting the training data against the final centroids reproduces the labels
//! let labels = predict(&result.centroids.view(), &data.view()).unwrap();
//! assert_eq!(labels, result.labels);
//! ```
//!
//! ## Serving requests
//!
//! ```rust
//! use kmeans_lab::service;
//!
//! let body = r#"{"points": [{"x": 1, "y": 3}, {"x": 1.5, "y": 3.2}, {"x": 8, "y": 9}], "k": 2, "seed": 1}"#;
//! let response = service::cluster_json(body).unwrap();
//!
//! let json = serde_json::to_value(&response).unwrap();
//! assert_eq!(json["status"], "success");
//! assert!(json["clusters"].get("cluster_0").is_some());
//! ```

pub mod algorithm;
pub mod classify;
mod config;
pub mod distance;
mod error;
mod kmeans;
pub mod parser;
pub mod report;
pub mod service;

pub use algorithm::{fit, fit_with_rng, predict, FitResult, IterationRecord};
pub use config::KMeansConfig;
pub use error::{ClassifyError, KMeansError, Result};
pub use kmeans::KMeans;
pub use parser::{parse_points, parse_points_str, to_matrix};
pub use report::{ClusterResponse, PredictResponse};
