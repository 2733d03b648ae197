use crate::algorithm::{FitResult, IterationRecord};
use ndarray::{Array1, Array2};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Decimal places the top-level SSE is rounded to for display
pub const SSE_DISPLAY_PLACES: i32 = 4;

/// Points grouped by cluster, serialized as `{"cluster_0": [...], "cluster_1": [...]}`
/// with keys in cluster-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroups(pub Vec<Vec<Vec<f64>>>);

impl ClusterGroups {
    pub fn from_arrays(groups: &[Array2<f64>]) -> Self {
        Self(groups.iter().map(rows).collect())
    }

    pub fn key(index: usize) -> String {
        format!("cluster_{index}")
    }
}

impl Serialize for ClusterGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, points) in self.0.iter().enumerate() {
            map.serialize_entry(&Self::key(index), points)?;
        }
        map.end()
    }
}

/// One entry of the response `history`
#[derive(Debug, Clone, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    pub centroids: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub sse: f64,
    pub clusters: ClusterGroups,
}

impl From<&IterationRecord> for IterationReport {
    fn from(record: &IterationRecord) -> Self {
        Self {
            iteration: record.iteration,
            centroids: rows(&record.centroids),
            labels: record.labels.to_vec(),
            sse: record.sse,
            clusters: ClusterGroups::from_arrays(&record.clusters),
        }
    }
}

/// Response of a clustering request
#[derive(Debug, Clone, Serialize)]
pub struct ClusterResponse {
    pub status: &'static str,
    pub algorithm: &'static str,
    pub k: usize,
    pub iterations: usize,
    /// Final SSE, rounded to [`SSE_DISPLAY_PLACES`]
    pub sse: f64,
    pub centroids: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub clusters: ClusterGroups,
    /// The parsed input points, echoed back
    pub points: Vec<Vec<f64>>,
    pub history: Vec<IterationReport>,
}

impl ClusterResponse {
    pub fn new(k: usize, result: &FitResult, points: Vec<Vec<f64>>) -> Self {
        Self {
            status: "success",
            algorithm: "K-Means Clustering",
            k,
            iterations: result.n_iterations,
            sse: round_to(result.sse, SSE_DISPLAY_PLACES),
            centroids: rows(&result.centroids),
            labels: result.labels.to_vec(),
            clusters: ClusterGroups::from_arrays(&result.clusters),
            points,
            history: result.history.iter().map(IterationReport::from).collect(),
        }
    }
}

/// Response of a predict-only request
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub status: &'static str,
    pub labels: Vec<usize>,
    pub points: Vec<Vec<f64>>,
}

impl PredictResponse {
    pub fn new(labels: &Array1<usize>, points: Vec<Vec<f64>>) -> Self {
        Self {
            status: "success",
            labels: labels.to_vec(),
            points,
        }
    }
}

/// Body returned alongside a non-2xx status
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl<E: std::fmt::Display> From<&E> for ErrorResponse {
    fn from(err: &E) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KMeansError;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_56, 4), 1.2346);
        assert_eq!(round_to(2.0, 4), 2.0);
        assert_eq!(round_to(-0.000_04, 4), -0.0);
    }

    #[test]
    fn test_cluster_groups_keys_in_index_order() {
        let groups: Vec<Array2<f64>> = (0..12).map(|i| array![[i as f64]]).collect();
        let text = serde_json::to_string(&ClusterGroups::from_arrays(&groups)).unwrap();

        let pos_2 = text.find("\"cluster_2\"").unwrap();
        let pos_10 = text.find("\"cluster_10\"").unwrap();
        assert!(pos_2 < pos_10);
    }

    #[test]
    fn test_cluster_groups_empty_group() {
        let groups = vec![array![[1.0, 2.0]], Array2::<f64>::zeros((0, 2))];
        let value = serde_json::to_value(ClusterGroups::from_arrays(&groups)).unwrap();

        assert_eq!(value, json!({"cluster_0": [[1.0, 2.0]], "cluster_1": []}));
    }

    #[test]
    fn test_error_response() {
        let body = ErrorResponse::from(&KMeansError::EmptyDataset);
        assert!(body.error.contains("Empty dataset"));
    }
}
