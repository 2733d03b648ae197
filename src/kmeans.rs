use crate::algorithm::{self, FitResult};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use ndarray::{Array1, Array2, ArrayView2};

/// K-means model that keeps the result of its last fit.
///
/// The free functions [`crate::fit`] and [`crate::predict`] are the stateless
/// core; this type is a convenience for callers that want to fit once and
/// predict many times. Fitting takes `&mut self`, so a model shared across
/// threads must be wrapped by the caller.
///
/// # Example
///
/// ```
/// use kmeans_lab::{KMeans, KMeansConfig};
/// use ndarray::array;
///
/// let data = array![[1.0, 1.0], [1.5, 2.0], [8.0, 8.0], [9.0, 8.5]];
///
/// let mut kmeans = KMeans::with_config(KMeansConfig::new(2).with_seed(7));
/// let labels = kmeans.fit_predict(&data.view()).unwrap();
///
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,

    /// Result of the last fit (None if not yet fitted)
    fitted: Option<FitResult>,
}

impl KMeans {
    /// Create a model with default configuration and `k` clusters.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a model with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.k` is 0.
    pub fn with_config(config: KMeansConfig) -> Self {
        assert!(config.k > 0, "k must be greater than 0");

        Self {
            config,
            fitted: None,
        }
    }

    /// Fit the model, replacing any previous result.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, has fewer rows than k, or the
    /// configuration is invalid. A failed fit leaves the previous result in place.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&FitResult, KMeansError> {
        let result = algorithm::fit(data, &self.config)?;
        Ok(self.fitted.insert(result))
    }

    /// Predict cluster assignments for new data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has not been fitted yet
    /// - Data dimensions don't match the training data
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        let centroids = self.centroids().ok_or(KMeansError::NotFitted)?;
        algorithm::predict(&centroids.view(), data)
    }

    /// Fit the model and return the labels of the training data.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        Ok(self.fit(data)?.labels.clone())
    }

    /// Centroids of the fitted model, `None` before the first fit
    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.fitted.as_ref().map(|result| &result.centroids)
    }

    /// Full result of the last fit, including the iteration history
    pub fn result(&self) -> Option<&FitResult> {
        self.fitted.as_ref()
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
