use crate::config::KMeansConfig;
use crate::distance::{assign_labels, compute_centroid_shift, compute_sse};
use crate::error::KMeansError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Snapshot of one assignment step
#[derive(Debug, Clone)]
pub struct IterationRecord {
    /// 1-based iteration number
    pub iteration: usize,
    /// Centroids the points were assigned against (before this step's update)
    pub centroids: Array2<f64>,
    pub labels: Array1<usize>,
    /// SSE of `labels` against the pre-update `centroids`
    pub sse: f64,
    /// Rows of the dataset grouped by label, one entry per cluster
    pub clusters: Vec<Array2<f64>>,
}

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct FitResult {
    pub centroids: Array2<f64>,
    pub labels: Array1<usize>,
    /// SSE of the final labels against the final (post-update) centroids.
    /// This is generally lower than `history.last().sse`, which was measured
    /// before the last centroid move.
    pub sse: f64,
    pub n_iterations: usize,
    pub history: Vec<IterationRecord>,
    pub clusters: Vec<Array2<f64>>,
}

/// Run k-means on `data` (one point per row).
///
/// Centroids are seeded from `config.seed`, or from OS entropy when unset.
pub fn fit(data: &ArrayView2<f64>, config: &KMeansConfig) -> Result<FitResult, KMeansError> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    fit_with_rng(data, config, &mut rng)
}

/// Run k-means drawing the initial centroids from `rng`.
pub fn fit_with_rng<R: Rng + ?Sized>(
    data: &ArrayView2<f64>,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<FitResult, KMeansError> {
    validate(data, config)?;

    let k = config.k;
    let mut centroids = initialize_centroids(data, k, rng);
    debug!(
        n_samples = data.nrows(),
        n_features = data.ncols(),
        k,
        "initialized centroids"
    );

    let mut history = Vec::new();
    let mut labels = Array1::zeros(data.nrows());
    let mut n_iterations = 0;
    let mut converged = false;

    for iteration in 1..=config.max_iters {
        n_iterations = iteration;

        labels = assign_labels(data, &centroids.view());

        let sse = compute_sse(data, &labels.view(), &centroids.view());
        history.push(IterationRecord {
            iteration,
            centroids: centroids.clone(),
            labels: labels.clone(),
            sse,
            clusters: group_by_cluster(data, &labels.view(), k),
        });

        let new_centroids = update_centroids(data, &labels.view(), &centroids.view());
        let shift = compute_centroid_shift(&centroids.view(), &new_centroids.view());
        centroids = new_centroids;

        if config.verbose {
            info!(iteration, sse, shift, "k-means iteration");
        } else {
            debug!(iteration, sse, shift, "k-means iteration");
        }

        if shift < config.tol {
            if config.verbose {
                info!(iteration, shift, tol = config.tol, "converged");
            } else {
                debug!(iteration, shift, tol = config.tol, "converged");
            }
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(max_iters = config.max_iters, "stopped at iteration budget");
    }

    let sse = compute_sse(data, &labels.view(), &centroids.view());
    let clusters = group_by_cluster(data, &labels.view(), k);

    Ok(FitResult {
        centroids,
        labels,
        sse,
        n_iterations,
        history,
        clusters,
    })
}

/// Assign `data` against previously fitted `centroids` without retraining
pub fn predict(
    centroids: &ArrayView2<f64>,
    data: &ArrayView2<f64>,
) -> Result<Array1<usize>, KMeansError> {
    if centroids.nrows() == 0 {
        return Err(KMeansError::NotFitted);
    }

    if data.ncols() != centroids.ncols() {
        return Err(KMeansError::InvalidDimensions(format!(
            "Expected {} features, got {}",
            centroids.ncols(),
            data.ncols()
        )));
    }

    Ok(assign_labels(data, centroids))
}

/// Split the rows of `data` into `k` groups by label, keeping dataset order
/// within each group. Groups with no members have zero rows.
pub fn group_by_cluster(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
    k: usize,
) -> Vec<Array2<f64>> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (idx, &label) in labels.iter().enumerate() {
        members[label].push(idx);
    }

    members
        .iter()
        .map(|indices| data.select(Axis(0), indices))
        .collect()
}

fn validate(data: &ArrayView2<f64>, config: &KMeansConfig) -> Result<(), KMeansError> {
    let n_samples = data.nrows();
    let k = config.k;

    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }

    if n_samples == 0 {
        return Err(KMeansError::EmptyDataset);
    }

    if data.ncols() == 0 {
        return Err(KMeansError::InvalidDimensions(
            "points must have at least one coordinate".to_string(),
        ));
    }

    if n_samples < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            n_samples, k
        )));
    }

    if config.max_iters == 0 {
        return Err(KMeansError::InvalidConfig(
            "max_iters must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Initialize centroids by randomly selecting k distinct data points (Forgy)
fn initialize_centroids<R: Rng + ?Sized>(
    data: &ArrayView2<f64>,
    k: usize,
    rng: &mut R,
) -> Array2<f64> {
    let indices: Vec<usize> = (0..data.nrows()).collect();
    let selected: Vec<usize> = indices.choose_multiple(rng, k).cloned().collect();

    data.select(Axis(0), &selected)
}

/// Mean of each cluster's members; empty clusters keep their previous centroid
fn update_centroids(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
    centroids: &ArrayView2<f64>,
) -> Array2<f64> {
    let k = centroids.nrows();
    let mut sums: Array2<f64> = Array2::zeros(centroids.raw_dim());
    let mut counts = vec![0usize; k];

    for (row, &label) in data.outer_iter().zip(labels.iter()) {
        counts[label] += 1;
        let mut sum = sums.row_mut(label);
        sum += &row;
    }

    let mut new_centroids = centroids.to_owned();
    for (cluster_idx, &count) in counts.iter().enumerate() {
        if count > 0 {
            let mean = &sums.row(cluster_idx) / count as f64;
            new_centroids.row_mut(cluster_idx).assign(&mean);
        }
    }

    new_centroids
}
