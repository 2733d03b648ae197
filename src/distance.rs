use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Zip};
use rayon::prelude::*;

/// Squared L2 distance between two rows of equal length
#[inline]
pub fn squared_euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    Zip::from(a).and(b).fold(0.0, |acc, &x, &y| {
        let d = x - y;
        acc + d * d
    })
}

/// L2 distance between two rows of equal length
#[inline]
pub fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Index of the centroid closest to `point`.
///
/// Ties go to the lowest index: a later centroid only wins when it is
/// strictly closer. `centroids` must have at least one row.
pub fn nearest_centroid(point: &ArrayView1<f64>, centroids: &ArrayView2<f64>) -> usize {
    let mut best_label = 0;
    let mut best_dist = f64::INFINITY;

    for (j, centroid) in centroids.outer_iter().enumerate() {
        let dist = euclidean_distance(point, &centroid);
        if dist < best_dist {
            best_dist = dist;
            best_label = j;
        }
    }

    best_label
}

/// Assign every row of `data` to its nearest centroid
///
/// Rows are processed in parallel; each label depends only on its own row,
/// so the output is identical to a serial pass.
pub fn assign_labels(data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Array1<usize> {
    let labels: Vec<usize> = data
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| nearest_centroid(&row, centroids))
        .collect();

    Array1::from_vec(labels)
}

/// Sum of squared distances from each row to the centroid it is labelled with
pub fn compute_sse(
    data: &ArrayView2<f64>,
    labels: &ArrayView1<usize>,
    centroids: &ArrayView2<f64>,
) -> f64 {
    data.outer_iter()
        .zip(labels.iter())
        .map(|(row, &label)| squared_euclidean(&row, &centroids.row(label)))
        .sum()
}

/// Compute centroid shift (sum of L2 norms of centroid movements)
pub fn compute_centroid_shift(
    old_centroids: &ArrayView2<f64>,
    new_centroids: &ArrayView2<f64>,
) -> f64 {
    old_centroids
        .outer_iter()
        .zip(new_centroids.outer_iter())
        .map(|(old_c, new_c)| euclidean_distance(&old_c, &new_c))
        .sum()
}
