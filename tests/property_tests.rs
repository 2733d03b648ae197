use kmeans_lab::{fit, predict, to_matrix, KMeansConfig};
use proptest::prelude::*;

fn dataset() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..4).prop_flat_map(|dims| {
        prop::collection::vec(prop::collection::vec(-100.0f64..100.0, dims), 1..30)
    })
}

proptest! {
    #[test]
    fn prop_fit_output_invariants(points in dataset(), k in 1usize..6, seed in any::<u64>()) {
        prop_assume!(k <= points.len());
        let data = to_matrix(&points).unwrap();
        let config = KMeansConfig::new(k).with_seed(seed).with_max_iters(50);

        let result = fit(&data.view(), &config).unwrap();

        prop_assert_eq!(result.centroids.nrows(), k);
        prop_assert_eq!(result.labels.len(), points.len());
        prop_assert!(result.labels.iter().all(|&l| l < k));
        prop_assert_eq!(result.history.len(), result.n_iterations);
        prop_assert!(result.n_iterations >= 1 && result.n_iterations <= 50);

        let grouped: usize = result.clusters.iter().map(|g| g.nrows()).sum();
        prop_assert_eq!(grouped, points.len());
        for (cluster_idx, group) in result.clusters.iter().enumerate() {
            let count = result.labels.iter().filter(|&&l| l == cluster_idx).count();
            prop_assert_eq!(group.nrows(), count);
        }
    }

    #[test]
    fn prop_history_sse_non_increasing(points in dataset(), k in 1usize..5, seed in any::<u64>()) {
        prop_assume!(k <= points.len());
        let data = to_matrix(&points).unwrap();
        let config = KMeansConfig::new(k).with_seed(seed).with_tol(1e-12);

        let result = fit(&data.view(), &config).unwrap();

        for pair in result.history.windows(2) {
            let slack = 1e-9 * (1.0 + pair[0].sse.abs());
            prop_assert!(pair[1].sse <= pair[0].sse + slack);
        }
    }

    #[test]
    fn prop_predict_matches_last_assignment(points in dataset(), k in 1usize..5, seed in any::<u64>()) {
        prop_assume!(k <= points.len());
        let data = to_matrix(&points).unwrap();
        let config = KMeansConfig::new(k).with_seed(seed);

        let result = fit(&data.view(), &config).unwrap();
        let last = result.history.last().unwrap();

        // Labels are a pure function of the centroids they were assigned against
        let labels = predict(&last.centroids.view(), &data.view()).unwrap();
        prop_assert_eq!(labels, last.labels.clone());
        prop_assert_eq!(&result.labels, &last.labels);
    }
}
