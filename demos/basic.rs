//! Walks through a small k-means exercise and prints every iteration
//!
//! Run with: cargo run --example basic

use kmeans_lab::report::ClusterGroups;
use kmeans_lab::{fit, parse_points_str, predict, to_matrix, KMeansConfig};

fn main() {
    println!("=== kmeans-lab example ===\n");

    let input = "A={1,1}, B={1.5,2}, C={3,4}, D={5,7}, E={3.5,5}, F={4.5,5}, G={3.5,4.5}";
    let points = parse_points_str(input);
    let data = to_matrix(&points).expect("points share one dimension");

    println!("Input ({} points):", data.nrows());
    for (i, row) in data.outer_iter().enumerate() {
        println!("  x{}: ({:.2}, {:.2})", i + 1, row[0], row[1]);
    }
    println!();

    let k = 2;
    let config = KMeansConfig::new(k).with_max_iters(100).with_seed(42);
    println!("Running k-means with k={}...\n", k);

    let result = fit(&data.view(), &config).expect("clustering failed");

    for record in &result.history {
        println!("Iteration {}: SSE = {:.4}", record.iteration, record.sse);
        for (i, centroid) in record.centroids.outer_iter().enumerate() {
            println!("  centroid {}: ({:.4}, {:.4})", i, centroid[0], centroid[1]);
        }
    }
    println!();

    println!("Converged after {} iterations", result.n_iterations);
    println!("Final SSE: {:.4}\n", result.sse);

    for (i, group) in result.clusters.iter().enumerate() {
        println!("{} ({} points):", ClusterGroups::key(i), group.nrows());
        for row in group.outer_iter() {
            println!("  ({:.4}, {:.4})", row[0], row[1]);
        }
    }
    println!();

    let new_points = to_matrix(&parse_points_str("{1.2,1.4}, {4,6}")).expect("two 2-d points");
    let labels = predict(&result.centroids.view(), &new_points.view()).expect("prediction failed");
    for (row, label) in new_points.outer_iter().zip(labels.iter()) {
        println!("  ({:.2}, {:.2}) -> cluster {}", row[0], row[1], label);
    }

    println!("\n=== Done! ===");
}
