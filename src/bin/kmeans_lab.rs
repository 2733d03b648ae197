//! Command-line front end for the k-means engine
//!
//! Reads a clustering or predict request, runs it, and prints the JSON
//! response (or a readable summary). A rejected request prints an
//! `{"error": ...}` body and exits with a failure status.
//!
//! Usage:
//!   kmeans-lab cluster --points "x1={1,1}, x2={1.5,2}, x3={3,4}" --k 2
//!   kmeans-lab cluster --input request.json --summary
//!   kmeans-lab predict --input predict.json

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use kmeans_lab::report::{ClusterGroups, ClusterResponse, ErrorResponse};
use kmeans_lab::service::{self, ClusterRequest};
use kmeans_lab::{parse_points_str, KMeansError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kmeans-lab", version, about = "K-means clustering demo")]
struct Cli {
    /// Log every iteration (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster a set of points
    Cluster(ClusterArgs),
    /// Assign points to previously fitted centroids
    Predict {
        /// JSON file with `centroids` and `points`
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ClusterArgs {
    /// JSON file holding a clustering request
    #[arg(short, long, conflicts_with = "points")]
    input: Option<PathBuf>,

    /// Points in brace notation, e.g. "x1={1,3}, x2={1.5,3.2}"
    #[arg(short, long)]
    points: Option<String>,

    /// Number of clusters
    #[arg(short, long, default_value_t = 2)]
    k: i64,

    #[arg(long, default_value_t = 100)]
    max_iters: usize,

    /// Convergence tolerance on the total centroid shift
    #[arg(long)]
    tol: Option<f64>,

    /// Seed for the initial centroids
    #[arg(long)]
    seed: Option<u64>,

    /// Print a readable report instead of JSON
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Cluster(args) => run_cluster(args, cli.verbose),
        Command::Predict { input } => {
            let body = read(&input)?;
            match service::predict_json(&body) {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => report_error(&err),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cluster(args: ClusterArgs, verbose: bool) -> anyhow::Result<ExitCode> {
    let mut request = match (&args.input, &args.points) {
        (Some(path), _) => {
            let body = read(path)?;
            match serde_json::from_str::<ClusterRequest>(&body) {
                Ok(request) => request,
                Err(e) => return report_error(&KMeansError::from(e)),
            }
        }
        (None, Some(text)) => {
            let points: Vec<Value> = parse_points_str(text)
                .into_iter()
                .map(Value::from)
                .collect();
            let mut request = ClusterRequest::new(points, args.k);
            request.max_iters = args.max_iters;
            request
        }
        (None, None) => bail!("either --input or --points is required"),
    };

    request.tolerance = args.tol.or(request.tolerance);
    request.seed = args.seed.or(request.seed);
    request.verbose |= verbose;

    let response = match service::cluster(&request) {
        Ok(response) => response,
        Err(err) => return report_error(&err),
    };

    if args.summary {
        print_summary(&response);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn report_error(err: &KMeansError) -> anyhow::Result<ExitCode> {
    warn!(status = err.status_code(), "request rejected: {err}");
    println!("{}", error_body(err)?);
    Ok(ExitCode::FAILURE)
}

fn error_body(err: &KMeansError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ErrorResponse::from(err))
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn print_summary(response: &ClusterResponse) {
    println!("Iterations: {}", response.iterations);
    println!("SSE (Sum of Squared Errors): {:.4}", response.sse);

    println!("\nFinal centroids:");
    for (i, centroid) in response.centroids.iter().enumerate() {
        println!("  Cluster {}: {}", i, format_point(centroid));
    }

    println!("\nClusters:");
    let ClusterGroups(groups) = &response.clusters;
    for (i, points) in groups.iter().enumerate() {
        println!("\n  {} ({} points):", ClusterGroups::key(i), points.len());
        for point in points {
            println!("    {}", format_point(point));
        }
    }
}

fn format_point(point: &[f64]) -> String {
    let coords: Vec<String> = point.iter().map(|c| format!("{c:.4}")).collect();
    format!("({})", coords.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_carries_message() {
        let body = error_body(&KMeansError::NoParsablePoints).unwrap();
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Could not parse any point from the input");
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["kmeans-lab", "cluster", "--points", "{1,1}", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Cluster(_)));
    }
}
