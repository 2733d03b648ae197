//! Point parsing.
//!
//! Accepts the encodings a client may send for a point and normalizes them
//! into plain coordinate vectors:
//!
//! - `{"x": 1, "y": 3}`: when both `x` and `y` are present the point is
//!   exactly `[x, y]`, other keys are ignored
//! - `{"b": 2, "a": 1}`: otherwise every numeric value, in ascending key order
//! - `[1, 3]`: the numeric entries of the list
//! - `"x1={1,3}, x2={1.5,3.2}"`: brace notation, one point per `{...}` block
//!
//! Parsing is deliberately lossy. Tokens that are not numbers are dropped,
//! and an item left with no coordinates is dropped as a whole. No dimension
//! check happens here; use [`to_matrix`] for that.

use crate::error::KMeansError;
use ndarray::Array2;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Parse a list of JSON point encodings
pub fn parse_points(items: &[Value]) -> Vec<Vec<f64>> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let point = parse_point(item);
            if point.is_empty() {
                debug!(index = idx, "dropping point without numeric coordinates");
                None
            } else {
                Some(point)
            }
        })
        .collect()
}

/// Parse a single JSON point encoding. Returns an empty vector when nothing
/// numeric was found.
pub fn parse_point(item: &Value) -> Vec<f64> {
    match item {
        Value::Object(record) => parse_record(record),
        Value::Array(values) => values.iter().filter_map(as_number).collect(),
        _ => Vec::new(),
    }
}

fn parse_record(record: &Map<String, Value>) -> Vec<f64> {
    if let (Some(x), Some(y)) = (record.get("x"), record.get("y")) {
        return match (coerce_number(x), coerce_number(y)) {
            (Some(x), Some(y)) => vec![x, y],
            _ => Vec::new(),
        };
    }

    let mut entries: Vec<(&String, &Value)> = record.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .filter_map(|(_, value)| as_number(value))
        .collect()
}

/// Strict: only JSON numbers count as coordinates
fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Lenient: JSON numbers or strings holding a number
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => parse_token(s),
        other => as_number(other),
    }
}

fn parse_token(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// One `{...}` block with no nested braces. Scanning left to right, an
/// opening brace followed by another one before `}` restarts the block.
static BRACE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("brace block pattern compiles"));

/// Parse brace notation such as `x1={1,3}, x2={1.5,3.2}`.
///
/// Text outside braces (labels, separators) is ignored. A block whose
/// closing brace is missing is dropped.
pub fn parse_points_str(text: &str) -> Vec<Vec<f64>> {
    BRACE_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let block = caps.get(1).map_or("", |m| m.as_str());
            let point: Vec<f64> = block.split(',').filter_map(parse_token).collect();
            if point.is_empty() {
                debug!(block, "dropping point block without numeric coordinates");
                None
            } else {
                Some(point)
            }
        })
        .collect()
}

/// Pack parsed points into a matrix, one point per row.
pub fn to_matrix(points: &[Vec<f64>]) -> Result<Array2<f64>, KMeansError> {
    let first = points.first().ok_or(KMeansError::EmptyDataset)?;
    let n_features = first.len();

    if let Some((index, point)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| p.len() != n_features)
    {
        return Err(KMeansError::InconsistentDimensions {
            index,
            expected: n_features,
            found: point.len(),
        });
    }

    let flat: Vec<f64> = points.iter().flatten().copied().collect();
    Array2::from_shape_vec((points.len(), n_features), flat).map_err(|e| {
        KMeansError::InvalidDimensions(format!("cannot shape {} points: {}", points.len(), e))
    })
}
