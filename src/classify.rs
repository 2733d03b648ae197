//! Pre-trained classifier collaborators.
//!
//! The decision-tree and naive-bayes models are opaque: a row of categorical
//! features goes in, a label comes out. This module only knows which features
//! each model expects and how to shape a raw request into that row. The
//! registry is built once at startup and handed to whatever serves requests.

use crate::error::ClassifyError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

/// One input row: `(feature name, value)` in the order the model expects
pub type FeatureRow = Vec<(String, String)>;

/// A trained model that maps one feature row to a class label
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<String, ClassifyError>;
}

/// Static description of a model and the input it expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub key: &'static str,
    pub display_name: &'static str,
    pub features: &'static [&'static str],
    /// Rename a `Temp` input key to `Temperature` before building the row
    pub normalize_temp: bool,
}

pub const GINI_CART: ModelSpec = ModelSpec {
    key: "GINI_CART",
    display_name: "GINI_CART (Decision Tree)",
    features: &["Outlook", "Temperature", "Humidity", "Wind"],
    normalize_temp: true,
};

pub const ID3_ENTROPY: ModelSpec = ModelSpec {
    key: "ID3_Entropy",
    display_name: "ID3_Entropy (Decision Tree)",
    features: &["Outlook", "Temp", "Humidity", "Wind"],
    normalize_temp: false,
};

pub const NAIVE_BAYES: ModelSpec = ModelSpec {
    key: "NAIVE_BAYES",
    display_name: "NAIVE_BAYES",
    features: &["Outlook", "Temperature", "Humidity", "Wind"],
    normalize_temp: true,
};

/// The models the demo ships with
pub const BUILTIN_MODELS: [ModelSpec; 3] = [GINI_CART, ID3_ENTROPY, NAIVE_BAYES];

/// Response of a classification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub prediction: String,
}

struct Entry {
    spec: ModelSpec,
    classifier: Box<dyn Classifier>,
}

/// Classifiers by model key
#[derive(Default)]
pub struct ClassifierRegistry {
    models: HashMap<&'static str, Entry>,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the classifier for `spec.key`
    pub fn register(&mut self, spec: ModelSpec, classifier: Box<dyn Classifier>) {
        info!(model = spec.key, "registered classifier");
        self.models.insert(spec.key, Entry { spec, classifier });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Run the model registered under `key` on a raw request record
    pub fn classify(
        &self,
        key: &str,
        raw: &Map<String, Value>,
    ) -> Result<ClassificationResponse, ClassifyError> {
        let entry = self
            .models
            .get(key)
            .ok_or_else(|| ClassifyError::UnknownModel(key.to_string()))?;

        let row = build_row(&entry.spec, raw);
        debug!(model = key, ?row, "classifying");
        let prediction = entry.classifier.predict(&row)?;

        Ok(ClassificationResponse {
            status: "success",
            model: entry.spec.display_name,
            prediction,
        })
    }
}

/// Shape a raw record into the model's feature row. Missing features become
/// empty strings; keys the model does not know are ignored.
pub fn build_row(spec: &ModelSpec, raw: &Map<String, Value>) -> FeatureRow {
    let normalized = normalize_keys(spec, raw);

    spec.features
        .iter()
        .map(|&feature| {
            let value = normalized.get(feature).map(value_text).unwrap_or_default();
            (feature.to_string(), value)
        })
        .collect()
}

fn normalize_keys(spec: &ModelSpec, raw: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = raw.clone();
    if spec.normalize_temp {
        if let Some(temp) = normalized.remove("Temp") {
            normalized.insert("Temperature".to_string(), temp);
        }
    }
    normalized
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
