//! Fixture builders shared by unit tests, integration tests and benches.
//!
//! The helpers here panic on failure; they are meant for test code only.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::features::{CLASSIFICATION_FEATURES, REGRESSION_FEATURES};
use crate::model::{Booster, ModelMeta, OutputTransform, ScoringModel, TaskKind};
use crate::persist;
use crate::repr::gbdt::{Forest, Tree};

/// Default tolerance for comparing predictions.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Column of `selling_price` in the classification vector.
pub const SELLING_PRICE_COLUMN: u32 = 8;

/// A single-leaf forest that always outputs `value`.
pub fn constant_model(
    task: TaskKind,
    n_features: usize,
    value: f64,
    transform: OutputTransform,
) -> ScoringModel {
    let meta = ModelMeta {
        task,
        n_features,
        ..Default::default()
    };
    ScoringModel::new(
        Booster::Tree(Forest::new(0.0).with_tree(Tree::leaf(value))),
        meta,
        transform,
    )
    .expect("constant model is valid")
}

/// Regression model over the 18-feature layout that always outputs `log_price`.
pub fn regression_stub(log_price: f64) -> ScoringModel {
    constant_model(
        TaskKind::Regression,
        REGRESSION_FEATURES.len(),
        log_price,
        OutputTransform::Identity,
    )
}

/// Classifier over the 19-feature layout that always outputs `raw` as its label.
pub fn classification_stub(raw: f64) -> ScoringModel {
    constant_model(
        TaskKind::BinaryClassification,
        CLASSIFICATION_FEATURES.len(),
        raw,
        OutputTransform::Identity,
    )
}

/// Sigmoid classifier that predicts Won when `selling_price >= threshold`.
pub fn price_threshold_classifier(threshold: f32) -> ScoringModel {
    let meta = ModelMeta::for_binary_classification(CLASSIFICATION_FEATURES.len())
        .with_feature_names(CLASSIFICATION_FEATURES)
        .with_objective("binary:logistic");
    ScoringModel::new(
        Booster::Tree(Forest::new(0.0).with_tree(Tree::stump(
            SELLING_PRICE_COLUMN,
            threshold,
            -2.0,
            2.0,
        ))),
        meta,
        OutputTransform::Sigmoid,
    )
    .expect("threshold classifier is valid")
}

/// Write `model` as a native JSON resource at `path`.
pub fn write_model(model: &ScoringModel, path: impl AsRef<Path>) {
    let path = path.as_ref();
    persist::save_json(model, path)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
}

/// Deserialize a JSON fixture file.
pub fn read_fixture<T: DeserializeOwned>(path: impl AsRef<Path>) -> T {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
}
