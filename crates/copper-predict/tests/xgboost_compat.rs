//! Loading XGBoost JSON models through the task adapters.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use copper_predict::compat::xgboost::{ConversionError, XgbModel};
use copper_predict::model::Booster;
use copper_predict::{
    ClassificationInput, ClassificationModel, DealOutcome, Error, LoadPolicy, ModelFormat,
    ModelLoadError, ModelSource, OutputTransform, RegressionInput, RegressionModel, TaskKind,
    classification_features, regression_features,
};
use rstest::rstest;
use serde_json::Value;

fn xgboost_case(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test-cases/xgboost")
        .join(name)
}

fn fixture_value(name: &str) -> Value {
    let bytes = std::fs::read(xgboost_case(name)).expect("read fixture");
    serde_json::from_slice(&bytes).expect("parse fixture json")
}

#[test]
fn parse_regression_model() {
    let model = XgbModel::from_file(xgboost_case("regression_model.json")).unwrap();
    assert_eq!(model.version, [2, 0, 3]);
    assert!(!model.is_linear());
    assert_abs_diff_eq!(model.learner.learner_model_param.base_score, 7.0);

    let scoring = model.to_scoring_model().unwrap();
    assert_eq!(scoring.task(), TaskKind::Regression);
    assert_eq!(scoring.n_features(), 18);
    assert_eq!(scoring.output_transform(), OutputTransform::Identity);
    match scoring.booster() {
        Booster::Tree(forest) => assert_eq!(forest.n_trees(), 2),
        other => panic!("expected gbtree, got {}", other.kind()),
    }
}

#[test]
fn classification_base_score_is_margin() {
    let model = XgbModel::from_file(xgboost_case("classification_model.json")).unwrap();
    let scoring = model.to_scoring_model().unwrap();
    assert_eq!(scoring.task(), TaskKind::BinaryClassification);
    assert_eq!(scoring.output_transform(), OutputTransform::Sigmoid);
    match scoring.booster() {
        // p = 0.5 → logit 0
        Booster::Tree(forest) => assert_abs_diff_eq!(forest.base_score(), 0.0, epsilon = 1e-12),
        other => panic!("expected gbtree, got {}", other.kind()),
    }
}

#[rstest]
#[case::auto(ModelFormat::Auto)]
#[case::explicit(ModelFormat::Xgboost)]
fn selling_price_from_xgboost_model(#[case] format: ModelFormat) {
    let model = RegressionModel::from_source(
        ModelSource::new(xgboost_case("regression_model.json"), format),
        LoadPolicy::Shared,
    );
    let features = regression_features(&RegressionInput::default()).unwrap();
    let price = model.predict(&features).unwrap();
    assert_eq!(price.to_string(), "$ 1919.999");
}

#[rstest]
#[case::won(1918.06, DealOutcome::Won)]
#[case::at_threshold(1000.0, DealOutcome::Won)]
#[case::lost(999.5, DealOutcome::Lost)]
#[case::zero(0.0, DealOutcome::Lost)]
fn status_from_xgboost_model(#[case] selling_price: f64, #[case] expected: DealOutcome) {
    let model = ClassificationModel::new(xgboost_case("classification_model.json"));
    let input = ClassificationInput {
        selling_price,
        ..ClassificationInput::default()
    };
    let features = classification_features(&input).unwrap();
    assert_eq!(model.predict(&features).unwrap(), expected);
}

#[test]
fn native_format_rejects_xgboost_document() {
    let source = ModelSource::new(xgboost_case("regression_model.json"), ModelFormat::Native);
    let err = source.load().unwrap_err();
    assert!(matches!(err, ModelLoadError::Native { .. }), "got: {err:?}");
}

#[test]
fn multiclass_model_rejected() {
    let mut v = fixture_value("classification_model.json");
    v["learner"]["learner_model_param"]["num_class"] = Value::from("3");

    let err = XgbModel::from_value(v).unwrap().to_scoring_model().unwrap_err();
    assert!(
        matches!(err, ConversionError::MultiOutput { num_class: 3, .. }),
        "got: {err:?}"
    );
}

#[test]
fn categorical_split_rejected() {
    let mut v = fixture_value("classification_model.json");
    v["learner"]["gradient_booster"]["model"]["trees"][0]["split_type"] =
        Value::from(vec![1, 0, 0]);

    let err = XgbModel::from_value(v).unwrap().to_scoring_model().unwrap_err();
    assert!(
        matches!(err, ConversionError::CategoricalSplit { tree: 0, node: 0 }),
        "got: {err:?}"
    );
}

#[test]
fn dart_booster_fails_to_parse() {
    let mut v = fixture_value("regression_model.json");
    v["learner"]["gradient_booster"]["name"] = Value::from("dart");
    assert!(XgbModel::from_value(v).is_err());
}

#[test]
fn split_on_missing_feature_rejected_at_load() {
    let mut v = fixture_value("regression_model.json");
    v["learner"]["gradient_booster"]["model"]["trees"][1]["split_indices"][0] = Value::from(40);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.json");
    std::fs::write(&path, serde_json::to_vec(&v).unwrap()).unwrap();

    let model = RegressionModel::new(&path);
    let features = regression_features(&RegressionInput::default()).unwrap();
    let err = model.predict(&features).unwrap_err();
    assert!(
        matches!(
            err,
            Error::ModelLoad(ModelLoadError::Xgboost {
                source: ConversionError::Structure(_),
                ..
            })
        ),
        "got: {err:?}"
    );
}

#[test]
fn hinge_objective_maps_to_step() {
    let mut v = fixture_value("classification_model.json");
    v["learner"]["objective"] = serde_json::json!({"name": "binary:hinge"});
    v["learner"]["learner_model_param"]["base_score"] = Value::from("0E0");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hinge.json");
    std::fs::write(&path, serde_json::to_vec(&v).unwrap()).unwrap();

    let scoring = ModelSource::new(&path, ModelFormat::Auto).load().unwrap();
    assert_eq!(scoring.output_transform(), OutputTransform::Step);

    let model = ClassificationModel::new(&path);
    let features = classification_features(&ClassificationInput::default()).unwrap();
    assert_eq!(model.predict(&features).unwrap(), DealOutcome::Won);
}
