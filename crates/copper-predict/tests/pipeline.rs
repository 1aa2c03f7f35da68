//! End-to-end transform-then-predict tests against model resources on disk.

use std::path::{Path, PathBuf};

use copper_predict::features::REGRESSION_FEATURES;
use copper_predict::model::ModelMeta;
use copper_predict::testing::{
    classification_stub, price_threshold_classifier, read_fixture, regression_stub, write_model,
};
use copper_predict::{
    ClassificationInput, ClassificationModel, DealOutcome, Error, FeatureError, LoadPolicy,
    ModelFormat, ModelLoadError, ModelSource, PredictionError, Predictor, PredictorConfig,
    RegressionInput, RegressionModel, ScoringModel, TaskKind,
};

fn test_cases() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

fn native_predictor() -> Predictor {
    let dir = test_cases().join("native");
    let config = PredictorConfig::builder()
        .regression_model(dir.join("regression_model.json"))
        .classification_model(dir.join("classification_model.json"))
        .build()
        .expect("valid config");
    Predictor::new(config)
}

// =============================================================================
// Happy path
// =============================================================================

#[test]
fn selling_price_from_native_model() {
    let predictor = native_predictor();
    let price = predictor
        .predict_selling_price(&RegressionInput::default())
        .expect("prediction");
    assert_eq!(price.amount(), 1919.999);
    assert_eq!(price.to_string(), "$ 1919.999");
    assert!(predictor.regression().handle().is_loaded());
}

#[test]
fn selling_price_from_request_fixture() {
    let input: RegressionInput = read_fixture(test_cases().join("requests/price.json"));
    let price = native_predictor().predict_selling_price(&input).unwrap();
    assert_eq!(price.to_string(), "$ 1919.999");
}

#[test]
fn status_follows_selling_price() {
    let predictor = native_predictor();

    let won = predictor
        .predict_status(&ClassificationInput::default())
        .unwrap();
    assert_eq!(won, DealOutcome::Won);
    assert_eq!(won.to_string(), "Won");

    let cheap = ClassificationInput {
        selling_price: 500.0,
        ..ClassificationInput::default()
    };
    assert_eq!(predictor.predict_status(&cheap).unwrap(), DealOutcome::Lost);
}

#[test]
fn status_from_request_fixture() {
    let input: ClassificationInput = read_fixture(test_cases().join("requests/status.json"));
    assert_eq!(
        native_predictor().predict_status(&input).unwrap(),
        DealOutcome::Won
    );
}

#[test]
fn linear_regression_model() {
    let model = RegressionModel::new(test_cases().join("native/linear_regression_model.json"));
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    // 7.0 + 0.001 * day_difference(458)
    let price = model.predict(&features).unwrap();
    assert_eq!(price.amount(), 1733.677);
}

#[test]
fn config_file_resolves_models_next_to_it() {
    let dir = tempfile::tempdir().unwrap();
    write_model(&regression_stub(0.0), dir.path().join("price.json"));
    write_model(&price_threshold_classifier(1000.0), dir.path().join("status.json"));
    let config_path = dir.path().join("copper.toml");
    std::fs::write(
        &config_path,
        "regression_model = \"price.json\"\nclassification_model = \"status.json\"\n",
    )
    .unwrap();

    let predictor = Predictor::new(PredictorConfig::load(&config_path).unwrap());
    let price = predictor
        .predict_selling_price(&RegressionInput::default())
        .unwrap();
    assert_eq!(price.to_string(), "$ 1");
    assert_eq!(
        predictor
            .predict_status(&ClassificationInput::default())
            .unwrap(),
        DealOutcome::Won
    );
}

// =============================================================================
// Classification output mapping
// =============================================================================

#[test]
fn identity_classifier_requires_exact_one() {
    let dir = tempfile::tempdir().unwrap();
    let won_path = dir.path().join("won.json");
    let near_path = dir.path().join("near.json");
    write_model(&classification_stub(1.0), &won_path);
    write_model(&classification_stub(0.999), &near_path);

    let features =
        copper_predict::classification_features(&ClassificationInput::default()).unwrap();
    assert_eq!(
        ClassificationModel::new(&won_path).predict(&features).unwrap(),
        DealOutcome::Won
    );
    assert_eq!(
        ClassificationModel::new(&near_path)
            .predict(&features)
            .unwrap(),
        DealOutcome::Lost
    );
}

// =============================================================================
// Failure paths
// =============================================================================

#[test]
fn invalid_input_never_touches_model() {
    let config = PredictorConfig::builder()
        .regression_model("/nonexistent/regression_model.json")
        .classification_model("/nonexistent/classification_model.json")
        .build()
        .unwrap();
    let predictor = Predictor::new(config);

    let bad_label = RegressionInput {
        item_type: "XYZ".into(),
        ..RegressionInput::default()
    };
    let err = predictor.predict_selling_price(&bad_label).unwrap_err();
    assert!(
        matches!(err, Error::Feature(FeatureError::UnknownLabel(_))),
        "got: {err:?}"
    );

    let bad_width = ClassificationInput {
        width: 5000.0,
        ..ClassificationInput::default()
    };
    let err = predictor.predict_status(&bad_width).unwrap_err();
    assert!(
        matches!(err, Error::Feature(FeatureError::InvalidRange(_))),
        "got: {err:?}"
    );

    assert!(!predictor.regression().handle().is_loaded());
    assert!(!predictor.classification().handle().is_loaded());
}

#[test]
fn missing_model_is_load_error() {
    let model = RegressionModel::new("/nonexistent/regression_model.json");
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    let err = model.predict(&features).unwrap_err();
    assert!(
        matches!(err, Error::ModelLoad(ModelLoadError::Io { .. })),
        "got: {err:?}"
    );
}

#[test]
fn wrong_feature_count_is_prediction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narrow.json");
    write_model(
        &copper_predict::testing::constant_model(
            TaskKind::Regression,
            5,
            7.0,
            copper_predict::OutputTransform::Identity,
        ),
        &path,
    );

    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    let err = RegressionModel::new(&path).predict(&features).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Prediction(PredictionError::FeatureCountMismatch {
                expected: 5,
                actual: 18
            })
        ),
        "got: {err:?}"
    );
}

#[test]
fn wrong_task_is_rejected() {
    let path = test_cases().join("native/classification_model.json");
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    let err = RegressionModel::new(&path).predict(&features).unwrap_err();
    assert!(
        matches!(
            err,
            Error::ModelLoad(ModelLoadError::TaskMismatch {
                expected: TaskKind::Regression,
                actual: TaskKind::BinaryClassification,
                ..
            })
        ),
        "got: {err:?}"
    );
}

#[test]
fn misnamed_feature_is_rejected() {
    let mut names: Vec<String> = REGRESSION_FEATURES.iter().map(|s| s.to_string()).collect();
    names.swap(9, 10);
    let stub = regression_stub(7.0);
    let model = ScoringModel::new(
        stub.booster().clone(),
        ModelMeta::for_regression(REGRESSION_FEATURES.len()).with_feature_names(names),
        stub.output_transform(),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("misnamed.json");
    write_model(&model, &path);

    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    let err = RegressionModel::new(&path).predict(&features).unwrap_err();
    match err {
        Error::ModelLoad(ModelLoadError::FeatureName {
            index,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(index, 9);
            assert_eq!(expected, "quantity_tons_boxcox");
            assert_eq!(actual, "thickness_boxcox");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Load policies
// =============================================================================

#[test]
fn shared_policy_keeps_model_after_resource_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price.json");
    write_model(&regression_stub(0.0), &path);

    let model = RegressionModel::from_source(
        ModelSource::new(&path, ModelFormat::Native),
        LoadPolicy::Shared,
    );
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    assert_eq!(model.predict(&features).unwrap().amount(), 1.0);

    std::fs::remove_file(&path).unwrap();
    assert_eq!(model.predict(&features).unwrap().amount(), 1.0);
}

#[test]
fn per_call_policy_rereads_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price.json");
    write_model(&regression_stub(0.0), &path);

    let model = RegressionModel::from_source(
        ModelSource::new(&path, ModelFormat::Auto),
        LoadPolicy::PerCall,
    );
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();
    assert_eq!(model.predict(&features).unwrap().amount(), 1.0);
    assert!(!model.handle().is_loaded());

    // A replaced resource is picked up on the next call.
    write_model(&regression_stub(1.0), &path);
    assert_eq!(model.predict(&features).unwrap().amount(), 2.718);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        model.predict(&features),
        Err(Error::ModelLoad(ModelLoadError::Io { .. }))
    ));
}

#[test]
fn shared_failure_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("price.json");
    let model = RegressionModel::new(&path);
    let features = copper_predict::regression_features(&RegressionInput::default()).unwrap();

    assert!(model.predict(&features).is_err());
    assert!(!model.handle().is_loaded());

    write_model(&regression_stub(0.0), &path);
    assert_eq!(model.predict(&features).unwrap().to_string(), "$ 1");
    assert!(model.handle().is_loaded());
}
