//! Transform-then-predict facade.

use crate::adapter::{
    ClassificationModel, DealOutcome, ModelSource, RegressionModel, SellingPrice,
};
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::features::{
    ClassificationInput, RegressionInput, classification_features, regression_features,
};

/// Both task adapters behind one interface.
///
/// Inputs are validated and transformed before a model is acquired, so a
/// rejected request never touches a model resource.
#[derive(Debug)]
pub struct Predictor {
    regression: RegressionModel,
    classification: ClassificationModel,
}

impl Predictor {
    pub fn new(config: PredictorConfig) -> Self {
        let regression = RegressionModel::from_source(
            ModelSource::new(config.regression_model, config.format),
            config.load_policy,
        );
        let classification = ClassificationModel::from_source(
            ModelSource::new(config.classification_model, config.format),
            config.load_policy,
        );
        Self::from_models(regression, classification)
    }

    pub fn from_models(regression: RegressionModel, classification: ClassificationModel) -> Self {
        Self {
            regression,
            classification,
        }
    }

    pub fn regression(&self) -> &RegressionModel {
        &self.regression
    }

    pub fn classification(&self) -> &ClassificationModel {
        &self.classification
    }

    /// Predict the selling price for a sale.
    pub fn predict_selling_price(&self, input: &RegressionInput) -> Result<SellingPrice> {
        let _span = tracing::info_span!("predict_selling_price").entered();
        let features = regression_features(input)?;
        self.regression.predict(&features)
    }

    /// Predict whether a sale is won or lost.
    pub fn predict_status(&self, input: &ClassificationInput) -> Result<DealOutcome> {
        let _span = tracing::info_span!("predict_status").entered();
        let features = classification_features(input)?;
        self.classification.predict(&features)
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}
