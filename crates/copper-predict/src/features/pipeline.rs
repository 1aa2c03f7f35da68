//! Raw inputs → model feature vectors.
//!
//! Both entry points validate every bound and label before doing any
//! arithmetic, so a rejected request never reaches a model.

use crate::codes::{APPLICATION, COUNTRY, ITEM_TYPE, STATUS};

use super::bounds::{
    CUSTOMER, DELIVERY_DATE, ITEM_DATE, PRODUCT_REF, QUANTITY_TONS, SELLING_PRICE, THICKNESS,
    WIDTH,
};
use super::calendar::CalendarFeatures;
use super::power::BoxCox;
use super::{ClassificationInput, FeatureError, FeatureVector, RegressionInput};

/// Transformed `(quantity_tons, thickness)`, with λ fitted on just these two values.
fn transformed_magnitudes(quantity_tons: f64, thickness: f64) -> Result<[f64; 2], FeatureError> {
    let fitted = BoxCox::fit(&[quantity_tons, thickness])?;
    Ok([fitted.transform(quantity_tons), fitted.transform(thickness)])
}

/// Build the 18-element regression vector.
///
/// Layout: see [`REGRESSION_FEATURES`](super::REGRESSION_FEATURES).
pub fn regression_features(input: &RegressionInput) -> Result<FeatureVector, FeatureError> {
    let item_date = ITEM_DATE.check(input.item_date)?;
    let delivery_date = DELIVERY_DATE.check(input.delivery_date)?;
    let quantity_tons = QUANTITY_TONS.check(input.quantity_tons)?;
    let customer = CUSTOMER.check(input.customer)?;
    let thickness = THICKNESS.check(input.thickness)?;
    let width = WIDTH.check(input.width)?;
    let product_ref = PRODUCT_REF.check(input.product_ref)?;

    let status = STATUS.lookup(&input.status)?;
    let item_type = ITEM_TYPE.lookup(&input.item_type)?;
    let application = APPLICATION.check(input.application)?;
    let country = COUNTRY.check(input.country)?;

    let [t_quantity, t_thickness] = transformed_magnitudes(quantity_tons, thickness)?;
    let calendar = CalendarFeatures::new(item_date, delivery_date);

    let mut values = Vec::with_capacity(super::REGRESSION_FEATURES.len());
    values.extend_from_slice(&[
        quantity_tons,
        customer,
        status,
        item_type,
        application,
        country,
        thickness,
        width,
        product_ref,
        t_quantity,
        t_thickness,
    ]);
    values.extend_from_slice(&calendar.to_array());

    Ok(FeatureVector::new(values))
}

/// Build the 19-element classification vector.
///
/// Layout: see [`CLASSIFICATION_FEATURES`](super::CLASSIFICATION_FEATURES).
pub fn classification_features(input: &ClassificationInput) -> Result<FeatureVector, FeatureError> {
    let item_date = ITEM_DATE.check(input.item_date)?;
    let delivery_date = DELIVERY_DATE.check(input.delivery_date)?;
    let quantity_tons = QUANTITY_TONS.check(input.quantity_tons)?;
    let customer = CUSTOMER.check(input.customer)?;
    let thickness = THICKNESS.check(input.thickness)?;
    let width = WIDTH.check(input.width)?;
    let product_ref = PRODUCT_REF.check(input.product_ref)?;
    let selling_price = SELLING_PRICE.check(input.selling_price)?;

    let item_type = ITEM_TYPE.lookup(&input.item_type)?;
    let application = APPLICATION.check(input.application)?;
    let country = COUNTRY.check(input.country)?;

    let [t_quantity, t_thickness] = transformed_magnitudes(quantity_tons, thickness)?;
    let calendar = CalendarFeatures::new(item_date, delivery_date);

    let mut values = Vec::with_capacity(super::CLASSIFICATION_FEATURES.len());
    values.extend_from_slice(&[
        quantity_tons,
        customer,
        item_type,
        application,
        country,
        thickness,
        width,
        product_ref,
        selling_price,
        selling_price.ln_1p(),
        t_quantity,
        t_thickness,
    ]);
    values.extend_from_slice(&calendar.to_array());

    Ok(FeatureVector::new(values))
}
