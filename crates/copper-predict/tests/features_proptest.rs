//! Property-based tests for the feature transform.
//!
//! Inputs are drawn from inside every declared bound, so each request must
//! produce a vector of the documented length and layout.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use copper_predict::codes::{APPLICATION, COUNTRY, ITEM_TYPE, STATUS};
use copper_predict::features::power::BoxCox;
use copper_predict::features::{CLASSIFICATION_FEATURES, REGRESSION_FEATURES};
use copper_predict::{
    ClassificationInput, RegressionInput, classification_features, regression_features,
};

// =============================================================================
// Strategies
// =============================================================================

fn date_from(year: i32, month: u32, day: u32, offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.checked_add_days(Days::new(offset)))
        .expect("date in range")
}

/// Item dates span 2020-07-02 ..= 2021-04-01 (273 days).
fn arb_item_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..=273).prop_map(|offset| date_from(2020, 7, 2, offset))
}

/// Delivery dates span 2019-04-01 ..= 2022-01-01 (1006 days).
fn arb_delivery_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..=1006).prop_map(|offset| date_from(2019, 4, 1, offset))
}

/// Log-uniform draw over `[10^lo, 10^hi]`, clamped back into the bound.
fn log_uniform(lo: f64, hi: f64) -> impl Strategy<Value = f64> {
    let (min, max) = (10f64.powf(lo), 10f64.powf(hi));
    (lo..=hi).prop_map(move |e| 10f64.powf(e).clamp(min, max))
}

/// `(quantity_tons, thickness)` anywhere inside their bounds.
fn arb_spread_magnitudes() -> impl Strategy<Value = (f64, f64)> {
    // quantity_tons: [1e-5, 1e9], thickness: [0.18, 2500]
    (log_uniform(-5.0, 9.0), log_uniform(0.18f64.log10(), 2500f64.log10()))
}

/// `thickness = quantity_tons · (1 ± ε)` for tiny ε, both inside their bounds.
fn arb_close_magnitudes() -> impl Strategy<Value = (f64, f64)> {
    (
        log_uniform(0.2f64.log10(), 2400f64.log10()),
        log_uniform(-12.0, -6.0),
        any::<bool>(),
    )
        .prop_map(|(q, eps, above)| {
            let t = if above { q * (1.0 + eps) } else { q * (1.0 - eps) };
            (q, t)
        })
}

/// Distinct `(quantity_tons, thickness)` pairs, with nearly equal pairs mixed in.
fn arb_magnitudes() -> impl Strategy<Value = (f64, f64)> {
    prop_oneof![arb_spread_magnitudes(), arb_close_magnitudes()]
        .prop_filter("magnitudes must differ", |(q, t)| q != t)
}

fn arb_label(labels: Vec<&'static str>) -> impl Strategy<Value = String> {
    prop::sample::select(labels).prop_map(str::to_string)
}

fn arb_regression_input() -> impl Strategy<Value = RegressionInput> {
    (
        arb_item_date(),
        arb_delivery_date(),
        arb_magnitudes(),
        arb_label(STATUS.labels().collect()),
        arb_label(ITEM_TYPE.labels().collect()),
        prop::sample::select(APPLICATION.codes()),
        prop::sample::select(COUNTRY.codes()),
        700.0f64..=1980.0,
    )
        .prop_map(
            |(item_date, delivery_date, (quantity_tons, thickness), status, item_type, application, country, width)| {
                RegressionInput {
                    item_date,
                    delivery_date,
                    quantity_tons,
                    status,
                    item_type,
                    application,
                    country,
                    thickness,
                    width,
                    ..RegressionInput::default()
                }
            },
        )
}

fn arb_classification_input() -> impl Strategy<Value = ClassificationInput> {
    (
        arb_item_date(),
        arb_delivery_date(),
        arb_magnitudes(),
        arb_label(ITEM_TYPE.labels().collect()),
        0.0f64..1e5,
    )
        .prop_map(
            |(item_date, delivery_date, (quantity_tons, thickness), item_type, selling_price)| {
                ClassificationInput {
                    item_date,
                    delivery_date,
                    quantity_tons,
                    thickness,
                    item_type,
                    selling_price,
                    ..ClassificationInput::default()
                }
            },
        )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn regression_vector_is_complete(input in arb_regression_input()) {
        let v = regression_features(&input).unwrap();
        prop_assert_eq!(v.len(), REGRESSION_FEATURES.len());
        prop_assert!(v.as_slice().iter().all(|x| x.is_finite()));

        prop_assert_eq!(v[0], input.quantity_tons);
        prop_assert_eq!(v[2], STATUS.lookup(&input.status).unwrap());
        prop_assert_eq!(v[3], ITEM_TYPE.lookup(&input.item_type).unwrap());
        prop_assert_eq!(v[6], input.thickness);
        let expected_days = (input.item_date - input.delivery_date).num_days() as f64;
        prop_assert_eq!(v[11], expected_days);
    }

    #[test]
    fn regression_vector_is_deterministic(input in arb_regression_input()) {
        let a = regression_features(&input).unwrap();
        let b = regression_features(&input).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn box_cox_preserves_order(input in arb_regression_input()) {
        let v = regression_features(&input).unwrap();
        // A fitted Box-Cox transform is strictly increasing.
        prop_assert_eq!(
            input.quantity_tons > input.thickness,
            v[9] > v[10]
        );
    }

    #[test]
    fn close_magnitudes_fit_near_log((q, t) in arb_close_magnitudes()) {
        let fitted = BoxCox::fit(&[q, t]).unwrap();
        prop_assert!(fitted.lambda().abs() < 1e-6, "lambda = {}", fitted.lambda());
        prop_assert!((fitted.transform(q) - q.ln()).abs() < 1e-9);
        prop_assert!((fitted.transform(t) - t.ln()).abs() < 1e-9);
        prop_assert_eq!(q > t, fitted.transform(q) > fitted.transform(t));
    }

    #[test]
    fn classification_vector_is_complete(input in arb_classification_input()) {
        let v = classification_features(&input).unwrap();
        prop_assert_eq!(v.len(), CLASSIFICATION_FEATURES.len());
        prop_assert!(v.as_slice().iter().all(|x| x.is_finite()));

        prop_assert_eq!(v[8], input.selling_price);
        prop_assert_eq!(v[9], input.selling_price.ln_1p());
        let expected_days = (input.item_date - input.delivery_date).num_days() as f64;
        prop_assert_eq!(v[12], expected_days);
    }

    #[test]
    fn shared_fields_agree_across_tasks(input in arb_classification_input()) {
        let regression = RegressionInput {
            item_date: input.item_date,
            delivery_date: input.delivery_date,
            quantity_tons: input.quantity_tons,
            customer: input.customer,
            status: "Won".to_string(),
            item_type: input.item_type.clone(),
            application: input.application,
            country: input.country,
            thickness: input.thickness,
            width: input.width,
            product_ref: input.product_ref,
        };
        let r = regression_features(&regression).unwrap();
        let c = classification_features(&input).unwrap();

        // Box-Cox pair and calendar tail line up.
        prop_assert_eq!(&r.as_slice()[9..], &c.as_slice()[10..]);
    }
}
