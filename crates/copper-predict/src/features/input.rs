//! Raw, host-supplied inputs for each task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw fields for a selling-price prediction.
///
/// Dates deserialize from ISO-8601 (`"2020-07-02"`). Categorical fields carry
/// the label shown to the user (`status`, `item_type`) or the raw code
/// (`application`, `country`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionInput {
    pub item_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub quantity_tons: f64,
    pub customer: f64,
    pub status: String,
    pub item_type: String,
    pub application: f64,
    pub country: f64,
    pub thickness: f64,
    pub width: f64,
    pub product_ref: f64,
}

/// Raw fields for a deal-outcome prediction.
///
/// Same shape as [`RegressionInput`] without `status`, plus the selling price
/// (an input here rather than the target).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub item_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub quantity_tons: f64,
    pub customer: f64,
    pub item_type: String,
    pub application: f64,
    pub country: f64,
    pub thickness: f64,
    pub width: f64,
    pub product_ref: f64,
    pub selling_price: f64,
}

fn form_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Default for RegressionInput {
    /// The form's prefill values. They carry no meaning beyond convenience.
    fn default() -> Self {
        Self {
            item_date: form_date(2020, 7, 2),
            delivery_date: form_date(2019, 4, 1),
            quantity_tons: 5874.904,
            customer: 30512207.0,
            status: "Won".to_string(),
            item_type: "W".to_string(),
            application: 10.0,
            country: 28.0,
            thickness: 2.56482,
            width: 1297.0455,
            product_ref: 473967910.72,
        }
    }
}

impl Default for ClassificationInput {
    /// The form's prefill values. They carry no meaning beyond convenience.
    fn default() -> Self {
        Self {
            item_date: form_date(2020, 7, 2),
            delivery_date: form_date(2019, 4, 1),
            quantity_tons: 5874.904,
            customer: 30512207.0,
            item_type: "W".to_string(),
            application: 10.0,
            country: 28.0,
            thickness: 2.56482,
            width: 1297.0455,
            product_ref: 473967910.72,
            selling_price: 1918.06,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_input_from_json() {
        let json = r#"{
            "item_date": "2020-07-02",
            "delivery_date": "2019-04-01",
            "quantity_tons": 5874.904,
            "customer": 30512207.0,
            "status": "To be approved",
            "item_type": "SLAWR",
            "application": 41,
            "country": 113,
            "thickness": 2.56482,
            "width": 1297.0455,
            "product_ref": 473967910.72
        }"#;
        let input: RegressionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.status, "To be approved");
        assert_eq!(input.application, 41.0);
        assert_eq!(input.item_date, form_date(2020, 7, 2));
    }

    #[test]
    fn classification_input_requires_selling_price() {
        let json = r#"{
            "item_date": "2020-07-02",
            "delivery_date": "2019-04-01",
            "quantity_tons": 1.0,
            "customer": 30512207.0,
            "item_type": "W",
            "application": 10,
            "country": 28,
            "thickness": 2.0,
            "width": 1000.0,
            "product_ref": 611728
        }"#;
        let err = serde_json::from_str::<ClassificationInput>(json).unwrap_err();
        assert!(err.to_string().contains("selling_price"));
    }

    #[test]
    fn defaults_match_form_prefill() {
        let input = ClassificationInput::default();
        assert_eq!(input.selling_price, 1918.06);
        assert_eq!(input.delivery_date, form_date(2019, 4, 1));
        assert_eq!(RegressionInput::default().status, "Won");
    }
}
