//! Declared bounds for numeric and date fields.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// A field value outside its declared bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} = {value} is outside {expected}")]
pub struct InvalidRangeError {
    /// Field name.
    pub field: &'static str,
    /// The offending value, formatted.
    pub value: String,
    /// The declared bound, formatted as an interval.
    pub expected: String,
}

/// Inclusive bound on a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBound {
    /// Field name.
    pub field: &'static str,
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
}

impl FieldBound {
    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    /// Returns true if `value` lies in `[min, max]`. NaN is never in range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Return `value` unchanged if it is in range.
    pub fn check(&self, value: f64) -> Result<f64, InvalidRangeError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(InvalidRangeError {
                field: self.field,
                value: value.to_string(),
                expected: self.to_string(),
            })
        }
    }
}

impl fmt::Display for FieldBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Inclusive bound on a date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound {
    /// Field name.
    pub field: &'static str,
    /// Earliest accepted date.
    pub min: NaiveDate,
    /// Latest accepted date.
    pub max: NaiveDate,
}

impl DateBound {
    /// Returns true if `date` lies in `[min, max]`.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min && date <= self.max
    }

    /// Return `date` unchanged if it is in range.
    pub fn check(&self, date: NaiveDate) -> Result<NaiveDate, InvalidRangeError> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(InvalidRangeError {
                field: self.field,
                value: date.to_string(),
                expected: self.to_string(),
            })
        }
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid bound date"),
    }
}

pub const QUANTITY_TONS: FieldBound = FieldBound::new("quantity_tons", 1e-5, 1e9);
pub const CUSTOMER: FieldBound = FieldBound::new("customer", 12458.0, 2147483647.0);
pub const THICKNESS: FieldBound = FieldBound::new("thickness", 0.18, 2500.0);
pub const WIDTH: FieldBound = FieldBound::new("width", 700.0, 1980.0);
pub const PRODUCT_REF: FieldBound = FieldBound::new("product_ref", 611728.0, 1722207590.0);
/// The entry form only caps selling price. The lower bound of 0 keeps the
/// `ln_1p(selling_price)` feature finite.
pub const SELLING_PRICE: FieldBound = FieldBound::new("selling_price", 0.0, 100001015.0);

pub const ITEM_DATE: DateBound = DateBound {
    field: "item_date",
    min: date(2020, 7, 2),
    max: date(2021, 4, 1),
};

pub const DELIVERY_DATE: DateBound = DateBound {
    field: "delivery_date",
    min: date(2019, 4, 1),
    max: date(2022, 1, 1),
};
