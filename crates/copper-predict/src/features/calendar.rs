//! Calendar-derived features.

use chrono::{Datelike, NaiveDate};

/// Day, month and year of a date, as model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

impl DateParts {
    /// `[day, month, year]` as floats.
    pub fn to_array(self) -> [f64; 3] {
        [self.day as f64, self.month as f64, self.year as f64]
    }
}

/// Features derived from the item and delivery dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// `item_date - delivery_date` in whole days; negative when delivery is later.
    pub day_difference: i64,
    pub item: DateParts,
    pub delivery: DateParts,
}

impl CalendarFeatures {
    pub fn new(item_date: NaiveDate, delivery_date: NaiveDate) -> Self {
        Self {
            day_difference: item_date.signed_duration_since(delivery_date).num_days(),
            item: item_date.into(),
            delivery: delivery_date.into(),
        }
    }

    /// `[day_difference, item_day, item_month, item_year, delivery_day, delivery_month, delivery_year]`.
    pub fn to_array(self) -> [f64; 7] {
        let [id, im, iy] = self.item.to_array();
        let [dd, dm, dy] = self.delivery.to_array();
        [self.day_difference as f64, id, im, iy, dd, dm, dy]
    }
}
