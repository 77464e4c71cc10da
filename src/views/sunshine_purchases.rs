//! Purchase counts by daily sunshine hours.
//!
//! Sunshine hours are rounded to two decimals once, when the weather row is
//! read; that rounded value is both the group key and the reported value.

use crate::coerce::{hundredths, leading_number_or_zero};
use crate::dimensions::DimensionCache;
use crate::engine::{RowCount, View};
use crate::error::Result;
use crate::schema::columns;
use crate::source::{field, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunshinePurchases {
    pub sunshine_hours: f64,
    pub purchase_count: u64,
}

pub struct SunshinePurchasesView;

impl View for SunshinePurchasesView {
    type Lookups = ();
    /// Sunshine hours in hundredths.
    type Attribute = i64;
    type Key = i64;
    type Acc = RowCount;
    type Output = SunshinePurchases;

    fn name(&self) -> &'static str {
        "sunshineHours_Purchase"
    }

    fn lookups(&self, _cache: &DimensionCache) -> Self::Lookups {}

    fn weather_attribute(&self, _: &(), weather_row: &Record) -> Result<i64> {
        Ok(hundredths(leading_number_or_zero(field(
            weather_row,
            columns::SUNSHINE_HOURS,
        ))))
    }

    // Sales on dates without a weather reading are not counted.
    fn group_key(&self, _: &(), sunshine: Option<&i64>, _sale: &Record) -> Result<Option<i64>> {
        Ok(sunshine.copied())
    }

    fn fold(&self, acc: &mut RowCount, _sale: &Record) {
        acc.increment();
    }

    fn finish(&self, sunshine: i64, acc: RowCount) -> SunshinePurchases {
        SunshinePurchases {
            sunshine_hours: sunshine as f64 / 100.0,
            purchase_count: acc.count,
        }
    }
}
