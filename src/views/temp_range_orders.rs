//! Order counts by temperature range and order-value category.

use crate::coerce::leading_number_or_zero;
use crate::dimensions::DimensionCache;
use crate::engine::{RowCount, View};
use crate::error::Result;
use crate::resolution::{text_of, KeyResolutionMap};
use crate::schema::{columns, DimensionKind};
use crate::source::Record;
use crate::views::label_or_unknown;
use serde::{Deserialize, Serialize};

/// Scatter point: `x` is the numeric lower bound of the temperature range,
/// `y` the number of orders, `type` the order-value category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempRangeOrders {
    pub x: f64,
    pub y: u64,
    #[serde(rename = "type")]
    pub order_value_category: String,
}

pub struct TempRangeLookups {
    temp_ranges: KeyResolutionMap<String>,
    order_categories: KeyResolutionMap<String>,
}

pub struct TempRangeOrdersView;

impl View for TempRangeOrdersView {
    type Lookups = TempRangeLookups;
    type Attribute = String;
    type Key = (String, String);
    type Acc = RowCount;
    type Output = TempRangeOrders;

    fn name(&self) -> &'static str {
        "Temp_range-orders"
    }

    fn lookups(&self, cache: &DimensionCache) -> TempRangeLookups {
        TempRangeLookups {
            temp_ranges: KeyResolutionMap::build(
                cache.table(DimensionKind::WeatherInfo),
                columns::WEATHER_INFO_KEY,
                None,
                text_of(columns::TEMP_RANGE),
            ),
            order_categories: KeyResolutionMap::build(
                cache.table(DimensionKind::OrderCategory),
                columns::ORDER_CATEGORY_KEY,
                None,
                text_of(columns::ORDER_VALUE_CATEGORY),
            ),
        }
    }

    fn weather_attribute(
        &self,
        lookups: &TempRangeLookups,
        weather_row: &Record,
    ) -> Result<String> {
        Ok(label_or_unknown(
            lookups.temp_ranges.resolve_field(weather_row, columns::WEATHER_INFO_KEY),
        ))
    }

    fn group_key(
        &self,
        lookups: &TempRangeLookups,
        temp_range: Option<&String>,
        sale: &Record,
    ) -> Result<Option<(String, String)>> {
        let order_category = label_or_unknown(
            lookups
                .order_categories
                .resolve_field(sale, columns::ORDER_CATEGORY_KEY),
        );
        Ok(Some((label_or_unknown(temp_range), order_category)))
    }

    fn fold(&self, acc: &mut RowCount, _sale: &Record) {
        acc.increment();
    }

    fn finish(
        &self,
        (temp_range, order_category): (String, String),
        acc: RowCount,
    ) -> TempRangeOrders {
        TempRangeOrders {
            x: leading_number_or_zero(&temp_range),
            y: acc.count,
            order_value_category: order_category,
        }
    }
}
