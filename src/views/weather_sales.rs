//! Total sales by weather category.

use crate::coerce::number_or_zero;
use crate::dimensions::DimensionCache;
use crate::engine::{SalesTotal, View};
use crate::error::Result;
use crate::resolution::{text_of, KeyResolutionMap};
use crate::schema::{columns, DimensionKind};
use crate::source::{field, Record};
use crate::views::label_or_unknown;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCategorySales {
    pub category: String,
    pub total_sales: f64,
}

pub struct WeatherSalesView;

impl View for WeatherSalesView {
    type Lookups = KeyResolutionMap<String>;
    type Attribute = String;
    type Key = String;
    type Acc = SalesTotal;
    type Output = WeatherCategorySales;

    fn name(&self) -> &'static str {
        "weather-sales"
    }

    fn lookups(&self, cache: &DimensionCache) -> Self::Lookups {
        KeyResolutionMap::build(
            cache.table(DimensionKind::WeatherInfo),
            columns::WEATHER_INFO_KEY,
            None,
            text_of(columns::WEATHER_CATEGORY),
        )
    }

    fn weather_attribute(
        &self,
        categories: &Self::Lookups,
        weather_row: &Record,
    ) -> Result<String> {
        Ok(label_or_unknown(
            categories.resolve_field(weather_row, columns::WEATHER_INFO_KEY),
        ))
    }

    fn group_key(
        &self,
        _: &Self::Lookups,
        category: Option<&String>,
        _sale: &Record,
    ) -> Result<Option<String>> {
        Ok(Some(label_or_unknown(category)))
    }

    fn fold(&self, acc: &mut SalesTotal, sale: &Record) {
        acc.add(number_or_zero(field(sale, columns::TOTAL_PRICE)));
    }

    fn finish(&self, category: String, acc: SalesTotal) -> WeatherCategorySales {
        WeatherCategorySales {
            category,
            total_sales: acc.total,
        }
    }
}
