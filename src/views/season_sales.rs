//! Total sales by season.

use crate::coerce::leading_number_or_zero;
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
pub struct SeasonSales {
    pub season: String,
    pub total_sales: f64,
}

pub struct SeasonSalesView;

impl View for SeasonSalesView {
    type Lookups = KeyResolutionMap<String>;
    type Attribute = String;
    type Key = String;
    type Acc = SalesTotal;
    type Output = SeasonSales;

    fn name(&self) -> &'static str {
        "season_Sales-vs-totalAmountSales"
    }

    // Season lives on the weather date dimension, keyed like the weather fact's date.
    fn lookups(&self, cache: &DimensionCache) -> Self::Lookups {
        KeyResolutionMap::build(
            cache.table(DimensionKind::DateWeather),
            columns::DATE_WEATHER_KEY,
            None,
            text_of(columns::SEASON),
        )
    }

    fn weather_attribute(&self, seasons: &Self::Lookups, weather_row: &Record) -> Result<String> {
        Ok(label_or_unknown(
            seasons.resolve_field(weather_row, columns::DATE_WEATHER_KEY),
        ))
    }

    fn group_key(
        &self,
        _: &Self::Lookups,
        season: Option<&String>,
        _sale: &Record,
    ) -> Result<Option<String>> {
        Ok(Some(label_or_unknown(season)))
    }

    fn fold(&self, acc: &mut SalesTotal, sale: &Record) {
        acc.add(leading_number_or_zero(field(sale, columns::TOTAL_PRICE)));
    }

    fn finish(&self, season: String, acc: SalesTotal) -> SeasonSales {
        SeasonSales {
            season,
            total_sales: acc.total,
        }
    }
}
