//! Transactions, quantities and revenue by rain intensity and return status.

use crate::coerce::number_or_zero;
use crate::dimensions::DimensionCache;
use crate::engine::{TransactionTotals, View};
use crate::error::Result;
use crate::resolution::{return_status, text_of, KeyResolutionMap};
use crate::schema::{columns, DimensionKind};
use crate::source::{field, Record};
use crate::views::label_or_unknown;
use serde::{Deserialize, Serialize};

const NOT_RETURNED: &str = "Not Returned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RainIntensityReturns {
    pub rain_intensity: String,
    pub return_status: String,
    pub transactions: u64,
    pub quantities: f64,
    pub revenue: f64,
}

pub struct RainReturnsLookups {
    rain_intensity: KeyResolutionMap<String>,
    return_status: KeyResolutionMap<String>,
}

pub struct RainReturnsView;

impl View for RainReturnsView {
    type Lookups = RainReturnsLookups;
    type Attribute = String;
    type Key = (String, String);
    type Acc = TransactionTotals;
    type Output = RainIntensityReturns;

    fn name(&self) -> &'static str {
        "rain-Intensity-vs-Returns"
    }

    fn lookups(&self, cache: &DimensionCache) -> RainReturnsLookups {
        RainReturnsLookups {
            rain_intensity: KeyResolutionMap::build(
                cache.table(DimensionKind::WeatherInfo),
                columns::WEATHER_INFO_KEY,
                None,
                text_of(columns::RAIN_INTENSITY),
            ),
            return_status: KeyResolutionMap::build(
                cache.table(DimensionKind::OrderCategory),
                columns::ORDER_CATEGORY_KEY,
                None,
                return_status,
            ),
        }
    }

    fn weather_attribute(
        &self,
        lookups: &RainReturnsLookups,
        weather_row: &Record,
    ) -> Result<String> {
        Ok(label_or_unknown(
            lookups.rain_intensity.resolve_field(weather_row, columns::WEATHER_INFO_KEY),
        ))
    }

    fn group_key(
        &self,
        lookups: &RainReturnsLookups,
        rain: Option<&String>,
        sale: &Record,
    ) -> Result<Option<(String, String)>> {
        let status = lookups
            .return_status
            .resolve_field(sale, columns::ORDER_CATEGORY_KEY)
            .cloned()
            .unwrap_or_else(|| NOT_RETURNED.to_string());
        Ok(Some((label_or_unknown(rain), status)))
    }

    fn fold(&self, acc: &mut TransactionTotals, sale: &Record) {
        acc.record(
            number_or_zero(field(sale, columns::QUANTITY)),
            number_or_zero(field(sale, columns::TOTAL_PRICE)),
        );
    }

    fn finish(
        &self,
        (rain_intensity, return_status): (String, String),
        acc: TransactionTotals,
    ) -> RainIntensityReturns {
        RainIntensityReturns {
            rain_intensity,
            return_status,
            transactions: acc.transactions,
            quantities: acc.quantities,
            revenue: acc.revenue,
        }
    }
}
