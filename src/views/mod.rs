//! View Assemblers
//!
//! Each view is a small configuration of the shared join pipeline: which
//! weather-derived attribute is recorded per date, how a sale's group key is
//! formed, and which accumulator is kept per group.

pub mod rain_returns;
pub mod season_sales;
pub mod sunshine_purchases;
pub mod temp_range_orders;
pub mod weather_sales;

pub use rain_returns::{RainIntensityReturns, RainReturnsView};
pub use season_sales::{SeasonSales, SeasonSalesView};
pub use sunshine_purchases::{SunshinePurchases, SunshinePurchasesView};
pub use temp_range_orders::{TempRangeOrders, TempRangeOrdersView};
pub use weather_sales::{WeatherCategorySales, WeatherSalesView};

use crate::engine::{JoinPipeline, View};
use crate::error::Result;
use crate::schema::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// The five dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    WeatherSales,
    TempRangeOrders,
    RainReturns,
    SeasonSales,
    SunshinePurchases,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::WeatherSales,
        ViewKind::TempRangeOrders,
        ViewKind::RainReturns,
        ViewKind::SeasonSales,
        ViewKind::SunshinePurchases,
    ];

    /// HTTP path serving this view.
    pub fn route(self) -> &'static str {
        match self {
            ViewKind::WeatherSales => "/weather-sales",
            ViewKind::TempRangeOrders => "/Temp_range-orders",
            ViewKind::RainReturns => "/rain-Intensity-vs-Returns",
            ViewKind::SeasonSales => "/season_Sales-vs-totalAmountSales",
            ViewKind::SunshinePurchases => "/sunshineHours_Purchase",
        }
    }

    pub fn from_route(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.route() == path)
    }

    /// Message returned to clients when the view fails.
    pub fn failure_message(self) -> String {
        format!("Failed to process {} data", self.route().trim_start_matches('/'))
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route())
    }
}

/// Run a view and return its rows as a JSON array.
pub fn run_view_json(kind: ViewKind, pipeline: &JoinPipeline<'_>) -> Result<serde_json::Value> {
    info!("Starting {}", kind);
    match kind {
        ViewKind::WeatherSales => rows_json(pipeline, &WeatherSalesView),
        ViewKind::TempRangeOrders => rows_json(pipeline, &TempRangeOrdersView),
        ViewKind::RainReturns => rows_json(pipeline, &RainReturnsView),
        ViewKind::SeasonSales => rows_json(pipeline, &SeasonSalesView),
        ViewKind::SunshinePurchases => rows_json(pipeline, &SunshinePurchasesView),
    }
}

fn rows_json<V: View>(pipeline: &JoinPipeline<'_>, view: &V) -> Result<serde_json::Value> {
    let result = pipeline.run(view)?;
    Ok(serde_json::to_value(result.rows)?)
}

/// Resolved label, or "Unknown" when absent or empty.
pub(crate) fn label_or_unknown(value: Option<&String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_round_trip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::from_route(kind.route()), Some(kind));
        }
        assert_eq!(ViewKind::from_route("/weather-sales/extra"), None);
    }

    #[test]
    fn test_failure_message() {
        assert_eq!(
            ViewKind::TempRangeOrders.failure_message(),
            "Failed to process Temp_range-orders data"
        );
    }

    #[test]
    fn test_label_or_unknown() {
        assert_eq!(label_or_unknown(Some(&"Rainy".to_string())), "Rainy");
        assert_eq!(label_or_unknown(Some(&String::new())), "Unknown");
        assert_eq!(label_or_unknown(None), "Unknown");
    }
}
