//! Star schema layout: table identities and the column names the views read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names as they appear in the CSV headers.
pub mod columns {
    pub const DATE_ECOM_KEY: &str = "surr_key_date_of_ecom";
    pub const DATE_WEATHER_KEY: &str = "surr_key_date_weather";
    pub const WEATHER_INFO_KEY: &str = "surr_key_Weather_info";
    pub const COUNTRY_WEATHER_KEY: &str = "surr_key_country_weather";
    pub const CUSTOMER_KEY: &str = "surr_key_customer";
    pub const ORDER_CATEGORY_KEY: &str = "surr_key_order_cat";

    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const DAY: &str = "Day";
    pub const COUNTRY: &str = "Country";

    pub const WEATHER_CATEGORY: &str = "Weather_Category";
    pub const TEMP_RANGE: &str = "temp_range";
    pub const RAIN_INTENSITY: &str = "Rain_Intensity";
    pub const SEASON: &str = "Season";
    pub const ORDER_VALUE_CATEGORY: &str = "Order_Value_Category";
    pub const IS_RETURN: &str = "Is_Return";

    pub const TOTAL_PRICE: &str = "TotalPrice";
    pub const QUANTITY: &str = "Quantity";
    pub const SUNSHINE_HOURS: &str = "Sunshine_Hours";
}

/// Sentinel used when a derived attribute cannot be resolved.
pub const UNKNOWN: &str = "Unknown";

/// The six dimension tables held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    DateEcom,
    DateWeather,
    Country,
    Customer,
    WeatherInfo,
    OrderCategory,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 6] = [
        DimensionKind::DateEcom,
        DimensionKind::DateWeather,
        DimensionKind::Country,
        DimensionKind::Customer,
        DimensionKind::WeatherInfo,
        DimensionKind::OrderCategory,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DimensionKind::DateEcom => "dim_date_ecom.csv",
            DimensionKind::DateWeather => "dim_date_weather.csv",
            DimensionKind::Country => "dim_country.csv",
            DimensionKind::Customer => "Dim_Customer.csv",
            DimensionKind::WeatherInfo => "dim_weather.csv",
            DimensionKind::OrderCategory => "Dim_Order_Cat.csv",
        }
    }

    /// Surrogate key column that identifies rows of this table.
    pub fn key_column(self) -> &'static str {
        match self {
            DimensionKind::DateEcom => columns::DATE_ECOM_KEY,
            DimensionKind::DateWeather => columns::DATE_WEATHER_KEY,
            DimensionKind::Country => columns::COUNTRY_WEATHER_KEY,
            DimensionKind::Customer => columns::CUSTOMER_KEY,
            DimensionKind::WeatherInfo => columns::WEATHER_INFO_KEY,
            DimensionKind::OrderCategory => columns::ORDER_CATEGORY_KEY,
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Fact tables streamed per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Weather,
    Sales,
}

impl FactKind {
    pub fn file_name(self) -> &'static str {
        match self {
            FactKind::Weather => "fact_weather.csv",
            FactKind::Sales => "fact_sales.csv",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
