//! Key-Resolution Maps
//!
//! Surrogate key -> business attribute lookups, rebuilt from the dimension
//! cache on every query. Building never fails: a missing column just yields
//! an empty string, which callers treat as unknown.

use crate::dimensions::{DimensionCache, DimensionTable};
use crate::schema::{columns, DimensionKind};
use crate::source::{field, Record};
use std::collections::HashMap;
use tracing::debug;

/// Opaque surrogate key, compared as its raw string form.
pub type SurrogateKey = String;

/// Surrogate key -> derived value. Later rows overwrite earlier ones for the same key.
#[derive(Debug, Clone, Default)]
pub struct KeyResolutionMap<V> {
    entries: HashMap<SurrogateKey, V>,
}

impl<V> KeyResolutionMap<V> {
    /// Build from `table` in table order. `filter`, when present, decides which
    /// rows are included; `derive` computes the value stored under the row's key.
    pub fn build<D>(
        table: &DimensionTable,
        key_column: &str,
        filter: Option<&dyn Fn(&Record) -> bool>,
        derive: D,
    ) -> Self
    where
        D: Fn(&Record) -> V,
    {
        Self::from_records(table.records(), key_column, filter, derive)
    }

    pub fn from_records<D>(
        records: &[Record],
        key_column: &str,
        filter: Option<&dyn Fn(&Record) -> bool>,
        derive: D,
    ) -> Self
    where
        D: Fn(&Record) -> V,
    {
        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            if filter.map_or(true, |keep| keep(record)) {
                entries.insert(field(record, key_column).to_string(), derive(record));
            }
        }
        Self { entries }
    }

    pub fn resolve(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Resolve the key held in `column` of a fact row.
    pub fn resolve_field(&self, record: &Record, column: &str) -> Option<&V> {
        self.resolve(field(record, column))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// "Year-Month-Day" as written in the dimension row (no padding or validation).
pub fn date_string(record: &Record) -> String {
    format!(
        "{}-{}-{}",
        field(record, columns::YEAR),
        field(record, columns::MONTH),
        field(record, columns::DAY)
    )
}

/// Copy of a text column.
pub fn text_of(column: &'static str) -> impl Fn(&Record) -> String {
    move |record| field(record, column).to_string()
}

/// "Returned" / "Not Returned" from an `Is_Return` flag.
pub fn return_status(record: &Record) -> String {
    if field(record, columns::IS_RETURN).eq_ignore_ascii_case("true") {
        "Returned".to_string()
    } else {
        "Not Returned".to_string()
    }
}

/// The maps every view needs to join both fact tables to dates and countries.
#[derive(Debug, Clone)]
pub struct JoinMaps {
    pub ecom_date: KeyResolutionMap<String>,
    pub weather_date: KeyResolutionMap<String>,
    pub weather_country: KeyResolutionMap<String>,
    pub customer_country: KeyResolutionMap<String>,
}

impl JoinMaps {
    /// Country maps keep only rows whose `Country` equals `country`.
    pub fn build(cache: &DimensionCache, country: &str) -> Self {
        let in_country = |r: &Record| field(r, columns::COUNTRY) == country;

        let maps = Self {
            ecom_date: KeyResolutionMap::build(
                cache.table(DimensionKind::DateEcom),
                columns::DATE_ECOM_KEY,
                None,
                date_string,
            ),
            weather_date: KeyResolutionMap::build(
                cache.table(DimensionKind::DateWeather),
                columns::DATE_WEATHER_KEY,
                None,
                date_string,
            ),
            weather_country: KeyResolutionMap::build(
                cache.table(DimensionKind::Country),
                columns::COUNTRY_WEATHER_KEY,
                Some(&in_country),
                text_of(columns::COUNTRY),
            ),
            customer_country: KeyResolutionMap::build(
                cache.table(DimensionKind::Customer),
                columns::CUSTOMER_KEY,
                Some(&in_country),
                text_of(columns::COUNTRY),
            ),
        };
        debug!(
            "Join maps: {} ecom dates, {} weather dates, {} {} weather locations, {} {} customers",
            maps.ecom_date.len(),
            maps.weather_date.len(),
            maps.weather_country.len(),
            country,
            maps.customer_country.len(),
            country
        );
        maps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_last_row_wins_for_duplicate_keys() {
        let rows = vec![
            rec(&[("surr_key_Weather_info", "5"), ("Weather_Category", "Sunny")]),
            rec(&[("surr_key_Weather_info", "6"), ("Weather_Category", "Cloudy")]),
            rec(&[("surr_key_Weather_info", "5"), ("Weather_Category", "Rainy")]),
        ];
        let map = KeyResolutionMap::from_records(
            &rows,
            columns::WEATHER_INFO_KEY,
            None,
            text_of(columns::WEATHER_CATEGORY),
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("5").map(String::as_str), Some("Rainy"));
        assert_eq!(map.resolve("6").map(String::as_str), Some("Cloudy"));
        assert!(map.resolve("7").is_none());
    }

    #[test]
    fn test_filter_excludes_rows() {
        let rows = vec![
            rec(&[("surr_key_customer", "1"), ("Country", "United Kingdom")]),
            rec(&[("surr_key_customer", "2"), ("Country", "Germany")]),
        ];
        let uk = |r: &Record| field(r, columns::COUNTRY) == "United Kingdom";
        let map = KeyResolutionMap::from_records(
            &rows,
            columns::CUSTOMER_KEY,
            Some(&uk),
            text_of(columns::COUNTRY),
        );
        assert!(map.resolve("1").is_some());
        assert!(map.resolve("2").is_none());
    }

    #[test]
    fn test_missing_columns_do_not_fail() {
        let rows = vec![rec(&[("surr_key_date_weather", "10"), ("Year", "2024")])];
        let map =
            KeyResolutionMap::from_records(&rows, columns::DATE_WEATHER_KEY, None, date_string);
        assert_eq!(map.resolve("10").map(String::as_str), Some("2024--"));

        let seasons = KeyResolutionMap::from_records(
            &rows,
            columns::DATE_WEATHER_KEY,
            None,
            text_of(columns::SEASON),
        );
        assert_eq!(seasons.resolve("10").map(String::as_str), Some(""));
    }

    #[test]
    fn test_date_string_is_unpadded() {
        let row = rec(&[("Year", "2024"), ("Month", "1"), ("Day", "5")]);
        assert_eq!(date_string(&row), "2024-1-5");
    }

    #[test]
    fn test_return_status() {
        assert_eq!(return_status(&rec(&[("Is_Return", "TRUE")])), "Returned");
        assert_eq!(return_status(&rec(&[("Is_Return", "false")])), "Not Returned");
        assert_eq!(return_status(&rec(&[])), "Not Returned");
    }
}
