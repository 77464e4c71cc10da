//! End-to-end view tests over a temporary data directory.

mod common;

use common::Fixture;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use weather_sales::config::AppConfig;
use weather_sales::engine::{FactSources, JoinPipeline};
use weather_sales::error::AnalyticsError;
use weather_sales::server::AppState;
use weather_sales::source::CsvSource;
use weather_sales::views::{
    RainIntensityReturns, SeasonSales, SunshinePurchases, TempRangeOrders, ViewKind,
    WeatherCategorySales, WeatherSalesView,
};

fn rows<T: DeserializeOwned>(state: &AppState, kind: ViewKind) -> Vec<T> {
    let value = state.run_view(kind).expect("view runs");
    serde_json::from_value(value).expect("rows deserialize")
}

fn weather_sales(category: &str, total_sales: f64) -> WeatherCategorySales {
    WeatherCategorySales {
        category: category.to_string(),
        total_sales,
    }
}

#[test]
fn test_weather_sales_by_category() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    let result: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(
        result,
        vec![
            weather_sales("Rainy", 100.0),
            weather_sales("Sunny", 70.5),
            weather_sales("Unknown", 40.0),
        ]
    );
}

#[test]
fn test_temp_range_orders() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    let result: Vec<TempRangeOrders> = rows(&state, ViewKind::TempRangeOrders);
    let points: Vec<(f64, u64, &str)> = result
        .iter()
        .map(|p| (p.x, p.y, p.order_value_category.as_str()))
        .collect();
    assert_eq!(
        points,
        vec![
            (10.0, 1, "High"),
            (20.0, 1, "Low"),
            (10.0, 1, "Low"),
            (0.0, 1, "High"),
            (20.0, 1, "High"),
        ]
    );

    let json = state.run_view(ViewKind::TempRangeOrders).unwrap();
    assert_eq!(json[0]["type"], "High");
    assert_eq!(json[0]["y"], 1);
}

#[test]
fn test_rain_intensity_vs_returns() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    let result: Vec<RainIntensityReturns> = rows(&state, ViewKind::RainReturns);
    let summary: Vec<(&str, &str, u64, f64, f64)> = result
        .iter()
        .map(|r| {
            (
                r.rain_intensity.as_str(),
                r.return_status.as_str(),
                r.transactions,
                r.quantities,
                r.revenue,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Heavy", "Not Returned", 1, 2.0, 100.0),
            ("None", "Returned", 1, 1.0, 50.5),
            // TotalPrice "N/A" adds nothing to revenue but the sale still counts.
            ("Heavy", "Returned", 1, 3.0, 0.0),
            ("Unknown", "Not Returned", 1, 1.0, 40.0),
            ("None", "Not Returned", 1, 4.0, 20.0),
        ]
    );

    let json = state.run_view(ViewKind::RainReturns).unwrap();
    assert!(json[0].get("rainIntensity").is_some());
    assert!(json[0].get("returnStatus").is_some());
}

#[test]
fn test_season_sales() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    let result: Vec<SeasonSales> = rows(&state, ViewKind::SeasonSales);
    assert_eq!(
        result,
        vec![
            SeasonSales {
                season: "Winter".to_string(),
                total_sales: 170.5
            },
            SeasonSales {
                season: "Unknown".to_string(),
                total_sales: 40.0
            },
        ]
    );
}

#[test]
fn test_sunshine_hours_purchases() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    let result: Vec<SunshinePurchases> = rows(&state, ViewKind::SunshinePurchases);
    assert_eq!(
        result,
        vec![
            SunshinePurchases {
                sunshine_hours: 2.35,
                purchase_count: 2
            },
            SunshinePurchases {
                sunshine_hours: 7.5,
                purchase_count: 2
            },
        ]
    );
}

#[test]
fn test_sunshine_groups_on_rounded_value() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_weather.csv",
        "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info,Sunshine_Hours\n\
         10,1,5,4.001\n\
         11,1,5,3.999\n",
    );
    let state = fixture.state();

    let result: Vec<SunshinePurchases> = rows(&state, ViewKind::SunshinePurchases);
    assert_eq!(
        result,
        vec![SunshinePurchases {
            sunshine_hours: 4.0,
            purchase_count: 4
        }]
    );
}

#[test]
fn test_sunshine_rounds_stored_value() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_weather.csv",
        "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info,Sunshine_Hours\n\
         10,1,5,0.015\n\
         11,1,5,8.345\n",
    );
    let state = fixture.state();

    let result: Vec<SunshinePurchases> = rows(&state, ViewKind::SunshinePurchases);
    assert_eq!(
        result,
        vec![
            SunshinePurchases {
                sunshine_hours: 0.01,
                purchase_count: 2
            },
            SunshinePurchases {
                sunshine_hours: 8.35,
                purchase_count: 2
            },
        ]
    );
}

#[test]
fn test_unresolved_order_and_partly_numeric_price() {
    let fixture = Fixture::standard();
    let mut sales = common::FACT_SALES.to_string();
    sales.push_str("1,7,99,12abc,1\n");
    fixture.write("fact_sales.csv", &sales);
    let state = fixture.state();

    // Whole-field coercion: "12abc" adds nothing, the sale still lands in its group.
    let weather: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(
        weather,
        vec![
            weather_sales("Rainy", 100.0),
            weather_sales("Sunny", 70.5),
            weather_sales("Unknown", 40.0),
        ]
    );

    // Leading-prefix coercion: "12abc" counts as 12.
    let seasons: Vec<SeasonSales> = rows(&state, ViewKind::SeasonSales);
    assert_eq!(
        seasons,
        vec![
            SeasonSales {
                season: "Winter".to_string(),
                total_sales: 182.5
            },
            SeasonSales {
                season: "Unknown".to_string(),
                total_sales: 40.0
            },
        ]
    );

    // An order category that does not resolve is "Not Returned".
    let rain: Vec<RainIntensityReturns> = rows(&state, ViewKind::RainReturns);
    let heavy_kept = rain
        .iter()
        .find(|r| r.rain_intensity == "Heavy" && r.return_status == "Not Returned")
        .expect("heavy / not returned group");
    assert_eq!(
        (heavy_kept.transactions, heavy_kept.quantities, heavy_kept.revenue),
        (2, 3.0, 100.0)
    );
    assert_eq!(rain.len(), 5);

    // ...and an "Unknown" order value category.
    let temps: Vec<TempRangeOrders> = rows(&state, ViewKind::TempRangeOrders);
    let last = temps.last().expect("temp range rows");
    assert_eq!((last.x, last.y, last.order_value_category.as_str()), (10.0, 1, "Unknown"));
    assert_eq!(temps.len(), 6);
}

#[test]
fn test_header_only_fact_files() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_sales.csv",
        "surr_key_date_of_ecom,surr_key_customer,surr_key_order_cat,TotalPrice,Quantity\n",
    );
    let state = fixture.state();
    for kind in ViewKind::ALL {
        assert_eq!(state.run_view(kind).unwrap(), serde_json::json!([]), "{}", kind);
    }

    fixture.write("fact_sales.csv", common::FACT_SALES);
    fixture.write(
        "fact_weather.csv",
        "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info,Sunshine_Hours\n",
    );
    let state = fixture.state();

    // Without weather every sale falls back to "Unknown"; sunshine counts nothing.
    let weather: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(weather, vec![weather_sales("Unknown", 210.5)]);
    let seasons: Vec<SeasonSales> = rows(&state, ViewKind::SeasonSales);
    assert_eq!(
        seasons,
        vec![SeasonSales {
            season: "Unknown".to_string(),
            total_sales: 210.5
        }]
    );
    let sunshine = state.run_view(ViewKind::SunshinePurchases).unwrap();
    assert_eq!(sunshine, serde_json::json!([]));
}

#[test]
fn test_single_row_scenario() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_weather.csv",
        "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info\n10,1,5\n",
    );
    fixture.write(
        "fact_sales.csv",
        "surr_key_date_of_ecom,surr_key_customer,TotalPrice\n1,7,100\n",
    );
    let state = fixture.state();

    let json = state.run_view(ViewKind::WeatherSales).unwrap();
    assert_eq!(json, serde_json::json!([{ "category": "Rainy", "totalSales": 100.0 }]));
}

#[test]
fn test_no_uk_sales_yields_empty_views() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_sales.csv",
        "surr_key_date_of_ecom,surr_key_customer,surr_key_order_cat,TotalPrice,Quantity\n\
         1,8,1,100,2\n\
         2,8,2,50,1\n\
         2,404,1,75,1\n",
    );
    let state = fixture.state();

    for kind in ViewKind::ALL {
        let json = state.run_view(kind).unwrap();
        assert_eq!(json, serde_json::json!([]), "{} should be empty", kind);
    }
}

#[test]
fn test_other_countries_contribute_nothing() {
    let fixture = Fixture::standard();
    let baseline: Vec<WeatherCategorySales> = rows(&fixture.state(), ViewKind::WeatherSales);

    // More French sales on the same dates change nothing.
    let mut sales = common::FACT_SALES.to_string();
    sales.push_str("1,8,1,5000,50\n2,8,2,7000,70\n");
    fixture.write("fact_sales.csv", &sales);

    let with_french: Vec<WeatherCategorySales> = rows(&fixture.state(), ViewKind::WeatherSales);
    assert_eq!(baseline, with_french);
}

#[test]
fn test_totals_do_not_depend_on_row_order() {
    let fixture = Fixture::standard();
    let forward: Vec<RainIntensityReturns> = rows(&fixture.state(), ViewKind::RainReturns);

    let mut lines: Vec<&str> = common::FACT_SALES.lines().collect();
    let header = lines.remove(0);
    lines.reverse();
    fixture.write("fact_sales.csv", &format!("{}\n{}\n", header, lines.join("\n")));
    let reversed: Vec<RainIntensityReturns> = rows(&fixture.state(), ViewKind::RainReturns);

    let by_key = |rows: &[RainIntensityReturns]| -> HashMap<(String, String), (u64, f64, f64)> {
        rows.iter()
            .map(|r| {
                (
                    (r.rain_intensity.clone(), r.return_status.clone()),
                    (r.transactions, r.quantities, r.revenue),
                )
            })
            .collect()
    };
    assert_eq!(by_key(forward.as_slice()), by_key(reversed.as_slice()));
}

#[test]
fn test_views_are_idempotent() {
    let fixture = Fixture::standard();
    let state = fixture.state();

    for kind in ViewKind::ALL {
        let first = state.run_view(kind).unwrap();
        let second = state.run_view(kind).unwrap();
        assert_eq!(first, second, "{} changed between runs", kind);
    }
}

#[test]
fn test_duplicate_dimension_keys_last_row_wins() {
    let fixture = Fixture::standard();
    fixture.write(
        "dim_weather.csv",
        "surr_key_Weather_info,Weather_Category,temp_range,Rain_Intensity\n\
         5,Rainy,10-15,Heavy\n\
         6,Sunny,20-25,None\n\
         5,Stormy,5-10,Violent\n",
    );
    let state = fixture.state();

    let result: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(result[0], weather_sales("Stormy", 100.0));
    assert!(result.iter().all(|r| r.category != "Rainy"));
}

#[test]
fn test_later_weather_row_wins_for_same_date() {
    let fixture = Fixture::standard();
    fixture.write(
        "fact_weather.csv",
        "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info,Sunshine_Hours\n\
         10,1,5,1\n\
         10,1,6,2\n",
    );
    let state = fixture.state();

    let result: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(result[0], weather_sales("Sunny", 100.0));
}

#[test]
fn test_malformed_sales_row_is_skipped() {
    let fixture = Fixture::standard();
    let mut bytes =
        b"surr_key_date_of_ecom,surr_key_customer,surr_key_order_cat,TotalPrice,Quantity\n"
            .to_vec();
    bytes.extend_from_slice(b"1,7,1,100,2\n");
    bytes.extend_from_slice(&[b'1', b',', b'7', b',', b'1', b',', 0xff, 0xfe, b',', b'1', b'\n']);
    bytes.extend_from_slice(b"1,9,1,30,1\n");
    fixture.write_bytes("fact_sales.csv", &bytes);
    let state = fixture.state();

    let result: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(result, vec![weather_sales("Rainy", 130.0)]);
}

#[test]
fn test_missing_fact_file_fails_view_only() {
    let fixture = Fixture::standard();
    let state = fixture.state();
    fixture.remove("fact_sales.csv");

    let result = state.run_view(ViewKind::WeatherSales);
    assert!(matches!(result, Err(AnalyticsError::Stream { .. })));

    // The cache is unaffected; restoring the file restores the view.
    fixture.write("fact_sales.csv", common::FACT_SALES);
    assert!(state.run_view(ViewKind::WeatherSales).is_ok());
}

#[test]
fn test_missing_dimension_file_fails_startup() {
    let fixture = Fixture::standard();
    fixture.remove("Dim_Order_Cat.csv");

    match AppState::load(fixture.config()) {
        Err(AnalyticsError::DimensionLoad { table, .. }) => assert_eq!(table, "Dim_Order_Cat.csv"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should fail without Dim_Order_Cat.csv"),
    }
}

#[test]
fn test_filter_country_is_configurable() {
    let fixture = Fixture::standard();
    let config = AppConfig {
        filter_country: "France".to_string(),
        ..fixture.config()
    };
    let state = AppState::load(config).unwrap();

    // The French weather row (date 10) is Sunny; the French sale on that date is 999.
    let result: Vec<WeatherCategorySales> = rows(&state, ViewKind::WeatherSales);
    assert_eq!(result, vec![weather_sales("Sunny", 999.0)]);
}

#[test]
fn test_pipeline_over_in_memory_sources() {
    let fixture = Fixture::standard();
    let state = fixture.state();
    let weather = CsvSource::from_text("fact_weather", common::FACT_WEATHER);
    let sales = CsvSource::from_text("fact_sales", common::FACT_SALES);
    let pipeline = JoinPipeline::new(
        state.cache(),
        FactSources {
            weather: &weather,
            sales: &sales,
        },
        "United Kingdom",
    );

    let result = pipeline.run(&WeatherSalesView).unwrap();
    assert_eq!(result.rows.len(), 3);
    assert_eq!(result.weather.rows_accepted, 2);
    assert_eq!(result.weather.rows_excluded, 1);
    assert_eq!(result.sales.rows_accepted, 5);
    assert_eq!(result.sales.rows_excluded, 1);
    assert_eq!(result.sales.rows_faulted, 0);
}
