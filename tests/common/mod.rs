//! Shared fixtures: a temporary data directory holding a small star schema.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weather_sales::config::AppConfig;
use weather_sales::server::AppState;

pub const DIM_DATE_ECOM: &str = "surr_key_date_of_ecom,Year,Month,Day
1,2024,01,05
2,2024,01,06
3,2024,01,07
";

pub const DIM_DATE_WEATHER: &str = "surr_key_date_weather,Year,Month,Day,Season
10,2024,01,05,Winter
11,2024,01,06,Winter
12,2024,07,01,Summer
";

pub const DIM_COUNTRY: &str = "surr_key_country_weather,Country
1,United Kingdom
2,France
";

pub const DIM_CUSTOMER: &str = "surr_key_customer,Country
7,United Kingdom
8,France
9,United Kingdom
";

pub const DIM_WEATHER: &str = "surr_key_Weather_info,Weather_Category,temp_range,Rain_Intensity
5,Rainy,10-15,Heavy
6,Sunny,20-25,None
";

pub const DIM_ORDER_CAT: &str = "surr_key_order_cat,Order_Value_Category,Is_Return
1,High,False
2,Low,TRUE
";

pub const FACT_WEATHER: &str = "surr_key_date_weather,surr_key_country_weather,surr_key_Weather_info,Sunshine_Hours
10,1,5,2.346
10,2,6,9.0
11,1,6,7.5
";

pub const FACT_SALES: &str = "surr_key_date_of_ecom,surr_key_customer,surr_key_order_cat,TotalPrice,Quantity
1,7,1,100,2
1,8,1,999,9
2,9,2,50.5,1
1,9,2,N/A,3
3,7,1,40,1
2,7,1,20,4
";

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// The standard schema used across the integration tests.
    pub fn standard() -> Self {
        let fixture = Self::empty();
        fixture.write("dim_date_ecom.csv", DIM_DATE_ECOM);
        fixture.write("dim_date_weather.csv", DIM_DATE_WEATHER);
        fixture.write("dim_country.csv", DIM_COUNTRY);
        fixture.write("Dim_Customer.csv", DIM_CUSTOMER);
        fixture.write("dim_weather.csv", DIM_WEATHER);
        fixture.write("Dim_Order_Cat.csv", DIM_ORDER_CAT);
        fixture.write("fact_weather.csv", FACT_WEATHER);
        fixture.write("fact_sales.csv", FACT_SALES);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("write fixture file");
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) {
        fs::write(self.dir.path().join(name), contents).expect("write fixture file");
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).expect("remove fixture file");
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            data_dir: self.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    pub fn state(&self) -> AppState {
        AppState::load(self.config()).expect("dimension tables load")
    }
}
