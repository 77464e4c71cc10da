//! Two-phase join pipeline
//!
//! Phase 1 streams the weather facts and records, per calendar date, the
//! weather-derived attribute a view asks for. Phase 2 streams the sales facts,
//! joins each row to that attribute through its resolved date, and folds it
//! into the view's grouping accumulator. Both phases keep only rows whose
//! resolved country equals the filter country.

use crate::dimensions::DimensionCache;
use crate::engine::aggregate::GroupedAccumulator;
use crate::engine::stream::{FactStream, RowOutcome, StreamReport};
use crate::error::Result;
use crate::resolution::{JoinMaps, KeyResolutionMap};
use crate::schema::columns;
use crate::source::{Record, RecordSource};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;
use tracing::info;

/// One analytical view expressed over the shared pipeline.
pub trait View {
    /// Per-query lookups the view needs beyond the date/country join maps.
    type Lookups;
    /// Weather-derived value recorded per calendar date.
    type Attribute;
    /// Grouping key (single value or composite).
    type Key: Eq + Hash + Clone;
    /// Accumulator kept per group.
    type Acc: Default;
    /// Finalized output record.
    type Output: Serialize;

    fn name(&self) -> &'static str;

    fn lookups(&self, cache: &DimensionCache) -> Self::Lookups;

    /// Attribute for a weather row that passed the date and country checks.
    fn weather_attribute(
        &self,
        lookups: &Self::Lookups,
        weather_row: &Record,
    ) -> Result<Self::Attribute>;

    /// Group key for a sale that passed the date and country checks.
    /// `None` leaves the sale out of the result.
    fn group_key(
        &self,
        lookups: &Self::Lookups,
        attribute: Option<&Self::Attribute>,
        sale: &Record,
    ) -> Result<Option<Self::Key>>;

    fn fold(&self, acc: &mut Self::Acc, sale: &Record);

    fn finish(&self, key: Self::Key, acc: Self::Acc) -> Self::Output;
}

/// The two fact tables streamed per query.
#[derive(Clone, Copy)]
pub struct FactSources<'a> {
    pub weather: &'a dyn RecordSource,
    pub sales: &'a dyn RecordSource,
}

/// Output records plus the stream reports of both phases.
#[derive(Debug, Clone, Serialize)]
pub struct ViewResult<T> {
    pub rows: Vec<T>,
    pub weather: StreamReport,
    pub sales: StreamReport,
}

pub struct JoinPipeline<'a> {
    cache: &'a DimensionCache,
    facts: FactSources<'a>,
    country: &'a str,
}

impl<'a> JoinPipeline<'a> {
    pub fn new(cache: &'a DimensionCache, facts: FactSources<'a>, country: &'a str) -> Self {
        Self { cache, facts, country }
    }

    /// Run `view` end to end. All lookup and grouping state is local to this call.
    pub fn run<V: View>(&self, view: &V) -> Result<ViewResult<V::Output>> {
        let started = Instant::now();
        let maps = JoinMaps::build(self.cache, self.country);
        let lookups = view.lookups(self.cache);

        let mut by_date: HashMap<String, V::Attribute> = HashMap::new();
        let weather = FactStream::new(self.facts.weather).run(|row| {
            let date = match self.resolve_in_country(
                row,
                (&maps.weather_date, columns::DATE_WEATHER_KEY),
                (&maps.weather_country, columns::COUNTRY_WEATHER_KEY),
            ) {
                Some(date) => date,
                None => return Ok(RowOutcome::Excluded),
            };
            let attribute = view.weather_attribute(&lookups, row)?;
            by_date.insert(date.clone(), attribute);
            Ok(RowOutcome::Accepted)
        })?;

        let mut groups: GroupedAccumulator<V::Key, V::Acc> = GroupedAccumulator::new();
        let sales = FactStream::new(self.facts.sales).run(|sale| {
            let date = match self.resolve_in_country(
                sale,
                (&maps.ecom_date, columns::DATE_ECOM_KEY),
                (&maps.customer_country, columns::CUSTOMER_KEY),
            ) {
                Some(date) => date,
                None => return Ok(RowOutcome::Excluded),
            };
            match view.group_key(&lookups, by_date.get(date), sale)? {
                Some(key) => {
                    view.fold(groups.bucket(key), sale);
                    Ok(RowOutcome::Accepted)
                }
                None => Ok(RowOutcome::Excluded),
            }
        })?;

        let rows: Vec<V::Output> = groups
            .into_buckets()
            .into_iter()
            .map(|(key, acc)| view.finish(key, acc))
            .collect();

        info!(
            "{}: {} groups from {} weather dates in {}ms",
            view.name(),
            rows.len(),
            by_date.len(),
            started.elapsed().as_millis()
        );
        Ok(ViewResult { rows, weather, sales })
    }

    /// Resolved date of `row`, provided its country key resolves to the filter country.
    fn resolve_in_country<'m>(
        &self,
        row: &Record,
        (dates, date_column): (&'m KeyResolutionMap<String>, &str),
        (countries, country_column): (&KeyResolutionMap<String>, &str),
    ) -> Option<&'m String> {
        let country = countries.resolve_field(row, country_column)?;
        if country != self.country {
            return None;
        }
        dates.resolve_field(row, date_column)
    }
}
