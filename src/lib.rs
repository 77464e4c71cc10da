//! Weather/sales star-schema analytics.
//!
//! Dimension tables are loaded once into a read-only [`dimensions::DimensionCache`].
//! Each dashboard query rebuilds its key-resolution maps from that cache, streams
//! the weather and sales fact tables once each, and folds UK rows into
//! per-category accumulators (see [`engine::JoinPipeline`] and [`views`]).

pub mod coerce;
pub mod config;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod resolution;
pub mod schema;
pub mod server;
pub mod source;
pub mod views;
