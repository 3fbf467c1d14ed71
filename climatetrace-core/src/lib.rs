//! Core library for the `climatetrace` CLI.
//!
//! This crate defines:
//! - An async client for the Climate TRACE REST API
//! - The records the API returns
//! - Configuration of the API root
//!
//! It is used by `climatetrace-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod source;

pub use client::{ClimateTraceApi, EMISSIONS_YEAR, Endpoint};
pub use config::{Config, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
pub use model::{
    Asset, AssetsResult, Country, CountryAssetEmissions, CountryAssetEmissionsInfo,
    CountryEmissionsInfo, EmissionInfo,
};
pub use source::{ClimateDataSource, source_from_config};
