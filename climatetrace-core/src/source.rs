use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    ClimateTraceApi,
    error::Result,
    model::{AssetsResult, Country, CountryAssetEmissions, CountryEmissionsInfo},
};

/// Anything that can answer the Climate TRACE queries.
///
/// [`ClimateTraceApi`] is the real implementation; callers that only need the
/// data (such as the CLI) are written against this trait.
#[async_trait]
pub trait ClimateDataSource: Send + Sync + Debug {
    async fn fetch_continents(&self) -> Result<Vec<String>>;
    async fn fetch_countries(&self) -> Result<Vec<Country>>;
    async fn fetch_sectors(&self) -> Result<Vec<String>>;
    async fn fetch_sub_sectors(&self) -> Result<Vec<String>>;
    async fn fetch_gases(&self) -> Result<Vec<String>>;
    async fn fetch_assets(&self) -> Result<AssetsResult>;
    async fn fetch_country_assets(&self, country_code: &str) -> Result<AssetsResult>;
    async fn fetch_country_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<Vec<CountryEmissionsInfo>>;
    async fn fetch_country_asset_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<CountryAssetEmissions>;
}

#[async_trait]
impl ClimateDataSource for ClimateTraceApi {
    async fn fetch_continents(&self) -> Result<Vec<String>> {
        ClimateTraceApi::fetch_continents(self).await
    }

    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        ClimateTraceApi::fetch_countries(self).await
    }

    async fn fetch_sectors(&self) -> Result<Vec<String>> {
        ClimateTraceApi::fetch_sectors(self).await
    }

    async fn fetch_sub_sectors(&self) -> Result<Vec<String>> {
        ClimateTraceApi::fetch_sub_sectors(self).await
    }

    async fn fetch_gases(&self) -> Result<Vec<String>> {
        ClimateTraceApi::fetch_gases(self).await
    }

    async fn fetch_assets(&self) -> Result<AssetsResult> {
        ClimateTraceApi::fetch_assets(self).await
    }

    async fn fetch_country_assets(&self, country_code: &str) -> Result<AssetsResult> {
        ClimateTraceApi::fetch_country_assets(self, country_code).await
    }

    async fn fetch_country_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<Vec<CountryEmissionsInfo>> {
        ClimateTraceApi::fetch_country_emissions_info(self, country_code).await
    }

    async fn fetch_country_asset_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<CountryAssetEmissions> {
        ClimateTraceApi::fetch_country_asset_emissions_info(self, country_code).await
    }
}

/// Construct the data source described by the configuration.
pub fn source_from_config(config: &crate::Config) -> Box<dyn ClimateDataSource> {
    Box::new(ClimateTraceApi::from_config(config))
}
