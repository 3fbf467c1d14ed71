use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    error::{ApiError, Result},
    model::{AssetsResult, Country, CountryAssetEmissions, CountryEmissionsInfo},
};

/// Reporting year requested from the country emissions endpoint.
pub const EMISSIONS_YEAR: u16 = 2022;

/// Remote resources exposed by the API, one per fetch method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Continents,
    Countries,
    Sectors,
    SubSectors,
    Gases,
    /// First page only; the API paginates this listing.
    Assets,
    CountryAssets(&'a str),
    CountryEmissions(&'a str),
    CountryAssetEmissions(&'a str),
}

impl Endpoint<'_> {
    /// Path and query relative to the API root. Country codes are inserted
    /// as given.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Continents => "/definitions/continents".to_string(),
            Endpoint::Countries => "/definitions/countries".to_string(),
            Endpoint::Sectors => "/definitions/sectors".to_string(),
            Endpoint::SubSectors => "/definitions/subsectors".to_string(),
            Endpoint::Gases => "/definitions/gases".to_string(),
            Endpoint::Assets => "/assets".to_string(),
            Endpoint::CountryAssets(code) => format!("/assets?countries={code}"),
            Endpoint::CountryEmissions(code) => format!(
                "/country/emissions?since={EMISSIONS_YEAR}&to={EMISSIONS_YEAR}&countries={code}"
            ),
            Endpoint::CountryAssetEmissions(code) => {
                format!("/assets/emissions?countries={code}")
            }
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// Client for the Climate TRACE REST API.
///
/// Holds one `reqwest::Client`, so clones share a connection pool. Each fetch
/// method performs exactly one GET. Dropping a returned future abandons the
/// request in flight.
#[derive(Debug, Clone)]
pub struct ClimateTraceApi {
    base_url: String,
    http: Client,
}

impl Default for ClimateTraceApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ClimateTraceApi {
    /// Client for the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_base_url(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_continents(&self) -> Result<Vec<String>> {
        self.get(Endpoint::Continents).await
    }

    pub async fn fetch_countries(&self) -> Result<Vec<Country>> {
        self.get(Endpoint::Countries).await
    }

    pub async fn fetch_sectors(&self) -> Result<Vec<String>> {
        self.get(Endpoint::Sectors).await
    }

    pub async fn fetch_sub_sectors(&self) -> Result<Vec<String>> {
        self.get(Endpoint::SubSectors).await
    }

    pub async fn fetch_gases(&self) -> Result<Vec<String>> {
        self.get(Endpoint::Gases).await
    }

    // TODO: follow the API's paging so all assets are returned, not just the first page.
    pub async fn fetch_assets(&self) -> Result<AssetsResult> {
        self.get(Endpoint::Assets).await
    }

    pub async fn fetch_country_assets(&self, country_code: &str) -> Result<AssetsResult> {
        self.get(Endpoint::CountryAssets(country_code)).await
    }

    /// Emissions for one country over the fixed 2022 window.
    pub async fn fetch_country_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<Vec<CountryEmissionsInfo>> {
        self.get(Endpoint::CountryEmissions(country_code)).await
    }

    /// Asset emissions for one country, keyed by sector.
    pub async fn fetch_country_asset_emissions_info(
        &self,
        country_code: &str,
    ) -> Result<CountryAssetEmissions> {
        self.get(Endpoint::CountryAssetEmissions(country_code)).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        debug!(%url, "GET");

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%url, %status, bytes = body.len(), "response");

        if !status.is_success() {
            return Err(ApiError::status(status, &url, &body));
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Parse { url, source })
    }
}
