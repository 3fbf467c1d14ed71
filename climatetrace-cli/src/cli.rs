use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use climatetrace_core::{ClimateDataSource, Config, DEFAULT_BASE_URL, source_from_config};
use std::path::Path;
use tracing::warn;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climatetrace", version, about = "Climate TRACE emissions data CLI")]
pub struct Cli {
    /// API root to use instead of the configured one.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print the parsed response as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List continent names.
    Continents,
    /// List countries with their ISO codes.
    Countries,
    /// List sector names.
    Sectors,
    /// List subsector names.
    Subsectors,
    /// List gas names.
    Gases,

    /// List assets (first page only).
    Assets {
        /// Restrict to one country, e.g. "USA".
        #[arg(long)]
        country: Option<String>,
    },

    /// Show 2022 emissions for a country compared to the world.
    Emissions {
        /// Country code, e.g. "USA".
        country: String,
    },

    /// Show asset emissions for a country, grouped by sector.
    AssetEmissions {
        /// Country code, e.g. "USA".
        country: String,
    },

    /// Set the API root stored in the config file.
    Configure {
        /// New API root; prompts when omitted.
        url: Option<String>,

        /// Forget the stored API root and use the production API.
        #[arg(long, conflicts_with = "url")]
        reset: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = Config::config_file_path()?;

        if let Command::Configure { url, reset } = &self.command {
            let config = configure(&path, url.clone(), *reset)?;
            println!("Using {} (saved to {})", config.base_url(), path.display());
            return Ok(());
        }

        let config = config_for_query(self.base_url.as_deref(), &path)?;
        let source = source_from_config(&config);
        let output = execute(source.as_ref(), &self.command, self.json).await?;
        println!("{output}");

        Ok(())
    }
}

/// Config for a data command. `--base-url` bypasses the config file entirely.
pub fn config_for_query(base_url: Option<&str>, path: &Path) -> anyhow::Result<Config> {
    match base_url {
        Some(url) => Config::with_base_url(url),
        None => Config::load_from(path),
    }
}

/// Run a data command against `source` and return the text to print.
pub async fn execute(
    source: &dyn ClimateDataSource,
    command: &Command,
    json: bool,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Continents => {
            let names = source.fetch_continents().await?;
            render::output(&names, json, |n| render::names(n))?
        }
        Command::Countries => {
            let countries = source.fetch_countries().await?;
            render::output(&countries, json, |c| render::countries(c))?
        }
        Command::Sectors => {
            let names = source.fetch_sectors().await?;
            render::output(&names, json, |n| render::names(n))?
        }
        Command::Subsectors => {
            let names = source.fetch_sub_sectors().await?;
            render::output(&names, json, |n| render::names(n))?
        }
        Command::Gases => {
            let names = source.fetch_gases().await?;
            render::output(&names, json, |n| render::names(n))?
        }
        Command::Assets { country } => {
            let result = match country {
                Some(code) => source.fetch_country_assets(code).await?,
                None => source.fetch_assets().await?,
            };
            render::output(&result, json, render::assets)?
        }
        Command::Emissions { country } => {
            let infos = source.fetch_country_emissions_info(country).await?;
            render::output(&infos, json, |i| render::country_emissions(i))?
        }
        Command::AssetEmissions { country } => {
            let map = source.fetch_country_asset_emissions_info(country).await?;
            render::output(&map, json, render::asset_emissions)?
        }
        Command::Configure { .. } => {
            anyhow::bail!("`configure` does not query the API")
        }
    };

    Ok(output)
}

/// Write a new config to `path`. The previous file is replaced, not read,
/// so a file that no longer parses can be repaired this way.
pub fn configure(path: &Path, url: Option<String>, reset: bool) -> anyhow::Result<Config> {
    let config = if reset {
        Config::default()
    } else {
        let url = match url {
            Some(url) => url,
            None => prompt_base_url(path)?,
        };
        Config::with_base_url(&url)?
    };

    config.save_to(path)?;
    Ok(config)
}

fn prompt_base_url(path: &Path) -> anyhow::Result<String> {
    let current = match Config::load_from(path) {
        Ok(cfg) => cfg.base_url().to_string(),
        Err(err) => {
            warn!("{err:#}; offering the production API root instead");
            DEFAULT_BASE_URL.to_string()
        }
    };

    inquire::Text::new("Climate TRACE API root:")
        .with_default(&current)
        .prompt()
        .context("Failed to read API root")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use climatetrace_core::{
        Asset, AssetsResult, Country, CountryAssetEmissions, CountryAssetEmissionsInfo,
        CountryEmissionsInfo, EmissionInfo, Result,
    };
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default)]
    struct StubSource;

    #[async_trait]
    impl ClimateDataSource for StubSource {
        async fn fetch_continents(&self) -> Result<Vec<String>> {
            Ok(vec!["Africa".into(), "Europe".into()])
        }

        async fn fetch_countries(&self) -> Result<Vec<Country>> {
            Ok(vec![Country {
                alpha3: Some("FRA".into()),
                alpha2: Some("FR".into()),
                name: Some("France".into()),
                continent: Some("Europe".into()),
            }])
        }

        async fn fetch_sectors(&self) -> Result<Vec<String>> {
            Ok(vec!["power".into()])
        }

        async fn fetch_sub_sectors(&self) -> Result<Vec<String>> {
            Ok(vec!["electricity-generation".into()])
        }

        async fn fetch_gases(&self) -> Result<Vec<String>> {
            Ok(vec!["co2".into(), "ch4".into()])
        }

        async fn fetch_assets(&self) -> Result<AssetsResult> {
            Ok(AssetsResult {
                assets: vec![Asset {
                    id: Some("a1".into()),
                    name: Some("Plant A".into()),
                    ..Asset::default()
                }],
            })
        }

        async fn fetch_country_assets(&self, country_code: &str) -> Result<AssetsResult> {
            Ok(AssetsResult {
                assets: vec![Asset {
                    id: Some(format!("{country_code}-1")),
                    ..Asset::default()
                }],
            })
        }

        async fn fetch_country_emissions_info(
            &self,
            country_code: &str,
        ) -> Result<Vec<CountryEmissionsInfo>> {
            Ok(vec![CountryEmissionsInfo {
                country: Some(country_code.to_string()),
                rank: Some(3),
                emissions: Some(EmissionInfo {
                    co2: Some(10.0),
                    co2e_100yr: Some(25.0),
                    co2e_20yr: None,
                }),
                world_emissions: Some(EmissionInfo {
                    co2: Some(100.0),
                    co2e_100yr: Some(100.0),
                    co2e_20yr: None,
                }),
            }])
        }

        async fn fetch_country_asset_emissions_info(
            &self,
            country_code: &str,
        ) -> Result<CountryAssetEmissions> {
            let entry = CountryAssetEmissionsInfo {
                country: Some(country_code.to_string()),
                emissions: Some(12.5),
                sector: Some("power".into()),
            };
            Ok(CountryAssetEmissions::from([("power".to_string(), vec![entry])]))
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "climatetrace",
            "emissions",
            "USA",
            "--json",
            "--base-url",
            "http://localhost:8080/v4",
            "-vv",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080/v4"));
        assert_eq!(cli.command, Command::Emissions { country: "USA".into() });
    }

    #[test]
    fn parses_asset_commands() {
        let cli = Cli::try_parse_from(["climatetrace", "assets", "--country", "DEU"]).unwrap();
        assert_eq!(cli.command, Command::Assets { country: Some("DEU".into()) });

        let cli = Cli::try_parse_from(["climatetrace", "asset-emissions", "USA"]).unwrap();
        assert_eq!(cli.command, Command::AssetEmissions { country: "USA".into() });
    }

    #[test]
    fn configure_reset_conflicts_with_url() {
        let err = Cli::try_parse_from(["climatetrace", "configure", "http://x", "--reset"]);
        assert!(err.is_err());
    }

    #[test]
    fn emissions_requires_country() {
        assert!(Cli::try_parse_from(["climatetrace", "emissions"]).is_err());
    }

    #[tokio::test]
    async fn lists_names_one_per_line() {
        let out = execute(&StubSource, &Command::Gases, false).await.unwrap();
        assert_eq!(out, "co2\nch4");
    }

    #[tokio::test]
    async fn country_assets_use_country_filter() {
        let cmd = Command::Assets { country: Some("DEU".into()) };
        let out = execute(&StubSource, &cmd, false).await.unwrap();
        assert!(out.contains("DEU-1"));

        let out = execute(&StubSource, &Command::Assets { country: None }, false)
            .await
            .unwrap();
        assert!(out.contains("a1"));
        assert!(out.contains("Plant A"));
    }

    #[tokio::test]
    async fn json_output_uses_wire_names() {
        let cmd = Command::AssetEmissions { country: "USA".into() };
        let out = execute(&StubSource, &cmd, true).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["power"][0]["Emissions"], 12.5);
        assert_eq!(value["power"][0]["Country"], "USA");
    }

    #[tokio::test]
    async fn emissions_show_world_share() {
        let cmd = Command::Emissions { country: "USA".into() };
        let out = execute(&StubSource, &cmd, false).await.unwrap();

        assert!(out.contains("USA"));
        assert!(out.contains("rank 3"));
        assert!(out.contains("25.00% of world"));
    }

    #[tokio::test]
    async fn configure_is_not_a_query() {
        let cmd = Command::Configure { url: None, reset: true };
        assert!(execute(&StubSource, &cmd, false).await.is_err());
    }

    fn broken_config() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();
        (dir, path)
    }

    #[test]
    fn base_url_flag_skips_broken_config() {
        let (_dir, path) = broken_config();

        let cfg = config_for_query(Some("http://127.0.0.1:1/v4"), &path).unwrap();
        assert_eq!(cfg.base_url(), "http://127.0.0.1:1/v4");

        let err = config_for_query(None, &path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn configure_reset_repairs_broken_config() {
        let (_dir, path) = broken_config();

        let cfg = configure(&path, None, true).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn configure_url_replaces_broken_config() {
        let (_dir, path) = broken_config();

        configure(&path, Some("http://localhost:8080/v4/".into()), false).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.base_url(), "http://localhost:8080/v4");
    }

    #[test]
    fn configure_rejects_bad_url_without_writing() {
        let (_dir, path) = broken_config();

        assert!(configure(&path, Some("ftp://x".into()), false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "base_url = [");
    }
}
