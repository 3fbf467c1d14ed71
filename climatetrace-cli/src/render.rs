//! Human-friendly output formatting.

use climatetrace_core::{
    AssetsResult, Country, CountryAssetEmissions, CountryEmissionsInfo, EmissionInfo,
};
use serde::Serialize;

const MISSING: &str = "-";

/// Either pretty JSON of `value`, or the text produced by `text`.
pub fn output<T, F>(value: &T, json: bool, text: F) -> anyhow::Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

pub fn names(names: &[String]) -> String {
    names.join("\n")
}

pub fn countries(countries: &[Country]) -> String {
    countries
        .iter()
        .map(|c| {
            format!(
                "{:<4} {:<3} {} ({})",
                or_missing(&c.alpha3),
                or_missing(&c.alpha2),
                or_missing(&c.name),
                or_missing(&c.continent),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assets(result: &AssetsResult) -> String {
    if result.assets.is_empty() {
        return "No assets found.".to_string();
    }

    result
        .assets
        .iter()
        .map(|a| {
            format!(
                "{}  {}  [{} / {}]",
                or_missing(&a.id),
                or_missing(&a.name),
                or_missing(&a.sector),
                or_missing(&a.asset_type),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn country_emissions(infos: &[CountryEmissionsInfo]) -> String {
    if infos.is_empty() {
        return "No emissions data.".to_string();
    }

    let mut lines = Vec::new();
    for info in infos {
        let rank = info
            .rank
            .map(|r| format!("rank {r}"))
            .unwrap_or_else(|| "unranked".to_string());
        lines.push(format!("{} ({rank})", or_missing(&info.country)));

        if let Some(emissions) = &info.emissions {
            lines.push(format!("  country: {}", emission_line(emissions)));
        }
        if let Some(world) = &info.world_emissions {
            lines.push(format!("  world:   {}", emission_line(world)));
        }

        let share = info
            .emissions
            .as_ref()
            .and_then(|e| e.co2e_100yr)
            .zip(info.world_emissions.as_ref().and_then(|w| w.co2e_100yr))
            .filter(|(_, world)| *world > 0.0)
            .map(|(country, world)| country / world * 100.0);
        if let Some(share) = share {
            lines.push(format!("  {share:.2}% of world co2e_100yr"));
        }
    }

    lines.join("\n")
}

/// Sectors sorted by name, each with its total and the individual entries.
pub fn asset_emissions(map: &CountryAssetEmissions) -> String {
    if map.is_empty() {
        return "No asset emissions data.".to_string();
    }

    let mut sectors: Vec<_> = map.iter().collect();
    sectors.sort_by(|a, b| a.0.cmp(b.0));

    let mut lines = Vec::new();
    for (sector, entries) in sectors {
        let total: f64 = entries.iter().filter_map(|e| e.emissions).sum();
        lines.push(format!("{sector}: {total}"));
        for entry in entries {
            lines.push(format!(
                "  {} {} {}",
                or_missing(&entry.country),
                or_missing(&entry.sector),
                entry
                    .emissions
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
            ));
        }
    }

    lines.join("\n")
}

fn emission_line(e: &EmissionInfo) -> String {
    format!(
        "co2 {}  co2e_100yr {}  co2e_20yr {}",
        number(e.co2),
        number(e.co2e_100yr),
        number(e.co2e_20yr),
    )
}

fn number(n: Option<f64>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| MISSING.to_string())
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}
