//! CLI command implementations

pub mod generate;
pub mod height;
pub mod heightmap;
pub mod inspect;

use anyhow::{Context, Result};
use relief_terrain::{NormalPolicy, TerrainConfig};

/// Settings shared by every command that builds a terrain
#[derive(clap::Args, Debug)]
pub struct TerrainArgs {
    /// Path to a terrain.toml config file
    #[arg(long)]
    pub config: Option<String>,

    /// Vertex rows per tile (overrides the config file)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Vertex columns per tile (overrides the config file)
    #[arg(long)]
    pub cols: Option<usize>,

    /// Normal averaging policy: legacy or distinct
    #[arg(long, value_parser = parse_policy)]
    pub policy: Option<NormalPolicy>,
}

impl TerrainArgs {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn resolve(&self) -> Result<TerrainConfig> {
        let mut config = match &self.config {
            Some(path) => TerrainConfig::load(path)
                .with_context(|| format!("Failed to load terrain config '{}'", path))?,
            None => TerrainConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(policy) = self.policy {
            config.normal_policy = policy;
        }

        config.validate().context("Invalid terrain config")?;
        Ok(config)
    }
}

fn parse_policy(s: &str) -> Result<NormalPolicy, String> {
    match s {
        "legacy" | "legacy_duplicated_sample" => Ok(NormalPolicy::LegacyDuplicatedSample),
        "distinct" | "eight_distinct_samples" => Ok(NormalPolicy::EightDistinctSamples),
        _ => Err(format!(
            "unknown normal policy '{}'; valid values: legacy, distinct",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_parse() {
        assert_eq!(parse_policy("legacy"), Ok(NormalPolicy::LegacyDuplicatedSample));
        assert_eq!(parse_policy("distinct"), Ok(NormalPolicy::EightDistinctSamples));
        assert!(parse_policy("smooth").is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = TerrainArgs {
            config: None,
            rows: Some(12),
            cols: None,
            policy: Some(NormalPolicy::EightDistinctSamples),
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.rows, 12);
        assert_eq!(config.cols, 96);
        assert_eq!(config.normal_policy, NormalPolicy::EightDistinctSamples);
    }

    #[test]
    fn invalid_override_is_reported() {
        let args = TerrainArgs {
            config: None,
            rows: Some(2),
            cols: None,
            policy: None,
        };
        assert!(args.resolve().is_err());
    }
}
