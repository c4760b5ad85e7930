use crate::error::{CollectorError, Result};
use crate::utils::constants::{
    ARCHIVE_BASE_URL, CURRENT_BASE_URL, DEFAULT_DELIMITER, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_YEAR, ENV_PREFIX, FULL_LISTING_YEAR,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// How a year's directory listing names its archives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingLayout {
    /// Every archive in the listing is a candidate
    AllArchives,
    /// Only archives whose filename carries the location's station code
    StationCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRule {
    pub year: i32,
    pub layout: ListingLayout,
}

/// Whether historical collection stops at the first archive with data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectMode {
    #[default]
    FirstMatch,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CollectorConfig {
    #[validate(length(min = 1))]
    pub current_base_url: String,

    #[validate(length(min = 1))]
    pub archive_base_url: String,

    #[validate(length(min = 1))]
    pub years: Vec<i32>,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    pub request_timeout_secs: Option<u64>,

    pub collect_mode: CollectMode,

    #[validate(length(min = 1, max = 1))]
    pub delimiter: String,

    pub listing_rules: Vec<ListingRule>,

    pub default_layout: ListingLayout,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            current_base_url: CURRENT_BASE_URL.to_string(),
            archive_base_url: ARCHIVE_BASE_URL.to_string(),
            years: vec![DEFAULT_YEAR],
            max_workers: num_cpus::get(),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            collect_mode: CollectMode::FirstMatch,
            delimiter: DEFAULT_DELIMITER.to_string(),
            listing_rules: vec![ListingRule {
                year: FULL_LISTING_YEAR,
                layout: ListingLayout::AllArchives,
            }],
            default_layout: ListingLayout::StationCode,
        }
    }
}

impl CollectorConfig {
    /// Load defaults, then an optional config file, then `IMGW_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// As [`CollectorConfig::load`], reading overrides from `env` instead of the process environment
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("years")
                .source(env),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_collect_mode(mut self, collect_mode: CollectMode) -> Self {
        self.collect_mode = collect_mode;
        self
    }

    pub fn with_current_base_url(mut self, url: impl Into<String>) -> Self {
        self.current_base_url = url.into();
        self
    }

    pub fn with_archive_base_url(mut self, url: impl Into<String>) -> Self {
        self.archive_base_url = url.into();
        self
    }

    pub fn with_listing_rules(mut self, rules: Vec<ListingRule>) -> Self {
        self.listing_rules = rules;
        self
    }

    /// Listing layout for `year`, falling back to the default layout
    pub fn layout_for(&self, year: i32) -> ListingLayout {
        self.listing_rules
            .iter()
            .find(|rule| rule.year == year)
            .map(|rule| rule.layout)
            .unwrap_or(self.default_layout)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(CollectorError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::load_with_env(None, env(&[])).unwrap();

        assert_eq!(config.years, vec![2019]);
        assert_eq!(config.collect_mode, CollectMode::FirstMatch);
        assert_eq!(config.layout_for(2019), ListingLayout::AllArchives);
        assert_eq!(config.layout_for(2018), ListingLayout::StationCode);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
        assert!(config.max_workers >= 1);
    }

    #[test]
    fn test_environment_overrides() {
        let config = CollectorConfig::load_with_env(
            None,
            env(&[
                ("IMGW_YEARS", "2017,2018"),
                ("IMGW_MAX_WORKERS", "3"),
                ("IMGW_COLLECT_MODE", "all"),
            ]),
        )
        .unwrap();

        assert_eq!(config.years, vec![2017, 2018]);
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.collect_mode, CollectMode::All);
    }

    #[test]
    fn test_file_overrides() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "years = [2001, 2002]")?;
        writeln!(file, "default_layout = \"all_archives\"")?;
        writeln!(file, "[[listing_rules]]")?;
        writeln!(file, "year = 2002")?;
        writeln!(file, "layout = \"station_code\"")?;

        let config = CollectorConfig::load_with_env(Some(file.path()), env(&[]))?;

        assert_eq!(config.years, vec![2001, 2002]);
        assert_eq!(config.layout_for(2001), ListingLayout::AllArchives);
        assert_eq!(config.layout_for(2002), ListingLayout::StationCode);
        Ok(())
    }

    #[test]
    fn test_validation_rejects_empty_years_and_zero_workers() {
        let config = CollectorConfig::default().with_years(vec![]);
        assert!(matches!(
            config.validated(),
            Err(CollectorError::Validation(_))
        ));

        let config = CollectorConfig::default().with_max_workers(0);
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result =
            CollectorConfig::load_with_env(Some(Path::new("does/not/exist.toml")), env(&[]));
        assert!(matches!(result, Err(CollectorError::ConfigSource(_))));
    }
}
