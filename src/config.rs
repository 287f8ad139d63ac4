//! Index configuration.
//!
//! Loaded from JSON (or TOML with the `toml` feature) or built in code with
//! the `with_*` setters. Every field has a default, so an empty document is a
//! valid configuration.

use serde::de::Error;

/// Cap on covering cells above which a warning is logged.
const LARGE_MAX_HASHES: usize = 4096;

/// Geomem configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound on the number of covering cells a query may visit when
    /// choosing its resolution
    #[serde(default = "Config::default_max_hashes")]
    pub max_hashes: usize,
}

impl Config {
    const fn default_max_hashes() -> usize {
        crate::compute::coverage::DEFAULT_MAX_HASHES
    }

    pub fn with_max_hashes(mut self, max_hashes: usize) -> Self {
        if max_hashes > LARGE_MAX_HASHES {
            log::warn!(
                "max_hashes of {} is very large; each query may scan that many cell buckets",
                max_hashes
            );
        }
        self.max_hashes = max_hashes;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_hashes == 0 {
            return Err("max_hashes must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hashes: Self::default_max_hashes(),
        }
    }
}
