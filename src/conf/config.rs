use crate::{
    conf::{ServerConfig, StorageConfig},
    core::SiftError::{self, ConfigParsingError},
};
use config::{Config as CConfig, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "SIFT";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, SiftError> {
        let config = CConfig::builder()
            .add_source(File::from_str(toml_str, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }

    /// Loads an optional TOML file, then applies `SIFT_<SECTION>__<KEY>` overrides.
    pub fn load(path: Option<&str>) -> Result<Config, SiftError> {
        Self::build(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(path: Option<&str>, env: Environment) -> Result<Config, SiftError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
        }
        builder
            .add_source(env)
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }
}
