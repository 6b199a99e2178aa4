use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::PriceResult;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "carprice";

/// Prefix for environment overrides, e.g. `CARPRICE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "CARPRICE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Location of the serialized model artifact
    pub path: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./model/car_selling_price.model"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            model: ModelSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and the environment.
    ///
    /// An explicitly given file must exist; the default `carprice.toml` is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> PriceResult<Self> {
        let defaults = Self::default();

        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("model.path", defaults.model.path.to_string_lossy().into_owned())?
            .set_default("log_level", defaults.log_level)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply a model path given on the command line, if any
    pub fn with_model_override(mut self, model_path: Option<PathBuf>) -> Self {
        if let Some(path) = model_path {
            self.model.path = path;
        }
        self
    }
}
