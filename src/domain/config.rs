use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// Configuration for the recipe manager.
///
/// This struct holds settings that control how recipe drafts are requested
/// from the language model and how they are turned into recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The model used to generate recipe drafts.
    ///
    /// For example, 'gemini-2.0-flash'.
    model: String,

    /// Base URL of the generative language API.
    api_base_url: String,

    /// Name of the environment variable holding the API key.
    ///
    /// The key itself is never written to the configuration file.
    api_key_env: String,

    /// Batch volume, in liters, given to generated recipes.
    ///
    /// The model does not choose a batch size, so drafts are scaled to this.
    default_volume: f64,

    /// How long to wait for the model before giving up, in seconds.
    timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            default_volume: default_volume(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration, falling back to the defaults if the file is
    /// missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the model used for recipe drafts.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the base URL of the generative language API.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the name of the environment variable holding the API key.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    /// Returns the batch volume, in liters, for generated recipes.
    #[must_use]
    pub const fn default_volume(&self) -> f64 {
        self.default_volume
    }

    /// Returns the request timeout for the model.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sets the model used for recipe drafts.
    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

const fn default_volume() -> f64 {
    20.0
}

const fn default_timeout_secs() -> u64 {
    60
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_model")]
        model: String,

        #[serde(default = "default_api_base_url")]
        api_base_url: String,

        #[serde(default = "default_api_key_env")]
        api_key_env: String,

        /// Batch volume in liters for generated drafts.
        #[serde(default = "default_volume")]
        default_volume: f64,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                model,
                api_base_url,
                api_key_env,
                default_volume,
                timeout_secs,
            } => Self {
                model,
                api_base_url,
                api_key_env,
                default_volume,
                timeout_secs,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            model: config.model,
            api_base_url: config.api_base_url,
            api_key_env: config.api_key_env,
            default_volume: config.default_volume,
            timeout_secs: config.timeout_secs,
        }
    }
}
