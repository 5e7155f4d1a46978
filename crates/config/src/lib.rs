use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Application settings.
///
/// Layered, later sources win: built-in defaults, `config/default.*`,
/// `config/local.*`, `READSCORE__SECTION__KEY` environment variables, and the
/// conventional `ASSEMBLYAI_API_KEY` / `OPENAI_API_KEY` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub assemblyai: AssemblyAiSettings,
    pub openai: OpenAiSettings,
    pub polling: PollingSettings,
    pub pricing: PricingSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest accepted audio upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyAiSettings {
    pub api_key: String,
    pub base_url: String,
    /// Default spoken language of the recordings.
    pub language_code: String,
}

impl Default for AssemblyAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.assemblyai.com/v2".to_string(),
            language_code: "tr".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            interval_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    pub transcription_per_minute: f64,
    pub diff_per_thousand_tokens: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            transcription_per_minute: 0.0062,
            diff_per_thousand_tokens: 0.03,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSettings {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Settings {
    /// Loads settings from the `config/` directory of the working directory.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix("READSCORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("assemblyai.api_key", std::env::var("ASSEMBLYAI_API_KEY").ok())?
            .set_override_option("openai.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
