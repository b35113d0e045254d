use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the auth/context API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:9005".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding the durable session files.
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            profile_dir: default_profile_dir(),
        }
    }
}

fn default_profile_dir() -> PathBuf {
    PathBuf::from(".studio-profile")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Delay between a successful workspace switch and the scheduled
    /// application reload. Long enough for the success notice to render.
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reload_delay_ms: default_reload_delay_ms(),
        }
    }
}

fn default_reload_delay_ms() -> u64 {
    1500
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
