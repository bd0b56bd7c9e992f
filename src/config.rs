use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub linkd: LinkdSettings,
    pub automation: AutomationSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkdSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomationSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_poll_interval")]
    pub login_poll_interval_secs: u64,
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    #[serde(default)]
    pub send_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_messages_dir")]
    pub messages_dir: String,
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            messages_dir: default_messages_dir(),
            state_file: default_state_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_limit")]
    pub default_limit: u16,
    #[serde(default = "default_outreach_limit")]
    pub outreach_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            outreach_limit: default_outreach_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchSettings {
    /// Apply the default and clamp to `max_limit`
    pub fn resolve_limit(&self, requested: Option<u16>, default: u16) -> usize {
        requested.unwrap_or(default).clamp(1, self.max_limit.max(1)) as usize
    }
}

fn default_gemini_model() -> String { "gemini-2.0-flash".to_string() }
fn default_session_file() -> String { "linkedin-auth.json".to_string() }
fn default_poll_interval() -> u64 { 5 }
fn default_max_login_attempts() -> u32 { 120 }
fn default_messages_dir() -> String { "public/messages".to_string() }
fn default_state_file() -> String { "data/ui-state.json".to_string() }
fn default_search_limit() -> u16 { 10 }
fn default_outreach_limit() -> u16 { 5 }
fn default_max_limit() -> u16 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ALUMNI_)
    /// 5. Well-known API key variables (GEMINI_API_KEY, LINKD_API_KEY, STAGEHAND_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ALUMNI__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ALUMNI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    ///
    /// Environment overrides apply here exactly as in `load`.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ALUMNI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

/// Apply the API key variables the hosted services document
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    override_api_keys(settings, |var| std::env::var(var).ok())
}

fn override_api_keys<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        ("gemini.api_key", "GEMINI_API_KEY"),
        ("linkd.api_key", "LINKD_API_KEY"),
        ("automation.api_key", "STAGEHAND_API_KEY"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, var) in overrides {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
