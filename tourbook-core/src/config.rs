//! Global tourbook configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{TourbookError, TourbookResult};
use crate::search::{Collection, QueryRouter};

static DEFAULT_EVENTS_PATH: &str = "~/tourbook/events.json";
static DEFAULT_TIMEZONE: &str = "UTC";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4097;

fn default_events_path() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_PATH)
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_level() -> String {
    "info".to_string()
}

fn default_collection() -> Collection {
    Collection::Destinations
}

/// Configuration at ~/.config/tourbook/config.toml, overridable with
/// `TOURBOOK_*` environment variables (`TOURBOOK_SERVER__PORT=8080`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourbookConfig {
    /// JSON file holding the event records
    #[serde(default = "default_events_path")]
    pub events_path: PathBuf,

    /// IANA time zone that offset timestamps are displayed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Collection for phrases that match no keyword
    #[serde(default = "default_collection")]
    pub default: Collection,

    /// Replacement keyword lists, keyed by collection name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            default: default_collection(),
            keywords: BTreeMap::new(),
        }
    }
}

impl Default for TourbookConfig {
    fn default() -> Self {
        TourbookConfig {
            events_path: default_events_path(),
            timezone: default_timezone(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl TourbookConfig {
    pub fn config_path() -> TourbookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TourbookError::Config("Could not determine config directory".into()))?
            .join("tourbook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first run.
    pub fn load() -> TourbookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered with the environment.
    pub fn load_from(path: &Path) -> TourbookResult<Self> {
        let config: TourbookConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("TOURBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TourbookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TourbookError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Events file with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.events_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn tz(&self) -> TourbookResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| TourbookError::Config(format!("Invalid timezone '{}': {e}", self.timezone)))
    }

    /// The query router described by `[search]`.
    pub fn router(&self) -> TourbookResult<QueryRouter> {
        let overrides = self
            .search
            .keywords
            .iter()
            .map(|(name, words)| Ok((name.parse::<Collection>()?, words.clone())))
            .collect::<TourbookResult<BTreeMap<_, _>>>()?;

        Ok(QueryRouter::with_overrides(&overrides, self.search.default))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Write the current config to `path`.
    pub fn save(&self, path: &Path) -> TourbookResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TourbookError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| TourbookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TourbookResult<()> {
        let contents = format!(
            "\
# tourbook configuration

# Where event records are read from:
# events_path = \"{DEFAULT_EVENTS_PATH}\"

# Time zone the calendar is displayed in:
# timezone = \"{DEFAULT_TIMEZONE}\"

# [server]
# host = \"{DEFAULT_HOST}\"
# port = {DEFAULT_PORT}

# [logging]
# level = \"info\"

# [search]
# default = \"destinations\"
# [search.keywords]
# events = [\"event\", \"festival\", \"concert\"]
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TourbookError::Config(format!("Could not create config directory: {e}")))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TourbookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
