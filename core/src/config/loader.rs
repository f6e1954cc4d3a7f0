use crate::config::error::ConfigError;
use crate::config::error::Result;
use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const ENV_PREFIX: &str = "SRENITY";

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the analysis backend lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Deadline for the one-shot endpoint. The stream has no overall
    /// deadline because a session is expected to stay open for minutes.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Terminal report options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_status_log: bool,

    #[serde(default = "default_true")]
    pub deep_dive: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_request_timeout_ms() -> u64 {
    60_000
}
fn default_true() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_status_log: default_true(),
            deep_dive: default_true(),
        }
    }
}

impl BackendConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Appends an endpoint path to the base URL, keeping any path prefix
    /// the base carries (e.g. a reverse-proxy mount point).
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.parsed_base_url()?;
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::Validation(format!("cannot join {path}: {e}")))
    }

    fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Validation(format!("backend.base_url: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation(format!(
                "backend.base_url: unsupported scheme '{other}'"
            ))),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.backend.parsed_base_url()?;
        if self.backend.connect_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "backend.connect_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "backend.request_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loader with layered merging support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration with layered merging:
    /// 1. Start with defaults (from Default implementations)
    /// 2. Merge config file if provided
    /// 3. Override with environment variables (SRENITY_ prefix)
    pub fn load(&self) -> Result<AppConfig> {
        let mut builder = Config::builder();

        let defaults_json = serde_json::to_string(&AppConfig::default())?;
        builder = builder.add_source(File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(ref path) = self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            tracing::debug!("loading config from {}", path.display());
            builder = builder.add_source(File::from(path.as_path()));
        }

        // Example: SRENITY_BACKEND__BASE_URL=http://rca.internal:8000
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Locate the default config file in standard locations:
    /// 1. Current directory: ./srenity.toml
    /// 2. XDG config: ~/.config/srenity/config.toml
    /// 3. Home directory: ~/.srenity.toml
    pub fn find_config_file() -> Option<PathBuf> {
        let cwd_config = PathBuf::from("./srenity.toml");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("srenity").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".srenity.toml"))
            .filter(|path| path.exists())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<AppConfig> {
        match Self::find_config_file() {
            Some(path) => ConfigLoader::new().with_file(path).load(),
            None => ConfigLoader::new().load(),
        }
    }
}
