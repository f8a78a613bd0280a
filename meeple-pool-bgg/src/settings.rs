use std::path::PathBuf;
use std::str::FromStr;

use tokio::time::Duration;

use crate::client::DEFAULT_BASE_URL;
use crate::error::BggError;
use crate::rate_limit::MIN_REQUEST_INTERVAL;

const ENV_BASE_URL: &str = "MEEPLE_POOL_BASE_URL";
const ENV_MIN_INTERVAL: &str = "MEEPLE_POOL_MIN_INTERVAL_MS";
const ENV_TIMEOUT: &str = "MEEPLE_POOL_TIMEOUT_SECS";
const ENV_FRESH: &str = "MEEPLE_POOL_FRESH_SECS";
const ENV_KEEP: &str = "MEEPLE_POOL_KEEP_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FRESH_SECS: u64 = 5 * 60;
const DEFAULT_KEEP_SECS: u64 = 10 * 60;

/// Client and cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    /// Spacing between request starts. Values below
    /// [`MIN_REQUEST_INTERVAL`] are raised to it.
    pub min_request_interval_ms: u64,
    pub timeout_secs: u64,
    /// How long an aggregated result is served without refetching.
    pub fresh_for_secs: u64,
    /// How long an unread cache entry is kept at all.
    pub keep_for_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_request_interval_ms: MIN_REQUEST_INTERVAL.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fresh_for_secs: DEFAULT_FRESH_SECS,
            keep_for_secs: DEFAULT_KEEP_SECS,
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default.
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSources {
    pub base_url: SettingSource,
    pub min_request_interval_ms: SettingSource,
    pub timeout_secs: SettingSource,
    pub fresh_for_secs: SettingSource,
    pub keep_for_secs: SettingSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    bgg: Option<BggConfig>,
}

/// The `[bgg]` table of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BggConfig {
    pub base_url: Option<String>,
    pub min_request_interval_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub fresh_for_secs: Option<u64>,
    pub keep_for_secs: Option<u64>,
}

impl ClientSettings {
    /// Load settings from environment variables, the config file, or defaults.
    ///
    /// Priority: env vars > config file > built-in defaults.
    pub fn load() -> Self {
        Self::resolve(load_config_file().as_ref(), |var| std::env::var(var).ok()).0
    }

    /// Determine where each setting is coming from.
    pub fn sources() -> SettingsSources {
        Self::resolve(load_config_file().as_ref(), |var| std::env::var(var).ok()).1
    }

    /// Resolve every field from `env` and `file`, falling back to defaults.
    /// Values that fail to parse are skipped with a warning.
    pub fn resolve(
        file: Option<&BggConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> (Self, SettingsSources) {
        let defaults = Self::default();
        let file = file.cloned().unwrap_or_default();

        let (base_url, base_url_src) =
            pick(&env, ENV_BASE_URL, file.base_url, defaults.base_url);
        let (min_request_interval_ms, interval_src) = pick(
            &env,
            ENV_MIN_INTERVAL,
            file.min_request_interval_ms,
            defaults.min_request_interval_ms,
        );
        let (timeout_secs, timeout_src) =
            pick(&env, ENV_TIMEOUT, file.timeout_secs, defaults.timeout_secs);
        let (fresh_for_secs, fresh_src) =
            pick(&env, ENV_FRESH, file.fresh_for_secs, defaults.fresh_for_secs);
        let (keep_for_secs, keep_src) =
            pick(&env, ENV_KEEP, file.keep_for_secs, defaults.keep_for_secs);

        (
            Self {
                base_url,
                min_request_interval_ms,
                timeout_secs,
                fresh_for_secs,
                keep_for_secs,
            },
            SettingsSources {
                base_url: base_url_src,
                min_request_interval_ms: interval_src,
                timeout_secs: timeout_src,
                fresh_for_secs: fresh_src,
                keep_for_secs: keep_src,
            },
        )
    }

    /// The configured request spacing, never shorter than
    /// [`MIN_REQUEST_INTERVAL`].
    pub fn min_request_interval(&self) -> Duration {
        let configured = Duration::from_millis(self.min_request_interval_ms);
        if configured < MIN_REQUEST_INTERVAL {
            log::warn!(
                "min_request_interval_ms = {} is below the service minimum, using {}",
                self.min_request_interval_ms,
                MIN_REQUEST_INTERVAL.as_millis()
            );
            return MIN_REQUEST_INTERVAL;
        }
        configured
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fresh_for(&self) -> Duration {
        Duration::from_secs(self.fresh_for_secs)
    }

    pub fn keep_for(&self) -> Duration {
        Duration::from_secs(self.keep_for_secs)
    }

    fn to_config(&self) -> BggConfig {
        BggConfig {
            base_url: Some(self.base_url.clone()),
            min_request_interval_ms: Some(self.min_request_interval_ms),
            timeout_secs: Some(self.timeout_secs),
            fresh_for_secs: Some(self.fresh_for_secs),
            keep_for_secs: Some(self.keep_for_secs),
        }
    }
}

fn pick<V: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    file: Option<V>,
    default: V,
) -> (V, SettingSource) {
    if let Some(raw) = env(var) {
        match raw.trim().parse::<V>() {
            Ok(value) => return (value, SettingSource::EnvVar(var)),
            Err(_) => log::warn!("Ignoring ${}: cannot parse '{}'", var, raw),
        }
    }
    match file {
        Some(value) => (value, SettingSource::ConfigFile),
        None => (default, SettingSource::Default),
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("meeple-pool").join("config.toml"))
}

/// Parse the contents of a config file.
pub fn parse_config(text: &str) -> Result<Option<BggConfig>, BggError> {
    let config: ConfigFile = toml::from_str(text)
        .map_err(|e| BggError::config(format!("Failed to parse config: {}", e)))?;
    Ok(config.bgg)
}

/// Save settings to the config file, creating parent directories as needed.
/// Returns the path the file was written to.
pub fn save_to_file(settings: &ClientSettings) -> Result<PathBuf, BggError> {
    let path =
        config_path().ok_or_else(|| BggError::config("Could not determine config directory"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        bgg: Some(settings.to_config()),
    };
    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| BggError::config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

fn load_config_file() -> Option<BggConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match parse_config(&content) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}
