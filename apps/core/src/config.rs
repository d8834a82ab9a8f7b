use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ignore_list::IgnoreSet;
use crate::settings::FilterSettings;

const APP_DIR_NAME: &str = "quicklaunch";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_DEBOUNCE_MS: i64 = 150;
pub const DEFAULT_SCAN_MAX_DEPTH: usize = 4;
const MAX_SCAN_DEPTH: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid json5 config: {0}")]
    Json5(#[from] json5::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debounce_delay_ms: i64,
    pub match_path: bool,
    pub show_full_path: bool,
    pub apply_ignore_list: bool,
    pub ignored_paths: IgnoreSet,
    pub app_roots: Vec<PathBuf>,
    pub exclude_roots: Vec<PathBuf>,
    pub scan_max_depth: usize,
    pub save_search: bool,
    pub last_search: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_delay_ms: DEFAULT_DEBOUNCE_MS,
            match_path: false,
            show_full_path: false,
            apply_ignore_list: true,
            ignored_paths: IgnoreSet::new(),
            app_roots: default_app_roots(),
            exclude_roots: Vec::new(),
            scan_max_depth: DEFAULT_SCAN_MAX_DEPTH,
            save_search: false,
            last_search: String::new(),
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
        }
    }
}

impl Config {
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            debounce: FilterSettings::delay_from_millis(self.debounce_delay_ms),
            match_path: self.match_path,
            show_full_path: self.show_full_path,
            apply_ignore_list: self.apply_ignore_list,
        }
    }

    /// The query to start a session with, when saved searches are enabled.
    pub fn initial_query(&self) -> Option<&str> {
        if self.save_search && !self.last_search.is_empty() {
            Some(&self.last_search)
        } else {
            None
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

/// Loads the config at `path` (or the default location). A missing file
/// yields defaults; `.json`/`.json5` files are read as JSON5, anything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file missing; using defaults");
        return Ok(Config {
            config_path: path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let mut config = if is_json5_path(&path) {
        parse_json5(&raw)?
    } else {
        parse_toml(&raw)?
    };
    config.config_path = path;
    validate(&config)?;
    Ok(config)
}

pub fn parse_toml(raw: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(raw)?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_json5(raw: &str) -> Result<Config, ConfigError> {
    let config: Config = json5::from_str(raw)?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.scan_max_depth == 0 || cfg.scan_max_depth > MAX_SCAN_DEPTH {
        return Err(ConfigError::Invalid(format!(
            "scan_max_depth must be between 1 and {MAX_SCAN_DEPTH}"
        )));
    }

    if cfg.app_roots.iter().any(|root| root.as_os_str().is_empty()) {
        return Err(ConfigError::Invalid("app_roots entries must not be empty".into()));
    }

    Ok(())
}

fn is_json5_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false)
}

#[cfg(target_os = "windows")]
fn default_app_roots() -> Vec<PathBuf> {
    let start_menu = Path::new("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs");
    let mut roots = Vec::new();
    if let Some(program_data) = std::env::var_os("ProgramData") {
        roots.push(PathBuf::from(program_data).join(&start_menu));
    }
    if let Some(roaming) = dirs::data_dir() {
        roots.push(roaming.join(&start_menu));
    }
    roots
}

#[cfg(target_os = "macos")]
fn default_app_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
    ];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Applications"));
    }
    roots
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_app_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
    ];
    if let Some(data) = dirs::data_dir() {
        roots.push(data.join("applications"));
    }
    roots
}
