/// Config file loading and creation for the songduel CLI.
///
/// Config lives at ~/.config/songduel/config.toml.
/// All fields are optional. CLI args override config values, config values
/// override built-in defaults.
use serde::Deserialize;
use songduel_core::constants::{
    CALIBRATION_MATCHES, DEFAULT_PAGE_SIZE, ESTABLISHED_K_FACTOR, PROVISIONAL_K_FACTOR,
    PROXIMITY_WINDOW,
};
use songduel_core::{EngineConfig, MatchmakingPolicy, RatingPolicy};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store file used when neither the CLI nor the config names one.
pub const DEFAULT_STORE: &str = "songs.json";

#[derive(Deserialize, Default, Debug)]
pub struct SongduelConfig {
    pub store: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub calibration_matches: Option<u32>,
    pub provisional_k: Option<f64>,
    pub established_k: Option<f64>,
    pub proximity_window: Option<f64>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("HOME environment variable not set")]
    NoHome,

    #[error("Failed to read config at {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse config at {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("Config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write config to {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# songduel configuration
# All values here can be overridden by CLI flags.

# Where ratings are stored (JSON, keyed by track URI)
# store = \"songs.json\"

# Tracks per playlist write when planning a reorder
# page_size = 100

# Comparisons before a track leaves its calibration period
# calibration_matches = 5

# Rating swing per comparison during / after calibration
# provisional_k = 64.0
# established_k = 32.0

# Proximity matchmaking pairs tracks rated closer than this
# proximity_window = 100.0
";

/// Returns the default config path: ~/.config/songduel/config.toml
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".config").join("songduel").join("config.toml"))
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<SongduelConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SongduelConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err)
}

/// Everything a command needs to know about where and how to rank.
///
/// Built once at startup and handed to each command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub store_path: PathBuf,
    pub page_size: usize,
    pub engine: EngineConfig,
}

impl AppContext {
    /// Merge the config file with the `--store` override and validate the result.
    pub fn resolve(cfg: SongduelConfig, store_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let store_path = store_override
            .or(cfg.store)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));

        let page_size = cfg.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        let calibration_matches = cfg.calibration_matches.unwrap_or(CALIBRATION_MATCHES);
        let provisional_k = positive("provisional_k", cfg.provisional_k.unwrap_or(PROVISIONAL_K_FACTOR))?;
        let established_k = positive("established_k", cfg.established_k.unwrap_or(ESTABLISHED_K_FACTOR))?;
        let proximity_window = positive("proximity_window", cfg.proximity_window.unwrap_or(PROXIMITY_WINDOW))?;

        Ok(AppContext {
            store_path,
            page_size,
            engine: EngineConfig {
                rating: RatingPolicy {
                    calibration_matches,
                    provisional_k,
                    established_k,
                },
                matchmaking: MatchmakingPolicy {
                    calibration_matches,
                    proximity_window,
                },
            },
        })
    }
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}
