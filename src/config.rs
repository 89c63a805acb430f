// Configuration loading and parsing (config/bot.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// bot.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire bot.toml file.
#[derive(Debug, Clone, Deserialize)]
struct BotFile {
    bot: BotSection,
    #[serde(default)]
    simulation: SimulationConfig,
    #[serde(default)]
    cache: CacheSection,
    #[serde(default)]
    league: LeagueData,
}

/// Which analysis runs and for whom.
#[derive(Debug, Clone, Deserialize)]
pub struct BotSection {
    /// Short team code, e.g. "mtl".
    pub team: String,
    pub mode: Mode,
    /// Point gap beyond which other teams stop being relevant.
    #[serde(default = "default_reach")]
    pub reach: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Tank,
    Playoffs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Use Monte-Carlo season simulation to pick ideal winners for
    /// tonight's conference games (playoffs mode only).
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Fix the RNG seed for reproducible recommendations.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            enabled: false,
            trials: default_trials(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        CacheSection { enabled: true }
    }
}

/// Static league tables. These travel through snapshot construction as
/// plain data; nothing reads them as process-wide state.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueData {
    /// First-overall draft lottery odds in percent, worst team first.
    #[serde(default = "default_lottery_odds")]
    pub lottery_odds: Vec<f64>,
    /// Fan subreddit per team, ordered by full team name.
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
}

impl Default for LeagueData {
    fn default() -> Self {
        LeagueData {
            lottery_odds: default_lottery_odds(),
            subreddits: default_subreddits(),
        }
    }
}

fn default_reach() -> u32 {
    crate::analysis::DEFAULT_REACH
}

fn default_trials() -> u32 {
    crate::analysis::simulation::DEFAULT_TRIALS
}

fn default_true() -> bool {
    true
}

fn default_lottery_odds() -> Vec<f64> {
    vec![
        18.5, 13.5, 11.5, 9.5, 8.5, 7.5, 6.5, 6.0, 5.0, 3.5, 3.0, 2.5, 2.0, 1.5, 1.0,
    ]
}

fn default_subreddits() -> Vec<String> {
    [
        "anaheimducks",
        "coyotes",
        "bostonbruins",
        "sabres",
        "calgaryflames",
        "canes",
        "hawks",
        "coloradoavalanche",
        "bluejackets",
        "dallasstars",
        "detroitredwings",
        "edmontonoilers",
        "floridapanthers",
        "losangeleskings",
        "wildhockey",
        "habs",
        "predators",
        "devils",
        "newyorkislanders",
        "rangers",
        "ottawasenators",
        "flyers",
        "penguins",
        "sanjosesharks",
        "stlouisblues",
        "tampabaylightning",
        "leafs",
        "canucks",
        "goldenknights",
        "caps",
        "winnipegjets",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub bot: BotSection,
    pub simulation: SimulationConfig,
    pub cache_enabled: bool,
    pub league: LeagueData,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/bot.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("bot.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: BotFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        bot: file.bot,
        simulation: file.simulation,
        cache_enabled: file.cache.enabled,
        league: file.league,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/bot.toml` exists by copying it from `defaults/` when
/// missing. Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let source = defaults_dir.join("bot.toml");
    let target = config_dir.join("bot.toml");
    if !source.exists() || target.exists() {
        return Ok(vec![]);
    }

    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;

    Ok(vec![target])
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying the default config file first when needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.bot.team.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "bot.team".into(),
            message: "must be a team code such as \"mtl\"".into(),
        });
    }

    if config.simulation.trials == 0 {
        return Err(ConfigError::ValidationError {
            field: "simulation.trials".into(),
            message: "must be greater than 0".into(),
        });
    }

    for (idx, odds) in config.league.lottery_odds.iter().enumerate() {
        if !(0.0..=100.0).contains(odds) {
            return Err(ConfigError::ValidationError {
                field: format!("league.lottery_odds[{idx}]"),
                message: format!("must be a percentage between 0 and 100, got {odds}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
