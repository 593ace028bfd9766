//! Engine configuration: defaults, an optional TOML file, then environment
//! overrides, validated once everything is merged.
//!
//! # Environment Variables
//!
//! - `HOLDEM_CONFIG`: path to a TOML file with `[table]` / `[simulation]` tables
//! - `HOLDEM_SEED`: seed for deals and simulations
//! - `HOLDEM_PLAYERS`: table size for both the table and the simulator
//! - `HOLDEM_TRIALS`: simulation trial count

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, GameError};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

/// Table parameters for [`crate::game::GameState::make_with_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub players: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Seed for the first deal; later hands derive theirs from it
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            players: 9,
            starting_stack: 200,
            small_blind: 1,
            big_blind: 2,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        validate_players(self.players)?;
        if self.starting_stack == 0 {
            return Err(GameError::InvalidTable(
                "starting_stack must be > 0".into(),
            ));
        }
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(GameError::InvalidTable("blinds must be > 0".into()));
        }
        validate_chip_total((0..self.players).map(|_| u64::from(self.starting_stack)))?;
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidTable(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        Ok(())
    }
}

/// Checks a table size against the supported 2..=10 range.
pub fn validate_players(players: usize) -> Result<(), GameError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        Ok(())
    } else {
        Err(GameError::InvalidTable(format!(
            "{} players, expected {}..={}",
            players, MIN_PLAYERS, MAX_PLAYERS
        )))
    }
}

/// Every chip at a table must fit the `u32` pot.
pub fn validate_chip_total(chips: impl IntoIterator<Item = u64>) -> Result<(), GameError> {
    let total: u64 = chips.into_iter().sum();
    if total > u64::from(u32::MAX) {
        return Err(GameError::InvalidTable(format!(
            "{} chips at the table, at most {}",
            total,
            u32::MAX
        )));
    }
    Ok(())
}

/// Parameters for [`crate::simulate::Simulator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub trials: u64,
    pub players: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Independent shards run in parallel; 0 means one per worker thread
    #[serde(default)]
    pub shards: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 1_000_000,
            players: 3,
            seed: None,
            shards: 0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        validate_players(self.players)?;
        if self.trials == 0 {
            return Err(GameError::InvalidTable("trials must be >= 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub table: TableConfig,
    pub simulation: SimulationConfig,
    /// Directory holding `odds_{n}_handed.csv` files
    pub odds_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            simulation: SimulationConfig::default(),
            odds_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub players: ValueSource,
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub trials: ValueSource,
    pub shards: ValueSource,
    pub odds_dir: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            players: ValueSource::Default,
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            trials: ValueSource::Default,
            shards: ValueSource::Default,
            odds_dir: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: EngineConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    table: Option<FileTable>,
    #[serde(default)]
    simulation: Option<FileSimulation>,
    #[serde(default)]
    odds_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileTable {
    players: Option<usize>,
    starting_stack: Option<u32>,
    small_blind: Option<u32>,
    big_blind: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSimulation {
    trials: Option<u64>,
    players: Option<usize>,
    seed: Option<u64>,
    shards: Option<usize>,
}

pub fn load() -> Result<EngineConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let file = match std::env::var("HOLDEM_CONFIG") {
        Ok(path) if !path.is_empty() => Some(read_file(Path::new(&path))?),
        _ => None,
    };
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
    resolve(file, env)
}

/// Parses a config file without applying environment overrides.
pub fn load_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    resolve(Some(read_file(path)?), |_| None).map(|r| r.config)
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}

fn resolve(
    file: Option<FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = EngineConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(f) = file {
        if let Some(t) = f.table {
            if let Some(v) = t.players {
                cfg.table.players = v;
                sources.players = ValueSource::File;
            }
            if let Some(v) = t.starting_stack {
                cfg.table.starting_stack = v;
                sources.starting_stack = ValueSource::File;
            }
            if let Some(v) = t.small_blind {
                cfg.table.small_blind = v;
                sources.small_blind = ValueSource::File;
            }
            if let Some(v) = t.big_blind {
                cfg.table.big_blind = v;
                sources.big_blind = ValueSource::File;
            }
            if let Some(v) = t.seed {
                cfg.table.seed = Some(v);
                sources.seed = ValueSource::File;
            }
        }
        if let Some(s) = f.simulation {
            if let Some(v) = s.trials {
                cfg.simulation.trials = v;
                sources.trials = ValueSource::File;
            }
            if let Some(v) = s.players {
                cfg.simulation.players = v;
                sources.players = ValueSource::File;
            }
            if let Some(v) = s.seed {
                cfg.simulation.seed = Some(v);
                sources.seed = ValueSource::File;
            }
            if let Some(v) = s.shards {
                cfg.simulation.shards = v;
                sources.shards = ValueSource::File;
            }
        }
        if let Some(v) = f.odds_dir {
            cfg.odds_dir = v;
            sources.odds_dir = ValueSource::File;
        }
    }

    if let Some(seed) = env("HOLDEM_SEED") {
        let seed: u64 = seed
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?;
        cfg.table.seed = Some(seed);
        cfg.simulation.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(players) = env("HOLDEM_PLAYERS") {
        let players: usize = players
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid players: {}", players)))?;
        cfg.table.players = players;
        cfg.simulation.players = players;
        sources.players = ValueSource::Env;
    }
    if let Some(trials) = env("HOLDEM_TRIALS") {
        cfg.simulation.trials = trials
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid trials: {}", trials)))?;
        sources.trials = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn validate(cfg: &EngineConfig) -> Result<(), ConfigError> {
    cfg.table
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    cfg.simulation
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Ok(())
}
