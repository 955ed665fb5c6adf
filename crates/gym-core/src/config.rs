// Console configuration
//
// Read from the environment; every setting has a default so an empty
// environment yields a working setup.

use std::path::PathBuf;

use crate::error::{GymError, Result};

pub const DEFAULT_STORAGE_PATH: &str = "gym-storage.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GymConfig {
    /// File backing the key-value store (GYM_STORAGE_PATH)
    pub storage_path: Option<PathBuf>,

    /// Seed empty collections before running a command (GYM_SEED_ON_START)
    pub seed_on_start: Option<bool>,

    /// Fixed RNG seed for sample data (GYM_SEED_RNG)
    pub seed_rng: Option<u64>,
}

impl GymConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; used by `from_env` and tests
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed_on_start = lookup("GYM_SEED_ON_START")
            .map(|raw| parse_bool("GYM_SEED_ON_START", &raw))
            .transpose()?;
        let seed_rng = lookup("GYM_SEED_RNG")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    GymError::config(format!("GYM_SEED_RNG must be an unsigned integer, got {raw:?}"))
                })
            })
            .transpose()?;

        Ok(Self {
            storage_path: lookup("GYM_STORAGE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            seed_on_start,
            seed_rng,
        })
    }

    /// Storage path with default
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH))
    }

    /// Seed-on-start flag with default
    pub fn seed_on_start(&self) -> bool {
        self.seed_on_start.unwrap_or(true)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GymError::config(format!(
            "{name} must be a boolean, got {raw:?}"
        ))),
    }
}
