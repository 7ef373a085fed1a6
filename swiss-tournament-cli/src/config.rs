use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use swiss_tournament_core::PairingOptions;
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    /// Directory holding one JSON document per tournament.
    pub data_dir: PathBuf,
    /// Seed for the first round draw. A random seed is used if unset.
    pub seed: Option<u64>,
    pub pairing: PairingOptions,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read(path)?;
        Ok(toml::from_slice(&buf)?)
    }

    /// Reads the config file at `path`, falling back to the defaults if it does not exist, and
    /// applies the environment on top.
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let config = match Self::from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => return Err(err),
        };

        Ok(config.with_environment())
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "ST_LOGLEVEL", loglevel, "ST_DATA_DIR", data_dir);

        if let Ok(value) = env::var("ST_SEED") {
            if let Ok(value) = value.parse() {
                self.seed = Some(value);
            }
        }

        from_environment!(
            self.pairing,
            "ST_BACKTRACK_BUDGET",
            backtrack_budget,
            "ST_REPAIR_ATTEMPTS",
            repair_attempts,
        );

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            data_dir: PathBuf::from("data"),
            seed: None,
            pairing: PairingOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
