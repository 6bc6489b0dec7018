use std::{env, num::ParseIntError, path::PathBuf, str::FromStr};

use pool_ledger::PoolConfig;
use thiserror::Error;

const DEV_STATE_DIR: &str = "tombola.dev.state";
const PROD_STATE_DIR: &str = "tombola.state";

/// Deployment target for the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::UnknownEnvironment {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub pool: PoolConfig,
}

impl AppConfig {
    /// Builds the pool configuration for the target environment.
    /// `TOMBOLA_STATE_DIR` overrides the state directory, `TOMBOLA_SEED`
    /// pins the draw generator for reproducible runs.
    pub fn load(target: Environment) -> Result<Self, ConfigError> {
        let state_dir = match env::var("TOMBOLA_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from(match target {
                Environment::Dev => DEV_STATE_DIR,
                Environment::Prod => PROD_STATE_DIR,
            }),
        };

        let mut pool = PoolConfig::new(state_dir);
        if let Ok(raw) = env::var("TOMBOLA_SEED") {
            let seed = raw
                .parse()
                .map_err(|source| ConfigError::InvalidSeed { raw, source })?;
            pool.seed = Some(seed);
        }

        Ok(Self { env: target, pool })
    }

    pub fn env_label(&self) -> &'static str {
        match self.env {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment {value:?}, expected dev or prod")]
    UnknownEnvironment { value: String },
    #[error("TOMBOLA_SEED {raw:?} is not a valid u64: {source}")]
    InvalidSeed { raw: String, source: ParseIntError },
}
