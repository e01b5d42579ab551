//! Configuration of the didbtc tool.

use std::{fs, io, path::Path};

use bitcoin::{Amount, Network};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default value for `did_sats` in [`Config`]. Also the smallest accepted value.
const DEFAULT_DID_SATS: u64 = 330;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] io::Error),

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("did_sats must be at least {DEFAULT_DID_SATS}, got {0}")]
    DidSatsBelowDust(u64),

    #[error("fee_rate must be at least 1 sat/vB")]
    ZeroFeeRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Network transactions are built for and addresses are checked against.
    #[serde(default = "default_network")]
    pub network: Network,

    /// Value of each new DID output in sats.
    #[serde(default = "default_did_sats")]
    pub did_sats: u64,

    /// Fee rate in sat/vB used when none is given on the command line.
    #[serde(default)]
    pub fee_rate: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of compact text.
    #[serde(default)]
    pub json: bool,
}

fn default_network() -> Network {
    Network::Bitcoin
}

fn default_did_sats() -> u64 {
    DEFAULT_DID_SATS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: default_network(),
            did_sats: default_did_sats(),
            fee_rate: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config at `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.did_sats < DEFAULT_DID_SATS {
            return Err(ConfigError::DidSatsBelowDust(self.did_sats));
        }
        if self.fee_rate == Some(0) {
            return Err(ConfigError::ZeroFeeRate);
        }
        Ok(())
    }

    pub fn did_value(&self) -> Amount {
        Amount::from_sat(self.did_sats)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().did_value(), Amount::from_sat(330));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
network = "testnet"
did_sats = 1000
fee_rate = 17

[logging]
json = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.did_sats, 1000);
        assert_eq!(config.fee_rate, Some(17));
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            Config::from_toml("did_sats = 329"),
            Err(ConfigError::DidSatsBelowDust(329))
        ));
        assert!(matches!(
            Config::from_toml("fee_rate = 0"),
            Err(ConfigError::ZeroFeeRate)
        ));
        assert!(matches!(
            Config::from_toml("network = \"moonnet\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
