//! Network table and credential loading.
//!
//! Networks come from an optional TOML file, overridden by `GASLESS__`
//! environment variables, e.g. `GASLESS__NETWORKS__TEST__RELAY_URL`.

use std::collections::BTreeMap;
use std::path::Path;

use gasless_crypto::Account;
use gasless_types::{NetworkConfig, RelayError, Result};
use serde::Deserialize;
use tracing::{info, warn};

const PLACEHOLDER_API_TOKEN: &str = "YOUR_API_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("GASLESS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RelayError::Config(format!("failed to load {}: {e}", path.display())))?;
        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> Result<Self> {
        config
            .try_deserialize()
            .map_err(|e| RelayError::Config(format!("invalid network table: {e}")))
    }

    /// The validated entry for `network` (`test` or `production`).
    pub fn network(&self, network: &str) -> Result<NetworkConfig> {
        let config = self.networks.get(network).ok_or_else(|| {
            let known: Vec<&str> = self.networks.keys().map(String::as_str).collect();
            RelayError::Config(format!("unknown network '{network}' (configured: {known:?})"))
        })?;
        config.validate()?;
        Ok(config.clone())
    }
}

pub fn require_api_token(token: Option<&str>) -> Result<String> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() && token != PLACEHOLDER_API_TOKEN => Ok(token.to_string()),
        _ => Err(RelayError::Config("RALLY_MOBILE_API_TOKEN not set".into())),
    }
}

/// Restore the account from `mnemonic`, or create a fresh one.
///
/// A freshly generated phrase is returned alongside the account; it is shown
/// exactly once and never logged.
pub fn load_account(mnemonic: Option<&str>) -> Result<(Account, Option<String>)> {
    match mnemonic.map(str::trim).filter(|m| !m.is_empty()) {
        Some(phrase) => {
            let account = Account::from_mnemonic(phrase)?;
            info!(address = %account.address(), "restored account from mnemonic");
            Ok((account, None))
        }
        None => {
            warn!("WALLET_MNEMONIC not set, generating a new account");
            let (account, phrase) = Account::generate()?;
            Ok((account, Some(phrase)))
        }
    }
}
