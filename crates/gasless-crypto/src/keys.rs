//! Sender accounts.
//!
//! Flow: mnemonic → BIP-39 seed → BIP-44 path m/44'/60'/0'/0/0 → secp256k1 key

use std::fmt;

use alloy_primitives::{Address, B256};
use alloy_signer_local::coins_bip39::{English, Mnemonic};
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};
use gasless_types::{RelayError, Result};

/// First Ethereum account of a BIP-44 wallet.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

const GENERATED_WORD_COUNT: usize = 24;

/// An address and the key that signs for it. Lives for one run only.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account").field("address", &self.address()).finish_non_exhaustive()
    }
}

impl Account {
    /// Derive the default account from a BIP-39 phrase.
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(DEFAULT_DERIVATION_PATH)
            .map_err(|e| RelayError::Config(format!("invalid derivation path: {e}")))?
            .build()
            .map_err(|e| RelayError::Config(format!("invalid wallet mnemonic: {e}")))?;
        Ok(Self { signer })
    }

    /// Generate a fresh mnemonic and its default account.
    ///
    /// The phrase is returned once so the caller can hand it to the user.
    pub fn generate() -> Result<(Self, String)> {
        let mut rng = rand::thread_rng();
        let mnemonic = Mnemonic::<English>::new_with_count(&mut rng, GENERATED_WORD_COUNT)
            .map_err(|e| RelayError::Config(format!("mnemonic generation failed: {e}")))?;
        let phrase = mnemonic.to_phrase();
        let account = Self::from_mnemonic(&phrase)?;
        Ok((account, phrase))
    }

    pub fn from_private_key(key: &B256) -> Result<Self> {
        let signer = PrivateKeySigner::from_bytes(key)
            .map_err(|e| RelayError::Signing(format!("invalid private key: {e}")))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub(crate) fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}
