use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

pub const MAINNET_EXPLORER_URL: &str = "https://insight.dash.org";
pub const TESTNET_EXPLORER_URL: &str = "https://insight.testnet.networks.dash.org:3002";

/// The chain a client talks to. Selects both the default explorer host and
/// the address version bytes accepted during validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn default_url(self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_EXPLORER_URL,
            Self::Testnet => TESTNET_EXPLORER_URL,
        }
    }

    /// Version byte of pay-to-pubkey-hash addresses.
    pub fn pubkey_prefix(self) -> u8 {
        match self {
            Self::Mainnet => 76,
            Self::Testnet => 140,
        }
    }

    /// Version byte of pay-to-script-hash addresses.
    pub fn script_prefix(self) -> u8 {
        match self {
            Self::Mainnet => 16,
            Self::Testnet => 19,
        }
    }

    /// Resolve a network name, accepting the aliases explorers and wallets
    /// commonly use. Returns `None` for anything else (e.g. a URL).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "livenet" | "mainnet" | "main" => Some(Self::Mainnet),
            "testnet" | "test" => Some(Self::Testnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| ExplorerError::InvalidArgument(format!("unknown network `{s}`")))
    }
}
