//! Client for Insight block explorers.
//!
//! [`ExplorerClient`] exposes one async operation per explorer capability
//! (transactions, UTXOs, broadcast, address summaries, status, blocks).
//! Arguments are validated locally, each operation issues a single HTTP
//! request through a [`transport::Transport`], and responses are mapped to
//! domain values by the pure functions in [`translate`].

pub mod client;
pub mod config;
pub mod error;
pub mod network;
pub mod translate;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use client::ExplorerClient;
pub use config::{ExplorerConfig, TransportSettings};
pub use error::{ExplorerError, TransportError};
pub use network::Network;
pub use types::{Address, AddressInfo, AddressKind, LastBlockHash, RawTransaction, UnspentOutput};
