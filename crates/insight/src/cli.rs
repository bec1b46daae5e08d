use clap::{Parser, Subcommand};
use insight_core::Network;

/// Query an Insight block explorer and broadcast transactions.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Explorer base URL, or a network name (`mainnet`, `testnet`) to use
    /// that network's public explorer.
    #[arg(long, env = "INSIGHT_URL")]
    pub url: Option<String>,

    /// Network whose addresses are accepted.
    #[arg(long, env = "INSIGHT_NETWORK", value_parser = parse_network)]
    pub network: Option<Network>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30", env = "INSIGHT_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Maximum outbound requests per second (unlimited if omitted).
    #[arg(long, env = "INSIGHT_RPS")]
    pub rps: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a transaction by id.
    Tx { txid: String },

    /// List unspent outputs of one or more addresses.
    Utxos {
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Broadcast a hex-encoded signed transaction.
    Broadcast {
        rawtx: String,

        /// Request instant-send handling.
        #[arg(long)]
        instant: bool,
    },

    /// Show balance and history summary of an address.
    Address { address: String },

    /// Print the last block hash reported by the explorer status.
    Status,

    /// Fetch a block by hash.
    Block { hash: String },

    /// Print the chain tip hash.
    LastBlockHash,
}

fn parse_network(value: &str) -> Result<Network, String> {
    value.parse().map_err(|e: insight_core::ExplorerError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utxos_with_several_addresses() {
        let cli = Cli::try_parse_from(["insight", "--network", "testnet", "utxos", "yA", "yB"])
            .expect("valid arguments");
        assert_eq!(cli.network, Some(Network::Testnet));
        assert!(matches!(cli.command, Command::Utxos { ref addresses } if addresses.len() == 2));
    }

    #[test]
    fn utxos_requires_an_address() {
        assert!(Cli::try_parse_from(["insight", "utxos"]).is_err());
    }

    #[test]
    fn broadcast_instant_flag() {
        let cli = Cli::try_parse_from(["insight", "broadcast", "0100", "--instant"])
            .expect("valid arguments");
        assert!(matches!(cli.command, Command::Broadcast { instant: true, .. }));
    }

    #[test]
    fn unknown_network_rejected() {
        assert!(Cli::try_parse_from(["insight", "--network", "regtest", "status"]).is_err());
    }
}
