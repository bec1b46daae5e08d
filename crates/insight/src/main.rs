mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

use insight_core::{ExplorerClient, ExplorerConfig, ExplorerError, TransportSettings};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = ExplorerConfig::from_target(args.url.as_deref(), args.network)
        .context("resolve explorer configuration")?;
    let settings = TransportSettings {
        request_timeout: Duration::from_secs(args.timeout_secs),
        requests_per_second: args.rps,
        ..TransportSettings::default()
    };
    let client =
        ExplorerClient::with_settings(config, &settings).context("build explorer client")?;
    tracing::debug!(
        url = client.config().url(),
        network = %client.network(),
        "explorer client ready"
    );

    let output = run(&client, args.command).await.map_err(|err| {
        let message = format_explorer_error(client.config().url(), &err);
        eyre!(message)
    })?;

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render output")?
    );
    Ok(())
}

async fn run(client: &ExplorerClient, command: Command) -> Result<Value, ExplorerError> {
    let output = match command {
        Command::Tx { txid } => client.get_transaction(&txid).await?,
        Command::Utxos { addresses } => to_json(client.get_utxos(&addresses).await?)?,
        Command::Broadcast { rawtx, instant } => {
            let txid = if instant {
                client.broadcast_instant(rawtx).await?
            } else {
                client.broadcast(rawtx).await?
            };
            serde_json::json!({ "txid": txid })
        }
        Command::Address { address } => to_json(client.address(&address).await?)?,
        Command::Status => serde_json::json!({ "lastblockhash": client.status().await? }),
        Command::Block { hash } => client.get_block_by_hash(&hash).await?,
        Command::LastBlockHash => to_json(client.get_last_block_hash().await?)?,
    };
    Ok(output)
}

fn to_json(value: impl serde::Serialize) -> Result<Value, ExplorerError> {
    serde_json::to_value(value)
        .map_err(|e| ExplorerError::Translation(format!("render result: {e}")))
}

fn format_explorer_error(url: &str, err: &ExplorerError) -> String {
    let mut lines = vec![format!("explorer request to `{url}` failed: {err}")];

    let source_error = match err {
        ExplorerError::Transport(transport) => format!("{transport:?}"),
        _ => return lines.join("\n"),
    };

    if source_error.contains("dns error") || source_error.contains("failed to lookup") {
        lines.push(
            "hint: hostname resolution failed; verify the explorer hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("certificate") || source_error.contains("tls") {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the explorer uses HTTPS"
                .into(),
        );
    } else if source_error.contains("Connection refused")
        || source_error.contains("ConnectionRefused")
    {
        lines.push("hint: connection refused; verify the explorer URL and port".into());
    } else if source_error.contains("TimedOut") || source_error.contains("timed out") {
        lines.push("hint: request timed out; raise --timeout-secs or try again later".into());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::TransportError;

    #[test]
    fn remote_errors_get_no_hint() {
        let err = ExplorerError::Remote {
            status: 404,
            body: Some(serde_json::json!("Not found")),
        };
        let message = format_explorer_error("https://insight.dash.org", &err);
        assert_eq!(
            message,
            "explorer request to `https://insight.dash.org` failed: explorer returned status 404: Not found"
        );
    }

    #[test]
    fn refused_connection_gets_hint() {
        let err = ExplorerError::Transport(TransportError::Unavailable(
            "Connection refused".to_owned(),
        ));
        let message = format_explorer_error("http://127.0.0.1:3001", &err);
        assert!(message.contains("hint: connection refused"));
    }
}
