use std::sync::Once;

use insight_core::{ExplorerClient, ExplorerConfig, Network};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("insight_core=debug")),
            )
            .with_target(true)
            .try_init();
    });
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires network access to the public testnet explorer"]
async fn testnet_explorer_reports_chain_tip() {
    init_tracing();

    let client = ExplorerClient::new(ExplorerConfig::for_network(Network::Testnet))
        .expect("client must construct");

    let tip = client
        .get_last_block_hash()
        .await
        .expect("testnet getLastBlockHash must succeed");
    assert_eq!(tip.last_block_hash.len(), 64, "tip hash must be 64 hex chars");

    eprintln!("[itest] fetching block {}", tip.last_block_hash);
    let block = client
        .get_block_by_hash(&tip.last_block_hash)
        .await
        .expect("tip block must be retrievable");
    assert_eq!(
        block.get("hash").and_then(serde_json::Value::as_str),
        Some(tip.last_block_hash.as_str())
    );
}
