//! PagePilot demo runner.
//!
//! Drives the watchdog against an in-memory page: a conversation pane with a
//! composer and a tab strip, into which a "Connection failed" banner is
//! injected partway through. Watch the logs (RUST_LOG=debug for detail) to
//! see the preview-click flow, the back-off, and the toast traffic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagepilot::{install, uninstall, Dom, EngineConfig, MemoryDom, NodeKind};

/// PagePilot demo CLI.
#[derive(Parser)]
#[command(name = "pagepilot")]
#[command(about = "UI watchdog demo against an in-memory page")]
#[command(version)]
struct Cli {
    /// Watcher polling period in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_ms: u64,

    /// Idle timeout before tab cycling, in milliseconds
    #[arg(long, default_value_t = 60_000)]
    idle_timeout_ms: u64,

    /// Seconds after start at which the failure banner is injected
    #[arg(long, default_value_t = 2)]
    inject_after_secs: u64,

    /// Total demo duration in seconds
    #[arg(long, default_value_t = 12)]
    run_secs: u64,

    /// Enable verbose watchdog diagnostics
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dom = Arc::new(MemoryDom::new());
    let root = dom.add_root(NodeKind::Block);
    let pane = dom.add(root, NodeKind::ConversationPane, "");
    let _composer = dom.add(pane, NodeKind::Composer, "");
    let strip = dom.add(pane, NodeKind::TabStrip, "");
    dom.add(strip, NodeKind::Tab, "Chat");
    dom.add(strip, NodeKind::Tab, "Files");

    let mut config = EngineConfig::default();
    config.poll.watcher_interval_ms = cli.poll_ms;
    config.idle.idle_timeout_ms = cli.idle_timeout_ms;

    let session = install(Arc::clone(&dom) as Arc<dyn Dom>, config, false)?;
    session.set_debug(cli.debug);

    tokio::time::sleep(Duration::from_secs(cli.inject_after_secs)).await;
    info!("injecting a connection-failure banner");
    let banner = dom.add(
        pane,
        NodeKind::Block,
        "Connection failed. Check your network.",
    );
    let button = dom.add(banner, NodeKind::Button, "Try again");

    // Resolve the banner once the retry button gets clicked, like a page
    // whose reconnect attempt succeeds.
    let watch_dom = Arc::clone(&dom);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if watch_dom.clicks().contains(&button) {
                info!("retry clicked, banner resolves");
                watch_dom.detach(banner);
                break;
            }
        }
    });

    tokio::time::sleep(Duration::from_secs(
        cli.run_secs.saturating_sub(cli.inject_after_secs),
    ))
    .await;

    info!(clicks = dom.clicks().len(), "demo finished");
    uninstall(false);
    Ok(())
}
