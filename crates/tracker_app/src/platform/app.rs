use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracker_engine::{
    Collaborators, ConfigArgs, Engine, RandomIdentityProvider, RonHostIdStore, TrackerConfig,
};
use tracker_logging::{tracker_info, tracker_warn, LogDestination};

use super::console_ui::ConsoleUi;
use super::loopback::LoopbackTransport;
use super::page_scraper::PageFileScraper;
use super::page_watcher::PageWatcher;

/// Reports progress read from a page file to the dashboard listener.
#[derive(Debug, Parser)]
#[command(name = "tracker_app", version)]
struct Cli {
    /// JSON file describing the page being tracked
    #[arg(long, default_value = "page.json")]
    page: PathBuf,

    /// Open the host ID prompt right after launch
    #[arg(long)]
    prompt_host: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

pub fn run_app() -> anyhow::Result<()> {
    let Cli {
        page,
        prompt_host,
        config,
    } = Cli::parse();
    let config = TrackerConfig::from(config);
    tracker_logging::initialize(
        LogDestination::Both(PathBuf::from("./tracker.log")),
        tracker_logging::level_for(config.debug),
    );
    tracker_info!("Reading page state from {page:?}");

    let collaborators = Collaborators {
        transport: Box::new(LoopbackTransport::default()),
        scraper: Box::new(PageFileScraper::new(page.clone())),
        ui: Box::new(ConsoleUi::default()),
        identity: Box::new(RandomIdentityProvider::default()),
        store: Box::new(RonHostIdStore::new(config.state_dir.clone())),
    };
    let engine = Engine::new(config, collaborators);
    let handle = engine.handle();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let shutdown = CancellationToken::new();

        let ctrl_c = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.cancel();
            }
        });
        match PageWatcher::new(&page) {
            Ok(watcher) => {
                tokio::spawn(watcher.forward(handle.clone(), shutdown.child_token()));
            }
            Err(err) => tracker_warn!("Not watching {page:?} for changes: {err}"),
        }

        if prompt_host {
            handle.request_settings();
        }

        let state = engine.run(shutdown).await;
        tracker_info!("Final status: {}", state.view().status_line());
    });
    Ok(())
}
