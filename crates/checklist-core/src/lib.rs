pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod memory;
pub mod render;
pub mod store;
pub mod timer;

use std::ffi::OsString;
use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::http::HttpTaskStore;
use crate::memory::MemoryTaskStore;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        offline = cli.offline,
        "starting checklist CLI"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value)))?;
    debug!(?cfg, "resolved config");

    let renderer = render::Renderer::new(&cfg);
    let command = cli.command.unwrap_or_default();

    // Single-threaded: every mutation completes on this one event loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut out = io::stdout().lock();
    if cli.offline {
        runtime.block_on(commands::dispatch(
            &cfg,
            |user_id| Ok(MemoryTaskStore::new(user_id)),
            &renderer,
            command,
            &mut out,
        ))?;
    } else {
        let timeout = cfg.request_timeout();
        let base_url = cfg.api.base_url.clone();
        runtime.block_on(commands::dispatch(
            &cfg,
            |user_id| HttpTaskStore::new(&base_url, user_id, timeout),
            &renderer,
            command,
            &mut out,
        ))?;
    }

    info!("done");
    Ok(())
}
