//! hostctl agent entry point: a line-oriented stdio host.
//!
//! Reads one JSON request per line from stdin, dispatches it through the
//! [`CommandAdapter`] and writes one JSON reply per line to stdout.  Logs go
//! to stderr so stdout carries nothing but replies.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                 -- TOML, defaults when absent
//!  └─ init tracing                  -- RUST_LOG, else config log_level
//!  └─ build_backend(config.backend) -- native / unsupported / mock
//!  └─ serve()                       -- stdin lines -> CommandAdapter -> stdout
//!       └─ ends on EOF or Ctrl-C; dropping the adapter releases any grab
//! ```
//!
//! On macOS the confinement event tap lives on the main run loop, so the
//! main thread pumps that run loop while `serve()` runs on a worker thread.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hostctl_agent::infrastructure::{
    backend::build_backend,
    command_adapter::CommandAdapter,
    config::{load_config, AgentConfig},
    system_info::SysinfoProvider,
    window_handle::StaticWindowHandle,
};

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AgentConfig::default(), Some(e)),
    };

    // Logs go to stderr; `RUST_LOG` overrides the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    if let Some(e) = config_error {
        error!("failed to load configuration: {e}");
        return Err(e).context("loading configuration");
    }

    let backend = build_backend(config.agent.backend);
    info!(backend = backend.name(), window = ?config.window, "hostctl agent starting");

    let adapter = CommandAdapter::new(
        backend,
        Arc::new(StaticWindowHandle::new(config.window)),
        Arc::new(SysinfoProvider::new()),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    run(runtime, adapter)?;

    info!("hostctl agent stopped");
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(runtime: tokio::runtime::Runtime, adapter: CommandAdapter) -> anyhow::Result<()> {
    runtime.block_on(serve(adapter))
}

#[cfg(target_os = "macos")]
fn run(runtime: tokio::runtime::Runtime, adapter: CommandAdapter) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};

    use hostctl_agent::infrastructure::backend::macos::pump_main_run_loop;

    let done = Arc::new(AtomicBool::new(false));
    let done_worker = Arc::clone(&done);
    let worker = std::thread::Builder::new()
        .name("hostctl-serve".into())
        .spawn(move || {
            let result = runtime.block_on(serve(adapter));
            done_worker.store(true, Ordering::Release);
            result
        })
        .context("spawning request thread")?;

    while !done.load(Ordering::Acquire) {
        pump_main_run_loop(0.05);
    }

    let joined = worker.join();
    // Frees a tap released by the worker after the last pass.
    pump_main_run_loop(0.0);

    match joined {
        Ok(result) => result,
        Err(_) => anyhow::bail!("request thread panicked"),
    }
}

/// Serves requests until stdin closes or Ctrl-C arrives.
async fn serve(mut adapter: CommandAdapter) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("hostctl agent ready; reading requests from stdin");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = adapter.handle_line(&line);
                stdout.write_all(reply.as_bytes()).await.context("writing reply")?;
                stdout.write_all(b"\n").await.context("writing reply")?;
                stdout.flush().await.context("flushing stdout")?;
            }
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    if adapter.is_grabbing() {
        info!("releasing pointer grab on shutdown");
    }
    drop(adapter);
    Ok(())
}
