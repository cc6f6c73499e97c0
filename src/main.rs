//! Binary entrypoint for pairshow.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use pairshow::config::Configuration;
use pairshow::events::Command;
use pairshow::scan::Library;
use pairshow::session::Session;
use pairshow::tasks;
use pairshow::thumbnails::{self, ExternalTool, ThumbnailProgress};

#[derive(Debug, Parser)]
#[command(
    name = "pairshow",
    version,
    about = "Shuffle videos with matching image galleries"
)]
struct Args {
    /// Path to JSON config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Deterministic RNG seed for combination shuffling
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Override the gallery rotation period (e.g. "2s", "500ms")
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    interval: Option<Duration>,
    /// Print the first N combinations in playback order and exit
    #[arg(long = "dry-run", value_name = "ITERATIONS")]
    dry_run: Option<usize>,
    /// Do not run the thumbnail tool before starting
    #[arg(long)]
    skip_thumbnails: bool,
    /// Reload automatically when the config file changes
    #[arg(long)]
    watch_config: bool,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("pairshow={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

/// Grace period for blocking work still running when the tasks finish.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let result = runtime.block_on(run(args));
    // tokio's stdin reads on a blocking thread that cannot be interrupted;
    // waiting for it would hang until the next keypress.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run(args: Args) -> Result<()> {
    let mut cfg = Configuration::from_json_file(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?
        .validated()
        .context("invalid configuration values")?;
    if let Some(interval) = args.interval {
        anyhow::ensure!(!interval.is_zero(), "--interval must be greater than zero");
        cfg.slideshow_interval = interval;
    }
    info!(
        config = %args.config.display(),
        interval = %humantime::format_duration(cfg.slideshow_interval),
        "configuration loaded"
    );

    let library = Library::discover(&cfg);

    if let Some(iterations) = args.dry_run {
        let plan = tasks::controller::simulate(&cfg, library, iterations, args.seed);
        if plan.is_empty() {
            println!("no combinations match the current selection");
        }
        for (i, combo) in plan.iter().enumerate() {
            println!("{i:>4}  {combo}");
        }
        return Ok(());
    }

    if args.skip_thumbnails {
        info!("thumbnail generation skipped by request");
    } else {
        generate_thumbnails(&cfg, &library).await?;
    }

    let session = Session::new(&cfg, library, args.seed);
    let snapshots = session.subscribe();

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32); // Inputs -> Controller
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    #[cfg(unix)]
    {
        let cancel = cancel.clone();
        let control = cmd_tx.clone();
        tokio::spawn(async move {
            match signal(SignalKind::hangup()) {
                Ok(mut sighup) => loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        received = sighup.recv() => {
                            if received.is_none() {
                                break;
                            }
                            info!("SIGHUP received; reloading configuration");
                            if let Err(err) = control.send(Command::Reload).await {
                                warn!("failed to forward reload request: {err}");
                                break;
                            }
                        }
                    }
                },
                Err(err) => warn!("failed to register SIGHUP handler: {err}"),
            }
        });
    }

    let mut tasks = JoinSet::new();

    if io::stdin().is_terminal() {
        let cmd_tx = cmd_tx.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            tasks::commands::run(tokio::io::stdin(), cmd_tx, cancel)
                .await
                .context("command reader failed")
        });
    } else {
        tracing::debug!("stdin is not a terminal; skipping command reader");
    }

    if args.watch_config {
        let cmd_tx = cmd_tx.clone();
        let cancel = cancel.clone();
        let path = args.config.clone();
        tasks.spawn(async move {
            tasks::watch::run(path, cmd_tx, cancel)
                .await
                .context("config watcher failed")
        });
    }

    tasks.spawn({
        let cancel = cancel.clone();
        async move {
            tasks::viewer::run(snapshots, cancel)
                .await
                .context("viewer task failed")
        }
    });

    tasks.spawn({
        let cancel = cancel.clone();
        let path = args.config.clone();
        async move {
            tasks::controller::run(path, session, cmd_rx, cancel)
                .await
                .context("controller task failed")
        }
    });
    drop(cmd_tx);

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                cancel.cancel();
                return Err(err);
            }
            Err(err) => {
                cancel.cancel();
                return Err(anyhow!("task panicked: {err}"));
            }
        }
    }
    Ok(())
}

/// Run the thumbnail batch on its worker thread and wait for it.
async fn generate_thumbnails(cfg: &Configuration, library: &Library) -> Result<()> {
    let Some(tool) = cfg.thumbnail_tool.as_ref() else {
        info!("no thumbnail tool configured; skipping thumbnails");
        return Ok(());
    };
    let (handle, progress) = thumbnails::spawn_batch(
        library.videos.clone(),
        cfg.vid_path.clone(),
        cfg.thumb_dir(),
        ExternalTool::from(tool),
    )
    .context("failed to start thumbnail worker")?;

    // Progress is informational only.
    let reporter = tokio::task::spawn_blocking(move || {
        for event in progress.iter() {
            match event {
                ThumbnailProgress::Started { total } => info!(total, "generating thumbnails"),
                ThumbnailProgress::Generated(video) => info!(video = %video, "thumbnail generated"),
                ThumbnailProgress::Skipped(video) => {
                    tracing::debug!(video = %video, "thumbnail up to date")
                }
                ThumbnailProgress::Failed { video, reason } => {
                    warn!(video = %video, reason = %reason, "thumbnail failed")
                }
                ThumbnailProgress::Finished(_) => break,
            }
        }
    });

    let outcome = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("thumbnail join failed")?
        .map_err(|_| anyhow!("thumbnail worker panicked"))?;
    let _ = reporter.await;
    outcome.context("thumbnail generation failed")?;
    Ok(())
}
