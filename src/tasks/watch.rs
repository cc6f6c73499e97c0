use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher, recommended_watcher};
use tokio::select;
use tokio::sync::mpsc::{self, Sender};
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::events::Command;

/// Editors tend to emit several events per save; collapse them.
const SETTLE: Duration = Duration::from_millis(250);

/// Watch the configuration file and ask the controller to reload on change.
#[instrument(skip(to_controller, cancel), fields(config = %config_path.display()))]
pub async fn run(
    config_path: PathBuf,
    to_controller: Sender<Command>,
    cancel: CancellationToken,
) -> Result<()> {
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", config_path.display()))?;
    // Watch the directory: editors often replace the file instead of writing it.
    let dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Bridge notify callback -> async channel
    let (watch_tx, mut watch_rx) = mpsc::channel::<notify::Result<Event>>(128);
    let mut watcher = recommended_watcher(move |res| {
        let _ = watch_tx.blocking_send(res);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(watching = %dir.display(), "config watcher initialized");

    let mut pending = false;
    loop {
        select! {
            _ = cancel.cancelled() => break,

            Some(res) = watch_rx.recv() => match res {
                Ok(event) if touches(&event, &config_path) => {
                    debug!(kind = ?event.kind, "config file event");
                    pending = true;
                }
                Ok(_) => {}
                Err(err) => error!("watch error: {err}"),
            },

            _ = sleep(SETTLE), if pending => {
                pending = false;
                info!("configuration changed on disk; requesting reload");
                if to_controller.send(Command::Reload).await.is_err() {
                    debug!("controller gone; config watcher exiting");
                    break;
                }
            }
        }
    }
    Ok(())
}

fn touches(event: &Event, config_path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p.file_name() == config_path.file_name())
}
