use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::combination::Combination;
use crate::config::Configuration;
use crate::events::Command;
use crate::scan::Library;
use crate::session::Session;

/// Owns the session and serializes every mutation of it.
///
/// Rules:
/// - Commands are applied in arrival order; each one regenerates and
///   publishes before the next is looked at.
/// - Slideshow ticks are polled in the same loop, so a tick never races a
///   cursor move or a regeneration.
/// - `Reload` re-reads `config_path` and rebuilds the whole model; a broken
///   file keeps the current model.
/// - On exit the slideshow timer is stopped.
pub async fn run(
    config_path: PathBuf,
    mut session: Session,
    mut commands: Receiver<Command>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut commands_open = true;
    loop {
        select! {
            _ = cancel.cancelled() => break,

            maybe_cmd = commands.recv(), if commands_open => {
                match maybe_cmd {
                    Some(Command::Quit) => {
                        info!("quit requested");
                        cancel.cancel();
                        break;
                    }
                    Some(Command::Reload) => reload(&config_path, &mut session),
                    Some(cmd) => apply(&mut session, cmd),
                    None => {
                        // All producers gone; keep the slideshow running until cancelled.
                        debug!("command channel closed");
                        commands_open = false;
                    }
                }
            }

            _ = session.next_tick() => {
                session.tick();
            }
        }
    }

    session.shutdown();
    info!("controller stopped");
    Ok(())
}

/// Apply a command that only touches in-memory state.
///
/// `Reload` and `Quit` need the controller's context and are ignored here.
pub fn apply(session: &mut Session, cmd: Command) {
    debug!(?cmd, "applying command");
    match cmd {
        Command::Next => {
            session.next();
        }
        Command::Previous => {
            session.previous();
        }
        Command::Select(category, name) => {
            session.select(category, &name);
        }
        Command::Deselect(category, name) => {
            session.deselect(category, &name);
        }
        Command::Toggle(category, name) => {
            session.toggle(category, &name);
        }
        Command::Only(category, names) => {
            session.replace(category, &names);
        }
        Command::SelectAll(category) => {
            session.select_all(category);
        }
        Command::SelectNone(category) => {
            session.select_none(category);
        }
        Command::ToggleOverlay => {
            session.toggle_overlay();
        }
        Command::TogglePlayback => {
            session.toggle_playback();
        }
        Command::Reload | Command::Quit => {
            warn!(?cmd, "command needs the controller loop; ignoring");
        }
    }
}

/// Re-read configuration and rediscover the library.
pub fn reload(config_path: &Path, session: &mut Session) {
    let cfg = match Configuration::from_json_file(config_path).and_then(Configuration::validated) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(
                path = %config_path.display(),
                error = ?err,
                "reload failed; keeping current model"
            );
            return;
        }
    };
    let library = Library::discover(&cfg);
    session.load(&cfg, library);
    info!(path = %config_path.display(), "configuration reloaded");
}

/// Walk the cursor `iterations` times without starting any task.
pub fn simulate(
    cfg: &Configuration,
    library: Library,
    iterations: usize,
    seed: Option<u64>,
) -> Vec<Combination> {
    let mut session = Session::new(cfg, library, seed);
    let mut plan = Vec::new();
    let Some(first) = session.current().cloned() else {
        return plan;
    };
    plan.push(first);
    while plan.len() < iterations {
        match session.next() {
            Some(next) => plan.push(next.clone()),
            None => break,
        }
    }
    plan.truncate(iterations);
    plan
}
