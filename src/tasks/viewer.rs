use anyhow::Result;
use tokio::select;
use tokio::sync::watch::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::combination::Combination;
use crate::session::SessionSnapshot;

/// Log-only presenter: reports what would be on screen.
pub async fn run(snapshots: Receiver<SessionSnapshot>, cancel: CancellationToken) -> Result<()> {
    run_with(snapshots, cancel, |snap, fresh| {
        if fresh {
            present(snap);
        } else {
            show_image(snap);
        }
    })
    .await
}

/// Feed every published snapshot to `show`, starting with the one current at
/// subscription time.
///
/// `show` gets `true` when the generation or combination differs from the
/// last snapshot it saw, and `false` for image-only changes.
pub async fn run_with<F>(
    mut snapshots: Receiver<SessionSnapshot>,
    cancel: CancellationToken,
    mut show: F,
) -> Result<()>
where
    F: FnMut(&SessionSnapshot, bool),
{
    let initial = snapshots.borrow_and_update().clone();
    show(&initial, true);
    let mut shown: (u64, Option<Combination>) = (initial.generation, initial.combination);
    loop {
        select! {
            _ = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    debug!("session publisher dropped; viewer exiting");
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                let key = (snap.generation, snap.combination.clone());
                let fresh = shown != key;
                show(&snap, fresh);
                shown = key;
            }
        }
    }
    Ok(())
}

fn present(snap: &SessionSnapshot) {
    match &snap.combination {
        Some(combo) => info!(
            video = %combo.video,
            gallery = %combo.gallery,
            position = ?snap.position,
            total = snap.total,
            images = snap.image_count,
            overlay = snap.playback.overlay_visible,
            playing = snap.playback.playing,
            "now showing"
        ),
        None => info!(total = snap.total, "nothing to show for the current selection"),
    }
}

fn show_image(snap: &SessionSnapshot) {
    match &snap.image {
        Some(image) => debug!(
            image = %image.display(),
            index = ?snap.image_position,
            count = snap.image_count,
            "displaying image"
        ),
        None => debug!("image not found"),
    }
}
