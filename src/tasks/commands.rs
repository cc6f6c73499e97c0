use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::Command;

/// Read one command per line from `input` and forward it to the controller.
///
/// Blank lines and `#` comments are skipped; unparsable lines are reported
/// and skipped. End of input cancels the session.
///
/// Cancellation returns at once, but with `tokio::io::stdin()` the pending
/// read stays parked on a blocking thread; the binary bounds that with
/// `Runtime::shutdown_timeout`.
pub async fn run<R>(
    input: R,
    to_controller: Sender<Command>,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    loop {
        let line = select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            info!("input closed; initiating shutdown");
            cancel.cancel();
            break;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Command>() {
            Ok(cmd) => {
                if to_controller.send(cmd).await.is_err() {
                    debug!("controller gone; command reader exiting");
                    break;
                }
            }
            Err(err) => warn!(line, "{err:#}"),
        }
    }
    Ok(())
}
