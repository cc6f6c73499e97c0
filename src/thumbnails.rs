//! Batch thumbnail generation through an external per-video tool.
//!
//! The batch only reads configuration and writes files, so it runs on a
//! worker thread and reports progress over a channel. It never touches the
//! selection or combination state.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, info, warn};

use crate::config::ThumbnailToolConfig;
use crate::error::Error;

/// Renders one thumbnail for one video into a directory.
pub trait ThumbnailTool {
    /// Produce `<video-stem>.jpg` inside `out_dir`.
    ///
    /// # Errors
    /// Any error is reported for this video only; the batch continues.
    fn render(&self, video: &Path, out_dir: &Path) -> Result<(), Error>;
}

/// Invokes an external program as `<program> <args...> <video> <out_dir>`.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

impl From<&ThumbnailToolConfig> for ExternalTool {
    fn from(cfg: &ThumbnailToolConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            args: cfg.args.clone(),
        }
    }
}

impl ThumbnailTool for ExternalTool {
    fn render(&self, video: &Path, out_dir: &Path) -> Result<(), Error> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(video)
            .arg(out_dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ToolFailed {
                video: video.to_path_buf(),
                status,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub enum ThumbnailProgress {
    Started { total: usize },
    Generated(String),
    Skipped(String),
    Failed { video: String, reason: String },
    Finished(BatchReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Path of the thumbnail expected for `video` inside `out_dir`.
pub fn thumbnail_path(out_dir: &Path, video: &str) -> PathBuf {
    let stem = Path::new(video)
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| video.into());
    let mut name = stem;
    name.push(".jpg");
    out_dir.join(name)
}

/// Render missing thumbnails for `videos` (names inside `video_dir`).
///
/// Videos whose thumbnail already exists are skipped, so re-running the batch
/// invokes nothing. Per-video failures are logged and counted.
///
/// # Errors
/// Returns [`Error::ThumbDir`] if `out_dir` cannot be created; nothing is
/// invoked in that case.
pub fn run_batch<T: ThumbnailTool + ?Sized>(
    videos: &[String],
    video_dir: &Path,
    out_dir: &Path,
    tool: &T,
    progress: Option<&Sender<ThumbnailProgress>>,
) -> Result<BatchReport, Error> {
    fs::create_dir_all(out_dir).map_err(|source| Error::ThumbDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let report_progress = |event: ThumbnailProgress| {
        if let Some(tx) = progress {
            // Receiver gone only means nobody is listening anymore.
            let _ = tx.send(event);
        }
    };

    report_progress(ThumbnailProgress::Started {
        total: videos.len(),
    });
    let mut report = BatchReport::default();
    for video in videos {
        let target = thumbnail_path(out_dir, video);
        if target.exists() {
            debug!(video = %video, "thumbnail exists; skipping");
            report.skipped += 1;
            report_progress(ThumbnailProgress::Skipped(video.clone()));
            continue;
        }
        match tool.render(&video_dir.join(video), out_dir) {
            Ok(()) => {
                debug!(video = %video, thumb = %target.display(), "thumbnail rendered");
                report.generated += 1;
                report_progress(ThumbnailProgress::Generated(video.clone()));
            }
            Err(err) => {
                warn!(video = %video, error = %err, "thumbnail failed; continuing");
                report.failed += 1;
                report_progress(ThumbnailProgress::Failed {
                    video: video.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        generated = report.generated,
        skipped = report.skipped,
        failed = report.failed,
        "thumbnail batch complete"
    );
    report_progress(ThumbnailProgress::Finished(report.clone()));
    Ok(report)
}

/// Run [`run_batch`] on a dedicated thread and hand back its progress feed.
pub fn spawn_batch<T>(
    videos: Vec<String>,
    video_dir: PathBuf,
    out_dir: PathBuf,
    tool: T,
) -> std::io::Result<(JoinHandle<Result<BatchReport, Error>>, Receiver<ThumbnailProgress>)>
where
    T: ThumbnailTool + Send + 'static,
{
    let (tx, rx) = unbounded();
    let handle = thread::Builder::new()
        .name("thumbnails".into())
        .spawn(move || run_batch(&videos, &video_dir, &out_dir, &tool, Some(&tx)))?;
    Ok((handle, rx))
}
