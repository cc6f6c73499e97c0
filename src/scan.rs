//! Directory scanning utilities for discovering videos, galleries and images.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Configuration;
use crate::error::Error;

/// Image extensions accepted inside a gallery (lowercase, without dot).
pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// A discovered gallery directory and the images directly inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    pub name: String,
    pub images: Vec<PathBuf>,
}

/// Everything discovered on disk for one load of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub videos: Vec<String>,
    pub galleries: Vec<Gallery>,
}

impl Library {
    /// Scan the directories named by `cfg`.
    ///
    /// Unreadable directories degrade to empty collections; an empty library
    /// is a legal, if uninteresting, state.
    pub fn discover(cfg: &Configuration) -> Self {
        let videos = list_videos(&cfg.vid_path).unwrap_or_else(|err| {
            warn!(error = %err, "video discovery failed; continuing with no videos");
            Vec::new()
        });
        let names = list_galleries(&cfg.nam_path).unwrap_or_else(|err| {
            warn!(error = %err, "gallery discovery failed; continuing with no galleries");
            Vec::new()
        });
        let galleries = names
            .into_iter()
            .map(|name| {
                let dir = cfg.nam_path.join(&name);
                let images = list_images(&dir).unwrap_or_else(|err| {
                    warn!(gallery = %name, error = %err, "gallery unreadable; treating as empty");
                    Vec::new()
                });
                Gallery { name, images }
            })
            .collect::<Vec<_>>();
        info!(
            videos = videos.len(),
            galleries = galleries.len(),
            "library discovered"
        );
        Self { videos, galleries }
    }

    pub fn gallery_names(&self) -> Vec<String> {
        self.galleries.iter().map(|g| g.name.clone()).collect()
    }

    /// Images of the named gallery, or an empty slice when it is unknown.
    pub fn images_for(&self, gallery: &str) -> &[PathBuf] {
        self.galleries
            .iter()
            .find(|g| g.name == gallery)
            .map(|g| g.images.as_slice())
            .unwrap_or(&[])
    }
}

/// Return `true` if `path` has an allowed image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTS.iter().any(|e| *e == ext)
        })
}

/// Names of the non-hidden, non-directory entries of `dir`, sorted.
///
/// # Errors
/// Returns [`Error::BadDir`] if `dir` is missing or not a directory.
pub fn list_videos(dir: &Path) -> Result<Vec<String>, Error> {
    Ok(children(dir)?
        .filter(|e| !e.file_type().is_dir())
        .filter_map(|e| entry_name(&e))
        .collect())
}

/// Names of the non-hidden directory entries of `dir`, sorted.
///
/// # Errors
/// Returns [`Error::BadDir`] if `dir` is missing or not a directory.
pub fn list_galleries(dir: &Path) -> Result<Vec<String>, Error> {
    Ok(children(dir)?
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| entry_name(&e))
        .collect())
}

/// Non-hidden image files directly inside `dir`, sorted by file name.
///
/// # Errors
/// Returns [`Error::BadDir`] if `dir` is missing or not a directory.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    Ok(children(dir)?
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| is_supported_image(e.path()))
        .map(DirEntry::into_path)
        .collect())
}

fn children(dir: &Path) -> Result<impl Iterator<Item = DirEntry>, Error> {
    if !dir.is_dir() {
        return Err(Error::BadDir(dir.to_path_buf()));
    }
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|res| match res {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| !is_hidden(e));
    Ok(walker)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}

fn entry_name(entry: &DirEntry) -> Option<String> {
    match entry.file_name().to_str() {
        Some(name) => Some(name.to_owned()),
        None => {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            None
        }
    }
}
