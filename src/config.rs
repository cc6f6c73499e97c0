use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Name of the directory created under the video directory when no explicit
/// thumbnail path is configured.
pub const DEFAULT_THUMB_DIR: &str = ".thumbnails";

/// Explicit gallery/tag associations declared for a single video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoRelation {
    pub galleries: Vec<String>,
    pub tags: Vec<String>,
}

/// External program used to render one thumbnail per video.
///
/// The program is invoked as `<program> <args...> <video-path> <thumb-dir>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThumbnailToolConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    /// Directory whose plain files are the playable videos.
    pub vid_path: PathBuf,
    /// Directory whose subdirectories are the image galleries.
    pub nam_path: PathBuf,
    /// Declared tag universe, in display order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Per-video relations keyed by video file name.
    #[serde(default)]
    pub video_relations: BTreeMap<String, VideoRelation>,
    /// Where generated thumbnails land. Defaults to `<vidPath>/.thumbnails`.
    #[serde(default)]
    pub thumb_path: Option<PathBuf>,
    #[serde(default)]
    pub thumbnail_tool: Option<ThumbnailToolConfig>,
    /// Period of the gallery image rotation.
    #[serde(
        default = "Configuration::default_slideshow_interval",
        with = "humantime_serde"
    )]
    pub slideshow_interval: Duration,
    /// Optional deterministic seed for combination shuffling.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl Configuration {
    const fn default_slideshow_interval() -> Duration {
        Duration::from_secs(2)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.vid_path.as_os_str().is_empty(),
            "vidPath must not be empty"
        );
        ensure!(
            !self.nam_path.as_os_str().is_empty(),
            "namPath must not be empty"
        );
        ensure!(
            !self.slideshow_interval.is_zero(),
            "slideshowInterval must be greater than zero"
        );
        for (i, tag) in self.tags.iter().enumerate() {
            ensure!(!tag.is_empty(), "tags[{i}] must not be empty");
            ensure!(
                !self.tags[..i].contains(tag),
                "tag `{tag}` is declared more than once"
            );
        }
        if let Some(tool) = &self.thumbnail_tool {
            ensure!(
                !tool.program.as_os_str().is_empty(),
                "thumbnailTool.program must not be empty"
            );
        }
        Ok(self)
    }

    pub fn thumb_dir(&self) -> PathBuf {
        self.thumb_path
            .clone()
            .unwrap_or_else(|| self.vid_path.join(DEFAULT_THUMB_DIR))
    }
}
