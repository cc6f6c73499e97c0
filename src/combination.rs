use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::cursor::CombinationSequence;
use crate::index::RelationIndex;
use crate::selection::SelectionState;

/// A (video, gallery) pairing eligible for playback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination {
    pub video: String,
    pub gallery: String,
}

impl Combination {
    pub fn new(video: impl Into<String>, gallery: impl Into<String>) -> Self {
        Self {
            video: video.into(),
            gallery: gallery.into(),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.video, self.gallery)
    }
}

/// Every pairing allowed by `selection`, in selection order.
///
/// A video qualifies when it is selected, present in the index, and either no
/// tags are selected or all selected tags are among its related tags. Each of
/// its related galleries that is also selected yields one pairing. A video
/// with no related tags therefore never passes an active tag filter.
pub fn matching(index: &RelationIndex, selection: &SelectionState) -> Vec<Combination> {
    let wanted_tags = selection.tags();
    let mut out = Vec::new();
    for video in selection.videos() {
        let Some(rel) = index.get(video) else {
            debug!(video = %video, "selected video not in index; skipping");
            continue;
        };
        if !wanted_tags.is_empty() && !wanted_tags.iter().all(|t| rel.tags.contains(t)) {
            continue;
        }
        out.extend(
            rel.galleries
                .iter()
                .filter(|g| selection.galleries().contains(*g))
                .map(|g| Combination::new(video.as_str(), g.as_str())),
        );
    }
    out
}

/// Matching pairings in uniformly shuffled order, with the cursor at the start.
pub fn generate<R: Rng + ?Sized>(
    index: &RelationIndex,
    selection: &SelectionState,
    rng: &mut R,
) -> CombinationSequence {
    let mut items = matching(index, selection);
    items.shuffle(rng);
    debug!(combinations = items.len(), "combinations generated");
    CombinationSequence::new(items)
}
