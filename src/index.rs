//! Per-video adjacency to galleries and tags.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::config::VideoRelation;

/// Galleries and tags related to one video, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    pub galleries: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationIndex {
    by_video: HashMap<String, Relations>,
}

impl RelationIndex {
    pub fn get(&self, video: &str) -> Option<&Relations> {
        self.by_video.get(video)
    }

    pub fn galleries(&self, video: &str) -> &[String] {
        self.get(video).map(|r| r.galleries.as_slice()).unwrap_or(&[])
    }

    pub fn tags(&self, video: &str) -> &[String] {
        self.get(video).map(|r| r.tags.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_video.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_video.is_empty()
    }
}

/// Build the relation index from discovered names and the declared relations.
///
/// A video without a relation entry is related to every gallery and no tags.
/// Relation entries are filtered to galleries that exist and tags that are
/// declared, keeping the relation's own order.
pub fn build_index(
    videos: &[String],
    galleries: &[String],
    tags: &[String],
    relations: &BTreeMap<String, VideoRelation>,
) -> RelationIndex {
    let known_galleries: HashSet<&str> = galleries.iter().map(String::as_str).collect();
    let known_tags: HashSet<&str> = tags.iter().map(String::as_str).collect();

    let by_video = videos
        .iter()
        .map(|video| {
            let rel = match relations.get(video) {
                None => Relations {
                    galleries: galleries.to_vec(),
                    tags: Vec::new(),
                },
                Some(entry) => {
                    let rel = Relations {
                        galleries: retain_known(&entry.galleries, &known_galleries),
                        tags: retain_known(&entry.tags, &known_tags),
                    };
                    if rel.galleries.len() != entry.galleries.len()
                        || rel.tags.len() != entry.tags.len()
                    {
                        debug!(
                            video = %video,
                            dropped_galleries = entry.galleries.len() - rel.galleries.len(),
                            dropped_tags = entry.tags.len() - rel.tags.len(),
                            "relation names unknown or repeated; dropped"
                        );
                    }
                    rel
                }
            };
            (video.clone(), rel)
        })
        .collect();

    RelationIndex { by_video }
}

/// Known names in first-seen order; repeats are dropped.
fn retain_known(names: &[String], known: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|n| known.contains(n.as_str()) && seen.insert(n.as_str()))
        .cloned()
        .collect()
}
