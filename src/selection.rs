//! User-adjustable subsets of videos, galleries and tags.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Video,
    Gallery,
    Tag,
}

impl Category {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Gallery => "gallery",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" | "videos" => Ok(Self::Video),
            "gallery" | "galleries" => Ok(Self::Gallery),
            "tag" | "tags" => Ok(Self::Tag),
            other => bail!("unknown category `{other}` (expected video, gallery or tag)"),
        }
    }
}

/// The three independent selection sets.
///
/// All mutators return `true` when the set actually changed so callers can
/// skip regeneration for no-op edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    videos: BTreeSet<String>,
    galleries: BTreeSet<String>,
    tags: BTreeSet<String>,
}

impl SelectionState {
    /// Initial selection after a load: everything discovered, no tags.
    pub fn all_of(videos: &[String], galleries: &[String]) -> Self {
        Self {
            videos: videos.iter().cloned().collect(),
            galleries: galleries.iter().cloned().collect(),
            tags: BTreeSet::new(),
        }
    }

    pub fn videos(&self) -> &BTreeSet<String> {
        &self.videos
    }

    pub fn galleries(&self) -> &BTreeSet<String> {
        &self.galleries
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn get(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Video => &self.videos,
            Category::Gallery => &self.galleries,
            Category::Tag => &self.tags,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::Video => &mut self.videos,
            Category::Gallery => &mut self.galleries,
            Category::Tag => &mut self.tags,
        }
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.get(category).contains(name)
    }

    pub fn insert(&mut self, category: Category, name: &str) -> bool {
        self.get_mut(category).insert(name.to_owned())
    }

    pub fn remove(&mut self, category: Category, name: &str) -> bool {
        self.get_mut(category).remove(name)
    }

    pub fn toggle(&mut self, category: Category, name: &str) -> bool {
        if !self.remove(category, name) {
            self.insert(category, name);
        }
        true
    }

    pub fn replace<I, S>(&mut self, category: Category, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let set = self.get_mut(category);
        if *set == next {
            return false;
        }
        *set = next;
        true
    }

    pub fn clear(&mut self, category: Category) -> bool {
        let set = self.get_mut(category);
        let changed = !set.is_empty();
        set.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut sel = SelectionState::default();
        assert!(sel.toggle(Category::Tag, "x"));
        assert!(sel.contains(Category::Tag, "x"));
        assert!(sel.toggle(Category::Tag, "x"));
        assert!(!sel.contains(Category::Tag, "x"));
    }

    #[test]
    fn replace_reports_no_change_for_equal_sets() {
        let mut sel = SelectionState::all_of(&["a".into()], &["G".into()]);
        assert!(!sel.replace(Category::Video, ["a"]));
        assert!(sel.replace(Category::Video, Vec::<String>::new()));
        assert!(sel.videos().is_empty());
    }

    #[test]
    fn category_parses_plural_forms() {
        assert_eq!("galleries".parse::<Category>().unwrap(), Category::Gallery);
        assert!("photo".parse::<Category>().is_err());
    }
}
