//! The single owner of selection, combinations and slideshow state.
//!
//! Every mutation goes through [`Session`], which regenerates combinations
//! and restarts the slideshow before returning, then publishes a fresh
//! [`SessionSnapshot`] to subscribers. Readers therefore never see a
//! selection whose combinations are stale.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::combination::{Combination, generate};
use crate::config::Configuration;
use crate::cursor::CombinationSequence;
use crate::index::{RelationIndex, build_index};
use crate::scan::Library;
use crate::selection::{Category, SelectionState};
use crate::slideshow::{RotationTimer, Slideshow};

/// Presentation flags, independent of the combination sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub overlay_visible: bool,
    pub playing: bool,
}

/// What a presentation layer needs to draw the current moment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub combination: Option<Combination>,
    pub position: Option<usize>,
    pub total: usize,
    pub image: Option<PathBuf>,
    pub image_position: Option<usize>,
    pub image_count: usize,
    pub playback: PlaybackState,
    /// Bumped on every regeneration of the combination sequence.
    pub generation: u64,
}

pub struct Session {
    tags: Vec<String>,
    library: Library,
    index: RelationIndex,
    selection: SelectionState,
    sequence: CombinationSequence,
    slideshow: Slideshow,
    timer: RotationTimer,
    playback: PlaybackState,
    rng: StdRng,
    generation: u64,
    publisher: watch::Sender<SessionSnapshot>,
}

impl Session {
    /// Build a session from a configuration and a discovered library.
    ///
    /// `seed` overrides `cfg.shuffle_seed`; with neither, shuffling is seeded
    /// from the OS.
    pub fn new(cfg: &Configuration, library: Library, seed: Option<u64>) -> Self {
        let rng = match seed.or(cfg.shuffle_seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (publisher, _) = watch::channel(SessionSnapshot::default());
        let mut session = Self {
            tags: Vec::new(),
            library: Library::default(),
            index: RelationIndex::default(),
            selection: SelectionState::default(),
            sequence: CombinationSequence::default(),
            slideshow: Slideshow::default(),
            timer: RotationTimer::new(cfg.slideshow_interval),
            playback: PlaybackState::default(),
            rng,
            generation: 0,
            publisher,
        };
        session.load(cfg, library);
        session
    }

    /// Rebuild everything from scratch: index, selection reset, combinations.
    pub fn load(&mut self, cfg: &Configuration, library: Library) {
        let galleries = library.gallery_names();
        self.index = build_index(
            &library.videos,
            &galleries,
            &cfg.tags,
            &cfg.video_relations,
        );
        self.selection = SelectionState::all_of(&library.videos, &galleries);
        self.tags = cfg.tags.clone();
        self.library = library;
        self.timer.set_period(cfg.slideshow_interval);
        info!(
            videos = self.library.videos.len(),
            galleries = galleries.len(),
            tags = self.tags.len(),
            "session loaded"
        );
        self.regenerate();
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            combination: self.sequence.current().cloned(),
            position: self.sequence.position(),
            total: self.sequence.len(),
            image: self.slideshow.current_image().cloned(),
            image_position: self.slideshow.position(),
            image_count: self.slideshow.image_count(),
            playback: self.playback,
            generation: self.generation,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn sequence(&self) -> &CombinationSequence {
        &self.sequence
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn timer(&self) -> &RotationTimer {
        &self.timer
    }

    pub fn current(&self) -> Option<&Combination> {
        self.sequence.current()
    }

    pub fn current_image(&self) -> Option<&PathBuf> {
        self.slideshow.current_image()
    }

    /// Names a selection in `category` may contain.
    fn universe(&self, category: Category) -> Vec<String> {
        match category {
            Category::Video => self.library.videos.clone(),
            Category::Gallery => self.library.gallery_names(),
            Category::Tag => self.tags.clone(),
        }
    }

    fn is_known(&self, category: Category, name: &str) -> bool {
        let known = match category {
            Category::Video => self.library.videos.iter().any(|v| v == name),
            Category::Gallery => self.library.galleries.iter().any(|g| g.name == name),
            Category::Tag => self.tags.iter().any(|t| t == name),
        };
        if !known {
            warn!(%category, name, "ignoring unknown name");
        }
        known
    }

    pub fn select(&mut self, category: Category, name: &str) -> bool {
        let changed = self.is_known(category, name) && self.selection.insert(category, name);
        self.after_edit(changed)
    }

    pub fn deselect(&mut self, category: Category, name: &str) -> bool {
        let changed = self.selection.remove(category, name);
        self.after_edit(changed)
    }

    pub fn toggle(&mut self, category: Category, name: &str) -> bool {
        let changed = if self.selection.contains(category, name) {
            self.selection.remove(category, name)
        } else {
            self.is_known(category, name) && self.selection.insert(category, name)
        };
        self.after_edit(changed)
    }

    /// Replace the whole set. Unknown names are dropped.
    pub fn replace<S: AsRef<str>>(&mut self, category: Category, names: &[S]) -> bool {
        let keep: Vec<String> = names
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|n| self.is_known(category, n))
            .map(str::to_owned)
            .collect();
        let changed = self.selection.replace(category, keep);
        self.after_edit(changed)
    }

    pub fn select_all(&mut self, category: Category) -> bool {
        let all = self.universe(category);
        let changed = self.selection.replace(category, all);
        self.after_edit(changed)
    }

    pub fn select_none(&mut self, category: Category) -> bool {
        let changed = self.selection.clear(category);
        self.after_edit(changed)
    }

    fn after_edit(&mut self, changed: bool) -> bool {
        if changed {
            self.regenerate();
        }
        changed
    }

    /// Recompute combinations from the current selection and restart at 0.
    fn regenerate(&mut self) {
        self.sequence = generate(&self.index, &self.selection, &mut self.rng);
        self.generation += 1;
        debug!(
            generation = self.generation,
            combinations = self.sequence.len(),
            "combinations regenerated"
        );
        self.activate_current();
    }

    pub fn next(&mut self) -> Option<&Combination> {
        if self.sequence.next().is_some() {
            self.activate_current();
        }
        self.sequence.current()
    }

    pub fn previous(&mut self) -> Option<&Combination> {
        if self.sequence.previous().is_some() {
            self.activate_current();
        }
        self.sequence.current()
    }

    /// Advance the slideshow one image. Returns the image now shown.
    pub fn tick(&mut self) -> Option<&PathBuf> {
        self.slideshow.tick();
        self.publish();
        self.slideshow.current_image()
    }

    /// Wait for the rotation timer. Pends forever while nothing is current.
    pub async fn next_tick(&mut self) {
        self.timer.tick().await;
    }

    pub fn toggle_overlay(&mut self) -> bool {
        self.playback.overlay_visible = !self.playback.overlay_visible;
        self.publish();
        self.playback.overlay_visible
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.playback.playing = !self.playback.playing;
        self.publish();
        self.playback.playing
    }

    /// Stop the slideshow and its timer for good.
    pub fn shutdown(&mut self) {
        self.timer.stop();
        self.slideshow.stop();
        self.publish();
    }

    /// Restart the slideshow for whatever combination is now current.
    fn activate_current(&mut self) {
        match self.sequence.current() {
            Some(combo) => {
                let images = self.library.images_for(&combo.gallery).to_vec();
                if images.is_empty() {
                    debug!(gallery = %combo.gallery, "gallery has no images");
                }
                self.slideshow.restart(images);
                self.timer.start();
            }
            None => {
                self.slideshow.stop();
                self.timer.stop();
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }
}
