//! Fixed-interval image rotation within the active gallery.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Rotation state for the gallery of the current combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slideshow {
    #[default]
    Stopped,
    Running {
        images: Vec<PathBuf>,
        index: usize,
    },
}

impl Slideshow {
    /// Begin rotating `images` from the first one.
    pub fn start(&mut self, images: Vec<PathBuf>) {
        *self = Self::Running { images, index: 0 };
    }

    /// Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        *self = Self::Stopped;
        was_running
    }

    /// Stop and immediately start over with a new gallery.
    pub fn restart(&mut self, images: Vec<PathBuf>) {
        self.stop();
        self.start(images);
    }

    /// Advance to the next image, wrapping. An empty gallery stays at 0.
    pub fn tick(&mut self) -> Option<&PathBuf> {
        if let Self::Running { images, index } = self {
            if !images.is_empty() {
                *index = (*index + 1) % images.len();
            }
            trace!(index = *index, count = images.len(), "slideshow tick");
        }
        self.current_image()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Running { images, index } if !images.is_empty() => Some(*index),
            _ => None,
        }
    }

    /// The image to display, `None` when stopped or the gallery is empty.
    #[must_use]
    pub fn current_image(&self) -> Option<&PathBuf> {
        match self {
            Self::Running { images, index } => images.get(*index),
            Self::Stopped => None,
        }
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        match self {
            Self::Running { images, .. } => images.len(),
            Self::Stopped => 0,
        }
    }
}

/// Recurring timer handle driving [`Slideshow::tick`].
///
/// Owning the handle is what makes it the only active timer: `start` and
/// `reset` replace the schedule, `stop` drops it. After `stop` returns,
/// [`tick`](Self::tick) never completes until the timer is started again.
#[derive(Debug)]
pub struct RotationTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl RotationTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Change the period; a running timer is rescheduled with it.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
        if self.is_active() {
            self.start();
        }
    }

    /// (Re)schedule the next tick one full period from now.
    pub fn start(&mut self) {
        self.deadline = Some(Instant::now() + self.period);
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Restart the countdown, starting the timer if it was stopped.
    pub fn reset(&mut self) {
        self.start();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// Wait for the next tick. Pends forever while stopped.
    ///
    /// Cancel-safe: the schedule only advances once a tick has completed,
    /// so it can sit in a `select!` arm.
    pub async fn tick(&mut self) {
        let Some(deadline) = self.deadline else {
            return std::future::pending::<()>().await;
        };
        sleep_until(deadline).await;
        // Late ticks push the schedule back instead of bursting.
        self.deadline = Some(Instant::now().max(deadline) + self.period);
    }
}
