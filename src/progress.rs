use std::path::PathBuf;
use std::sync::Arc;

use crate::episode::MediaKind;

/// Events emitted while processing a feed or page for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The feed document or episode page is being fetched
    FetchingSource { url: String },

    /// The feed document has been parsed
    FeedParsed { episode_count: usize },

    /// Processing of one episode is starting
    EpisodeStarting {
        /// Index of this episode in feed document order
        episode_index: usize,
        /// Total number of episodes in the feed
        total_episodes: usize,
        episode_title: String,
    },

    /// An asset download is starting
    AssetStarting {
        kind: MediaKind,
        url: String,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    /// Asset download progress update
    AssetProgress {
        kind: MediaKind,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// An asset download completed successfully
    AssetCompleted {
        kind: MediaKind,
        bytes_downloaded: u64,
    },

    /// An asset had no media URL and was skipped
    AssetSkipped {
        kind: MediaKind,
        episode_title: String,
    },

    /// The episode folder could not be created; the run proceeds and the
    /// following file writes will surface the underlying problem
    DirCreateFailed { path: PathBuf, error: String },

    /// A thumbnail was written next to the downloaded cover image
    ThumbnailWritten { path: PathBuf },

    /// Thumbnail generation failed; the episode itself still counts as done
    ThumbnailFailed { path: PathBuf, error: String },

    /// An episode finished, both assets handled
    EpisodeCompleted { episode_title: String },

    /// An episode failed and was abandoned
    EpisodeFailed {
        episode_title: String,
        error: String,
    },

    /// The whole run completed
    RunCompleted { downloaded: usize, failed: usize },
}

/// Trait for reporting progress events during a run.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
