pub mod episode;
pub mod error;
pub mod http;
pub mod locate;
pub mod paths;
pub mod progress;
pub mod run;

// Re-export main types for convenience
pub use episode::{download_asset, make_thumbnail, DownloadTask, Downloader, MediaKind};
pub use error::{FetchError, LocateError, ProcessError, ThumbnailError};
pub use http::{fetch_text, HttpClient, HttpResponse, ReqwestClient};
pub use locate::{EpisodeMedia, FeedLocator, MediaLocator, PageLocator};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use run::{process_feed, process_page, process_source, RunResult, SourceKind};
