use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching resources over HTTP or streaming them to disk
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed for {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while locating episode media in a feed item or page body
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Failed to parse RSS feed: {0}")]
    FeedParseFailed(#[from] rss::Error),

    #[error("Page contains no \"headline\" field")]
    HeadlineNotFound,

    #[error("Page contains no AudioObject contentUrl")]
    AudioObjectNotFound,

    #[error("Page contains no ImageObject url")]
    ImageObjectNotFound,

    #[error("Invalid media URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to resolve redirects for {url}: {source}")]
    ResolveFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised while producing a thumbnail from a downloaded cover image
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Failed to open image {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write thumbnail {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Thumbnail task was cancelled")]
    TaskCancelled,
}

/// Top-level errors for a feed or page run
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),
}
