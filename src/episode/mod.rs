// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod download;
pub mod thumbnail;

pub use download::download_asset;
pub use thumbnail::make_thumbnail;

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ProcessError;
use crate::http::HttpClient;
use crate::locate::MediaLocator;
use crate::paths;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// The two asset kinds downloaded per episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Image => write!(f, "image"),
        }
    }
}

/// One asset download derived from an episode: the resolved media URL and
/// the destination path `<output>/<slug>/<last-url-segment>`
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub media: Url,
    pub destination: PathBuf,
    pub kind: MediaKind,
}

impl DownloadTask {
    /// Build the task for one asset, `None` when the episode has no media
    /// of this kind or the URL carries no filename
    pub fn for_asset(dir: &Path, media: Option<&Url>, kind: MediaKind) -> Option<Self> {
        let destination = paths::destination(dir, media)?;
        Some(Self {
            media: media?.clone(),
            destination,
            kind,
        })
    }
}

/// Per-episode orchestration: locate media, download audio then image,
/// then generate the thumbnail. Strictly sequential.
pub struct Downloader<C, L> {
    client: C,
    locator: L,
    output_root: PathBuf,
    reporter: SharedProgressReporter,
}

impl<C, L> Downloader<C, L>
where
    C: HttpClient,
    L: MediaLocator,
{
    pub fn new(client: C, locator: L, output_root: &Path, reporter: SharedProgressReporter) -> Self {
        Self {
            client,
            locator,
            output_root: output_root.to_path_buf(),
            reporter,
        }
    }

    /// Process one episode payload end to end. Returns the episode title.
    ///
    /// Thumbnail generation is awaited; its failure is reported but does
    /// not fail the episode. Network and filesystem errors propagate.
    pub async fn process(&self, payload: &L::Payload) -> Result<String, ProcessError> {
        let media = self.locator.locate(payload).await?;

        let dir = paths::episode_dir(&self.output_root, &media.title);
        if let Err(e) = paths::ensure_dir(&dir) {
            // Proceed anyway; the first file write will surface the problem
            self.reporter.report(ProgressEvent::DirCreateFailed {
                path: dir.clone(),
                error: e.to_string(),
            });
        }

        self.download_or_skip(&dir, media.audio_url.as_ref(), MediaKind::Audio, &media.title)
            .await?;

        let image_task =
            self.download_or_skip(&dir, media.image_url.as_ref(), MediaKind::Image, &media.title)
                .await?;

        if let Some(task) = image_task {
            match make_thumbnail(&task.destination).await {
                Ok(thumb_path) => {
                    self.reporter
                        .report(ProgressEvent::ThumbnailWritten { path: thumb_path });
                }
                Err(e) => {
                    self.reporter.report(ProgressEvent::ThumbnailFailed {
                        path: task.destination.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(media.title)
    }

    /// Download one asset, or report a skip when the episode has no media
    /// of that kind. Returns the executed task, if any.
    async fn download_or_skip(
        &self,
        dir: &Path,
        media: Option<&Url>,
        kind: MediaKind,
        title: &str,
    ) -> Result<Option<DownloadTask>, ProcessError> {
        match DownloadTask::for_asset(dir, media, kind) {
            Some(task) => {
                download_asset(&self.client, &task, &self.reporter).await?;
                Ok(Some(task))
            }
            None => {
                self.reporter.report(ProgressEvent::AssetSkipped {
                    kind,
                    episode_title: title.to_string(),
                });
                Ok(None)
            }
        }
    }
}
