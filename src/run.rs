// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use url::Url;

use clap::ValueEnum;

use crate::episode::Downloader;
use crate::error::{LocateError, ProcessError};
use crate::http::{fetch_text, HttpClient};
use crate::locate::{FeedLocator, PageLocator};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Which kind of source a run processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// RSS feed with many episodes
    Feed,
    /// Single episode HTML page
    Page,
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Number of episodes fully processed
    pub downloaded: usize,
    /// Number of episodes that failed
    pub failed: usize,
    /// Details of failed episodes (title, error message)
    pub failed_episodes: Vec<(String, String)>,
}

/// Process a source of either kind
pub async fn process_source<C: HttpClient + Clone>(
    kind: SourceKind,
    client: &C,
    url: &str,
    output_root: &Path,
    reporter: SharedProgressReporter,
) -> Result<RunResult, ProcessError> {
    match kind {
        SourceKind::Feed => process_feed(client, url, output_root, reporter).await,
        SourceKind::Page => process_page(client, url, output_root, reporter).await,
    }
}

/// Process every episode of an RSS feed, in document order.
///
/// The feed is fetched and parsed once; each episode is then processed
/// sequentially. A failing episode is recorded and the run continues with
/// the next one, so one dead enclosure does not abort the whole batch.
pub async fn process_feed<C: HttpClient + Clone>(
    client: &C,
    feed_url: &str,
    output_root: &Path,
    reporter: SharedProgressReporter,
) -> Result<RunResult, ProcessError> {
    reporter.report(ProgressEvent::FetchingSource {
        url: feed_url.to_string(),
    });

    let body = fetch_text(client, feed_url).await?;
    let channel = rss::Channel::read_from(body.as_bytes()).map_err(LocateError::FeedParseFailed)?;

    let total_episodes = channel.items().len();
    reporter.report(ProgressEvent::FeedParsed {
        episode_count: total_episodes,
    });

    let channel_image = channel
        .itunes_ext()
        .and_then(|ext| ext.image())
        .and_then(|href| Url::parse(href).ok())
        .or_else(|| {
            channel
                .image()
                .and_then(|img| Url::parse(img.url()).ok())
        });

    let locator = FeedLocator::new(client.clone(), channel_image);
    let downloader = Downloader::new(client.clone(), locator, output_root, reporter.clone());

    let mut downloaded = 0;
    let mut failed_episodes: Vec<(String, String)> = Vec::new();

    for (episode_index, item) in channel.items().iter().enumerate() {
        let title_hint = item.title().unwrap_or("Untitled Episode").to_string();

        reporter.report(ProgressEvent::EpisodeStarting {
            episode_index,
            total_episodes,
            episode_title: title_hint.clone(),
        });

        match downloader.process(item).await {
            Ok(episode_title) => {
                downloaded += 1;
                reporter.report(ProgressEvent::EpisodeCompleted { episode_title });
            }
            Err(e) => {
                reporter.report(ProgressEvent::EpisodeFailed {
                    episode_title: title_hint.clone(),
                    error: e.to_string(),
                });
                failed_episodes.push((title_hint, e.to_string()));
            }
        }
    }

    let failed = failed_episodes.len();
    reporter.report(ProgressEvent::RunCompleted { downloaded, failed });

    Ok(RunResult {
        downloaded,
        failed,
        failed_episodes,
    })
}

/// Process a single episode page.
///
/// One resource, so fail-fast: any locate or download error aborts the run.
pub async fn process_page<C: HttpClient + Clone>(
    client: &C,
    page_url: &str,
    output_root: &Path,
    reporter: SharedProgressReporter,
) -> Result<RunResult, ProcessError> {
    reporter.report(ProgressEvent::FetchingSource {
        url: page_url.to_string(),
    });

    let body = fetch_text(client, page_url).await?;

    let downloader = Downloader::new(
        client.clone(),
        PageLocator::new(),
        output_root,
        reporter.clone(),
    );

    let episode_title = downloader.process(body.as_str()).await?;
    reporter.report(ProgressEvent::EpisodeCompleted { episode_title });

    reporter.report(ProgressEvent::RunCompleted {
        downloaded: 1,
        failed: 0,
    });

    Ok(RunResult {
        downloaded: 1,
        failed: 0,
        failed_episodes: vec![],
    })
}
