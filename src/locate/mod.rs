// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod feed;
pub mod page;

pub use feed::FeedLocator;
pub use page::PageLocator;

use async_trait::async_trait;
use url::Url;

use crate::error::LocateError;

/// Media located for one episode. Transient: built per episode, consumed by
/// the downloader, discarded.
#[derive(Debug, Clone)]
pub struct EpisodeMedia {
    pub title: String,
    /// Canonical audio URL, `None` when the source carries no audio
    pub audio_url: Option<Url>,
    /// Cover image URL, `None` when the source carries no image
    pub image_url: Option<Url>,
}

/// Extracts title, audio URL and image URL from one source payload.
///
/// The feed variant reads a parsed RSS item and treats missing media as
/// `Ok(None)`; the page variant pattern-matches an HTML body and treats
/// missing fields as hard errors. Audio resolution may perform network
/// requests (redirect-chain inspection), hence the async methods.
#[async_trait]
pub trait MediaLocator: Send + Sync {
    type Payload: ?Sized + Sync;

    fn title(&self, payload: &Self::Payload) -> Result<String, LocateError>;

    async fn audio_url(&self, payload: &Self::Payload) -> Result<Option<Url>, LocateError>;

    fn image_url(&self, payload: &Self::Payload) -> Result<Option<Url>, LocateError>;

    /// Locate all media for one episode
    async fn locate(&self, payload: &Self::Payload) -> Result<EpisodeMedia, LocateError> {
        Ok(EpisodeMedia {
            title: self.title(payload)?,
            audio_url: self.audio_url(payload).await?,
            image_url: self.image_url(payload)?,
        })
    }
}
