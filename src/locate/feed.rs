// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use url::Url;

use crate::error::LocateError;
use crate::http::HttpClient;

use super::MediaLocator;

/// Locates media in a parsed RSS feed item.
///
/// Enclosure URLs in the source feeds are frequently proxy links that
/// redirect to the real CDN file; the locator walks the redirect chain and
/// takes the first redirect target (origin + path, query dropped) as the
/// canonical audio URL. Missing optional fields yield `None`, not errors.
pub struct FeedLocator<C: HttpClient> {
    client: C,
    /// Channel-level cover image, used when an item has no itunes image
    channel_image: Option<Url>,
}

impl<C: HttpClient> FeedLocator<C> {
    pub fn new(client: C, channel_image: Option<Url>) -> Self {
        Self {
            client,
            channel_image,
        }
    }
}

/// Strip query string and fragment, keeping origin + path
fn strip_query(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn parse_media_url(raw: &str) -> Result<Url, LocateError> {
    Url::parse(raw).map_err(|e| LocateError::InvalidUrl {
        url: raw.to_string(),
        source: e,
    })
}

#[async_trait]
impl<C: HttpClient> MediaLocator for FeedLocator<C> {
    type Payload = rss::Item;

    fn title(&self, item: &rss::Item) -> Result<String, LocateError> {
        let title = item.title().unwrap_or("Untitled Episode");
        Ok(title.replace('"', "").trim().to_string())
    }

    async fn audio_url(&self, item: &rss::Item) -> Result<Option<Url>, LocateError> {
        let Some(enclosure) = item.enclosure() else {
            return Ok(None);
        };
        let proxied = enclosure.url();

        let chain =
            self.client
                .redirect_chain(proxied)
                .await
                .map_err(|e| LocateError::ResolveFailed {
                    url: proxied.to_string(),
                    source: e,
                })?;

        // No redirect means the enclosure URL already is the real file
        let canonical = match chain.first() {
            Some(first_hop) => strip_query(parse_media_url(first_hop)?),
            None => parse_media_url(proxied)?,
        };

        Ok(Some(canonical))
    }

    fn image_url(&self, item: &rss::Item) -> Result<Option<Url>, LocateError> {
        let item_image = item
            .itunes_ext()
            .and_then(|ext| ext.image())
            .and_then(|href| Url::parse(href).ok());

        Ok(item_image.or_else(|| self.channel_image.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ByteStream, HttpResponse};
    use async_trait::async_trait;
    use bytes::Bytes;

    /// Mock client whose redirect_chain returns a fixed list of hops
    struct RedirectingClient {
        hops: Vec<String>,
    }

    #[async_trait]
    impl HttpClient for RedirectingClient {
        async fn get_bytes(&self, _url: &str) -> Result<Bytes, reqwest::Error> {
            Ok(Bytes::new())
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let stream: ByteStream = Box::pin(futures::stream::empty());
            Ok(HttpResponse {
                status: 200,
                content_length: None,
                body: stream,
            })
        }

        async fn redirect_chain(&self, _url: &str) -> Result<Vec<String>, reqwest::Error> {
            Ok(self.hops.clone())
        }
    }

    fn make_item(title: Option<&str>, enclosure_url: Option<&str>) -> rss::Item {
        let mut item = rss::Item::default();
        item.set_title(title.map(String::from));
        if let Some(url) = enclosure_url {
            let mut enclosure = rss::Enclosure::default();
            enclosure.set_url(url.to_string());
            enclosure.set_mime_type("audio/mpeg".to_string());
            item.set_enclosure(enclosure);
        }
        item
    }

    fn locator(hops: Vec<String>) -> FeedLocator<RedirectingClient> {
        FeedLocator::new(RedirectingClient { hops }, None)
    }

    #[test]
    fn title_strips_quotes_and_whitespace() {
        let item = make_item(Some("  \"Ep One\"  "), None);
        assert_eq!(locator(vec![]).title(&item).unwrap(), "Ep One");
    }

    #[test]
    fn missing_title_falls_back_to_untitled() {
        let item = make_item(None, None);
        assert_eq!(locator(vec![]).title(&item).unwrap(), "Untitled Episode");
    }

    #[tokio::test]
    async fn audio_url_without_enclosure_is_none() {
        let item = make_item(Some("Ep"), None);
        assert_eq!(locator(vec![]).audio_url(&item).await.unwrap(), None);
    }

    #[tokio::test]
    async fn audio_url_without_redirect_is_the_enclosure_url() {
        let item = make_item(Some("Ep"), Some("https://example.com/ep1.mp3"));
        let url = locator(vec![]).audio_url(&item).await.unwrap().unwrap();
        assert_eq!(url.as_str(), "https://example.com/ep1.mp3");
    }

    #[tokio::test]
    async fn audio_url_takes_first_redirect_target_without_query() {
        let item = make_item(Some("Ep"), Some("https://proxy.example.com/r/abc"));
        let hops = vec![
            "https://cdn.example.com/audio/file123.mp3?token=abc".to_string(),
            "https://mirror.example.com/file123.mp3".to_string(),
        ];
        let url = locator(hops).audio_url(&item).await.unwrap().unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/audio/file123.mp3");
    }

    #[test]
    fn image_url_reads_itunes_extension() {
        let mut item = make_item(Some("Ep"), None);
        let mut itunes = rss::extension::itunes::ITunesItemExtension::default();
        itunes.set_image("https://example.com/cover.jpg".to_string());
        item.set_itunes_ext(itunes);

        let url = locator(vec![]).image_url(&item).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://example.com/cover.jpg");
    }

    #[test]
    fn image_url_falls_back_to_channel_image() {
        let item = make_item(Some("Ep"), None);
        let channel_image = Url::parse("https://example.com/channel.jpg").unwrap();
        let locator = FeedLocator::new(
            RedirectingClient { hops: vec![] },
            Some(channel_image.clone()),
        );

        assert_eq!(locator.image_url(&item).unwrap(), Some(channel_image));
    }

    #[test]
    fn image_url_is_none_without_any_image() {
        let item = make_item(Some("Ep"), None);
        assert_eq!(locator(vec![]).image_url(&item).unwrap(), None);
    }
}
