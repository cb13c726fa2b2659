// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use url::Url;

use crate::error::FetchError;

/// Maximum number of redirect hops followed when observing a redirect chain
const MAX_REDIRECT_HOPS: usize = 10;

/// A streaming response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// HTTP response with status, content length, and body stream
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Length header value, if present
    pub content_length: Option<u64>,
    /// Response body as a stream of bytes
    pub body: ByteStream,
}

/// HTTP client abstraction for testability
///
/// The scheme (http vs https) is honored per call by the underlying client,
/// so a redirect that crosses schemes is handled transparently.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch the entire response body as bytes
    async fn get_bytes(&self, url: &str) -> Result<Bytes, reqwest::Error>;

    /// Get a streaming response for large downloads
    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;

    /// Observe the chain of redirect targets for a URL, in hop order.
    ///
    /// Returns an empty vector when the resource is served directly.
    async fn redirect_chain(&self, url: &str) -> Result<Vec<String>, reqwest::Error>;
}

/// Fetch a URL and decode the body as text (lossy UTF-8)
pub async fn fetch_text<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<String, FetchError> {
    let bytes = client
        .get_bytes(url)
        .await
        .map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Default HTTP client implementation using reqwest
///
/// Holds two inner clients: one that follows redirects (used for plain GETs
/// and streams) and one that does not (used to walk redirect chains hop by
/// hop, since reqwest hides intermediate URLs when following automatically).
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    no_redirect: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            no_redirect: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("TLS backend initialization"),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_bytes(&self, url: &str) -> Result<Bytes, reqwest::Error> {
        self.client.get(url).send().await?.bytes().await
    }

    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();

        let body: ByteStream = Box::pin(response.bytes_stream());

        Ok(HttpResponse {
            status,
            content_length,
            body,
        })
    }

    async fn redirect_chain(&self, url: &str) -> Result<Vec<String>, reqwest::Error> {
        let mut chain = Vec::new();
        let mut current = url.to_string();

        for _ in 0..MAX_REDIRECT_HOPS {
            let response = self.no_redirect.get(&current).send().await?;

            if !response.status().is_redirection() {
                break;
            }

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok());

            // A redirect status without a usable Location ends the chain
            let Some(location) = location else { break };

            let next = match Url::parse(&current).and_then(|base| base.join(location)) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => break,
            };

            chain.push(next.clone());
            current = next;
        }

        Ok(chain)
    }
}
