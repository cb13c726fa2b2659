// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use crate::error::LocateError;

use super::MediaLocator;

// The episode pages embed JSON-LD metadata inside a script tag. The raw HTML
// is not reliably well-formed JSON (escaping varies, objects are split), so
// extraction deliberately targets the three fields with narrow patterns
// instead of a full JSON parse. Brittle by nature of the upstream format.

static HEADLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""headline":"\\?"?([A-Za-z,\-\s]+)\\?"?"#).unwrap());

static AUDIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{"@type":"AudioObject","contentUrl":"([a-zA-Z_/:.\-0-9]*)""#).unwrap());

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{"@type":"ImageObject","url":"([a-zA-Z_/:.\-0-9]*)""#).unwrap());

/// Locates media in the HTML body of a single episode page.
///
/// Unlike the feed variant, every field is mandatory: a page without the
/// expected metadata is a hard error, aborting before any download.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageLocator;

impl PageLocator {
    pub fn new() -> Self {
        Self
    }
}

fn capture<'a>(re: &Regex, body: &'a str) -> Option<&'a str> {
    re.captures(body).map(|c| c.get(1).map_or("", |m| m.as_str()))
}

fn parse_media_url(raw: &str) -> Result<Url, LocateError> {
    Url::parse(raw).map_err(|e| LocateError::InvalidUrl {
        url: raw.to_string(),
        source: e,
    })
}

#[async_trait]
impl MediaLocator for PageLocator {
    type Payload = str;

    fn title(&self, body: &str) -> Result<String, LocateError> {
        capture(&HEADLINE_RE, body)
            .map(|t| t.trim().to_string())
            .ok_or(LocateError::HeadlineNotFound)
    }

    async fn audio_url(&self, body: &str) -> Result<Option<Url>, LocateError> {
        let raw = capture(&AUDIO_RE, body).ok_or(LocateError::AudioObjectNotFound)?;
        Ok(Some(parse_media_url(raw)?))
    }

    fn image_url(&self, body: &str) -> Result<Option<Url>, LocateError> {
        let raw = capture(&IMAGE_RE, body).ok_or(LocateError::ImageObjectNotFound)?;
        Ok(Some(parse_media_url(raw)?))
    }
}
