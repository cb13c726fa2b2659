use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::DownloadTask;

/// Download one asset to its destination path.
///
/// Streams the response body to disk, reporting progress through the
/// reporter. The destination file is created before the body arrives, so a
/// mid-stream failure leaves a partial file behind; callers must treat the
/// file as untrustworthy whenever an error is returned.
pub async fn download_asset<C: HttpClient>(
    client: &C,
    task: &DownloadTask,
    reporter: &SharedProgressReporter,
) -> Result<u64, FetchError> {
    let url = task.media.as_str();

    let response = client
        .get_stream(url)
        .await
        .map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::AssetStarting {
        kind: task.kind,
        url: url.to_string(),
        content_length: response.content_length,
    });

    let mut file =
        File::create(&task.destination)
            .await
            .map_err(|e| FetchError::FileCreateFailed {
                path: task.destination.clone(),
                source: e,
            })?;

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| FetchError::FileWriteFailed {
                path: task.destination.clone(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::AssetProgress {
            kind: task.kind,
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    // Ensure all data is flushed to disk before the next pipeline step
    file.flush()
        .await
        .map_err(|e| FetchError::FileWriteFailed {
            path: task.destination.clone(),
            source: e,
        })?;

    reporter.report(ProgressEvent::AssetCompleted {
        kind: task.kind,
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::MediaKind;
    use crate::http::{ByteStream, HttpResponse};
    use crate::progress::NoopReporter;
    use async_trait::async_trait;
    use bytes::Bytes;
    use tempfile::tempdir;
    use url::Url;

    struct MockHttpClient {
        response_data: Vec<u8>,
        status: u16,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_bytes(&self, _url: &str) -> Result<Bytes, reqwest::Error> {
            Ok(Bytes::from(self.response_data.clone()))
        }

        async fn get_stream(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            let data = self.response_data.clone();
            let len = data.len() as u64;

            let stream: ByteStream =
                Box::pin(futures::stream::once(async move { Ok(Bytes::from(data)) }));

            Ok(HttpResponse {
                status: self.status,
                content_length: Some(len),
                body: stream,
            })
        }

        async fn redirect_chain(&self, _url: &str) -> Result<Vec<String>, reqwest::Error> {
            Ok(vec![])
        }
    }

    fn make_task(destination: std::path::PathBuf) -> DownloadTask {
        DownloadTask {
            media: Url::parse("https://example.com/ep1.mp3").unwrap(),
            destination,
            kind: MediaKind::Audio,
        }
    }

    #[tokio::test]
    async fn download_writes_file() {
        let dir = tempdir().unwrap();
        let task = make_task(dir.path().join("ep1.mp3"));

        let client = MockHttpClient {
            response_data: b"test audio content".to_vec(),
            status: 200,
        };
        let reporter = NoopReporter::shared();

        let bytes = download_asset(&client, &task, &reporter).await.unwrap();

        assert_eq!(bytes, 18); // "test audio content".len()
        let content = std::fs::read(&task.destination).unwrap();
        assert_eq!(content, b"test audio content");
    }

    #[tokio::test]
    async fn download_fails_on_http_error() {
        let dir = tempdir().unwrap();
        let task = make_task(dir.path().join("ep1.mp3"));

        let client = MockHttpClient {
            response_data: b"Not Found".to_vec(),
            status: 404,
        };
        let reporter = NoopReporter::shared();

        let result = download_asset(&client, &task, &reporter).await;

        match result.unwrap_err() {
            FetchError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn download_fails_when_destination_is_unwritable() {
        let dir = tempdir().unwrap();
        // Destination inside a directory that does not exist
        let task = make_task(dir.path().join("missing/ep1.mp3"));

        let client = MockHttpClient {
            response_data: b"data".to_vec(),
            status: 200,
        };
        let reporter = NoopReporter::shared();

        let result = download_asset(&client, &task, &reporter).await;
        assert!(matches!(
            result.unwrap_err(),
            FetchError::FileCreateFailed { .. }
        ));
    }
}
