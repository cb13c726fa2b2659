use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::ImageFormat;

use crate::error::ThumbnailError;

/// Fixed thumbnail dimensions; no aspect-ratio preservation
pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 240;

/// Resize a downloaded cover image to 320x240 and write it as PNG next to
/// the original, at `<path>.png`. The original file is kept.
///
/// Decoding and encoding are CPU-bound, so the work runs on the blocking
/// thread pool. Returns the thumbnail path on success.
pub async fn make_thumbnail(image_path: &Path) -> Result<PathBuf, ThumbnailError> {
    let source = image_path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        // CDN cover URLs routinely lie about the format in their extension,
        // so the decoder is chosen by sniffing content, not by path
        let img = image::ImageReader::open(&source)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.decode())
            .map_err(|e| ThumbnailError::OpenFailed {
                path: source.clone(),
                source: e,
            })?;

        let resized = img.resize_exact(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Triangle);

        let mut output = source.clone().into_os_string();
        output.push(".png");
        let output = PathBuf::from(output);

        resized
            .save_with_format(&output, ImageFormat::Png)
            .map_err(|e| ThumbnailError::WriteFailed {
                path: output.clone(),
                source: e,
            })?;

        Ok(output)
    })
    .await
    .map_err(|_| ThumbnailError::TaskCancelled)?
}
