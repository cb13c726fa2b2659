use std::path::{Path, PathBuf};

use url::Url;

/// Fold a lowercase character with diacritics to its ASCII base letter.
///
/// Covers the Vietnamese alphabet plus the common Latin accent range, which
/// is what podcast titles in the wild actually contain. Returns the input
/// unchanged when no folding applies.
fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ'
        | 'ẩ' | 'ẫ' | 'ậ' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ'
        | 'ở' | 'ỡ' | 'ợ' | 'ö' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'đ' => 'd',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Slugify an episode title into a filesystem-safe folder name.
///
/// Lowercases, folds diacritics, replaces runs of anything that is not an
/// ASCII letter or digit with a single `-`, and trims leading/trailing `-`.
/// The result contains only `[a-z0-9-]` and is a fixed point of slugify.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.to_lowercase().chars() {
        let c = fold_char(c);
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Compute the per-episode folder for a title: `<root>/<slug>`
pub fn episode_dir(output_root: &Path, title: &str) -> PathBuf {
    output_root.join(slugify(title))
}

/// Extract the filename part of a media URL: the substring after the last `/`.
///
/// Returns `None` when the URL is empty or ends with a `/` (no usable
/// filename), so callers skip the asset instead of writing a nameless file.
pub fn filename_from_url(url: &str) -> Option<&str> {
    let filename = url.rsplit('/').next()?;
    if filename.is_empty() {
        None
    } else {
        Some(filename)
    }
}

/// Compute the destination path for a media URL inside an episode folder.
///
/// `None` media (or media without a filename component) yields `None`: the
/// asset is absent, which is a skip, not an error.
pub fn destination(dir: &Path, media: Option<&Url>) -> Option<PathBuf> {
    let media = media?;
    let filename = filename_from_url(media.as_str())?;
    Some(dir.join(filename))
}

/// Create a directory and its parents if absent
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Slugify tests ===

    #[test]
    fn slugify_lowercases() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn slugify_collapses_runs_of_special_chars() {
        assert_eq!(slugify("Ep. 42: The -- Answer!"), "ep-42-the-answer");
    }

    #[test]
    fn slugify_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  --hello--  "), "hello");
    }

    #[test]
    fn slugify_folds_vietnamese_diacritics() {
        assert_eq!(
            slugify("Idriss et le secret du poulpe"),
            "idriss-et-le-secret-du-poulpe"
        );
        assert_eq!(slugify("Đường phố"), "duong-pho");
    }

    #[test]
    fn slugify_folds_latin_accents() {
        assert_eq!(slugify("Café résumé"), "cafe-resume");
    }

    #[test]
    fn slugify_drops_unfoldable_unicode() {
        assert_eq!(slugify("Hello 🎙️ World"), "hello-world");
        assert_eq!(slugify("中文"), "");
    }

    #[test]
    fn slugify_handles_empty_and_all_special() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify(":::///"), "");
    }

    #[test]
    fn slugify_output_is_safe_charset() {
        for title in ["Ép. 1 — \"Test\"", "a  b\tc", "ÀÉÎÕÜ"] {
            let slug = slugify(title);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad slug {slug:?} for {title:?}"
            );
            assert!(!slug.starts_with('-'));
            assert!(!slug.ends_with('-'));
        }
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in ["Ep One", "Ép. 2: thé!", "--a--b--"] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once);
        }
    }

    // === Folder tests ===

    #[test]
    fn episode_dir_joins_root_and_slug() {
        let dir = episode_dir(Path::new("data"), "Ep One");
        assert_eq!(dir, PathBuf::from("data/ep-one"));
    }

    // === Destination tests ===

    #[test]
    fn filename_is_last_url_segment() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/audio/file123.mp3"),
            Some("file123.mp3")
        );
    }

    #[test]
    fn filename_from_empty_url_is_none() {
        assert_eq!(filename_from_url(""), None);
    }

    #[test]
    fn filename_from_trailing_slash_is_none() {
        assert_eq!(filename_from_url("https://example.com/audio/"), None);
    }

    #[test]
    fn destination_joins_dir_and_filename() {
        let url = Url::parse("https://example.com/audio/ep1.mp3").unwrap();
        assert_eq!(
            destination(Path::new("data/ep-one"), Some(&url)),
            Some(PathBuf::from("data/ep-one/ep1.mp3"))
        );
    }

    #[test]
    fn destination_without_media_is_none() {
        assert_eq!(destination(Path::new("data/ep-one"), None), None);
    }

    #[test]
    fn ensure_dir_creates_nested_folders() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b/c");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
