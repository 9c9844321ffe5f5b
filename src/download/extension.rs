//! File extension resolution for downloaded images

/// Extensions the downloader can produce
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".png", ".gif", ".webp"];

/// Fallback when neither the content type nor the URL is recognized
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Content-type fragment -> extension, checked in order
const CONTENT_TYPE_RULES: &[(&str, &str)] = &[
    ("jpeg", ".jpg"),
    ("jpg", ".jpg"),
    ("png", ".png"),
    ("gif", ".gif"),
    ("webp", ".webp"),
];

/// URL suffix -> extension, checked in order
const URL_SUFFIX_RULES: &[(&str, &str)] = &[
    (".jpg", ".jpg"),
    (".jpeg", ".jpg"),
    (".png", ".png"),
    (".gif", ".gif"),
    (".webp", ".webp"),
];

/// Pick an extension for a download
///
/// The content type wins over the URL; `.jpg` is the fallback.
pub fn resolve_extension(content_type: &str, url: &str) -> &'static str {
    let content_type = content_type.to_lowercase();
    if let Some((_, ext)) = CONTENT_TYPE_RULES
        .iter()
        .find(|(fragment, _)| content_type.contains(fragment))
    {
        return *ext;
    }

    let url = url.to_lowercase();
    URL_SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| url.ends_with(suffix))
        .map(|(_, ext)| *ext)
        .unwrap_or(DEFAULT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_wins_over_url() {
        assert_eq!(resolve_extension("image/png", "https://x.test/a.jpg"), ".png");
        assert_eq!(resolve_extension("image/jpeg", "https://x.test/a.gif"), ".jpg");
        assert_eq!(resolve_extension("image/gif", "https://x.test/a"), ".gif");
        assert_eq!(resolve_extension("image/webp", "https://x.test/a.png"), ".webp");
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        assert_eq!(resolve_extension("Image/PNG", ""), ".png");
    }

    #[test]
    fn test_falls_back_to_url_suffix() {
        assert_eq!(resolve_extension("image/avif", "https://x.test/A.JPEG"), ".jpg");
        assert_eq!(resolve_extension("", "https://x.test/a.png"), ".png");
        assert_eq!(resolve_extension("image/x-icon", "https://x.test/a.gif"), ".gif");
        assert_eq!(resolve_extension("", "https://x.test/a.webp"), ".webp");
    }

    #[test]
    fn test_default_is_jpg() {
        assert_eq!(resolve_extension("image/avif", "https://x.test/a.avif"), DEFAULT_EXTENSION);
        assert_eq!(resolve_extension("", ""), ".jpg");
        // query strings defeat suffix matching
        assert_eq!(resolve_extension("", "https://x.test/a.png?w=200"), ".jpg");
    }

    #[test]
    fn test_results_are_known_extensions() {
        for (ct, url) in [("image/png", ""), ("", "a.gif"), ("", "")] {
            assert!(IMAGE_EXTENSIONS.contains(&resolve_extension(ct, url)));
        }
    }
}
