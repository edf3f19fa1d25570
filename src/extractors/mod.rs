use regex::Regex;
use std::sync::OnceLock;

/// Base URL for watch links built from a video identifier
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"v=([A-Za-z0-9_-]{11})").expect("video id pattern is valid"))
}

/// Extract the 11-character video identifier that follows a `v=` marker.
///
/// Only the `v=` form is recognised. Short links, embeds and playlist URLs are not
/// rewritten, and the rest of the URL is never validated.
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Build the public watch link for a video identifier
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_BASE, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL123&v=a_b-C1d2E3f&t=120"),
            Some("a_b-C1d2E3f".to_string())
        );
    }

    #[test]
    fn test_marker_anywhere_in_string() {
        // No URL validation, the marker alone is enough
        assert_eq!(extract_video_id("garbage v=ABCDEFGHIJK"), Some("ABCDEFGHIJK".to_string()));
    }

    #[test]
    fn test_longer_run_takes_first_eleven() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=ABCDEFGHIJKLMN"),
            Some("ABCDEFGHIJK".to_string())
        );
    }

    #[test]
    fn test_short_links_not_recognised() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_too_short_or_bad_chars() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc!defghij"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_watch_url_roundtrip() {
        let link = watch_url("ABCDEFGHIJK");
        assert_eq!(link, "https://www.youtube.com/watch?v=ABCDEFGHIJK");
        assert_eq!(extract_video_id(&link), Some("ABCDEFGHIJK".to_string()));
    }
}
