// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video id and page-kind detection from URLs.

use regex::Regex;
use std::sync::LazyLock;

/// Short-form URL shape; capture 1 is the video id.
static SHORTS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"youtube\.com/shorts/([A-Za-z0-9_-]+)").ok());

/// Other URL shapes that still carry a video id, tried after shorts.
static OTHER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]+)",
        r"youtu\.be/([A-Za-z0-9_-]+)",
        r"youtube\.com/embed/([A-Za-z0-9_-]+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Whether `url` is a short-form video page.
pub fn is_short_form(url: &str) -> bool {
    SHORTS_PATTERN
        .as_ref()
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}

/// Platform video id, if `url` matches a known shape.
pub fn extract_video_id(url: &str) -> Option<String> {
    SHORTS_PATTERN
        .iter()
        .chain(OTHER_PATTERNS.iter())
        .find_map(|re| re.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// High-quality thumbnail for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorts_url() {
        let url = "https://www.youtube.com/shorts/abc123_-X?feature=share";
        assert!(is_short_form(url));
        assert_eq!(extract_video_id(url).as_deref(), Some("abc123_-X"));
    }

    #[test]
    fn test_other_shapes() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert!(!is_short_form("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_video_id("https://example.com/video/1"), None);
        assert!(!is_short_form("https://example.com/shorts"));
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("abc"),
            "https://i.ytimg.com/vi/abc/hqdefault.jpg"
        );
    }
}
