// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Metadata extraction with prioritised selector fallbacks.
//!
//! The host page re-renders freely and renames classes between releases, so
//! each field has an ordered list of selectors and the first non-empty
//! match wins. Extraction never fails: on any error the caller still gets a
//! record with the URL and a best-effort title.

use super::document::{PageDocument, StaticPage};
use super::video_id::{extract_video_id, thumbnail_url};
use crate::error::AppError;
use crate::models::VideoMetadata;

pub const TITLE_SELECTORS: &[&str] = &[
    "h2.ytShortsVideoTitleViewModelShortsVideoTitle",
    "yt-shorts-video-title-view-model h2",
    "ytd-reel-player-header-renderer #video-title",
    "#shorts-player h2",
];

pub const DESCRIPTION_SELECTORS: &[&str] = &[
    "#snippet-text #plain-snippet-text",
    "#description-inline-expander",
    "ytd-reel-player-header-renderer #description",
];

pub const CHANNEL_SELECTORS: &[&str] = &[
    ".ytd-channel-name a",
    "[id=\"channel-name\"] a",
    "a.yt-simple-endpoint.style-scope.ytd-shorts",
    ".shorts-info a",
    "a[href*=\"/channel/\"]",
    "a[href*=\"/@\"]",
    ".byline-container",
];

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Extract metadata for the video currently shown on `page`.
///
/// Fields are clamped to the lengths the relay accepts, so the record can
/// always be submitted.
pub fn extract_metadata<P: PageDocument + ?Sized>(page: &P) -> VideoMetadata {
    let url = page.url();
    let metadata = match try_extract(page, &url) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(error = %e, "Extraction failed, using minimal record");
            minimal_record(page, &url)
        }
    };
    metadata.clamped()
}

/// Metadata for a bare URL (manual input in the popup).
pub fn metadata_from_url(url: &str) -> VideoMetadata {
    extract_metadata(&StaticPage::new(url.trim(), ""))
}

fn try_extract<P: PageDocument + ?Sized>(page: &P, url: &str) -> Result<VideoMetadata, AppError> {
    let title = first_text(page, TITLE_SELECTORS)?;
    let description = first_text(page, DESCRIPTION_SELECTORS)?;
    let channel = first_text(page, CHANNEL_SELECTORS)?;
    let video_id = extract_video_id(url);

    tracing::debug!(
        structured_title = title.is_some(),
        has_description = description.is_some(),
        has_channel = channel.is_some(),
        video_id = video_id.as_deref().unwrap_or(""),
        "Page metadata extracted"
    );

    Ok(VideoMetadata {
        title: title.unwrap_or_else(|| fallback_title(&page.document_title())),
        description: description.unwrap_or_default(),
        channel: channel.unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
        url: url.to_string(),
        thumbnail_url: video_id.as_deref().map(thumbnail_url),
        video_id,
    })
}

/// First non-empty inner text across `selectors`, in priority order.
fn first_text<P: PageDocument + ?Sized>(
    page: &P,
    selectors: &[&str],
) -> Result<Option<String>, AppError> {
    for selector in selectors {
        let found = page
            .select_texts(selector)?
            .into_iter()
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty());
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn fallback_title(document_title: &str) -> String {
    let title = document_title.trim();
    let title = title.strip_suffix("- YouTube").unwrap_or(title).trim();
    if title.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn minimal_record<P: PageDocument + ?Sized>(page: &P, url: &str) -> VideoMetadata {
    VideoMetadata {
        title: fallback_title(&page.document_title()),
        channel: UNKNOWN_CHANNEL.to_string(),
        url: url.to_string(),
        video_id: extract_video_id(url),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    const SHORT: &str = "https://www.youtube.com/shorts/abc123";

    #[test]
    fn test_structured_fields_win() {
        let page = StaticPage::new(SHORT, "Ignored - YouTube")
            .with(TITLE_SELECTORS[0], "  The Office cold open ")
            .with(DESCRIPTION_SELECTORS[0], "Dwight fire drill")
            .with(CHANNEL_SELECTORS[1], "Clips4U");

        let meta = extract_metadata(&page);
        assert_eq!(meta.title, "The Office cold open");
        assert_eq!(meta.description, "Dwight fire drill");
        assert_eq!(meta.channel, "Clips4U");
        assert_eq!(meta.video_id.as_deref(), Some("abc123"));
        assert_eq!(
            meta.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/hqdefault.jpg")
        );
    }

    #[test]
    fn test_selector_priority_skips_blank_matches() {
        let page = StaticPage::new(SHORT, "")
            .with(CHANNEL_SELECTORS[0], "   ")
            .with(CHANNEL_SELECTORS[4], "Second choice")
            .with(CHANNEL_SELECTORS[6], "Last choice");

        assert_eq!(extract_metadata(&page).channel, "Second choice");
    }

    #[test]
    fn test_falls_back_to_document_title() {
        let page = StaticPage::new("https://example.com/clip", "Funny scene - YouTube");

        let meta = extract_metadata(&page);
        assert_eq!(meta.title, "Funny scene");
        assert_eq!(meta.channel, "Unknown Channel");
        assert_eq!(meta.video_id, None);
        assert_eq!(meta.thumbnail_url, None);
    }

    #[test]
    fn test_empty_page_still_has_title() {
        let meta = extract_metadata(&StaticPage::new("https://example.com", "   "));
        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.url, "https://example.com");
    }

    #[test]
    fn test_broken_dom_degrades_to_minimal_record() {
        let page = StaticPage::new(SHORT, "Clip - YouTube").broken();

        let meta = extract_metadata(&page);
        assert_eq!(meta.title, "Clip");
        assert_eq!(meta.url, SHORT);
        assert_eq!(meta.video_id.as_deref(), Some("abc123"));
        assert!(meta.description.is_empty());
    }

    #[test]
    fn test_oversized_fields_are_clamped() {
        let long_url = format!("{}?si={}", SHORT, "q".repeat(3000));
        let page = StaticPage::new(&long_url, &format!("{} - YouTube", "T".repeat(900)))
            .with(DESCRIPTION_SELECTORS[1], &"a".repeat(5001))
            .with(CHANNEL_SELECTORS[0], &"ç".repeat(300));

        let meta = extract_metadata(&page);
        assert_eq!(meta.title.chars().count(), 500);
        assert_eq!(meta.description.chars().count(), 5000);
        assert_eq!(meta.channel.chars().count(), 200);
        assert_eq!(meta.url.chars().count(), 2048);
        assert_eq!(meta.video_id.as_deref(), Some("abc123"));
        assert!(meta.validate().is_ok());

        let broken = StaticPage::new(&long_url, "").broken();
        assert_eq!(extract_metadata(&broken).url.chars().count(), 2048);
    }

    #[test]
    fn test_metadata_from_url() {
        let meta = metadata_from_url("  https://www.youtube.com/shorts/xyz ");
        assert_eq!(meta.url, "https://www.youtube.com/shorts/xyz");
        assert_eq!(meta.video_id.as_deref(), Some("xyz"));
        assert_eq!(meta.title, "Unknown Title");
    }
}
