// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video metadata scraped from the host page.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub const MAX_TITLE_CHARS: usize = 500;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_CHANNEL_CHARS: usize = 200;
pub const MAX_URL_CHARS: usize = 2048;

/// Everything the identification prompt knows about a clip.
///
/// Built per request and never persisted. Only `title` is guaranteed to be
/// non-empty; the extractor falls back to the document title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VideoMetadata {
    /// Video title (or the page title as a fallback)
    #[validate(length(min = 1, max = 500))]
    #[serde(default)]
    pub title: String,
    /// Description snippet, empty when none is shown
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    /// Uploader channel name
    #[validate(length(max = 200))]
    #[serde(default)]
    pub channel: String,
    /// Page URL the metadata was read from
    #[validate(length(max = 2048))]
    #[serde(default)]
    pub url: String,
    /// Platform video identifier parsed from the URL
    #[serde(default)]
    pub video_id: Option<String>,
    /// Thumbnail image URL, when a video id is known
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl VideoMetadata {
    /// Cut every text field down to the length the relay accepts.
    pub fn clamped(mut self) -> Self {
        clamp_chars(&mut self.title, MAX_TITLE_CHARS);
        clamp_chars(&mut self.description, MAX_DESCRIPTION_CHARS);
        clamp_chars(&mut self.channel, MAX_CHANNEL_CHARS);
        clamp_chars(&mut self.url, MAX_URL_CHARS);
        self
    }
}

/// Truncate `text` to at most `max` characters, on a char boundary.
fn clamp_chars(text: &mut String, max: usize) {
    if let Some((end, _)) = text.char_indices().nth(max) {
        text.truncate(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_record_passes_validation() {
        let meta = VideoMetadata {
            title: "t".repeat(MAX_TITLE_CHARS + 1),
            description: "é".repeat(MAX_DESCRIPTION_CHARS + 10),
            channel: "c".repeat(MAX_CHANNEL_CHARS * 2),
            url: format!("https://www.youtube.com/shorts/{}", "x".repeat(MAX_URL_CHARS)),
            ..Default::default()
        };
        assert!(meta.validate().is_err());

        let meta = meta.clamped();
        assert_eq!(meta.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(meta.description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert_eq!(meta.channel.chars().count(), MAX_CHANNEL_CHARS);
        assert_eq!(meta.url.chars().count(), MAX_URL_CHARS);
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_short_fields_untouched() {
        let meta = VideoMetadata {
            title: "Heat".to_string(),
            ..Default::default()
        };
        assert_eq!(meta.clone().clamped(), meta);
    }
}
