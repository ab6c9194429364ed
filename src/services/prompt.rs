// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swappable prompt template for identification requests.
//!
//! Placeholders are `{title}`, `{description}`, `{channel}`, `{url}` and
//! `{video_id}`. A template line whose placeholders all render empty is
//! dropped, so optional fields leave no dangling labels.

use crate::config::ConfigError;
use crate::models::VideoMetadata;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_SYSTEM: &str = "You are a film and TV expert who identifies the movie or TV \
episode that a short video clip was taken from.";

const DEFAULT_USER: &str = r#"I'm watching a short-form video clip with these details:

Title: "{title}"
Description: "{description}"
Channel: "{channel}"
URL: {url}

Based on this information, identify which movie or TV show episode this clip is from.
If it is from a TV show, provide:
- Show name
- Season
- Episode
- Episode title
If it is from a movie, provide:
- Movie title
- Year
- Director
In both cases finish with:
- Explanation: how you identified it, in one or two sentences

If you can't determine the exact source, give your best guess based on the available information."#;

const DEFAULT_IMAGE_HINT: &str =
    "A frame from the clip is attached; use it as additional evidence.";

/// Prompt text and generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
    /// Appended to the user prompt when a thumbnail is attached
    pub image_hint: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            user: DEFAULT_USER.to_string(),
            image_hint: DEFAULT_IMAGE_HINT.to_string(),
            temperature: 0.2,
            max_output_tokens: 1024,
        }
    }
}

impl PromptTemplate {
    /// Load a template override from a JSON file. Missing fields keep defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::PromptTemplate(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::PromptTemplate(e.to_string()))
    }

    /// Render the user prompt for `metadata`.
    pub fn render(&self, metadata: &VideoMetadata, with_image: bool) -> String {
        let fields: [(&str, &str); 5] = [
            ("{title}", metadata.title.trim()),
            ("{description}", metadata.description.trim()),
            ("{channel}", metadata.channel.trim()),
            ("{url}", metadata.url.trim()),
            ("{video_id}", metadata.video_id.as_deref().unwrap_or("").trim()),
        ];

        let mut lines = Vec::new();
        for line in self.user.lines() {
            let used: Vec<_> = fields.iter().filter(|(p, _)| line.contains(p)).collect();
            if !used.is_empty() && used.iter().all(|(_, v)| v.is_empty()) {
                continue;
            }
            lines.push(substitute(line, &fields));
        }

        let mut prompt = lines.join("\n");
        if with_image && !self.image_hint.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.image_hint);
        }
        prompt
    }
}

/// Replace every `{name}` token in one pass over `line`. Values are never
/// rescanned, and unknown tokens are kept as written.
fn substitute(line: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let field = tail.find('}').and_then(|close| {
            let token = &tail[..=close];
            fields
                .iter()
                .find(|(p, _)| *p == token)
                .map(|(_, value)| (close, *value))
        });
        match field {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
