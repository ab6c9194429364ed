// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing copy for relay errors.

use regex::Regex;
use std::sync::LazyLock;

/// Lowercase substrings and the message shown when any of them matches.
/// First matching row wins.
const FRIENDLY_COPY: &[(&[&str], &str)] = &[
    (
        &["relay access token"],
        "SceneSniffer couldn't connect to its local relay. Check the relay token setting and try again.",
    ),
    (
        &["rate limit"],
        "Rate limit reached. Free API keys have limited requests per minute. Please wait a moment and try again.",
    ),
    (
        &["api key not found", "no api key"],
        "No API key set. Click the SceneSniffer icon in your toolbar to add your Gemini API key.",
    ),
    (
        &["bad request", "validation error"],
        "SceneSniffer couldn't read this video's details. Reload the page and try again.",
    ),
    (
        &["401", "invalid", "api_key_invalid"],
        "Your API key appears to be invalid. Open the SceneSniffer popup and check your key.",
    ),
    (
        &["403", "permission"],
        "Your API key doesn't have permission for this request. Check your Google AI Studio account.",
    ),
    (
        &["quota"],
        "API quota exceeded. Try again tomorrow or upgrade your API plan.",
    ),
    (
        &["timeout", "timed out"],
        "Request timed out. The server may be busy, please try again.",
    ),
    (
        &["network", "fetch"],
        "Network error. Check your internet connection and try again.",
    ),
];

static API_ERROR_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^API error \(\d+\):\s*").ok());

/// Map a relay error message to the copy shown in the error panel.
pub fn friendly_error(message: &str) -> String {
    let lowered = message.to_lowercase();

    FRIENDLY_COPY
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(_, copy)| copy.to_string())
        .unwrap_or_else(|| match API_ERROR_PREFIX.as_ref() {
            Some(re) => re.replace(message, "").into_owned(),
            None => message.to_string(),
        })
}
