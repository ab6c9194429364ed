// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Light structural highlighting of the model's free-form answer.
//!
//! The answer is not a fixed schema. Lines that start with a known label
//! ("Show name:", "- **Season:** 2", ...) get that label pulled out and
//! normalised; everything else is kept as text with markdown bold/italic
//! turned into inline spans.

use regex::Regex;
use std::sync::LazyLock;

/// A run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
}

/// One rendered line of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    /// Normalised label, e.g. `Show name` for both "TV Show" and "Show name"
    pub label: Option<&'static str>,
    pub bullet: bool,
    pub content: Vec<Inline>,
}

impl ResultLine {
    /// Plain text of the line without markup.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|i| match i {
                Inline::Text(s) | Inline::Strong(s) | Inline::Emphasis(s) => s.as_str(),
            })
            .collect()
    }
}

/// Label spellings, longest first so alternation prefers them.
const LABELS: &[(&str, &str)] = &[
    ("movie title", "Movie title"),
    ("episode title", "Episode title"),
    ("brief explanation", "Explanation"),
    ("release year", "Year"),
    ("show name", "Show name"),
    ("tv show", "Show name"),
    ("explanation", "Explanation"),
    ("director", "Director"),
    ("episode", "Episode"),
    ("season", "Season"),
    ("title", "Title"),
    ("year", "Year"),
];

fn label_alternation() -> String {
    LABELS
        .iter()
        .map(|(spelling, _)| spelling.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// `- **Label:** value`; the colon is optional after a bullet.
static BULLETED_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:-\s*|[*•]\s+)\**\s*({})\b\s*\**\s*:?\s*\**\s*",
        label_alternation()
    ))
    .ok()
});

/// `**Label:** value` or `Label: value`; colon required.
static PLAIN_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\**\s*({})\s*\**\s*:\s*\**\s*",
        label_alternation()
    ))
    .ok()
});

static BULLET: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^(?:-\s*|[*•]\s+)").ok());

static EMPHASIS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*").ok());

/// Split the answer into highlighted lines. Blank lines are dropped.
pub fn format_result(text: &str) -> Vec<ResultLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(format_line)
        .collect()
}

/// Normalised labels present in `lines`, in order of appearance.
pub fn recognized_labels(lines: &[ResultLine]) -> Vec<&'static str> {
    lines.iter().filter_map(|l| l.label).collect()
}

fn format_line(line: &str) -> ResultLine {
    for (re, bullet) in [(BULLETED_LABEL.as_ref(), true), (PLAIN_LABEL.as_ref(), false)] {
        let Some(re) = re else { continue };
        if let Some(caps) = re.captures(line) {
            let (Some(whole), Some(spelling)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            return ResultLine {
                label: normalise_label(spelling.as_str()),
                bullet,
                content: inlines(line[whole.end()..].trim()),
            };
        }
    }

    match BULLET.as_ref().and_then(|re| re.find(line)) {
        Some(m) => ResultLine {
            label: None,
            bullet: true,
            content: inlines(line[m.end()..].trim()),
        },
        None => ResultLine {
            label: None,
            bullet: false,
            content: inlines(line),
        },
    }
}

fn normalise_label(spelling: &str) -> Option<&'static str> {
    let key = spelling
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LABELS
        .iter()
        .find(|(s, _)| *s == key)
        .map(|(_, label)| *label)
}

fn inlines(text: &str) -> Vec<Inline> {
    let Some(re) = EMPHASIS.as_ref() else {
        return vec![Inline::Text(text.to_string())];
    };

    let mut out = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Inline::Text(text[last..whole.start()].to_string()));
        }
        if let Some(strong) = caps.get(1) {
            out.push(Inline::Strong(strong.as_str().to_string()));
        } else if let Some(em) = caps.get(2) {
            out.push(Inline::Emphasis(em.as_str().to_string()));
        }
        last = whole.end();
    }
    if last < text.len() {
        out.push(Inline::Text(text[last..].to_string()));
    }
    out
}
