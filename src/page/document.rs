// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only view of the host page.

use crate::error::AppError;
use std::collections::HashMap;

/// The parts of the host DOM the extractor reads.
///
/// Implemented by the browser bridge; the host page structure is not ours
/// and selectors may fail or match nothing at any time.
pub trait PageDocument: Send + Sync {
    fn url(&self) -> String;

    fn document_title(&self) -> String;

    /// Inner text of every element matching `selector`, in document order.
    fn select_texts(&self, selector: &str) -> Result<Vec<String>, AppError>;
}

/// A page snapshot held in memory.
///
/// Used for manual URL input (no DOM at all) and as a test double.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    pub url: String,
    pub title: String,
    elements: HashMap<String, Vec<String>>,
    broken: bool,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add an element with `text` matched by `selector`.
    pub fn with(mut self, selector: &str, text: &str) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(text.to_string());
        self
    }

    /// A page whose every selector query fails.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

impl PageDocument for StaticPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn document_title(&self) -> String {
        self.title.clone()
    }

    fn select_texts(&self, selector: &str) -> Result<Vec<String>, AppError> {
        if self.broken {
            return Err(AppError::ExtractionFailure(format!(
                "selector query failed: {}",
                selector
            )));
        }
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }
}
