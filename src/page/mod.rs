// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page extraction: turning the host page into `VideoMetadata`.

pub mod document;
pub mod extractor;
pub mod video_id;

pub use document::{PageDocument, StaticPage};
pub use extractor::{extract_metadata, metadata_from_url};
pub use video_id::{extract_video_id, is_short_form, thumbnail_url};
