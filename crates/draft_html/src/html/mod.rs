// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion between content states and HTML.
//!
//! [`convert_to_html`] and [`convert_from_html`] are inverses for
//! everything the exporter writes: styles, alignment, lists and entity
//! markup survive a round trip. [`serialize_to_html`] is a plainer output
//! for consumers that do not read entity payloads back.

mod export;
mod import;
mod inline;
pub(crate) mod parser;
mod serialize;

pub use export::{convert_to_html, HtmlExporter};
pub use import::convert_from_html;
pub use serialize::serialize_to_html;

use crate::model::BlockType;

/// Attribute holding an entity's JSON payload.
pub(crate) const DATA_VALUE_ATTR: &str = "data-value";
pub(crate) const MENTION_CLASS: &str = "mention";
pub(crate) const HASH_MENTION_CLASS: &str = "hash-mention";
/// `data-id` marking links written by the exporter.
pub(crate) const DRAFT_LINK_ID: &str = "draft-link";

/// The list element grouping consecutive blocks of `block_type`.
fn list_tag(block_type: &BlockType) -> Option<&'static str> {
    match block_type {
        BlockType::UnorderedListItem => Some("ul"),
        BlockType::OrderedListItem => Some("ol"),
        _ => None,
    }
}

/// The header element for a header block type.
fn header_tag(block_type: &BlockType) -> Option<&'static str> {
    match block_type {
        BlockType::HeaderOne => Some("h1"),
        BlockType::HeaderTwo => Some("h2"),
        BlockType::HeaderThree => Some("h3"),
        BlockType::HeaderFour => Some("h4"),
        BlockType::HeaderFive => Some("h5"),
        BlockType::HeaderSix => Some("h6"),
        _ => None,
    }
}
