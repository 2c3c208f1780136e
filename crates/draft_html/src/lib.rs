// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A block-based rich text model with HTML import and export.
//!
//! Documents are [`ContentState`] revisions: blocks of text where every
//! character carries a set of style tokens and an optional entity. Style
//! tokens are either boolean flags (`BOLD`) or keyed values
//! (`color__#ff0000`), see [`style_codec`].

mod error;
mod format_inspector;
mod html;
mod inline_style_mutator;
mod model;
mod raw;
pub mod style_codec;

use once_cell::sync::Lazy;

pub use crate::error::{HtmlImportError, RawContentError};
pub use crate::format_inspector::{get_format, FormatInspector, FormatSnapshot};
pub use crate::html::{
    convert_from_html, convert_to_html, serialize_to_html, HtmlExporter,
};
pub use crate::inline_style_mutator::{format_text, toggle_inline_style};
pub use crate::model::{
    block_key, BlockType, CharacterMetadata, CharacterRun, ContentBlock,
    ContentState, EditorState, Entity, EntityData, EntityKey, LinkData,
    MentionData, Mutability, Position, SelectionState, HASH_MENTION_TYPE,
    LINK_TYPE, MENTION_TYPE,
};
pub use crate::raw::{
    convert_from_raw, convert_to_raw, RawBlock, RawContent, RawEntity,
    RawEntityRange, RawStyleRange,
};
pub use crate::style_codec::{
    decode_style_set, resolve_custom_style_map, CssProperties, InlineStyle,
    StyleSet,
};
pub use format_keys::{
    CssDeclaration, FormatConfigError, FormatFlag, StyleConfig, StyleFamily,
};

/// The built-in style configuration used by the free functions.
pub static DEFAULT_STYLE_CONFIG: Lazy<StyleConfig> =
    Lazy::new(StyleConfig::default);
