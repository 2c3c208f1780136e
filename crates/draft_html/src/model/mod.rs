// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The document model: blocks of text with per-character styles and
//! entities, a selection, and the editor state tying them together.

mod content_block;
mod content_state;
mod editor_state;
mod entity;
mod selection;

pub use content_block::{
    BlockType, CharacterMetadata, CharacterRun, ContentBlock,
};
pub use content_state::{block_key, ContentState};
pub use editor_state::EditorState;
pub use entity::{
    Entity, EntityData, EntityKey, LinkData, MentionData, Mutability,
    HASH_MENTION_TYPE, LINK_TYPE, MENTION_TYPE,
};
pub use selection::{Position, SelectionState};
