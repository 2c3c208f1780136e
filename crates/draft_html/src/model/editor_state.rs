// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::content_block::ContentBlock;
use super::content_state::ContentState;
use super::entity::{EntityData, Mutability};
use super::selection::SelectionState;
use crate::style_codec::StyleSet;

/// A content revision together with the user's selection.
///
/// `inline_style_override` is the pending typing style: styles toggled at a
/// collapsed cursor are kept here, not in the content, and are applied to
/// the next inserted text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionState,
    inline_style_override: Option<StyleSet>,
}

impl EditorState {
    /// An editor over `content` with the cursor at its start.
    pub fn create_with_content(content: ContentState) -> Self {
        let key = content
            .first_block()
            .map(|b| b.key.clone())
            .unwrap_or_default();
        Self {
            content,
            selection: SelectionState::collapsed(&key, 0),
            inline_style_override: None,
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    /// A new state with `content` as the current revision. The pending
    /// typing style is dropped.
    pub fn push(&self, content: ContentState) -> Self {
        Self {
            content,
            selection: self.selection.clone(),
            inline_style_override: None,
        }
    }

    /// A new state with the selection moved. The pending typing style is
    /// dropped.
    pub fn select(&self, selection: SelectionState) -> Self {
        Self {
            content: self.content.clone(),
            selection,
            inline_style_override: None,
        }
    }

    pub fn with_inline_style_override(&self, styles: StyleSet) -> Self {
        Self {
            inline_style_override: Some(styles),
            ..self.clone()
        }
    }

    /// The block holding the start of the selection.
    pub fn start_block(&self) -> Option<&ContentBlock> {
        let (start, _) = self.selection.ordered(&self.content)?;
        self.content.blocks().get(start.block_index)
    }

    /// The styles the next typed character would get.
    ///
    /// The pending typing style wins if there is one. Otherwise a collapsed
    /// cursor takes the style of the character before it (the first
    /// character of its block at offset 0, or the last character of the
    /// nearest non-empty block above when its block is empty), and a range
    /// takes the style of its first character.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(styles) = &self.inline_style_override {
            return styles.clone();
        }
        let Some((start, _)) = self.selection.ordered(&self.content) else {
            return StyleSet::new();
        };
        let blocks = self.content.blocks();
        let block = &blocks[start.block_index];

        let style = if self.selection.is_collapsed() {
            if start.offset > 0 {
                block.style_at(start.offset - 1)
            } else if !block.is_empty() {
                block.style_at(0)
            } else {
                blocks[..start.block_index]
                    .iter()
                    .rev()
                    .find(|b| !b.is_empty())
                    .and_then(|b| b.style_at(b.len() - 1))
            }
        } else if start.offset < block.len() {
            block.style_at(start.offset)
        } else {
            // The range starts at the very end of a block; use the next
            // block's first character.
            blocks[start.block_index + 1..]
                .iter()
                .find(|b| !b.is_empty())
                .and_then(|b| b.style_at(0))
        };
        style.cloned().unwrap_or_default()
    }

    /// Replace the selection with `text` typed in the current style.
    pub fn insert_text(&self, text: &str) -> Self {
        let style = self.current_inline_style();
        self.replace_selection(&self.content, text, &style, None)
    }

    /// Insert `text` annotated with a new entity, e.g. a mention picked from
    /// a suggestion list.
    pub fn insert_entity_text(
        &self,
        text: &str,
        data: EntityData,
        mutability: Mutability,
    ) -> Self {
        let style = self.current_inline_style();
        let (content, key) = self.content.create_entity(data, mutability);
        self.replace_selection(&content, text, &style, Some(key))
    }

    fn replace_selection(
        &self,
        content: &ContentState,
        text: &str,
        style: &StyleSet,
        entity: Option<super::EntityKey>,
    ) -> Self {
        let Some((content, after)) =
            content.replace_text(&self.selection, text, style, entity)
        else {
            return self.clone();
        };
        let key = content.blocks()[after.block_index].key.clone();
        Self {
            content,
            selection: SelectionState::collapsed(&key, after.offset),
            inline_style_override: None,
        }
    }
}
