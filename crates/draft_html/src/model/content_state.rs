// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::content_block::{BlockType, CharacterMetadata, ContentBlock};
use super::entity::{Entity, EntityData, EntityKey, Mutability};
use super::selection::{Position, SelectionState};
use crate::style_codec::{InlineStyle, StyleSet};

/// Key given to the block at `index` by the importer and by
/// [`ContentState::new`].
pub fn block_key(index: usize) -> String {
    format!("b{index}")
}

/// One revision of a document: its blocks and the entities they refer to.
///
/// A `ContentState` is never changed in place. Every modifier returns a new
/// revision and leaves `self` untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentState {
    blocks: Vec<ContentBlock>,
    entity_map: Vec<Entity>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentState {
    /// A document with one empty paragraph.
    pub fn new() -> Self {
        Self::from_blocks(vec![ContentBlock::new(
            &block_key(0),
            BlockType::Unstyled,
            "",
        )])
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::from_parts(blocks, Vec::new())
    }

    pub fn from_parts(
        blocks: Vec<ContentBlock>,
        entity_map: Vec<Entity>,
    ) -> Self {
        Self { blocks, entity_map }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entity_map
    }

    pub fn first_block(&self) -> Option<&ContentBlock> {
        self.blocks.first()
    }

    pub fn block_index(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.key == key)
    }

    pub fn block_for_key(&self, key: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.key == key)
    }

    /// The position of `offset` in block `key`, clamped to the block.
    pub fn position(&self, key: &str, offset: usize) -> Option<Position> {
        let block_index = self.block_index(key)?;
        Some(Position {
            block_index,
            offset: offset.min(self.blocks[block_index].len()),
        })
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entity_map.get(key.0)
    }

    /// A new revision with the entity added, and the entity's key.
    pub fn create_entity(
        &self,
        data: EntityData,
        mutability: Mutability,
    ) -> (Self, EntityKey) {
        let mut content = self.clone();
        let key = content.push_entity(Entity::new(data, mutability));
        (content, key)
    }

    pub(crate) fn push_entity(&mut self, entity: Entity) -> EntityKey {
        self.entity_map.push(entity);
        EntityKey(self.entity_map.len() - 1)
    }

    /// All text, blocks joined by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_empty())
    }

    /// Add `style` to every character in the selection.
    pub fn apply_inline_style(
        &self,
        selection: &SelectionState,
        style: &InlineStyle,
    ) -> Self {
        self.map_selection(selection, |c| {
            c.style.insert(style.clone());
        })
    }

    /// Remove `style` from every character in the selection.
    pub fn remove_inline_style(
        &self,
        selection: &SelectionState,
        style: &InlineStyle,
    ) -> Self {
        self.map_selection(selection, |c| {
            c.style.remove(style);
        })
    }

    /// Every style found on any character of the selection.
    pub fn styles_in_selection(&self, selection: &SelectionState) -> StyleSet {
        let Some((start, end)) = selection.ordered(self) else {
            return StyleSet::new();
        };
        let mut styles = StyleSet::new();
        for index in start.block_index..=end.block_index {
            let block = &self.blocks[index];
            let from = if index == start.block_index {
                start.offset
            } else {
                0
            };
            let to = if index == end.block_index {
                end.offset
            } else {
                block.len()
            };
            for c in block.characters().iter().take(to).skip(from) {
                styles.extend(c.style.iter().cloned());
            }
        }
        styles
    }

    /// Replace the selected text with `text`, every inserted character
    /// carrying `style` and `entity`. Returns the new revision and the
    /// position just after the inserted text.
    pub fn replace_text(
        &self,
        selection: &SelectionState,
        text: &str,
        style: &StyleSet,
        entity: Option<EntityKey>,
    ) -> Option<(Self, Position)> {
        let (start, end) = selection.ordered(self)?;
        let first = &self.blocks[start.block_index];
        let last = &self.blocks[end.block_index];

        let inserted = text
            .chars()
            .map(|c| (c, CharacterMetadata::new(style.clone(), entity)));
        let tail: Vec<(char, CharacterMetadata)> = last
            .chars_with_metadata()
            .skip(end.offset)
            .map(|(c, m)| (c, m.clone()))
            .collect();
        let merged =
            first.splice(start.offset, first.len(), inserted.chain(tail));

        let mut content = self.clone();
        content
            .blocks
            .splice(start.block_index..=end.block_index, [merged]);
        let after = Position {
            block_index: start.block_index,
            offset: start.offset + text.chars().count(),
        };
        Some((content, after))
    }

    fn map_selection<F>(&self, selection: &SelectionState, mut f: F) -> Self
    where
        F: FnMut(&mut CharacterMetadata),
    {
        let Some((start, end)) = selection.ordered(self) else {
            return self.clone();
        };
        let mut content = self.clone();
        for index in start.block_index..=end.block_index {
            let block = &content.blocks[index];
            let from = if index == start.block_index {
                start.offset
            } else {
                0
            };
            let to = if index == end.block_index {
                end.offset
            } else {
                block.len()
            };
            content.blocks[index] = block.map_characters(from, to, &mut f);
        }
        content
    }
}
