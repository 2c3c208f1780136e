// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::EntityKey;
use crate::style_codec::StyleSet;

/// The type of a block. Alignment types double as paragraph alignment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockType {
    #[default]
    Unstyled,
    Center,
    Left,
    Right,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
    Atomic,
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unstyled => "unstyled",
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::HeaderOne => "header-one",
            Self::HeaderTwo => "header-two",
            Self::HeaderThree => "header-three",
            Self::HeaderFour => "header-four",
            Self::HeaderFive => "header-five",
            Self::HeaderSix => "header-six",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "code-block",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedListItem => "ordered-list-item",
            Self::Atomic => "atomic",
            Self::Other(name) => name,
        }
    }

    /// The `justify-content` value an alignment type is rendered with.
    pub fn justify_content(&self) -> Option<&'static str> {
        match self {
            Self::Center => Some("center"),
            Self::Left => Some("flex-start"),
            Self::Right => Some("flex-end"),
            _ => None,
        }
    }

    /// The alignment type rendered with `justify-content: value`.
    pub fn from_justify_content(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" => Some(Self::Center),
            "flex-start" | "start" | "left" => Some(Self::Left),
            "flex-end" | "end" | "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn header(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::HeaderOne),
            2 => Some(Self::HeaderTwo),
            3 => Some(Self::HeaderThree),
            4 => Some(Self::HeaderFour),
            5 => Some(Self::HeaderFive),
            6 => Some(Self::HeaderSix),
            _ => None,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::UnorderedListItem | Self::OrderedListItem)
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        match name {
            "unstyled" | "paragraph" => Self::Unstyled,
            "center" => Self::Center,
            "left" => Self::Left,
            "right" => Self::Right,
            "header-one" => Self::HeaderOne,
            "header-two" => Self::HeaderTwo,
            "header-three" => Self::HeaderThree,
            "header-four" => Self::HeaderFour,
            "header-five" => Self::HeaderFive,
            "header-six" => Self::HeaderSix,
            "blockquote" => Self::Blockquote,
            "code-block" => Self::CodeBlock,
            "unordered-list-item" => Self::UnorderedListItem,
            "ordered-list-item" => Self::OrderedListItem,
            "atomic" => Self::Atomic,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for BlockType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from(String::deserialize(deserializer)?.as_str()))
    }
}

/// Style and entity of a single character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }
}

/// A maximal run of characters sharing the same metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterRun<'a> {
    pub start: usize,
    pub end: usize,
    pub metadata: &'a CharacterMetadata,
}

/// A paragraph-like block: text plus per-character metadata.
///
/// Offsets count Unicode scalar values. `characters` always holds exactly
/// one entry per character of `text`.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBlock {
    pub key: String,
    pub block_type: BlockType,
    pub depth: usize,
    text: String,
    characters: Vec<CharacterMetadata>,
}

impl ContentBlock {
    /// A block of unstyled text.
    pub fn new(key: &str, block_type: BlockType, text: &str) -> Self {
        let characters =
            vec![CharacterMetadata::default(); text.chars().count()];
        Self {
            key: key.to_owned(),
            block_type,
            depth: 0,
            text: text.to_owned(),
            characters,
        }
    }

    /// A block built from `(char, metadata)` pairs.
    pub fn from_characters(
        key: &str,
        block_type: BlockType,
        chars: impl IntoIterator<Item = (char, CharacterMetadata)>,
    ) -> Self {
        let (text, characters): (String, Vec<CharacterMetadata>) =
            chars.into_iter().unzip();
        Self {
            key: key.to_owned(),
            block_type,
            depth: 0,
            text,
            characters,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn style_at(&self, offset: usize) -> Option<&StyleSet> {
        self.characters.get(offset).map(|c| &c.style)
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.characters.get(offset).and_then(|c| c.entity)
    }

    /// Characters in `[start, end)` as text.
    pub fn text_slice(&self, start: usize, end: usize) -> String {
        self.text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    /// Pairs of every character with its metadata.
    pub fn chars_with_metadata(
        &self,
    ) -> impl Iterator<Item = (char, &CharacterMetadata)> {
        self.text.chars().zip(self.characters.iter())
    }

    /// Split the block into maximal runs of identical metadata.
    pub fn runs(&self) -> Vec<CharacterRun<'_>> {
        let mut runs: Vec<CharacterRun<'_>> = Vec::new();
        for (i, metadata) in self.characters.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.metadata == metadata => run.end = i + 1,
                _ => runs.push(CharacterRun {
                    start: i,
                    end: i + 1,
                    metadata,
                }),
            }
        }
        runs
    }

    /// Maximal ranges sharing the same entity (or no entity).
    pub fn entity_ranges(&self) -> Vec<(Option<EntityKey>, usize, usize)> {
        let mut ranges: Vec<(Option<EntityKey>, usize, usize)> = Vec::new();
        for (i, c) in self.characters.iter().enumerate() {
            match ranges.last_mut() {
                Some((entity, _, end)) if *entity == c.entity => *end = i + 1,
                _ => ranges.push((c.entity, i, i + 1)),
            }
        }
        ranges
    }

    /// A copy with `f` applied to the metadata of `[start, end)`.
    pub(crate) fn map_characters<F>(
        &self,
        start: usize,
        end: usize,
        mut f: F,
    ) -> Self
    where
        F: FnMut(&mut CharacterMetadata),
    {
        let mut block = self.clone();
        let end = end.min(block.characters.len());
        for c in block.characters.iter_mut().take(end).skip(start) {
            f(c);
        }
        block
    }

    /// A copy with `[start, end)` replaced by the given characters.
    pub(crate) fn splice(
        &self,
        start: usize,
        end: usize,
        replacement: impl IntoIterator<Item = (char, CharacterMetadata)>,
    ) -> Self {
        let replacement: Vec<(char, CharacterMetadata)> =
            replacement.into_iter().collect();
        let chars = self
            .text
            .chars()
            .zip(self.characters.iter().cloned())
            .take(start)
            .chain(replacement)
            .chain(
                self.text
                    .chars()
                    .zip(self.characters.iter().cloned())
                    .skip(end),
            );
        let mut block =
            Self::from_characters(&self.key, self.block_type.clone(), chars);
        block.depth = self.depth;
        block
    }
}

#[cfg(test)]
mod tests {
    use format_keys::FormatFlag;

    use super::*;
    use crate::style_codec::InlineStyle;

    fn bold() -> CharacterMetadata {
        CharacterMetadata::new(
            [InlineStyle::from(FormatFlag::Bold)].into_iter().collect(),
            None,
        )
    }

    #[test]
    fn block_types_round_trip_through_names() {
        for name in ["unstyled", "center", "header-three", "code-block", "x"] {
            assert_eq!(BlockType::from(name).as_str(), name);
        }
        assert_eq!(BlockType::from("paragraph"), BlockType::Unstyled);
    }

    #[test]
    fn alignment_types_map_to_justify_content() {
        assert_eq!(BlockType::Right.justify_content(), Some("flex-end"));
        assert_eq!(
            BlockType::from_justify_content("flex-start"),
            Some(BlockType::Left)
        );
        assert_eq!(BlockType::Unstyled.justify_content(), None);
        assert_eq!(BlockType::from_justify_content("space-between"), None);
    }

    #[test]
    fn new_block_has_one_metadata_entry_per_char() {
        let block = ContentBlock::new("a", BlockType::Unstyled, "héllo");
        assert_eq!(block.len(), 5);
        assert_eq!(block.text_slice(1, 3), "él");
    }

    #[test]
    fn runs_group_identical_metadata() {
        let block = ContentBlock::new("a", BlockType::Unstyled, "abcd")
            .map_characters(1, 3, |c| *c = bold());
        let runs: Vec<(usize, usize)> =
            block.runs().iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(runs, vec![(0, 1), (1, 3), (3, 4)]);
    }

    #[test]
    fn splice_replaces_a_range() {
        let block = ContentBlock::new("a", BlockType::Unstyled, "abcd");
        let spliced = block.splice(1, 3, "XYZ".chars().map(|c| (c, bold())));
        assert_eq!(spliced.text(), "aXYZd");
        assert_eq!(spliced.len(), 5);
        assert_eq!(spliced.style_at(2), Some(&bold().style));
        assert!(spliced.style_at(4).unwrap().is_empty());
    }

    #[test]
    fn entity_ranges_cover_the_block() {
        let block = ContentBlock::new("a", BlockType::Unstyled, "abcd")
            .map_characters(2, 4, |c| c.entity = Some(EntityKey(0)));
        assert_eq!(
            block.entity_ranges(),
            vec![(None, 0, 2), (Some(EntityKey(0)), 2, 4)]
        );
    }
}
