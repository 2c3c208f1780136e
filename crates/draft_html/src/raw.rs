// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The raw JSON form of a document, as stored by editors that persist the
//! model rather than HTML.
//!
//! Offsets and lengths in the raw form count UTF-16 code units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RawContentError;
use crate::model::{
    BlockType, CharacterMetadata, ContentBlock, ContentState, Entity,
    EntityData, EntityKey, Mutability,
};
use crate::style_codec::{InlineStyle, StyleSet};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, RawEntity>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub data: Value,
}

impl RawContent {
    pub fn from_json(json: &str) -> Result<Self, RawContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RawContentError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Convert a content state to its raw form. Entity keys are positions in the
/// entity map.
pub fn convert_to_raw(
    content: &ContentState,
) -> Result<RawContent, RawContentError> {
    let mut entity_map = BTreeMap::new();
    for (index, entity) in content.entities().iter().enumerate() {
        let data = entity.data.to_raw().map_err(|source| {
            RawContentError::InvalidEntityData {
                key: index.to_string(),
                source,
            }
        })?;
        entity_map.insert(
            index.to_string(),
            RawEntity {
                entity_type: entity.entity_type().to_owned(),
                mutability: entity.mutability,
                data,
            },
        );
    }

    let blocks = content.blocks().iter().map(raw_block).collect();
    Ok(RawContent { blocks, entity_map })
}

fn raw_block(block: &ContentBlock) -> RawBlock {
    let units = Utf16Offsets::new(block.text());
    let range = |start: usize, end: usize| {
        (units.at(start), units.at(end) - units.at(start))
    };

    // Each style's maximal ranges, in order of where they start
    let mut inline_style_ranges: Vec<RawStyleRange> = Vec::new();
    let mut open: BTreeMap<&InlineStyle, usize> = BTreeMap::new();
    let empty = StyleSet::new();
    for i in 0..=block.len() {
        let styles = block.style_at(i).unwrap_or(&empty);
        let ended: Vec<&InlineStyle> =
            open.keys().filter(|s| !styles.contains(**s)).copied().collect();
        for style in ended {
            if let Some(start) = open.remove(style) {
                let (offset, length) = range(start, i);
                inline_style_ranges.push(RawStyleRange {
                    offset,
                    length,
                    style: style.clone(),
                });
            }
        }
        for style in styles {
            open.entry(style).or_insert(i);
        }
    }
    inline_style_ranges.sort_by_key(|r| r.offset);

    let entity_ranges = block
        .entity_ranges()
        .into_iter()
        .filter_map(|(entity, start, end)| {
            let (offset, length) = range(start, end);
            entity.map(|key| RawEntityRange {
                offset,
                length,
                key: key.index(),
            })
        })
        .collect();

    RawBlock {
        key: block.key.clone(),
        text: block.text().to_owned(),
        block_type: block.block_type.clone(),
        depth: block.depth,
        inline_style_ranges,
        entity_ranges,
        data: Map::new(),
    }
}

/// Rebuild a content state from its raw form.
///
/// Entities are renumbered in key order. Ranges must lie inside their
/// block's text and refer to entities present in the map.
pub fn convert_from_raw(
    raw: &RawContent,
) -> Result<ContentState, RawContentError> {
    // Numeric keys in numeric order, so "10" follows "9"
    let mut raw_entities: Vec<(&String, &RawEntity)> =
        raw.entity_map.iter().collect();
    raw_entities.sort_by_key(|(key, _)| {
        (key.parse::<usize>().unwrap_or(usize::MAX), *key)
    });

    let mut entities = Vec::new();
    let mut keys: BTreeMap<&str, EntityKey> = BTreeMap::new();
    for (key, entity) in raw_entities {
        let data =
            EntityData::from_raw(&entity.entity_type, entity.data.clone())
                .map_err(|source| RawContentError::InvalidEntityData {
                    key: key.clone(),
                    source,
                })?;
        entities.push(Entity::new(data, entity.mutability));
        keys.insert(key.as_str(), EntityKey(entities.len() - 1));
    }

    let mut blocks = Vec::with_capacity(raw.blocks.len());
    for raw_block in &raw.blocks {
        let units = Utf16Offsets::new(&raw_block.text);
        let out_of_bounds = || RawContentError::RangeOutOfBounds {
            block: raw_block.key.clone(),
        };
        let mut characters =
            vec![CharacterMetadata::default(); raw_block.text.chars().count()];

        for range in &raw_block.inline_style_ranges {
            let (start, end) = units
                .char_range(range.offset, range.length)
                .ok_or_else(out_of_bounds)?;
            for c in &mut characters[start..end] {
                c.style.insert(range.style.clone());
            }
        }
        for range in &raw_block.entity_ranges {
            let (start, end) = units
                .char_range(range.offset, range.length)
                .ok_or_else(out_of_bounds)?;
            let key = range.key.to_string();
            let entity = *keys.get(key.as_str()).ok_or_else(|| {
                RawContentError::UnknownEntity {
                    block: raw_block.key.clone(),
                    key: key.clone(),
                }
            })?;
            for c in &mut characters[start..end] {
                c.entity = Some(entity);
            }
        }

        let mut block = ContentBlock::from_characters(
            &raw_block.key,
            raw_block.block_type.clone(),
            raw_block.text.chars().zip(characters),
        );
        block.depth = raw_block.depth;
        blocks.push(block);
    }

    if blocks.is_empty() {
        return Ok(ContentState::from_parts(
            ContentState::new().blocks().to_vec(),
            entities,
        ));
    }
    Ok(ContentState::from_parts(blocks, entities))
}

/// UTF-16 offset of every char boundary of a string.
struct Utf16Offsets(Vec<usize>);

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut offsets = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;
        offsets.push(unit);
        for c in text.chars() {
            unit += c.len_utf16();
            offsets.push(unit);
        }
        Self(offsets)
    }

    /// UTF-16 offset of char index `index`.
    fn at(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or_else(|| self.len())
    }

    fn len(&self) -> usize {
        self.0.last().copied().unwrap_or_default()
    }

    /// Char indices of a UTF-16 range, if both ends fall on char boundaries
    /// inside the text.
    fn char_range(
        &self,
        offset: usize,
        length: usize,
    ) -> Option<(usize, usize)> {
        let start = self.0.binary_search(&offset).ok()?;
        let end = self.0.binary_search(&offset.checked_add(length)?).ok()?;
        Some((start, end))
    }
}
