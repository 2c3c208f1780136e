// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Entities: out-of-band annotations (mentions, links) attached to ranges
//! of text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumString};

pub const MENTION_TYPE: &str = "mention";
pub const HASH_MENTION_TYPE: &str = "#mention";
pub const LINK_TYPE: &str = "link";

/// Handle of an entity inside a content state's entity map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(pub(crate) usize);

impl EntityKey {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    #[default]
    #[strum(serialize = "MUTABLE")]
    Mutable,
    #[strum(serialize = "IMMUTABLE")]
    Immutable,
    #[strum(serialize = "SEGMENTED")]
    Segmented,
}

/// Payload of a user mention or hash mention.
///
/// Fields hold whatever JSON the payload carried, `null` included, so any
/// payload is written back unchanged. Keys not named here are kept in
/// `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionData {
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A key that is present keeps its value, even `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A payload field as text: strings as they are, numbers and booleans in
/// their JSON form, nothing for `null` or structured values.
fn field_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

impl MentionData {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<String> {
        field_text(&self.name)
    }

    pub fn color(&self) -> Option<String> {
        field_text(&self.color)
    }

    pub fn title(&self) -> Option<String> {
        field_text(&self.title)
    }

    /// The mention key as text, whether it was stored as a string or a
    /// number.
    pub fn key_text(&self) -> String {
        field_text(&self.key).unwrap_or_default()
    }

    /// A copy with the picture fields blanked, for writing into markup.
    pub fn without_images(&self) -> Self {
        Self {
            image: Some(Value::from("")),
            avatar: Some(Value::from("")),
            ..self.clone()
        }
    }
}

/// Payload of a hyperlink.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkData {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            extra: Map::new(),
        }
    }
}

/// The typed payload of an entity. The variant is the entity type.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityData {
    Mention(MentionData),
    HashMention(MentionData),
    Link(LinkData),
    /// An entity type this crate has no markup for. Exported as plain text.
    Other {
        entity_type: String,
        data: Map<String, Value>,
    },
}

impl EntityData {
    /// Build a payload from a type tag and its JSON data. Link tags match
    /// case-insensitively (`link`, `LINK`).
    pub fn from_raw(
        entity_type: &str,
        data: Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match entity_type {
            MENTION_TYPE => Self::Mention(mention_from_raw(data)?),
            HASH_MENTION_TYPE => Self::HashMention(mention_from_raw(data)?),
            t if t.eq_ignore_ascii_case(LINK_TYPE) => {
                Self::Link(serde_json::from_value(data)?)
            }
            _ => Self::Other {
                entity_type: entity_type.to_owned(),
                data: serde_json::from_value(data)?,
            },
        })
    }

    /// The payload as raw JSON data.
    ///
    /// Mentions are nested under a `mention` key, the shape the editor's
    /// mention plugin stores them in.
    pub fn to_raw(&self) -> Result<Value, serde_json::Error> {
        Ok(match self {
            Self::Mention(mention) | Self::HashMention(mention) => {
                serde_json::json!({ "mention": mention })
            }
            Self::Link(link) => serde_json::to_value(link)?,
            Self::Other { data, .. } => Value::Object(data.clone()),
        })
    }

    pub fn entity_type(&self) -> &str {
        match self {
            Self::Mention(_) => MENTION_TYPE,
            Self::HashMention(_) => HASH_MENTION_TYPE,
            Self::Link(_) => LINK_TYPE,
            Self::Other { entity_type, .. } => entity_type,
        }
    }
}

/// Raw mention data is either the mention itself or `{ "mention": {...} }`.
fn mention_from_raw(data: Value) -> Result<MentionData, serde_json::Error> {
    match data {
        Value::Object(mut map) if map.contains_key(MENTION_TYPE) => {
            serde_json::from_value(map.remove(MENTION_TYPE).unwrap_or_default())
        }
        other => serde_json::from_value(other),
    }
}

/// An annotation on a range of text. Entities never change once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub data: EntityData,
    pub mutability: Mutability,
}

impl Entity {
    pub fn new(data: EntityData, mutability: Mutability) -> Self {
        Self { data, mutability }
    }

    pub fn entity_type(&self) -> &str {
        self.data.entity_type()
    }
}
