// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Names and tables shared between the editor toolbar and the draft HTML
//! converter.
//!
//! - [`FormatFlag`] lists the boolean inline styles. Their string form is the
//!   token stored in a style set (`BOLD`, `SUBSCRIPT`, ...).
//! - [`StyleFamily`] lists the families of keyed styles. A family identifier
//!   is a CSS property name, and a keyed token is `family__value`.
//! - [`StyleConfig`] carries the presentation settings for anchor-like
//!   entities and the families whose values are JSON literals.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Separator between a family identifier and its value inside a keyed token.
pub const KEYED_TOKEN_SEPARATOR: &str = "__";

/// Text colour forced onto exported mentions when the caller asks for it.
pub const DEFAULT_MENTION_ACCENT_COLOR: &str = "#0078d4";

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum FormatFlag {
    #[strum(serialize = "BOLD")]
    Bold,
    #[strum(serialize = "ITALIC")]
    Italic,
    #[strum(serialize = "UNDERLINE")]
    Underline,
    #[strum(serialize = "STRIKETHROUGH")]
    StrikeThrough,
    #[strum(serialize = "SUBSCRIPT")]
    SubScript,
    #[strum(serialize = "SUPERSCRIPT")]
    SuperScript,
    #[strum(serialize = "CODE")]
    Code,
}

/// A family of mutually exclusive keyed styles.
///
/// Only one value of a family may be active on a character; the inline style
/// mutator enforces that, the document model does not.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum StyleFamily {
    #[strum(serialize = "color")]
    Color,
    #[strum(serialize = "background-color")]
    BackgroundColor,
    #[strum(serialize = "font-family")]
    FontFamily,
    #[strum(serialize = "font-size")]
    FontSize,
    #[strum(serialize = "line-height")]
    LineHeight,
    #[strum(serialize = "justify-content")]
    JustifyContent,
}

impl StyleFamily {
    /// The CSS property this family is written as.
    pub fn css_property(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::FontFamily => "font-family",
            Self::FontSize => "font-size",
            Self::LineHeight => "line-height",
            Self::JustifyContent => "justify-content",
        }
    }

    /// Name of the field the value is reported under in a format snapshot.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BackgroundColor => "background",
            Self::FontFamily => "font",
            Self::FontSize => "size",
            Self::LineHeight => "lineHeight",
            Self::JustifyContent => "justifyContent",
        }
    }

    /// Token prefix including the separator, e.g. `color__`.
    pub fn token_prefix(&self) -> String {
        format!("{}{KEYED_TOKEN_SEPARATOR}", self.css_property())
    }

    /// Build the keyed token for `value`.
    ///
    /// The separator is not escaped, so `value` must not contain `__`.
    /// Written to a `style` attribute, a `;` in `value` ends the
    /// declaration unless it sits inside a quoted string.
    pub fn encode(&self, value: &str) -> String {
        format!("{}{KEYED_TOKEN_SEPARATOR}{value}", self.css_property())
    }

    /// Split a keyed token into its family and value. The head before the
    /// first separator must equal a family identifier exactly.
    pub fn decode(token: &str) -> Option<(Self, &str)> {
        let (head, value) = token.split_once(KEYED_TOKEN_SEPARATOR)?;
        head.parse::<Self>().ok().map(|family| (family, value))
    }
}

/// One `property: value` pair of an inline style attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssDeclaration {
    pub property: String,
    pub value: String,
}

impl CssDeclaration {
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.to_owned(),
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for CssDeclaration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.property, self.value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatConfigError {
    #[error("invalid style configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Presentation settings consumed by the converter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    /// Inline style applied to mention and link markup.
    pub anchor_style: Vec<CssDeclaration>,
    /// Colour used for mentions when the exporter is asked to colour them.
    pub mention_accent_color: String,
    /// Families whose raw values are JSON literals (numbers, objects).
    pub parsed_families: Vec<StyleFamily>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            anchor_style: vec![
                CssDeclaration::new("cursor", "pointer"),
                CssDeclaration::new("text-decoration", "none"),
                CssDeclaration::new("font-weight", "600"),
            ],
            mention_accent_color: DEFAULT_MENTION_ACCENT_COLOR.to_owned(),
            parsed_families: vec![StyleFamily::LineHeight],
        }
    }
}

impl StyleConfig {
    /// Load a configuration; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, FormatConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_parsed(&self, family: StyleFamily) -> bool {
        self.parsed_families.contains(&family)
    }
}
