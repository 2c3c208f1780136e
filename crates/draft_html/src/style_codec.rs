// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Style tokens and their string encoding.
//!
//! A style set holds atomic tokens. Boolean styles are stored by name
//! (`BOLD`), keyed styles as `family__value` (`color__red`). Tokens are
//! typed here as [`InlineStyle`]; the string form only appears at the edges
//! (raw content and the HTML exporter).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use format_keys::{FormatFlag, StyleFamily, KEYED_TOKEN_SEPARATOR};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single inline style token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Flag(FormatFlag),
    Keyed(StyleFamily, String),
    /// A token this crate does not understand. Kept so that styles written
    /// by newer collaborators survive a round trip through the model.
    Custom(String),
}

/// The set of tokens applied to one character.
pub type StyleSet = BTreeSet<InlineStyle>;

/// Keyed style values by family, as produced by [`decode_style_set`].
pub type CssProperties = BTreeMap<StyleFamily, String>;

impl InlineStyle {
    pub fn keyed(family: StyleFamily, value: impl Into<String>) -> Self {
        Self::Keyed(family, value.into())
    }

    /// Parse a token. Never fails: unknown tokens become [`Self::Custom`].
    pub fn from_token(token: &str) -> Self {
        if let Ok(flag) = token.parse::<FormatFlag>() {
            Self::Flag(flag)
        } else if let Some((family, value)) = StyleFamily::decode(token) {
            Self::Keyed(family, value.to_owned())
        } else {
            Self::Custom(token.to_owned())
        }
    }

    /// The family of a keyed token.
    pub fn family(&self) -> Option<StyleFamily> {
        match self {
            Self::Keyed(family, _) => Some(*family),
            _ => None,
        }
    }

    pub fn flag(&self) -> Option<FormatFlag> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// A `(property, value)` pair for tokens that render as an inline style:
    /// keyed tokens, and custom tokens shaped like `property__value`.
    pub fn css_declaration(&self) -> Option<(&str, &str)> {
        match self {
            Self::Keyed(family, value) => {
                Some((family.css_property(), value.as_str()))
            }
            Self::Custom(token) => token.split_once(KEYED_TOKEN_SEPARATOR),
            Self::Flag(_) => None,
        }
    }
}

impl From<FormatFlag> for InlineStyle {
    fn from(flag: FormatFlag) -> Self {
        Self::Flag(flag)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(formatter, "{flag}"),
            Self::Keyed(family, value) => {
                write!(formatter, "{}", family.encode(value))
            }
            Self::Custom(token) => write!(formatter, "{token}"),
        }
    }
}

impl FromStr for InlineStyle {
    type Err = std::convert::Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(token))
    }
}

impl Serialize for InlineStyle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InlineStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

/// Collect the keyed values of a style set by family.
///
/// Each token is matched to exactly one family by its head, so the result
/// does not depend on the order families are declared in. If a set carries
/// several values of one family, the one that sorts last wins.
pub fn decode_style_set(styles: &StyleSet) -> CssProperties {
    styles
        .iter()
        .filter_map(|style| match style {
            InlineStyle::Keyed(family, value) => Some((*family, value.clone())),
            _ => None,
        })
        .collect()
}

/// Keyed values of a style set as CSS properties, ready to be applied to a
/// rendered run of text.
pub fn resolve_custom_style_map(
    styles: &StyleSet,
) -> BTreeMap<&'static str, String> {
    decode_style_set(styles)
        .into_iter()
        .map(|(family, value)| (family.css_property(), value))
        .collect()
}

/// Every keyed token of `family` in `styles`.
pub(crate) fn styles_in_family(
    styles: &StyleSet,
    family: StyleFamily,
) -> impl Iterator<Item = &InlineStyle> {
    styles
        .iter()
        .filter(move |style| style.family() == Some(family))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> StyleSet {
        tokens.iter().map(|t| InlineStyle::from_token(t)).collect()
    }

    #[test]
    fn tokens_parse_into_typed_styles() {
        assert_eq!(
            InlineStyle::from_token("BOLD"),
            InlineStyle::Flag(FormatFlag::Bold)
        );
        assert_eq!(
            InlineStyle::from_token("color__#ff0000"),
            InlineStyle::keyed(StyleFamily::Color, "#ff0000")
        );
        assert_eq!(
            InlineStyle::from_token("HIGHLIGHT"),
            InlineStyle::Custom("HIGHLIGHT".to_owned())
        );
    }

    #[test]
    fn tokens_display_as_their_encoding() {
        assert_eq!(InlineStyle::from(FormatFlag::Italic).to_string(), "ITALIC");
        assert_eq!(
            InlineStyle::keyed(StyleFamily::FontSize, "14px").to_string(),
            "font-size__14px"
        );
    }

    #[test]
    fn decode_collects_one_value_per_family() {
        let props = decode_style_set(&set(&[
            "BOLD",
            "color__red",
            "background-color__blue",
            "font-family__Arial",
        ]));
        assert_eq!(props.len(), 3);
        assert_eq!(props[&StyleFamily::Color], "red");
        assert_eq!(props[&StyleFamily::BackgroundColor], "blue");
        assert_eq!(props[&StyleFamily::FontFamily], "Arial");
    }

    #[test]
    fn decode_does_not_confuse_families_sharing_a_suffix() {
        // A substring scan for `color__` would report this as a colour.
        let props = decode_style_set(&set(&["background-color__red"]));
        assert_eq!(props.get(&StyleFamily::Color), None);
        assert_eq!(props[&StyleFamily::BackgroundColor], "red");
    }

    #[test]
    fn decode_ignores_custom_and_flag_tokens() {
        let props = decode_style_set(&set(&["SUBSCRIPT", "border__1px"]));
        assert!(props.is_empty());
    }

    #[test]
    fn resolved_style_map_uses_css_property_names() {
        let props =
            resolve_custom_style_map(&set(&["line-height__1.5", "color__red"]));
        assert_eq!(props["line-height"], "1.5");
        assert_eq!(props["color"], "red");
    }

    #[test]
    fn custom_keyed_tokens_still_render_as_declarations() {
        let style = InlineStyle::from_token("border__1px solid");
        assert_eq!(style.css_declaration(), Some(("border", "1px solid")));
        let highlight = InlineStyle::from_token("HIGHLIGHT");
        assert_eq!(highlight.css_declaration(), None);
    }

    #[test]
    fn styles_serialize_as_token_strings() {
        let json =
            serde_json::to_string(&set(&["BOLD", "color__red"])).unwrap();
        assert_eq!(json, r#"["BOLD","color__red"]"#);
        let back: StyleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set(&["BOLD", "color__red"]));
    }
}
