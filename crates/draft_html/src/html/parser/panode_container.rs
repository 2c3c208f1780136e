// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;
use once_cell::sync::Lazy;
use regex::Regex;

use super::PaDomHandle;

/// A `property: value` declaration. Quoted strings inside the value may
/// contain `;`.
static STYLE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z-]+)\s*:\s*((?:"[^"]*"|'[^']*'|[^;"']|["'])*)"#)
        .unwrap()
});

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

impl PaNodeContainer {
    /// The lower-case local tag name.
    pub(crate) fn tag(&self) -> &str {
        self.name.local.as_ref()
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// The declarations of the `style` attribute in source order, property
    /// names lower-cased and values trimmed. Empty values are skipped.
    pub(crate) fn style_declarations(&self) -> Vec<(String, String)> {
        let Some(style) = self.get_attr("style") else {
            return Vec::new();
        };
        STYLE_DECLARATION
            .captures_iter(style)
            .filter_map(|caps| {
                let value = caps[2].trim();
                (!value.is_empty())
                    .then(|| (caps[1].to_ascii_lowercase(), value.to_owned()))
            })
            .collect()
    }

    /// The last value declared for `property`, if any.
    pub(crate) fn style(&self, property: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub(crate) fn contains_style(&self, name: &str, value: &str) -> bool {
        self.style(name)
            .is_some_and(|v| v.eq_ignore_ascii_case(value))
    }
}
