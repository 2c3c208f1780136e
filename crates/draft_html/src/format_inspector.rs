// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Reports the formatting active at the selection, for toolbar state.

use std::collections::BTreeMap;

use format_keys::{FormatFlag, StyleConfig, StyleFamily};
use serde::Serialize;
use serde_json::Value;

use crate::model::{BlockType, EditorState};
use crate::style_codec::{InlineStyle, StyleSet};
use crate::DEFAULT_STYLE_CONFIG;

/// The formatting at the selection. Derived on demand, never stored.
///
/// Keyed style values live in `values` under the family's field name
/// (`color`, `font`, `size`, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSnapshot {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_through: bool,
    pub sub_script: bool,
    pub super_script: bool,
    pub text_align: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl FormatSnapshot {
    pub fn value(&self, family: StyleFamily) -> Option<&Value> {
        self.values.get(family.field_name())
    }

    /// A keyed value as a string, if it was not parsed into something else.
    pub fn value_str(&self, family: StyleFamily) -> Option<&str> {
        self.value(family).and_then(Value::as_str)
    }
}

pub struct FormatInspector<'a> {
    config: &'a StyleConfig,
}

impl<'a> FormatInspector<'a> {
    pub fn new(config: &'a StyleConfig) -> Self {
        Self { config }
    }

    pub fn inspect(&self, editor: &EditorState) -> FormatSnapshot {
        let block_type = editor
            .start_block()
            .map(|b| b.block_type.clone())
            .unwrap_or_default();
        self.inspect_styles(&editor.current_inline_style(), &block_type)
    }

    pub fn inspect_styles(
        &self,
        styles: &StyleSet,
        block_type: &BlockType,
    ) -> FormatSnapshot {
        let has = |flag: FormatFlag| styles.contains(&InlineStyle::Flag(flag));
        let mut snapshot = FormatSnapshot {
            bold: has(FormatFlag::Bold),
            italic: has(FormatFlag::Italic),
            underline: has(FormatFlag::Underline),
            strike_through: has(FormatFlag::StrikeThrough),
            sub_script: has(FormatFlag::SubScript),
            super_script: has(FormatFlag::SuperScript),
            text_align: block_type.to_string(),
            values: BTreeMap::new(),
        };
        for style in styles {
            if let InlineStyle::Keyed(family, raw) = style {
                let value = self.decode(*family, raw);
                snapshot.values.insert(family.field_name().to_owned(), value);
            }
        }
        snapshot
    }

    fn decode(&self, family: StyleFamily, raw: &str) -> Value {
        if self.config.is_parsed(family) {
            if let Ok(parsed) = serde_json::from_str(raw) {
                return parsed;
            }
        }
        Value::String(raw.to_owned())
    }
}

/// The formatting at the selection, using the default style configuration.
pub fn get_format(editor: &EditorState) -> FormatSnapshot {
    FormatInspector::new(&DEFAULT_STYLE_CONFIG).inspect(editor)
}
