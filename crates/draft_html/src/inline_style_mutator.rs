// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Applying formatting to the selection.
//!
//! - **Collapsed cursor**: only the pending typing style changes; the
//!   content revision is untouched.
//! - **Range selection**: a new content revision with the style applied to
//!   or removed from every selected character.

use crate::model::EditorState;
use crate::style_codec::{styles_in_family, InlineStyle, StyleSet};

/// Apply a format to the selection.
///
/// For a keyed style every value of its family is cleared from the
/// selection first, so at most one value per family stays active. The new
/// value is then added, unless it was already the active one, in which case
/// the family simply ends up cleared. Boolean and custom styles toggle.
pub fn format_text(editor: &EditorState, style: InlineStyle) -> EditorState {
    let Some(family) = style.family() else {
        return toggle_inline_style(editor, style);
    };
    let current = editor.current_inline_style();
    let was_active = current.contains(&style);
    let selection = editor.selection();

    if selection.is_collapsed() {
        let mut pending: StyleSet = current
            .iter()
            .filter(|s| s.family() != Some(family))
            .cloned()
            .collect();
        if !was_active {
            pending.insert(style);
        }
        return editor.with_inline_style_override(pending);
    }

    let in_selection = editor.content().styles_in_selection(selection);
    let cleared = styles_in_family(&in_selection, family).fold(
        editor.content().clone(),
        |content, stale| content.remove_inline_style(selection, stale),
    );
    let content = if was_active {
        cleared
    } else {
        cleared.apply_inline_style(selection, &style)
    };
    editor.push(content)
}

/// Toggle a style on the selection.
///
/// A range gets the style removed if its first character carries it, and
/// added everywhere otherwise.
pub fn toggle_inline_style(
    editor: &EditorState,
    style: InlineStyle,
) -> EditorState {
    let mut current = editor.current_inline_style();
    let is_active = current.contains(&style);
    let selection = editor.selection();

    if selection.is_collapsed() {
        if is_active {
            current.remove(&style);
        } else {
            current.insert(style);
        }
        return editor.with_inline_style_override(current);
    }

    let content = if is_active {
        editor.content().remove_inline_style(selection, &style)
    } else {
        editor.content().apply_inline_style(selection, &style)
    };
    editor.push(content)
}
