// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::content_state::ContentState;

/// A point in the document: a block index and a character offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub block_index: usize,
    pub offset: usize,
}

/// The user's selection, anchored by block keys.
///
/// The anchor is where the selection started, the focus where it ends; the
/// focus may come before the anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
}

impl SelectionState {
    /// A cursor at `offset` in the given block.
    pub fn collapsed(block_key: &str, offset: usize) -> Self {
        Self::range(block_key, offset, block_key, offset)
    }

    pub fn range(
        anchor_key: &str,
        anchor_offset: usize,
        focus_key: &str,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor_key: anchor_key.to_owned(),
            anchor_offset,
            focus_key: focus_key.to_owned(),
            focus_offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key
            && self.anchor_offset == self.focus_offset
    }

    /// Start and end positions in document order, clamped to the blocks'
    /// lengths. `None` if either key is not in `content`.
    pub fn ordered(
        &self,
        content: &ContentState,
    ) -> Option<(Position, Position)> {
        let anchor = content.position(&self.anchor_key, self.anchor_offset)?;
        let focus = content.position(&self.focus_key, self.focus_offset)?;
        Some(if focus < anchor {
            (focus, anchor)
        } else {
            (anchor, focus)
        })
    }

    pub fn is_backward(&self, content: &ContentState) -> bool {
        match (
            content.position(&self.anchor_key, self.anchor_offset),
            content.position(&self.focus_key, self.focus_offset),
        ) {
            (Some(anchor), Some(focus)) => focus < anchor,
            _ => false,
        }
    }
}
