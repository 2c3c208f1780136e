// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Styled text to inline markup, shared by both HTML writers.

use crate::model::ContentBlock;
use crate::style_codec::InlineStyle;

/// An inline element as its opening and closing markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct InlineTag {
    open: String,
    close: String,
}

impl InlineTag {
    /// A bare element, e.g. `<b>`.
    pub(super) fn element(name: &str) -> Self {
        Self {
            open: format!("<{name}>"),
            close: format!("</{name}>"),
        }
    }

    /// A `<span>` carrying one inline style declaration.
    pub(super) fn styled_span(property: &str, value: &str) -> Self {
        Self {
            open: format!(
                "<span style=\"{}: {}\">",
                html_escape::encode_double_quoted_attribute(property),
                html_escape::encode_double_quoted_attribute(value)
            ),
            close: "</span>".to_owned(),
        }
    }
}

/// Markup for the characters `[start, end)` of `block`.
///
/// Open tags are kept on a stack. When a run no longer wants a tag, that tag
/// and every tag opened after it are closed, then missing tags are opened in
/// style order.
pub(super) fn styled_html<F>(
    block: &ContentBlock,
    start: usize,
    end: usize,
    markup: F,
) -> String
where
    F: Fn(&InlineStyle) -> Option<InlineTag>,
{
    let chars: Vec<char> = block.text().chars().collect();
    let mut html = String::new();
    let mut open_tags: Vec<InlineTag> = Vec::new();

    for run in block
        .runs()
        .iter()
        .filter(|run| run.start >= start && run.end <= end)
    {
        let mut desired: Vec<InlineTag> = Vec::new();
        for tag in run.metadata.style.iter().filter_map(&markup) {
            if !desired.contains(&tag) {
                desired.push(tag);
            }
        }

        let stale = open_tags.iter().position(|t| !desired.contains(t));
        if let Some(stale) = stale {
            close_tags(&mut html, &mut open_tags, stale);
        }
        for tag in desired {
            if !open_tags.contains(&tag) {
                html.push_str(&tag.open);
                open_tags.push(tag);
            }
        }

        let text: String = chars[run.start..run.end].iter().collect();
        html.push_str(&escape_text(&text));
    }

    close_tags(&mut html, &mut open_tags, 0);
    html
}

/// Close every open tag from the top of the stack down to `from`.
fn close_tags(html: &mut String, open_tags: &mut Vec<InlineTag>, from: usize) {
    while open_tags.len() > from {
        if let Some(tag) = open_tags.pop() {
            html.push_str(&tag.close);
        }
    }
}

/// Escape text content, with soft newlines as `<br>`.
pub(super) fn escape_text(text: &str) -> String {
    text.split('\n')
        .map(|line| html_escape::encode_text(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>")
}
