// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use format_keys::FormatFlag;
use html_escape::encode_double_quoted_attribute as attr;

use super::inline::{styled_html, InlineTag};
use super::{header_tag, list_tag};
use crate::model::{BlockType, ContentBlock, ContentState, EntityData, LinkData};
use crate::style_codec::InlineStyle;

/// Plain HTML for simple persistence: one element per line, standard inline
/// tags, and links as ordinary anchors.
///
/// Keyed styles, mentions and other entities are written as plain text, so
/// this output does not round trip through [`super::convert_from_html`].
pub fn serialize_to_html(content: &ContentState) -> String {
    let mut html = String::new();
    let mut wrapper: Option<&'static str> = None;

    for block in content.blocks() {
        let new_wrapper = list_tag(&block.block_type);
        if wrapper != new_wrapper {
            if let Some(tag) = wrapper {
                html.push_str(&format!("</{tag}>\n"));
            }
            if let Some(tag) = new_wrapper {
                html.push_str(&format!("<{tag}>\n"));
            }
            wrapper = new_wrapper;
        }
        let tag = block_tag(&block.block_type);
        html.push_str(&format!(
            "<{tag}>{}</{tag}>\n",
            block_html(content, block)
        ));
    }

    if let Some(tag) = wrapper {
        html.push_str(&format!("</{tag}>\n"));
    }
    html
}

fn block_tag(block_type: &BlockType) -> &'static str {
    match block_type {
        BlockType::Blockquote => "blockquote",
        BlockType::CodeBlock => "pre",
        BlockType::UnorderedListItem | BlockType::OrderedListItem => "li",
        BlockType::Atomic => "figure",
        other => header_tag(other).unwrap_or("p"),
    }
}

fn block_html(content: &ContentState, block: &ContentBlock) -> String {
    block
        .entity_ranges()
        .into_iter()
        .map(|(entity, start, end)| {
            let inner = styled_html(block, start, end, inline_tag);
            match entity.and_then(|key| content.entity(key)).map(|e| &e.data) {
                Some(EntityData::Link(link)) => link_html(link, &inner),
                _ => inner,
            }
        })
        .collect()
}

fn link_html(link: &LinkData, inner: &str) -> String {
    let target = link
        .extra
        .get("targetOption")
        .and_then(|v| v.as_str())
        .unwrap_or("_self");
    format!(
        "<a href=\"{}\" target=\"{}\">{inner}</a>",
        attr(&link.url),
        attr(target)
    )
}

fn inline_tag(style: &InlineStyle) -> Option<InlineTag> {
    let tag = match style.flag()? {
        FormatFlag::Bold => "strong",
        FormatFlag::Italic => "em",
        FormatFlag::Underline => "ins",
        FormatFlag::StrikeThrough => "del",
        FormatFlag::Code => "code",
        FormatFlag::SuperScript => "sup",
        FormatFlag::SubScript => "sub",
    };
    Some(InlineTag::element(tag))
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::model::{
        CharacterMetadata, MentionData, Mutability, SelectionState,
    };

    #[test]
    fn blocks_are_written_one_per_line() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::HeaderOne, "Title"),
            ContentBlock::new("b", BlockType::Unstyled, "a < b"),
            ContentBlock::new("c", BlockType::UnorderedListItem, "one"),
            ContentBlock::new("d", BlockType::UnorderedListItem, "two"),
            ContentBlock::new("e", BlockType::Center, "centred"),
        ]);
        assert_eq!(
            serialize_to_html(&content),
            indoc! {"
                <h1>Title</h1>
                <p>a &lt; b</p>
                <ul>
                <li>one</li>
                <li>two</li>
                </ul>
                <p>centred</p>
            "}
        );
    }

    #[test]
    fn flags_use_standard_tags_and_keyed_styles_are_dropped() {
        let all = SelectionState::range("a", 0, "a", 1);
        let content = ["BOLD", "UNDERLINE", "STRIKETHROUGH", "color__red"]
            .iter()
            .fold(
                ContentState::from_blocks(vec![ContentBlock::new(
                    "a",
                    BlockType::Unstyled,
                    "x",
                )]),
                |content, token| {
                    let style = InlineStyle::from_token(token);
                    content.apply_inline_style(&all, &style)
                },
            );
        assert_eq!(
            serialize_to_html(&content),
            "<p><strong><ins><del>x</del></ins></strong></p>\n"
        );
    }

    #[test]
    fn links_are_plain_anchors_and_mentions_plain_text() {
        let (content, link) = ContentState::new().create_entity(
            EntityData::Link(LinkData::new("https://x.com")),
            Mutability::Mutable,
        );
        let (content, mention) = content.create_entity(
            EntityData::Mention(MentionData::new("Bob")),
            Mutability::Immutable,
        );
        let block = ContentBlock::from_characters(
            "a",
            BlockType::Unstyled,
            "go@Bob".chars().enumerate().map(|(i, c)| {
                let entity = if i < 2 { Some(link) } else { Some(mention) };
                let metadata =
                    CharacterMetadata::new(Default::default(), entity);
                (c, metadata)
            }),
        );
        let content =
            ContentState::from_parts(vec![block], content.entities().to_vec());
        assert_eq!(
            serialize_to_html(&content),
            "<p><a href=\"https://x.com\" target=\"_self\">go</a>@Bob</p>\n"
        );
    }
}
