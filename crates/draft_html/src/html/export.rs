// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use format_keys::{CssDeclaration, FormatFlag, StyleConfig};
use html_escape::encode_double_quoted_attribute as attr;
use log::{trace, warn};
use serde::Serialize;

use super::inline::{escape_text, styled_html, InlineTag};
use super::{
    header_tag, list_tag, DATA_VALUE_ATTR, DRAFT_LINK_ID, HASH_MENTION_CLASS,
    MENTION_CLASS,
};
use crate::model::{
    BlockType, ContentBlock, ContentState, Entity, EntityData, MentionData,
};
use crate::style_codec::InlineStyle;
use crate::DEFAULT_STYLE_CONFIG;

/// Serialize a content state to the HTML that [`super::convert_from_html`]
/// reads back.
///
/// With `is_color_required`, mentions are coloured with the accent colour.
/// With `dynamic_mention`, hash mentions are written as a `#[key]`
/// placeholder with a `title`, for the server to resolve later.
pub fn convert_to_html(
    content: &ContentState,
    is_color_required: bool,
    dynamic_mention: bool,
) -> String {
    HtmlExporter::new(&DEFAULT_STYLE_CONFIG)
        .color_required(is_color_required)
        .dynamic_mention(dynamic_mention)
        .export(content)
}

#[derive(Clone, Debug)]
pub struct HtmlExporter<'a> {
    config: &'a StyleConfig,
    is_color_required: bool,
    dynamic_mention: bool,
}

impl<'a> HtmlExporter<'a> {
    pub fn new(config: &'a StyleConfig) -> Self {
        Self {
            config,
            is_color_required: false,
            dynamic_mention: false,
        }
    }

    pub fn color_required(mut self, is_color_required: bool) -> Self {
        self.is_color_required = is_color_required;
        self
    }

    pub fn dynamic_mention(mut self, dynamic_mention: bool) -> Self {
        self.dynamic_mention = dynamic_mention;
        self
    }

    pub fn export(&self, content: &ContentState) -> String {
        let mut html = String::new();
        let mut wrapper: Option<&'static str> = None;

        for block in content.blocks() {
            let new_wrapper = list_tag(&block.block_type);
            if wrapper != new_wrapper {
                if let Some(tag) = wrapper {
                    html.push_str(&format!("</{tag}>"));
                }
                if let Some(tag) = new_wrapper {
                    html.push_str(&format!("<{tag}>"));
                }
                wrapper = new_wrapper;
            }

            trace!("Exporting block {} ({})", block.key, block.block_type);
            let (open, close) = block_tags(&block.block_type);
            html.push_str(&open);
            html.push_str(&self.block_html(content, block));
            html.push_str(&close);
        }

        if let Some(tag) = wrapper {
            html.push_str(&format!("</{tag}>"));
        }
        html
    }

    fn block_html(
        &self,
        content: &ContentState,
        block: &ContentBlock,
    ) -> String {
        block
            .entity_ranges()
            .into_iter()
            .map(|(entity, start, end)| {
                let inner = styled_html(block, start, end, inline_tag);
                match entity.and_then(|key| content.entity(key)) {
                    Some(entity) => self.entity_html(entity, inner),
                    None => inner,
                }
            })
            .collect()
    }

    fn entity_html(&self, entity: &Entity, inner: String) -> String {
        match &entity.data {
            EntityData::Mention(mention) => {
                let mut style = self.config.anchor_style.clone();
                if self.is_color_required {
                    style.push(CssDeclaration::new(
                        "color",
                        &self.config.mention_accent_color,
                    ));
                }
                format!(
                    "<span class=\"{MENTION_CLASS}\" style=\"{}\" \
                     {DATA_VALUE_ATTR}=\"{}\">{inner}</span>",
                    attr(&style_attr(&style)),
                    attr(&data_value(&mention.without_images())),
                )
            }
            EntityData::HashMention(mention) => {
                let mut style = self.config.anchor_style.clone();
                if let Some(color) = mention.color() {
                    style.push(CssDeclaration::new("color", &color));
                }
                style.push(CssDeclaration::new(
                    "background-color",
                    "transparent",
                ));
                format!(
                    "<span class=\"{HASH_MENTION_CLASS}\"{} style=\"{}\" \
                     {DATA_VALUE_ATTR}=\"{}\">{}</span>",
                    self.hash_mention_title(mention),
                    attr(&style_attr(&style)),
                    attr(&data_value(&mention.without_images())),
                    if self.dynamic_mention {
                        escape_text(&format!("#[{}]", mention.key_text()))
                    } else {
                        inner
                    },
                )
            }
            EntityData::Link(link) => format!(
                "<a target=\"_blank\" href=\"{}\" style=\"{}\" \
                 {DATA_VALUE_ATTR}=\"{}\" \
                 data-id=\"{DRAFT_LINK_ID}\">{inner}</a>",
                attr(&link.url),
                attr(&style_attr(&self.config.anchor_style)),
                attr(&data_value(link)),
            ),
            EntityData::Other { .. } => inner,
        }
    }

    fn hash_mention_title(&self, mention: &MentionData) -> String {
        match (mention.title(), self.dynamic_mention) {
            (Some(title), true) => format!(" title=\"{}\"", attr(&title)),
            _ => String::new(),
        }
    }
}

fn block_tags(block_type: &BlockType) -> (String, String) {
    if let Some(justify) = block_type.justify_content() {
        return (
            format!("<p style=\"display: flex; justify-content: {justify}\">"),
            "</p>".to_owned(),
        );
    }
    let tag = match block_type {
        BlockType::Blockquote => "blockquote",
        BlockType::CodeBlock => "pre",
        BlockType::UnorderedListItem | BlockType::OrderedListItem => "li",
        BlockType::Atomic => "figure",
        other => header_tag(other).unwrap_or("p"),
    };
    (format!("<{tag}>"), format!("</{tag}>"))
}

fn inline_tag(style: &InlineStyle) -> Option<InlineTag> {
    match style {
        InlineStyle::Flag(flag) => Some(match flag {
            FormatFlag::Bold => InlineTag::element("b"),
            FormatFlag::Italic => InlineTag::element("em"),
            FormatFlag::Underline => InlineTag::element("u"),
            FormatFlag::Code => InlineTag::element("code"),
            FormatFlag::SuperScript => InlineTag::element("sup"),
            FormatFlag::SubScript => InlineTag::element("sub"),
            FormatFlag::StrikeThrough => {
                InlineTag::styled_span("text-decoration", "line-through")
            }
        }),
        other => other
            .css_declaration()
            .map(|(property, value)| InlineTag::styled_span(property, value)),
    }
}

fn style_attr(declarations: &[CssDeclaration]) -> String {
    declarations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// JSON for a `data-value` attribute, before attribute escaping.
fn data_value<T: Serialize>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| {
        warn!("Could not serialize entity data: {e}");
        "{}".to_owned()
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::model::{
        CharacterMetadata, EntityKey, LinkData, Mutability, SelectionState,
    };

    fn paragraph(text: &str) -> ContentBlock {
        ContentBlock::new("a", BlockType::Unstyled, text)
    }

    fn export(content: &ContentState) -> String {
        convert_to_html(content, false, false)
    }

    fn styled(text: &str, tokens: &[&str]) -> ContentState {
        let all = SelectionState::range("a", 0, "a", text.chars().count());
        tokens.iter().fold(
            ContentState::from_blocks(vec![paragraph(text)]),
            |content, token| {
                let style = InlineStyle::from_token(token);
                content.apply_inline_style(&all, &style)
            },
        )
    }

    /// A block of `before`, then `text` carrying a new entity, then `after`.
    fn with_entity(
        before: &str,
        text: &str,
        after: &str,
        data: EntityData,
        mutability: Mutability,
    ) -> ContentState {
        let (content, key) =
            ContentState::new().create_entity(data, mutability);
        let metadata = |entity: Option<EntityKey>| CharacterMetadata::new(
            Default::default(),
            entity,
        );
        let chars = before
            .chars()
            .map(|c| (c, metadata(None)))
            .chain(text.chars().map(|c| (c, metadata(Some(key)))))
            .chain(after.chars().map(|c| (c, metadata(None))));
        let block =
            ContentBlock::from_characters("a", BlockType::Unstyled, chars);
        ContentState::from_parts(vec![block], content.entities().to_vec())
    }

    fn mention() -> MentionData {
        let mut mention = MentionData::new("Alice");
        mention.image = Some(json!("https://img/alice.png"));
        mention
    }

    #[test]
    fn paragraphs_are_exported() {
        let content =
            ContentState::from_blocks(vec![paragraph("a"), paragraph("")]);
        assert_eq!(export(&content), "<p>a</p><p></p>");
    }

    #[test]
    fn alignment_blocks_are_flex_paragraphs() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::Center, "c"),
            ContentBlock::new("b", BlockType::Right, "r"),
        ]);
        assert_eq!(
            export(&content),
            "<p style=\"display: flex; justify-content: center\">c</p>\
             <p style=\"display: flex; justify-content: flex-end\">r</p>"
        );
    }

    #[test]
    fn other_block_types_use_their_elements() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::HeaderTwo, "h"),
            ContentBlock::new("b", BlockType::Blockquote, "q"),
            ContentBlock::new("c", BlockType::CodeBlock, "x"),
            ContentBlock::new("d", BlockType::Atomic, "f"),
            ContentBlock::new("e", BlockType::from("custom"), "o"),
        ]);
        assert_eq!(
            export(&content),
            "<h2>h</h2><blockquote>q</blockquote><pre>x</pre>\
             <figure>f</figure><p>o</p>"
        );
    }

    #[test]
    fn list_items_are_grouped() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::UnorderedListItem, "1"),
            ContentBlock::new("b", BlockType::UnorderedListItem, "2"),
            ContentBlock::new("c", BlockType::OrderedListItem, "3"),
            paragraph("p"),
        ]);
        assert_eq!(
            export(&content),
            "<ul><li>1</li><li>2</li></ul><ol><li>3</li></ol><p>p</p>"
        );
    }

    #[test]
    fn boolean_styles_use_tags() {
        assert_eq!(
            export(&styled("x", &["BOLD", "ITALIC", "SUPERSCRIPT"])),
            "<p><b><em><sup>x</sup></em></b></p>"
        );
        assert_eq!(export(&styled("x", &["SUBSCRIPT"])), "<p><sub>x</sub></p>");
    }

    #[test]
    fn strikethrough_is_a_styled_span() {
        assert_eq!(
            export(&styled("x", &["STRIKETHROUGH"])),
            "<p><span style=\"text-decoration: line-through\">x</span></p>"
        );
    }

    #[test]
    fn keyed_and_custom_styles_are_styled_spans() {
        assert_eq!(
            export(&styled("x", &["font-size__12px"])),
            "<p><span style=\"font-size: 12px\">x</span></p>"
        );
        assert_eq!(
            export(&styled("x", &["letter-spacing__2px"])),
            "<p><span style=\"letter-spacing: 2px\">x</span></p>"
        );
        assert_eq!(export(&styled("x", &["HIGHLIGHT"])), "<p>x</p>");
    }

    #[test]
    fn mentions_blank_their_pictures() {
        let content = with_entity(
            "hi ",
            "@Alice",
            "",
            EntityData::Mention(mention()),
            Mutability::Immutable,
        );
        assert_eq!(
            export(&content),
            "<p>hi <span class=\"mention\" \
             style=\"cursor: pointer; text-decoration: none; font-weight: 600\" \
             data-value=\"{&quot;name&quot;:&quot;Alice&quot;,\
             &quot;image&quot;:&quot;&quot;,&quot;avatar&quot;:&quot;&quot;}\">\
             @Alice</span></p>"
        );
    }

    #[test]
    fn mentions_take_the_accent_color_when_required() {
        let content = with_entity(
            "",
            "@Alice",
            "",
            EntityData::Mention(mention()),
            Mutability::Immutable,
        );
        let html = convert_to_html(&content, true, false);
        assert!(html.contains("font-weight: 600; color: #0078d4\""));
    }

    #[test]
    fn hash_mentions_keep_their_text_by_default() {
        let mut tag = MentionData::new("release");
        tag.key = Some(json!(7));
        tag.color = Some(json!("#123456"));
        tag.title = Some(json!("Release"));
        let content = with_entity(
            "",
            "#release",
            "",
            EntityData::HashMention(tag),
            Mutability::Immutable,
        );
        let html = export(&content);
        assert!(html.starts_with("<p><span class=\"hash-mention\" style=\""));
        assert!(html.contains(
            "font-weight: 600; color: #123456; background-color: transparent\""
        ));
        assert!(!html.contains("title="));
        assert!(html.ends_with(">#release</span></p>"));
    }

    #[test]
    fn dynamic_hash_mentions_become_placeholders() {
        let mut tag = MentionData::new("release");
        tag.key = Some(json!(7));
        tag.title = Some(json!("Release"));
        let content = with_entity(
            "",
            "#release",
            "",
            EntityData::HashMention(tag),
            Mutability::Immutable,
        );
        let html = convert_to_html(&content, false, true);
        assert!(html
            .starts_with("<p><span class=\"hash-mention\" title=\"Release\""));
        assert!(html.ends_with(">#[7]</span></p>"));
    }

    #[test]
    fn links_carry_their_payload_and_marker() {
        let content = with_entity(
            "see ",
            "here",
            "!",
            EntityData::Link(LinkData::new("https://x.com/?a=1&b=2")),
            Mutability::Mutable,
        );
        assert_eq!(
            export(&content),
            "<p>see <a target=\"_blank\" href=\"https://x.com/?a=1&amp;b=2\" \
             style=\"cursor: pointer; text-decoration: none; font-weight: 600\" \
             data-value=\"{&quot;url&quot;:&quot;https://x.com/?a=1&amp;b=2&quot;}\" \
             data-id=\"draft-link\">here</a>!</p>"
        );
    }

    #[test]
    fn unknown_entities_are_plain_text() {
        let content = with_entity(
            "",
            "img",
            "",
            EntityData::Other {
                entity_type: "IMAGE".to_owned(),
                data: Default::default(),
            },
            Mutability::Immutable,
        );
        assert_eq!(export(&content), "<p>img</p>");
    }

    #[test]
    fn entities_wrap_styled_text() {
        let content = with_entity(
            "",
            "ab",
            "",
            EntityData::Link(LinkData::new("u")),
            Mutability::Mutable,
        )
        .apply_inline_style(
            &SelectionState::range("a", 1, "a", 2),
            &InlineStyle::from(FormatFlag::Bold),
        );
        let html = export(&content);
        assert!(html.ends_with("data-id=\"draft-link\">a<b>b</b></a></p>"));
    }

    #[test]
    fn exporter_uses_its_configuration() {
        let config = StyleConfig {
            anchor_style: vec![CssDeclaration::new("cursor", "default")],
            ..StyleConfig::default()
        };
        let content = with_entity(
            "",
            "x",
            "",
            EntityData::Link(LinkData::new("u")),
            Mutability::Mutable,
        );
        let html = HtmlExporter::new(&config).export(&content);
        assert!(html.contains("style=\"cursor: default\""));
    }
}
