// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use format_keys::{FormatFlag, StyleFamily};
use log::{debug, warn};

use super::parser::{PaDom, PaDomCreator, PaDomNode, PaNodeContainer};
use super::{DATA_VALUE_ATTR, HASH_MENTION_CLASS, MENTION_CLASS};
use crate::error::HtmlImportError;
use crate::model::{
    block_key, BlockType, CharacterMetadata, ContentBlock, ContentState,
    Entity, EntityData, EntityKey, Mutability,
};
use crate::style_codec::{InlineStyle, StyleSet};

/// Elements converted as their children with no style of their own.
const TRANSPARENT_TAGS: &[&str] = &["html", "body", "span", "font", "small"];

/// Elements that start blocks or hold lists of them.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "figure", "ul", "ol", "li",
];

/// Elements dropped along with everything inside them.
const IGNORED_TAGS: &[&str] =
    &["head", "meta", "script", "style", "template", "title"];

/// Parse persisted HTML into a content state.
///
/// Missing input is the empty document. Malformed markup is recovered from
/// the way a browser would; only an entity element with a missing or
/// unreadable `data-value` fails the import.
pub fn convert_from_html(
    html: Option<&str>,
) -> Result<ContentState, HtmlImportError> {
    HtmlImporter::default().import(html.unwrap_or_default())
}

/// The styles and entity inherited by text from its enclosing elements.
#[derive(Clone, Debug, Default)]
struct InlineContext {
    style: StyleSet,
    entity: Option<EntityKey>,
    /// False directly inside the document or an element holding blocks,
    /// where whitespace-only text is indentation.
    keeps_whitespace: bool,
}

/// A block still collecting characters.
struct PendingBlock {
    /// Identifies the element that opened the block, if any.
    id: usize,
    block_type: BlockType,
    depth: usize,
    chars: Vec<(char, CharacterMetadata)>,
}

#[derive(Default)]
struct HtmlImporter {
    blocks: Vec<ContentBlock>,
    entities: Vec<Entity>,
    pending: Option<PendingBlock>,
    next_block_id: usize,
    /// Types of the block elements enclosing the current node.
    current_path: Vec<BlockType>,
    /// Item types of the lists enclosing the current node.
    list_path: Vec<BlockType>,
    pre_depth: usize,
}

impl HtmlImporter {
    fn import(mut self, html: &str) -> Result<ContentState, HtmlImportError> {
        let padom = match PaDomCreator::parse(html) {
            Ok(padom) => padom,
            Err(e) => {
                for error in &e.parse_errors {
                    debug!("Recovered from HTML parse error: {error}");
                }
                e.dom
            }
        };
        if let PaDomNode::Document(padoc) = padom.get_document() {
            self.convert(&padom, padoc, &InlineContext::default())?;
        }
        Ok(self.finish())
    }

    fn convert(
        &mut self,
        padom: &PaDom,
        panode: &PaNodeContainer,
        context: &InlineContext,
    ) -> Result<(), HtmlImportError> {
        for child_handle in &panode.children {
            match padom.get_node(child_handle) {
                PaDomNode::Container(child) => {
                    self.convert_container(padom, child, context)?;
                }
                PaDomNode::Text(text) => {
                    self.convert_text(&text.content, context)
                }
                PaDomNode::Document(_) | PaDomNode::Comment => {}
            }
        }
        Ok(())
    }

    fn convert_container(
        &mut self,
        padom: &PaDom,
        child: &PaNodeContainer,
        context: &InlineContext,
    ) -> Result<(), HtmlImportError> {
        let tag = child.tag();
        if IGNORED_TAGS.contains(&tag) {
            debug!("Dropping <{tag}> and its content");
            return Ok(());
        }
        if let Some(kind) = EntityKind::of(child) {
            return self.convert_entity(padom, child, kind, context);
        }

        match tag {
            "br" => {
                self.push_text("\n", context);
                Ok(())
            }
            "ul" | "ol" => {
                self.list_path.push(if tag == "ul" {
                    BlockType::UnorderedListItem
                } else {
                    BlockType::OrderedListItem
                });
                let context = InlineContext {
                    keeps_whitespace: false,
                    ..context.clone()
                };
                let result = self.convert(padom, child, &context);
                self.list_path.pop();
                result
            }
            "li" => {
                let block_type = self
                    .list_path
                    .last()
                    .cloned()
                    .unwrap_or(BlockType::UnorderedListItem);
                self.convert_block(padom, child, block_type, context)
            }
            "p" | "div" => {
                let block_type = alignment_of(child)
                    .or_else(|| self.current_path.last().cloned())
                    .unwrap_or_default();
                self.convert_block(padom, child, block_type, context)
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                let block_type = BlockType::header(level).unwrap_or_default();
                self.convert_block(padom, child, block_type, context)
            }
            "blockquote" => {
                self.convert_block(padom, child, BlockType::Blockquote, context)
            }
            "pre" => {
                self.pre_depth += 1;
                let result = self.convert_block(
                    padom,
                    child,
                    BlockType::CodeBlock,
                    context,
                );
                self.pre_depth -= 1;
                result
            }
            "figure" => {
                self.convert_block(padom, child, BlockType::Atomic, context)
            }
            _ => {
                let is_known = tag == "code"
                    || self.tag_flag(tag).is_some()
                    || TRANSPARENT_TAGS.contains(&tag);
                if !is_known {
                    debug!("Tag <{tag}> is not supported, keeping its content");
                }
                let mut context = self.styled_context(child, context, false);
                if !matches!(tag, "html" | "body") {
                    context.keeps_whitespace = true;
                }
                self.convert(padom, child, &context)
            }
        }
    }

    fn convert_block(
        &mut self,
        padom: &PaDom,
        child: &PaNodeContainer,
        block_type: BlockType,
        context: &InlineContext,
    ) -> Result<(), HtmlImportError> {
        let is_aligned = block_type.justify_content().is_some()
            && alignment_of(child).is_some();
        let id = self.open_block(block_type.clone());
        self.current_path.push(block_type);
        let mut context = self.styled_context(child, context, is_aligned);
        context.keeps_whitespace = !has_block_children(padom, child);
        let result = self.convert(padom, child, &context);
        self.current_path.pop();
        self.close_block(id);
        result
    }

    fn convert_entity(
        &mut self,
        padom: &PaDom,
        child: &PaNodeContainer,
        kind: EntityKind,
        context: &InlineContext,
    ) -> Result<(), HtmlImportError> {
        self.entities.push(kind.read(child)?);
        let context = InlineContext {
            style: context.style.clone(),
            entity: Some(EntityKey(self.entities.len() - 1)),
            keeps_whitespace: true,
        };
        self.convert(padom, child, &context)
    }

    fn convert_text(&mut self, text: &str, context: &InlineContext) {
        let text = if self.pre_depth > 0 {
            text.replace("\r\n", "\n")
        } else {
            text.replace(['\r', '\n'], " ")
        };
        let starts_block = self
            .pending
            .as_ref()
            .is_none_or(|pending| pending.chars.is_empty());
        if !context.keeps_whitespace
            && starts_block
            && text.chars().all(|c| c.is_ascii_whitespace())
        {
            // Indentation between block elements
            return;
        }
        self.push_text(&text, context);
    }

    fn push_text(&mut self, text: &str, context: &InlineContext) {
        if self.pending.is_none() {
            let block_type =
                self.current_path.last().cloned().unwrap_or_default();
            self.start_pending(block_type);
        }
        if let Some(pending) = self.pending.as_mut() {
            let metadata =
                CharacterMetadata::new(context.style.clone(), context.entity);
            pending
                .chars
                .extend(text.chars().map(|c| (c, metadata.clone())));
        }
    }

    /// A copy of `context` with the styles `child` adds.
    fn styled_context(
        &self,
        child: &PaNodeContainer,
        context: &InlineContext,
        is_aligned_paragraph: bool,
    ) -> InlineContext {
        let mut style = context.style.clone();
        if let Some(flag) = self.tag_flag(child.tag()) {
            style.insert(flag.into());
        }
        for (property, value) in child.style_declarations() {
            let lower = value.to_ascii_lowercase();
            match property.as_str() {
                "text-decoration" | "text-decoration-line" => {
                    if lower.contains("line-through") {
                        style.insert(FormatFlag::StrikeThrough.into());
                    }
                    if lower.contains("underline") {
                        style.insert(FormatFlag::Underline.into());
                    }
                }
                "font-weight" => {
                    if matches!(
                        lower.as_str(),
                        "bold" | "bolder" | "700" | "800" | "900"
                    ) {
                        style.insert(FormatFlag::Bold.into());
                    }
                }
                "font-style" => {
                    if matches!(lower.as_str(), "italic" | "oblique") {
                        style.insert(FormatFlag::Italic.into());
                    }
                }
                "vertical-align" => match lower.as_str() {
                    "sub" => {
                        style.insert(FormatFlag::SubScript.into());
                    }
                    "super" => {
                        style.insert(FormatFlag::SuperScript.into());
                    }
                    _ => {}
                },
                _ => {
                    let Ok(family) = property.parse::<StyleFamily>() else {
                        continue;
                    };
                    if is_aligned_paragraph
                        && family == StyleFamily::JustifyContent
                    {
                        continue;
                    }
                    // The innermost value of a family wins
                    style.retain(|s| s.family() != Some(family));
                    style.insert(InlineStyle::keyed(family, value));
                }
            }
        }
        InlineContext {
            style,
            entity: context.entity,
            keeps_whitespace: context.keeps_whitespace,
        }
    }

    fn tag_flag(&self, tag: &str) -> Option<FormatFlag> {
        match tag {
            "b" | "strong" => Some(FormatFlag::Bold),
            "i" | "em" => Some(FormatFlag::Italic),
            "u" | "ins" => Some(FormatFlag::Underline),
            "s" | "strike" | "del" => Some(FormatFlag::StrikeThrough),
            "sub" => Some(FormatFlag::SubScript),
            "sup" => Some(FormatFlag::SuperScript),
            // Code blocks keep their inner <code> as plain text
            "code" if self.pre_depth == 0 => Some(FormatFlag::Code),
            _ => None,
        }
    }

    /// Start a block for a block element, returning its id. Text collected
    /// so far ends up in its own block.
    fn open_block(&mut self, block_type: BlockType) -> usize {
        if let Some(pending) = self.pending.take() {
            if !pending.chars.is_empty() {
                self.push_block(pending);
            }
        }
        self.start_pending(block_type)
    }

    /// End the block element `id`. An element with no content still gives
    /// an empty block.
    fn close_block(&mut self, id: usize) {
        if let Some(mut pending) = self.pending.take() {
            if pending.chars.len() == 1 && pending.chars[0].0 == '\n' {
                // <p><br></p> is how editors write an empty paragraph
                pending.chars.clear();
            }
            if !pending.chars.is_empty() || pending.id == id {
                self.push_block(pending);
            }
        }
    }

    fn start_pending(&mut self, block_type: BlockType) -> usize {
        let id = self.next_block_id;
        self.next_block_id += 1;
        let depth = if block_type.is_list_item() {
            self.list_path.len().saturating_sub(1)
        } else {
            0
        };
        self.pending = Some(PendingBlock {
            id,
            block_type,
            depth,
            chars: Vec::new(),
        });
        id
    }

    fn push_block(&mut self, pending: PendingBlock) {
        let mut block = ContentBlock::from_characters(
            &block_key(self.blocks.len()),
            pending.block_type,
            pending.chars,
        );
        block.depth = pending.depth;
        self.blocks.push(block);
    }

    fn finish(mut self) -> ContentState {
        if let Some(pending) = self.pending.take() {
            if !pending.chars.is_empty() {
                self.push_block(pending);
            }
        }
        if self.blocks.is_empty() {
            let key = block_key(0);
            self.blocks
                .push(ContentBlock::new(&key, BlockType::Unstyled, ""));
        }
        ContentState::from_parts(self.blocks, self.entities)
    }
}

fn has_block_children(padom: &PaDom, container: &PaNodeContainer) -> bool {
    container.children.iter().any(|handle| {
        matches!(
            padom.get_node(handle),
            PaDomNode::Container(child) if BLOCK_TAGS.contains(&child.tag())
        )
    })
}

/// The alignment block type of `<p style="display: flex; justify-content: X">`.
fn alignment_of(child: &PaNodeContainer) -> Option<BlockType> {
    if !child.contains_style("display", "flex") {
        return None;
    }
    child
        .style("justify-content")
        .and_then(|value| BlockType::from_justify_content(&value))
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EntityKind {
    Mention,
    HashMention,
    Link,
}

impl EntityKind {
    fn of(child: &PaNodeContainer) -> Option<Self> {
        match child.tag() {
            "a" => Some(Self::Link),
            "span" if child.has_class(HASH_MENTION_CLASS) => {
                Some(Self::HashMention)
            }
            "span" if child.has_class(MENTION_CLASS) => Some(Self::Mention),
            _ => None,
        }
    }

    /// The entity described by the element's `data-value` payload.
    fn read(self, child: &PaNodeContainer) -> Result<Entity, HtmlImportError> {
        let tag = child.tag();
        let Some(raw) = child.get_attr(DATA_VALUE_ATTR) else {
            warn!("<{tag}> entity element has no {DATA_VALUE_ATTR}");
            return Err(HtmlImportError::MissingEntityData {
                tag: tag.to_owned(),
            });
        };
        let invalid = |source: serde_json::Error| {
            warn!(
                "<{tag}> entity element has unreadable {DATA_VALUE_ATTR}: {raw}"
            );
            HtmlImportError::InvalidEntityData {
                tag: tag.to_owned(),
                source,
            }
        };
        Ok(match self {
            Self::Mention => Entity::new(
                EntityData::Mention(
                    serde_json::from_str(raw).map_err(invalid)?,
                ),
                Mutability::Immutable,
            ),
            Self::HashMention => Entity::new(
                EntityData::HashMention(
                    serde_json::from_str(raw).map_err(invalid)?,
                ),
                Mutability::Immutable,
            ),
            Self::Link => Entity::new(
                EntityData::Link(serde_json::from_str(raw).map_err(invalid)?),
                Mutability::Mutable,
            ),
        })
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use serde_json::json;

    use super::*;
    use crate::model::{LinkData, MentionData};

    fn import(html: &str) -> ContentState {
        convert_from_html(Some(html)).unwrap()
    }

    fn texts(content: &ContentState) -> Vec<&str> {
        content.blocks().iter().map(|b| b.text()).collect()
    }

    fn types(content: &ContentState) -> Vec<&str> {
        content.blocks().iter().map(|b| b.block_type.as_str()).collect()
    }

    fn tokens_at(
        content: &ContentState,
        block: usize,
        offset: usize,
    ) -> Vec<String> {
        content.blocks()[block]
            .style_at(offset)
            .map(|s| s.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn missing_input_is_an_empty_document() {
        let content = convert_from_html(None).unwrap();
        assert_eq!(texts(&content), vec![""]);
        assert_eq!(content.blocks()[0].key, "b0");
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        assert_eq!(texts(&import("")), vec![""]);
    }

    #[test]
    fn plain_text_becomes_one_paragraph() {
        let content = import("some text");
        assert_eq!(texts(&content), vec!["some text"]);
        assert_eq!(types(&content), vec!["unstyled"]);
    }

    #[test]
    fn paragraphs_become_blocks() {
        let content = import("<p>one</p><p>two</p>");
        assert_eq!(texts(&content), vec!["one", "two"]);
        assert_eq!(content.blocks()[1].key, "b1");
    }

    #[test]
    fn indentation_between_blocks_is_dropped() {
        let content = import(indoc! {"
            <div>
              <p>one</p>
              <p>two</p>
            </div>
        "});
        assert_eq!(texts(&content), vec!["one", "two"]);
    }

    #[test]
    fn whitespace_inside_blocks_is_content() {
        let content = import("<p><b> </b>x</p><p>  </p><li>\t</li>");
        assert_eq!(texts(&content), vec![" x", "  ", "\t"]);
        assert_eq!(tokens_at(&content, 0, 0), vec!["BOLD"]);
    }

    #[test]
    fn indentation_inside_lists_and_quotes_is_dropped() {
        let content = import(indoc! {"
            <ul>
              <li>a</li>
            </ul>
            <blockquote>
              <p>b</p>
            </blockquote>
        "});
        assert_eq!(texts(&content), vec!["a", "b"]);
    }

    #[test]
    fn empty_paragraphs_are_kept() {
        let content = import("<p>a</p><p></p><p><br></p><p>b</p>");
        assert_eq!(texts(&content), vec!["a", "", "", "b"]);
    }

    #[test]
    fn line_breaks_stay_inside_the_block() {
        assert_eq!(texts(&import("<p>a<br>b</p>")), vec!["a\nb"]);
    }

    #[test]
    fn text_around_a_nested_block_gets_its_own_blocks() {
        let content = import("<div>before<p>inside</p>after</div>");
        assert_eq!(texts(&content), vec!["before", "inside", "after"]);
    }

    #[test]
    fn unknown_tags_keep_their_text() {
        let content = import("<div><xyz>text</xyz></div>");
        assert_eq!(texts(&content), vec!["text"]);
        assert!(tokens_at(&content, 0, 0).is_empty());
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let content = import("<style>p { color: red }</style><p>a</p>");
        assert_eq!(texts(&content), vec!["a"]);
    }

    #[test]
    fn inline_tags_become_flags() {
        let content = import(
            "<p><b>b</b><em>i</em><u>u</u><strike>s</strike>\
             <sub>x</sub><sup>y</sup><code>c</code></p>",
        );
        assert_eq!(tokens_at(&content, 0, 0), vec!["BOLD"]);
        assert_eq!(tokens_at(&content, 0, 1), vec!["ITALIC"]);
        assert_eq!(tokens_at(&content, 0, 2), vec!["UNDERLINE"]);
        assert_eq!(tokens_at(&content, 0, 3), vec!["STRIKETHROUGH"]);
        assert_eq!(tokens_at(&content, 0, 4), vec!["SUBSCRIPT"]);
        assert_eq!(tokens_at(&content, 0, 5), vec!["SUPERSCRIPT"]);
        assert_eq!(tokens_at(&content, 0, 6), vec!["CODE"]);
    }

    #[test]
    fn nested_tags_accumulate() {
        let content = import("<p><b>a<i>b</i></b></p>");
        assert_eq!(tokens_at(&content, 0, 0), vec!["BOLD"]);
        assert_eq!(tokens_at(&content, 0, 1), vec!["BOLD", "ITALIC"]);
    }

    #[test]
    fn css_flags_are_recognised() {
        let content = import(
            "<p><span style=\"text-decoration: line-through\">s</span>\
             <span style=\"font-weight: 700\">b</span>\
             <span style=\"font-style: italic\">i</span></p>",
        );
        assert_eq!(tokens_at(&content, 0, 0), vec!["STRIKETHROUGH"]);
        assert_eq!(tokens_at(&content, 0, 1), vec!["BOLD"]);
        assert_eq!(tokens_at(&content, 0, 2), vec!["ITALIC"]);
    }

    #[test]
    fn keyed_css_becomes_keyed_tokens() {
        let content = import(
            "<p><span style=\"color: #ff0000; font-size: 12px; \
             font-family: Arial, sans-serif\">x</span></p>",
        );
        assert_eq!(
            tokens_at(&content, 0, 0),
            vec![
                "color__#ff0000",
                "font-family__Arial, sans-serif",
                "font-size__12px"
            ]
        );
    }

    #[test]
    fn inner_values_replace_outer_values_of_a_family() {
        let content = import(
            "<p><span style=\"color: red\">a\
             <span style=\"color: blue\">b</span></span></p>",
        );
        assert_eq!(tokens_at(&content, 0, 0), vec!["color__red"]);
        assert_eq!(tokens_at(&content, 0, 1), vec!["color__blue"]);
    }

    #[test]
    fn unknown_css_is_ignored() {
        let content =
            import("<p><span style=\"margin: 0; padding: 2px\">x</span></p>");
        assert!(tokens_at(&content, 0, 0).is_empty());
    }

    #[test]
    fn aligned_paragraphs_become_alignment_blocks() {
        let content = import(
            "<p style=\"display: flex; justify-content: center\">c</p>\
             <p style=\"display: flex; justify-content: flex-start\">l</p>\
             <p style=\"display: flex; justify-content: flex-end\">r</p>",
        );
        assert_eq!(types(&content), vec!["center", "left", "right"]);
        assert!(tokens_at(&content, 0, 0).is_empty());
    }

    #[test]
    fn justify_content_without_flex_is_a_style_token() {
        let content =
            import("<p><span style=\"justify-content: center\">x</span></p>");
        assert_eq!(types(&content), vec!["unstyled"]);
        assert_eq!(tokens_at(&content, 0, 0), vec!["justify-content__center"]);
    }

    #[test]
    fn block_elements_set_block_types() {
        let content = import(
            "<h1>a</h1><h6>b</h6><blockquote>c</blockquote>\
             <pre>d</pre><figure>e</figure>",
        );
        assert_eq!(
            types(&content),
            vec![
                "header-one",
                "header-six",
                "blockquote",
                "code-block",
                "atomic"
            ]
        );
    }

    #[test]
    fn paragraphs_inside_blocks_inherit_their_type() {
        let content = import("<blockquote><p>a</p><p>b</p></blockquote>");
        assert_eq!(types(&content), vec!["blockquote", "blockquote"]);
    }

    #[test]
    fn lists_give_list_items_with_depth() {
        let content = import(
            "<ul><li>a</li><li>b<ol><li>c</li></ol></li></ul><ol><li>d</li></ol>",
        );
        assert_eq!(texts(&content), vec!["a", "b", "c", "d"]);
        assert_eq!(
            types(&content),
            vec![
                "unordered-list-item",
                "unordered-list-item",
                "ordered-list-item",
                "ordered-list-item"
            ]
        );
        assert_eq!(content.blocks()[2].depth, 1);
        assert_eq!(content.blocks()[3].depth, 0);
    }

    #[test]
    fn code_blocks_keep_newlines_and_ignore_inner_code() {
        let content = import("<pre><code>let a;\nlet b;</code></pre>");
        assert_eq!(texts(&content), vec!["let a;\nlet b;"]);
        assert!(tokens_at(&content, 0, 0).is_empty());
    }

    #[test]
    fn newlines_outside_code_blocks_are_spaces() {
        assert_eq!(texts(&import("<p>a\nb\tc</p>")), vec!["a b\tc"]);
    }

    #[test]
    fn mentions_become_immutable_entities() {
        let content = import(
            "<p>hi <span class=\"mention\" style=\"color: red\" \
             data-value='{\"name\":\"Alice\",\"id\":3}'>@Alice</span></p>",
        );
        let block = &content.blocks()[0];
        assert_eq!(block.entity_at(2), None);
        let key = block.entity_at(3).unwrap();
        assert_eq!(block.entity_at(8), Some(key));
        let entity = content.entity(key).unwrap();
        assert_eq!(entity.mutability, Mutability::Immutable);
        let EntityData::Mention(mention) = &entity.data else {
            panic!("expected a mention, got {:?}", entity.data);
        };
        assert_eq!(mention.name(), Some("Alice".to_owned()));
        assert_eq!(mention.id, Some(json!(3)));
        // The entity element's own style is presentation, not content
        assert!(tokens_at(&content, 0, 3).is_empty());
    }

    #[test]
    fn hash_mentions_become_immutable_entities() {
        let content = import(
            "<span class=\"hash-mention\" \
             data-value='{\"name\":\"tag\",\"key\":\"7\"}'>#tag</span>",
        );
        let key = content.blocks()[0].entity_at(0).unwrap();
        let mut expected = MentionData::new("tag");
        expected.key = Some(json!("7"));
        assert_eq!(
            content.entity(key).unwrap(),
            &Entity::new(
                EntityData::HashMention(expected),
                Mutability::Immutable
            )
        );
    }

    #[test]
    fn mention_payloads_of_any_shape_are_accepted() {
        let content = import(
            "<p><span class=\"mention\" \
             data-value='{\"name\":null,\"title\":5,\"id\":1}'>@x</span></p>",
        );
        let key = content.blocks()[0].entity_at(0).unwrap();
        let EntityData::Mention(mention) = &content.entity(key).unwrap().data
        else {
            panic!("expected a mention");
        };
        assert_eq!(mention.name, Some(serde_json::Value::Null));
        assert_eq!(mention.title, Some(json!(5)));
        assert_eq!(mention.id, Some(json!(1)));
    }

    #[test]
    fn links_become_mutable_entities() {
        let content = import(
            "<a href=\"https://x.com\" data-id=\"draft-link\" \
             data-value='{\"url\":\"https://x.com\"}'><b>x</b></a>",
        );
        let block = &content.blocks()[0];
        let key = block.entity_at(0).unwrap();
        assert_eq!(
            content.entity(key).unwrap(),
            &Entity::new(
                EntityData::Link(LinkData::new("https://x.com")),
                Mutability::Mutable
            )
        );
        assert_eq!(tokens_at(&content, 0, 0), vec!["BOLD"]);
    }

    #[test]
    fn missing_entity_data_is_an_error() {
        let error = convert_from_html(Some("<a href=\"https://x.com\">x</a>"))
            .unwrap_err();
        assert!(matches!(
            error,
            HtmlImportError::MissingEntityData { ref tag } if tag == "a"
        ));
    }

    #[test]
    fn malformed_entity_data_is_an_error() {
        let error = convert_from_html(Some(
            "<span class=\"mention\" data-value=\"{not json\">x</span>",
        ))
        .unwrap_err();
        assert!(matches!(
            error,
            HtmlImportError::InvalidEntityData { ref tag, .. } if tag == "span"
        ));
    }

    #[test]
    fn malformed_markup_is_recovered() {
        let content = import("<p><b>bold<i>both</b>italic</i></p>");
        assert_eq!(texts(&content), vec!["boldbothitalic"]);
        assert_eq!(tokens_at(&content, 0, 4), vec!["BOLD", "ITALIC"]);
        assert_eq!(tokens_at(&content, 0, 8), vec!["ITALIC"]);
    }
}
