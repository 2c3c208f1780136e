// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{paqual_name, PaDom, PaDomCreationError, PaDomHandle, PaDomNode};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::cell::{Ref, RefCell};

pub(crate) type DomCreationResult = Result<PaDom, PaDomCreationError>;

/// Builds a [`PaDom`] from html5ever tree-builder callbacks.
///
/// The parser recovers from malformed markup, so an `Err` still carries a
/// usable DOM alongside the recorded parse errors.
pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreationError>,
}

impl PaDomCreator {
    pub fn parse(html: &str) -> DomCreationResult {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(""),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn insert_before(&self, sibling: &PaDomHandle, new_node: PaDomHandle) {
        let dom = &mut self.state.borrow_mut().dom;
        let Some(parent) = dom.parent_of(sibling) else {
            return;
        };
        if let Some(children) = dom.children_mut(&parent) {
            let index = children
                .iter()
                .position(|c| c == sibling)
                .unwrap_or(children.len());
            children.insert(index, new_node);
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreationError::new()),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(state)
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.name(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Comment)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Comment)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => {
                if let Some(children) = dom.children_mut(parent) {
                    children.push(child);
                }
            }
            NodeOrText::AppendText(tendril) => {
                dom.append_text(parent, tendril.as_ref());
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent_of(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing we convert
    }

    fn pop(&self, _node: &Self::Handle) {
        // Nothing to do here, but this is called for every closed element
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept inline, under the template itself
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Nothing to do here
    }

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let handle = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(tendril) => {
                self.state.borrow_mut().dom.add_node(PaDomNode::Text(
                    super::PaNodeText {
                        content: tendril.as_ref().to_owned(),
                    },
                ))
            }
        };
        self.insert_before(sibling, handle);
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            let to_add: Vec<(String, String)> = attrs
                .iter()
                .filter_map(|attr| {
                    let attr_name = attr.name.local.as_ref();
                    if node.attrs.iter().any(|(name, _)| name == attr_name) {
                        None
                    } else {
                        Some((
                            attr_name.to_owned(),
                            attr.value.as_ref().to_owned(),
                        ))
                    }
                })
                .collect();
            node.attrs.extend(to_add);
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let moved = dom
            .children_mut(node)
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = dom.children_mut(new_parent) {
            children.extend(moved);
        }
    }

    fn set_current_line(&self, _line_number: u64) {
        // Nothing to do here, but this is called on input with new lines
    }
}
