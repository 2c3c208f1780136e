// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A minimal arena DOM filled in by html5ever.
//!
//! Nodes are owned by the [`PaDom`] in one list, and parents refer to their
//! children by [`PaDomHandle`]. Nodes created during parsing and later
//! detached stay in the list but are unreachable from the document.

mod padom_creator;
mod panode_container;

use html5ever::tree_builder::ElementFlags;
use html5ever::{Attribute, LocalName, Namespace, QualName};

pub(crate) use padom_creator::PaDomCreator;
pub(crate) use panode_container::PaNodeContainer;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// An HTML element name.
pub(crate) fn paqual_name(local_name: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local_name),
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions; never converted.
    Comment,
}

impl PaDomNode {
    fn children(&self) -> Option<&Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&c.children),
            Self::Text(_) | Self::Comment => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&mut c.children),
            Self::Text(_) | Self::Comment => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    document_handle: PaDomHandle,
    /// Name reported for nodes that are not elements.
    no_name: QualName,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
            no_name: paqual_name(""),
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn get_document(&self) -> &PaDomNode {
        self.get_node(&self.document_handle)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn name(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.name,
            PaDomNode::Text(_) | PaDomNode::Comment => &self.no_name,
        }
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .into_iter()
                .map(|attr| {
                    let name = attr.name.local.as_ref().to_owned();
                    (name, attr.value.to_string())
                })
                .collect(),
            children: Vec::new(),
        }))
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        self.get_node(handle)
            .children()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn children_mut(
        &mut self,
        handle: &PaDomHandle,
    ) -> Option<&mut Vec<PaDomHandle>> {
        self.get_mut_node(handle).children_mut()
    }

    /// The node holding `child` in its children, if it is attached.
    pub(crate) fn parent_of(&self, child: &PaDomHandle) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|node| {
                node.children().is_some_and(|children| children.contains(child))
            })
            .map(PaDomHandle)
    }

    /// Append text to `parent`, merging with a trailing text child.
    pub(crate) fn append_text(&mut self, parent: &PaDomHandle, text: &str) {
        let last_text = self
            .children(parent)
            .last()
            .filter(|last| matches!(self.get_node(last), PaDomNode::Text(_)))
            .cloned();
        if let Some(last) = last_text {
            if let PaDomNode::Text(t) = self.get_mut_node(&last) {
                t.content.push_str(text);
            }
        } else {
            let handle = self.add_node(PaDomNode::Text(PaNodeText {
                content: text.to_owned(),
            }));
            if let Some(children) = self.children_mut(parent) {
                children.push(handle);
            }
        }
    }

    /// Detach `child` from its parent, if it has one.
    pub(crate) fn detach(&mut self, child: &PaDomHandle) {
        if let Some(parent) = self.parent_of(child) {
            if let Some(children) = self.children_mut(&parent) {
                children.retain(|c| c != child);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PaDomCreationError {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

impl PaDomCreationError {
    pub(crate) fn new() -> Self {
        Self {
            dom: PaDom::new(),
            parse_errors: Vec::new(),
        }
    }
}
