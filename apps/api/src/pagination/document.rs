//! Unpaginated document model: the input of a pagination pass.
//!
//! A document is a flat, ordered list of top-level blocks. A block is either
//! fixed (placed whole) or splittable (one heading plus one list container whose
//! items may be distributed over several pages). Nodes carry an opaque id used
//! to look up their measured height and their serialized markup, which is never
//! modified by the engine.

use serde::{Deserialize, Serialize};

/// Opaque handle for a measurable node (block, heading or list item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// A rendered element together with its original markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub markup: String,
}

impl Node {
    pub fn new(id: NodeId, markup: impl Into<String>) -> Self {
        Self {
            id,
            markup: markup.into(),
        }
    }
}

/// The list wrapper of a splittable section (`<ul class="…">`, `<div class="…">`, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListContainer {
    pub tag: String,
    #[serde(default)]
    pub class: String,
    pub items: Vec<Node>,
}

/// A section that may be broken across pages between its items.
///
/// `heading` and `list` are optional because client-reported snapshots may be
/// malformed; see [`Section::parts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: NodeId,
    #[serde(default)]
    pub class: String,
    pub heading: Option<Node>,
    pub list: Option<ListContainer>,
}

impl Section {
    /// Heading and list, when both are present. Only then can the section be split.
    pub fn parts(&self) -> Option<(&Node, &ListContainer)> {
        match (&self.heading, &self.list) {
            (Some(heading), Some(list)) => Some((heading, list)),
            _ => None,
        }
    }

    /// True when neither heading nor list is present: nothing to place.
    pub fn is_hollow(&self) -> bool {
        self.heading.is_none() && self.list.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Atomic block, e.g. the education table.
    Fixed(Node),
    Splittable(Section),
}

impl Block {
    pub fn id(&self) -> NodeId {
        match self {
            Block::Fixed(node) => node.id,
            Block::Splittable(section) => section.id,
        }
    }

    #[cfg(test)]
    pub fn is_splittable(&self) -> bool {
        matches!(self, Block::Splittable(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Hands out sequential node ids while a document is being built.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
