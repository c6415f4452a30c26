use serde::{Deserialize, Serialize};

/// Index of a node inside its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Title {
        level: u8,
        text: String,
    },
    Paragraph,
    List,
    ListItem,
    /// Code content, either an inline run or a block. `code` is stored
    /// HTML-escaped; block content has had its common indentation stripped.
    CodeBlock {
        language: Option<String>,
        code: String,
        block_style: bool,
    },
    Link {
        url: String,
        title: String,
    },
    /// A cross-reference to another note. `target` is the resolved note
    /// identifier, or `None` when the title is unknown (a broken reference).
    NoteReference {
        title: String,
        target: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

/// A fully parsed note: an immutable tree owned by a flat arena.
///
/// Every node has exactly one parent; ids are only meaningful within the
/// document that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Text of the note's own heading: the first title under the root.
    pub fn title(&self) -> Option<&str> {
        self.children(self.root).iter().find_map(|&id| {
            match &self.node(id).kind {
                NodeKind::Title { text, .. } => Some(text.as_str()),
                _ => None,
            }
        })
    }
}

/// Growable node storage used while building; freezes into a [`Document`].
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    pub fn new_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.push(kind);
        self.append_child(parent, id);
        id
    }

    /// Append inline text, merging into a trailing text node when there is
    /// one so consecutive runs read back as a single node.
    pub fn push_text(&mut self, parent: NodeId, text: &str) {
        let last = self.nodes[parent.0].children.last().copied();
        if let Some(last) = last
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return;
        }
        let id = self.push(NodeKind::Text(text.to_string()));
        self.append_child(parent, id);
    }

    pub fn into_document(self, root: NodeId) -> Document {
        Document {
            nodes: self.nodes,
            root,
        }
    }
}
