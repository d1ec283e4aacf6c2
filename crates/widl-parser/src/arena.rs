//! Node arena: owning storage for the syntax tree.
//!
//! Nodes are addressed by `NodeIndex`; the parent link is an index too, so
//! back-references never participate in ownership. Parent assignment is
//! centralized here: `alloc` adopts every child reachable from the new
//! node's data, and the mutation helpers used by autofixes re-adopt, so
//! production code never sets `parent` by hand.

use crate::node::NodeData;

/// Index of a node in its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A syntax-tree node: its production data plus a non-owning parent link.
#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<NodeIndex>,
    pub data: NodeData,
}

/// Owning storage for every node of a parse.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and adopt every child its data references.
    pub fn alloc(&mut self, data: NodeData) -> NodeIndex {
        let children = data.children();
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node { parent: None, data });
        for child in children {
            self.adopt(child, index);
        }
        index
    }

    /// Point `child`'s parent link at `parent`.
    ///
    /// Callers that splice children into an existing node's lists must call
    /// this for each spliced index.
    pub fn adopt(&mut self, child: NodeIndex, parent: NodeIndex) {
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Replace a definition's or member's extended-attribute block.
    pub fn set_ext_attrs(&mut self, owner: NodeIndex, ext_attrs: NodeIndex) {
        self[owner].data.set_ext_attrs(Some(ext_attrs));
        self.adopt(ext_attrs, owner);
    }

    /// Insert a member into a container at `position`.
    pub fn insert_member(&mut self, container: NodeIndex, position: usize, member: NodeIndex) {
        match &mut self[container].data {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.members.insert(position, member),
            other => unreachable!("not a container: {}", other.kind_str()),
        }
        self.adopt(member, container);
    }

    /// Attach a default value to an argument.
    pub fn set_default(&mut self, argument: NodeIndex, default: NodeIndex) {
        match &mut self[argument].data {
            NodeData::Argument(data) => data.default = Some(default),
            other => unreachable!("not an argument: {}", other.kind_str()),
        }
        self.adopt(default, argument);
    }
}

impl std::ops::Index<NodeIndex> for NodeArena {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }
}

impl std::ops::IndexMut<NodeIndex> for NodeArena {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.index()]
    }
}
