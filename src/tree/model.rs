use std::collections::HashSet;

/// Index of a node inside a `PhotoTree`.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A folder; carries no photo.
    Group,
    /// A file, referring back to its record in the store.
    Leaf { photo: usize },
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub kind: NodeKind,
    /// Children in sort-projection order.
    pub children: Vec<NodeId>,
    pub depth: usize,
}

impl TreeNode {
    pub fn photo_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Leaf { photo } => Some(photo),
            NodeKind::Group => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }
}

/// One visible line of the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
}

/// Arena of nodes with the synthetic root at `PhotoTree::ROOT`.
#[derive(Debug, Clone)]
pub struct PhotoTree {
    nodes: Vec<TreeNode>,
    default_selection: Option<NodeId>,
}

impl PhotoTree {
    pub const ROOT: NodeId = 0;

    pub(super) fn from_parts(nodes: Vec<TreeNode>, default_selection: Option<NodeId>) -> Self {
        Self {
            nodes,
            default_selection,
        }
    }

    /// A tree holding only a root group.
    pub fn empty(label: &str) -> Self {
        Self::from_parts(
            vec![TreeNode {
                label: label.to_string(),
                kind: NodeKind::Group,
                children: Vec::new(),
                depth: 0,
            }],
            None,
        )
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// First leaf met while building; what the caller should highlight.
    pub fn default_selection(&self) -> Option<NodeId> {
        self.default_selection
    }

    /// Node ids reachable from the root, depth first, parents before children.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        out
    }

    /// Store indices of all reachable leaves, in tree order.
    pub fn leaf_photos(&self) -> Vec<usize> {
        self.walk()
            .into_iter()
            .filter_map(|id| self.nodes[id].photo_index())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_photos().len()
    }

    pub fn find_leaf(&self, photo: usize) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|&id| self.nodes[id].photo_index() == Some(photo))
    }

    /// Child of `parent` labelled `label`, if any.
    pub fn child_by_label(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].label == label)
    }

    /// Rows to display, skipping the children of collapsed groups.
    pub fn visible_rows(&self, collapsed: &HashSet<NodeId>) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            rows.push(TreeRow {
                id,
                depth: node.depth,
            });
            if !collapsed.contains(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        rows
    }

    /// Parent of `id`; `None` for the root or unknown ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.children.contains(&id))
    }
}
