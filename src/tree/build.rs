use std::collections::HashMap;
use std::path::{Component, Path};

use crate::library::PhotoStore;

use super::model::{NodeId, NodeKind, PhotoTree, TreeNode};

/// Path segments of `path` below `root`.
///
/// Paths outside `root` keep all of their plain components, so they still
/// land somewhere in the tree instead of vanishing.
pub fn relative_segments(root: &Path, path: &Path) -> Vec<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

struct TreeBuilder {
    nodes: Vec<TreeNode>,
    groups: HashMap<String, NodeId>,
    leaves: HashMap<String, NodeId>,
    first_leaf: Option<NodeId>,
}

impl TreeBuilder {
    fn new(root_label: String) -> Self {
        Self {
            nodes: vec![TreeNode {
                label: root_label,
                kind: NodeKind::Group,
                children: Vec::new(),
                depth: 0,
            }],
            groups: HashMap::new(),
            leaves: HashMap::new(),
            first_leaf: None,
        }
    }

    fn push_child(&mut self, parent: NodeId, label: &str, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(TreeNode {
            label: label.to_string(),
            kind,
            children: Vec::new(),
            depth,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Place `photo` under the groups named by `segments`.
    ///
    /// Groups are shared by their full prefix ("a/b"), never by bare name. A
    /// photo with the same full relative path and a higher store index takes
    /// over the existing leaf: the tree keeps one leaf per path, pointing at
    /// the later-indexed record whatever the visiting order.
    fn insert(&mut self, segments: &[String], photo: usize) {
        let Some((file, dirs)) = segments.split_last() else {
            return;
        };

        let mut parent = PhotoTree::ROOT;
        let mut key = String::new();
        for dir in dirs {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(dir);
            parent = match self.groups.get(&key) {
                Some(&id) => id,
                None => {
                    let id = self.push_child(parent, dir, NodeKind::Group);
                    self.groups.insert(key.clone(), id);
                    id
                }
            };
        }

        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(file);

        let leaf = match self.leaves.get(&key) {
            Some(&existing) => {
                if self.nodes[existing].photo_index().is_some_and(|current| photo > current) {
                    tracing::debug!(path = %key, photo, "duplicate relative path, replacing leaf");
                    self.nodes[existing].kind = NodeKind::Leaf { photo };
                }
                existing
            }
            None => {
                let id = self.push_child(parent, file, NodeKind::Leaf { photo });
                self.leaves.insert(key, id);
                id
            }
        };
        self.first_leaf.get_or_insert(leaf);
    }

    fn finish(self) -> PhotoTree {
        PhotoTree::from_parts(self.nodes, self.first_leaf)
    }
}

/// Build the folder tree for `store`, visiting records in `order`.
///
/// Children of every group appear in the order their first photo was seen,
/// so the sort projection carries through to each folder. Indices outside
/// the store are skipped.
pub fn build_tree(store: &PhotoStore, order: &[usize]) -> PhotoTree {
    let mut builder = TreeBuilder::new(store.root_label());
    for &idx in order {
        let Some(record) = store.get(idx) else {
            continue;
        };
        let segments = relative_segments(store.root(), &record.path);
        builder.insert(&segments, idx);
    }
    builder.finish()
}
