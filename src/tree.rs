//! Hierarchical view over a flat entry list.
//!
//! ZIP containers store a flat list of names. [`ArchiveTreeBuilder`] turns
//! that list into an [`ArchiveTree`]: an arena of [`TreeNode`]s indexed by
//! their full path. Every ancestor directory is materialized exactly once,
//! whether or not the container holds an explicit directory entry for it.
//!
//! # Example
//!
//! ```rust
//! use tiwut::ArchiveTree;
//!
//! let tree = ArchiveTree::build(["data/", "data/a.txt", "data/sub/b.txt"]).unwrap();
//!
//! let data = tree.get("data/").unwrap();
//! assert!(data.is_directory());
//!
//! // "data/sub/" was never stored, but it is part of the tree
//! assert_eq!(tree.is_directory("data/sub/"), Some(true));
//!
//! for (depth, node) in tree.walk() {
//!     println!("{}{}", "  ".repeat(depth), node.label());
//! }
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::archive_path::{self, ArchivePath};
use crate::Result;

/// Index of a node inside an [`ArchiveTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One file or directory in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    full_path: String,
    is_directory: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    /// Returns the display name (last path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the addressable entry name. Directories end in `/`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Returns `true` for directories, explicit or inferred.
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Returns the parent node, or `None` for top-level nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child nodes in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the display label, `"📁 name"` or `"📄 name"`.
    pub fn label(&self) -> String {
        if self.is_directory {
            format!("📁 {}", self.name)
        } else {
            format!("📄 {}", self.name)
        }
    }
}

/// Incremental tree construction from entry names.
///
/// Names may be inserted in any order; [`finish`](Self::finish) puts the
/// children of every node in display order (directories first, then by name).
#[derive(Debug, Default)]
pub struct ArchiveTreeBuilder {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl ArchiveTreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one entry name and all of its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEntry`](crate::Error::MalformedEntry) for
    /// empty names and names that could escape the container root.
    pub fn insert(&mut self, name: &str) -> Result<()> {
        let name = ArchivePath::new(name)?;
        let segments = name.segments();
        let last = segments.len().saturating_sub(1);

        let mut parent_path = String::new();
        for (i, segment) in segments.iter().enumerate() {
            let mut current_path = format!("{}{}", parent_path, segment);
            if i < last || name.is_directory() {
                current_path.push('/');
            }

            if !self.index.contains_key(&current_path) {
                let parent = self.index.get(&parent_path).copied();
                let id = NodeId(self.nodes.len());
                self.nodes.push(TreeNode {
                    name: (*segment).to_string(),
                    full_path: current_path.clone(),
                    is_directory: archive_path::is_directory(&current_path),
                    parent,
                    children: Vec::new(),
                });
                match parent {
                    Some(parent_id) => self.nodes[parent_id.0].children.push(id),
                    None => self.roots.push(id),
                }
                self.index.insert(current_path.clone(), id);
            }

            parent_path = current_path;
        }

        Ok(())
    }

    /// Sorts every child list and returns the finished tree.
    pub fn finish(mut self) -> ArchiveTree {
        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| display_order(&self.nodes[a.0], &self.nodes[b.0]));
            self.nodes[i].children = children;
        }
        let nodes = &self.nodes;
        self.roots
            .sort_by(|a, b| display_order(&nodes[a.0], &nodes[b.0]));

        ArchiveTree {
            nodes: self.nodes,
            roots: self.roots,
            index: self.index,
        }
    }
}

/// Directories before files, then by display name.
fn display_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.cmp(&b.name))
}

/// The in-memory tree of one container. Built fresh on every load.
#[derive(Debug, Clone, Default)]
pub struct ArchiveTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl ArchiveTree {
    /// Builds a tree from entry names.
    ///
    /// Names are processed in lexicographic order regardless of input order.
    pub fn build<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<S> = names.into_iter().collect();
        sorted.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));

        let mut builder = ArchiveTreeBuilder::new();
        for name in &sorted {
            builder.insert(name.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the top-level nodes in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Looks up the id of a node by full path.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    /// Looks up a node by full path.
    pub fn get(&self, path: &str) -> Option<&TreeNode> {
        self.find(path).map(|id| self.node(id))
    }

    /// Returns `true` if a node with this full path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Returns whether `path` is a directory, or `None` if it is not in the tree.
    pub fn is_directory(&self, path: &str) -> Option<bool> {
        self.get(path).map(TreeNode::is_directory)
    }

    /// Returns the children of a node in display order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.node(id).children.iter().map(move |child| self.node(*child))
    }

    /// Walks the tree depth-first in display order, yielding `(depth, node)`.
    pub fn walk(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> =
            self.roots.iter().rev().map(|id| (0, *id)).collect();

        while let Some((depth, id)) = stack.pop() {
            let node = self.node(id);
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, *child)));
        }

        out
    }

    /// Returns every node in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn child_paths<'a>(tree: &'a ArchiveTree, path: &str) -> Vec<&'a str> {
        let id = tree.find(path).unwrap();
        tree.children(id).map(TreeNode::full_path).collect()
    }

    #[test]
    fn test_nested_directories() {
        let tree =
            ArchiveTree::build(["data/", "data/a.txt", "data/sub/", "data/sub/b.txt"]).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.node(tree.roots()[0]).full_path(), "data/");

        assert_eq!(child_paths(&tree, "data/"), vec!["data/sub/", "data/a.txt"]);
        assert_eq!(child_paths(&tree, "data/sub/"), vec!["data/sub/b.txt"]);
        assert_eq!(tree.is_directory("data/a.txt"), Some(false));
    }

    #[test]
    fn test_implicit_ancestors() {
        let tree = ArchiveTree::build(["a/b/c/d.txt"]).unwrap();

        assert_eq!(tree.len(), 4);
        for dir in ["a/", "a/b/", "a/b/c/"] {
            assert_eq!(tree.is_directory(dir), Some(true), "{}", dir);
        }
        let leaf = tree.get("a/b/c/d.txt").unwrap();
        let parent = tree.node(leaf.parent().unwrap());
        assert_eq!(parent.full_path(), "a/b/c/");
    }

    #[test]
    fn test_explicit_directory_collapses_onto_inferred() {
        // Unsorted input: the deeper file comes first
        let tree = ArchiveTree::build(["data/sub/x.txt", "data/sub/", "data/"]).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(child_paths(&tree, "data/"), vec!["data/sub/"]);
    }

    #[test]
    fn test_directories_before_files() {
        let tree = ArchiveTree::build(["b.txt", "a.txt", "z/", "m/n.txt"]).unwrap();
        let roots: Vec<_> = tree
            .roots()
            .iter()
            .map(|id| tree.node(*id).full_path())
            .collect();
        assert_eq!(roots, vec!["m/", "z/", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_file_and_directory_with_same_stem() {
        let tree = ArchiveTree::build(["x", "x/y"]).unwrap();
        assert_eq!(tree.is_directory("x"), Some(false));
        assert_eq!(tree.is_directory("x/"), Some(true));
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_malformed_names_rejected() {
        for bad in ["", "/abs", "data/../x", "a//b"] {
            let err = ArchiveTree::build([bad]).unwrap_err();
            assert!(matches!(err, Error::MalformedEntry(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_labels() {
        let tree = ArchiveTree::build(["data/a.txt"]).unwrap();
        assert_eq!(tree.get("data/").unwrap().label(), "📁 data");
        assert_eq!(tree.get("data/a.txt").unwrap().label(), "📄 a.txt");
    }

    #[test]
    fn test_walk_depth_first() {
        let tree = ArchiveTree::build(["data/a.txt", "data/sub/b.txt", "info/"]).unwrap();
        let walked: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(depth, node)| (depth, node.full_path()))
            .collect();
        assert_eq!(
            walked,
            vec![
                (0, "data/"),
                (1, "data/sub/"),
                (2, "data/sub/b.txt"),
                (1, "data/a.txt"),
                (0, "info/"),
            ]
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = ArchiveTree::build(Vec::<String>::new()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.walk().is_empty());
    }
}
