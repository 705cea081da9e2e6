//! Huffman tree stored as an arena of nodes.
//!
//! Nodes refer to their children by [`NodeId`], so the tree can be flattened
//! into a preorder list for the container header and rebuilt from it without
//! recursion.

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;

/// Index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(char),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    weight: u64,
    kind: NodeKind,
}

impl Node {
    fn leaf(symbol: char, weight: u64) -> Self {
        Self {
            weight,
            kind: NodeKind::Leaf(symbol),
        }
    }

    fn internal(weight: u64, left: NodeId, right: NodeId) -> Self {
        Self {
            weight,
            kind: NodeKind::Internal { left, right },
        }
    }

    /// Aggregate frequency of every symbol beneath this node.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn symbol(&self) -> Option<char> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// Queue entry ordered by `(weight, order)` only.
///
/// `order` is the smallest first-seen position of any symbol under the node,
/// which is unique across disjoint subtrees and makes the order total.
#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    order: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    id: NodeId,
}

/// One node of a tree flattened in preorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatNode {
    Leaf { symbol: char, weight: u64 },
    Internal { weight: u64 },
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Builds the optimal prefix tree for `frequencies` by repeatedly merging
    /// the two lightest nodes.
    ///
    /// The first node popped becomes the left child. Equal weights are broken
    /// by first-seen order, so the shape of the tree is fully determined by
    /// the input text.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut nodes = Vec::with_capacity(2 * frequencies.len());
        let mut pq = BinaryHeap::with_capacity(frequencies.len());

        for (order, (symbol, count)) in frequencies.iter().enumerate() {
            let id = NodeId(nodes.len());
            nodes.push(Node::leaf(symbol, count));
            pq.push(Reverse(Pending {
                weight: count,
                order,
                id,
            }));
        }

        let mut root = NodeId(0);
        while let Some(Reverse(left)) = pq.pop() {
            let Some(Reverse(right)) = pq.pop() else {
                root = left.id;
                break;
            };

            let id = NodeId(nodes.len());
            let weight = left.weight + right.weight;
            log::trace!(
                "merge {:?}({}) + {:?}({}) -> {:?}({})",
                left.id,
                left.weight,
                right.id,
                right.weight,
                id,
                weight
            );
            nodes.push(Node::internal(weight, left.id, right.id));
            pq.push(Reverse(Pending {
                weight,
                order: left.order.min(right.order),
                id,
            }));
        }

        log::debug!(
            "built tree with {} nodes for {} symbols",
            nodes.len(),
            frequencies.len()
        );
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    ///
    /// If `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child of `id` reached by `bit` (`false` is left), `None` at a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(id).kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal { left, right } => Some(if bit { right } else { left }),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total weight held by the root.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Flattens the tree in preorder, left before right.
    pub fn to_preorder(&self) -> Vec<FlatNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match node.kind {
                NodeKind::Leaf(symbol) => out.push(FlatNode::Leaf {
                    symbol,
                    weight: node.weight,
                }),
                NodeKind::Internal { left, right } => {
                    out.push(FlatNode::Internal {
                        weight: node.weight,
                    });
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        out
    }

    /// Rebuilds a tree from the output of [`Tree::to_preorder`].
    ///
    /// Every internal node must be followed by exactly two complete subtrees,
    /// internal weights must equal the sum of their children, and no symbol
    /// may appear on two leaves.
    pub fn from_preorder(flat: &[FlatNode]) -> Result<Self> {
        struct Open {
            weight: u64,
            left: Option<NodeId>,
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(flat.len());
        let mut open: Vec<Open> = Vec::new();
        let mut seen = HashSet::new();
        let mut root = None;

        for (position, entry) in flat.iter().enumerate() {
            if root.is_some() {
                return Err(Error::corrupt(format!(
                    "tree has {} trailing nodes",
                    flat.len() - position
                )));
            }

            let (symbol, weight) = match *entry {
                FlatNode::Internal { weight } => {
                    open.push(Open { weight, left: None });
                    continue;
                }
                FlatNode::Leaf { symbol, weight } => (symbol, weight),
            };

            if !seen.insert(symbol) {
                return Err(Error::corrupt(format!(
                    "symbol {symbol:?} appears on more than one leaf"
                )));
            }

            let mut id = NodeId(nodes.len());
            nodes.push(Node::leaf(symbol, weight));

            // Close every internal node this leaf completes.
            loop {
                match open.last_mut() {
                    None => {
                        root = Some(id);
                        break;
                    }
                    Some(parent) if parent.left.is_none() => {
                        parent.left = Some(id);
                        break;
                    }
                    Some(_) => {}
                }

                let Some(Open {
                    weight,
                    left: Some(left),
                }) = open.pop()
                else {
                    return Err(Error::corrupt("unbalanced tree"));
                };

                let sum = nodes[left.0].weight.checked_add(nodes[id.0].weight);
                if sum != Some(weight) {
                    return Err(Error::corrupt(format!(
                        "internal node weight {weight} does not match its children"
                    )));
                }

                let parent = NodeId(nodes.len());
                nodes.push(Node::internal(weight, left, id));
                id = parent;
            }
        }

        match root {
            Some(root) => Ok(Self { nodes, root }),
            None if flat.is_empty() => Err(Error::corrupt("tree is empty")),
            None => Err(Error::corrupt(format!(
                "tree ends with {} incomplete internal nodes",
                open.len()
            ))),
        }
    }
}

/// Trees are equal when they have the same shape, symbols and weights,
/// regardless of arena layout.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.to_preorder() == other.to_preorder()
    }
}

impl Eq for Tree {}

/// Indented rendering, one node per line, showing each node's path code.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root, 0usize, "Root: ", String::new())];

        while let Some((id, level, prefix, code)) = stack.pop() {
            let node = self.node(id);
            write!(f, "{:indent$}{prefix}(", "", indent = 3 * level)?;
            if let NodeKind::Leaf(symbol) = node.kind {
                write!(f, "{}", symbol.escape_debug())?;
            }
            writeln!(f, ":{}):{code}", node.weight)?;

            if let NodeKind::Internal { left, right } = node.kind {
                stack.push((right, level + 1, "R-1- ", format!("{code}1")));
                stack.push((left, level + 1, "L-0- ", format!("{code}0")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> Tree {
        Tree::build(&FrequencyTable::analyze(text).unwrap())
    }

    fn pending(weight: u64, order: usize, id: usize) -> Pending {
        Pending {
            weight,
            order,
            id: NodeId(id),
        }
    }

    #[test]
    fn pending_compare_ignores_id() {
        assert_eq!(pending(3, 1, 0), pending(3, 1, 7));
    }

    #[test]
    fn pending_compare_ordering() {
        for i in 1..=1000 {
            assert!(pending(i, 5, 0) < pending(i + 1, 0, 1));
            assert!(pending(i, 0, 0) < pending(i, 1, 1));
        }
    }

    #[test]
    fn node_leaf() {
        let n = Node::leaf('x', 4);
        assert_eq!(n.weight(), 4);
        assert_eq!(n.symbol(), Some('x'));
        assert!(n.is_leaf());
    }

    #[test]
    fn node_internal() {
        let n = Node::internal(7, NodeId(0), NodeId(1));
        assert_eq!(n.weight(), 7);
        assert_eq!(n.symbol(), None);
        assert_eq!(
            n.kind(),
            NodeKind::Internal {
                left: NodeId(0),
                right: NodeId(1)
            }
        );
    }

    #[test]
    fn worked_example_shape() {
        let tree = tree_for("aaabbc");
        assert_eq!(tree.weight(), 6);
        assert_eq!(tree.len(), 5);

        // a(3) wins the tie against the b+c subtree(3) on first-seen order.
        let left = tree.child(tree.root(), false).unwrap();
        let right = tree.child(tree.root(), true).unwrap();
        assert_eq!(tree.node(left).symbol(), Some('a'));
        assert_eq!(tree.node(right).weight(), 3);

        let c = tree.child(right, false).unwrap();
        let b = tree.child(right, true).unwrap();
        assert_eq!(tree.node(c).symbol(), Some('c'));
        assert_eq!(tree.node(b).symbol(), Some('b'));
    }

    #[test]
    fn equal_leaves_merge_in_first_seen_order() {
        let tree = tree_for("xy");
        let left = tree.child(tree.root(), false).unwrap();
        assert_eq!(tree.node(left).symbol(), Some('x'));

        let tree = tree_for("yx");
        let left = tree.child(tree.root(), false).unwrap();
        assert_eq!(tree.node(left).symbol(), Some('y'));
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = tree_for("zzzz");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()).symbol(), Some('z'));
        assert_eq!(tree.weight(), 4);
        assert_eq!(tree.child(tree.root(), false), None);
    }

    #[test]
    fn preorder_rebuilds_same_shape() {
        let tree = tree_for("this is an example of a huffman tree");
        let flat = tree.to_preorder();
        assert_eq!(flat.len(), tree.len());

        let rebuilt = Tree::from_preorder(&flat).unwrap();
        assert_eq!(rebuilt.to_preorder(), flat);
        assert_eq!(rebuilt.leaf_count(), tree.leaf_count());
    }

    #[test]
    fn preorder_of_worked_example() {
        let flat = tree_for("aaabbc").to_preorder();
        assert_eq!(
            flat,
            vec![
                FlatNode::Internal { weight: 6 },
                FlatNode::Leaf { symbol: 'a', weight: 3 },
                FlatNode::Internal { weight: 3 },
                FlatNode::Leaf { symbol: 'c', weight: 1 },
                FlatNode::Leaf { symbol: 'b', weight: 2 },
            ]
        );
    }

    #[test]
    fn from_preorder_rejects_malformed_trees() {
        let leaf = |symbol, weight| FlatNode::Leaf { symbol, weight };

        assert!(Tree::from_preorder(&[]).is_err());
        // missing right child
        assert!(Tree::from_preorder(&[FlatNode::Internal { weight: 1 }, leaf('a', 1)]).is_err());
        // trailing node after a complete tree
        assert!(Tree::from_preorder(&[leaf('a', 1), leaf('b', 1)]).is_err());
        // weight mismatch
        assert!(Tree::from_preorder(&[
            FlatNode::Internal { weight: 5 },
            leaf('a', 1),
            leaf('b', 1)
        ])
        .is_err());
        // duplicate symbol
        assert!(Tree::from_preorder(&[
            FlatNode::Internal { weight: 2 },
            leaf('a', 1),
            leaf('a', 1)
        ])
        .is_err());
    }

    #[test]
    fn display_shows_paths() {
        let rendered = tree_for("aaabbc").to_string();
        assert_eq!(
            rendered,
            "Root: (:6):\n   L-0- (a:3):0\n   R-1- (:3):1\n      L-0- (c:1):10\n      R-1- (b:2):11\n"
        );
    }

    #[test]
    fn deep_skewed_tree_does_not_recurse() {
        // Fibonacci-like weights produce a maximally skewed tree.
        let mut text = String::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in ('a'..='z').take(20) {
            text.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }

        let tree = tree_for(&text);
        let rebuilt = Tree::from_preorder(&tree.to_preorder()).unwrap();
        assert_eq!(rebuilt, Tree::from_preorder(&rebuilt.to_preorder()).unwrap());
        assert!(!tree.to_string().is_empty());
    }
}
