//! Structure-of-arrays decision tree.

use super::NodeId;

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// Parallel arrays have different lengths.
    #[error("{array} has length {len}, expected {n_nodes}")]
    LengthMismatch {
        array: &'static str,
        len: usize,
        n_nodes: usize,
    },
    /// A child pointer references an out-of-bounds node.
    #[error("node {node} has {side} child {child} but tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} references itself")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path.
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
}

// ============================================================================
// Tree
// ============================================================================

/// Decision tree stored as parallel arrays indexed by node id (0 = root).
///
/// Splits are numeric: a sample goes left when `feature < threshold`, with
/// both sides compared in `f32` the way gradient-boosting libraries store
/// split conditions. Missing values (NaN) follow `default_left`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// Create a tree from parallel arrays and validate its structure.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f64>,
    ) -> Result<Self, TreeValidationError> {
        let n_nodes = is_leaf.len();
        for (array, len) in [
            ("split_indices", split_indices.len()),
            ("split_thresholds", split_thresholds.len()),
            ("left_children", left_children.len()),
            ("right_children", right_children.len()),
            ("default_left", default_left.len()),
            ("leaf_values", leaf_values.len()),
        ] {
            if len != n_nodes {
                return Err(TreeValidationError::LengthMismatch {
                    array,
                    len,
                    n_nodes,
                });
            }
        }

        let tree = Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        };
        tree.validate()?;
        Ok(tree)
    }

    /// A tree with a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            split_indices: Box::new([0]),
            split_thresholds: Box::new([0.0]),
            left_children: Box::new([0]),
            right_children: Box::new([0]),
            default_left: Box::new([false]),
            is_leaf: Box::new([true]),
            leaf_values: Box::new([value]),
        }
    }

    /// A depth-1 tree: `feature < threshold` → `left`, otherwise `right`.
    pub fn stump(feature: u32, threshold: f32, left: f64, right: f64) -> Self {
        Self {
            split_indices: Box::new([feature, 0, 0]),
            split_thresholds: Box::new([threshold, 0.0, 0.0]),
            left_children: Box::new([1, 0, 0]),
            right_children: Box::new([2, 0, 0]),
            default_left: Box::new([true, false, false]),
            is_leaf: Box::new([false, true, true]),
            leaf_values: Box::new([0.0, left, right]),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }

    /// Largest feature index used by any split, if the tree has splits.
    pub fn max_split_index(&self) -> Option<u32> {
        (0..self.n_nodes() as NodeId)
            .filter(|&n| !self.is_leaf(n))
            .map(|n| self.split_index(n))
            .max()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Walk from the root to the leaf reached by `features`.
    ///
    /// Callers must ensure every split index is within `features`.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f64]) -> NodeId {
        let mut node: NodeId = 0;

        while !self.is_leaf(node) {
            let fvalue = features[self.split_index(node) as usize] as f32;

            node = if fvalue.is_nan() {
                if self.default_left(node) {
                    self.left_child(node)
                } else {
                    self.right_child(node)
                }
            } else if fvalue < self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }

        node
    }

    /// Leaf value reached by `features`.
    #[inline]
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.leaf_value(self.traverse_to_leaf(features))
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate that the nodes form a proper binary tree rooted at 0.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;

            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        _ => return Err(TreeValidationError::DuplicateVisit { node }),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if !self.is_leaf(node) {
                        let left = self.left_child(node);
                        let right = self.right_child(node);

                        if left == node || right == node {
                            return Err(TreeValidationError::SelfLoop { node });
                        }

                        for (side, child) in [("left", left), ("right", right)] {
                            if child as usize >= n_nodes {
                                return Err(TreeValidationError::ChildOutOfBounds {
                                    node,
                                    side,
                                    child,
                                    n_nodes,
                                });
                            }
                        }

                        stack.push((right, 0));
                        stack.push((left, 0));
                    }
                }
                _ => color[node_usize] = 2,
            }
        }

        if let Some(node) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode {
                node: node as NodeId,
            });
        }

        Ok(())
    }
}
