//! Binary space-partitioning index over bounding boxes.
//!
//! The tree is built once from a list of boxes and stores indices into
//! that list, so it never owns the objects it accelerates. Queries return
//! candidate indices whose boxes the ray may hit; the exact per-object test
//! is left to the caller.

use lumen_math::{Aabb, Ray, Vec3};

/// Depth and leaf-size limits for tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspParams {
    /// Nodes at this depth become leaves regardless of their size.
    pub max_depth: usize,
    /// Nodes with at most this many objects become leaves.
    pub min_objects_per_leaf: usize,
}

impl BspParams {
    /// Limits for the top-level scene index.
    pub const SCENE: BspParams = BspParams {
        max_depth: 10,
        min_objects_per_leaf: 2,
    };

    /// Limits for per-mesh triangle indices, which are much larger.
    pub const MESH: BspParams = BspParams {
        max_depth: 15,
        min_objects_per_leaf: 4,
    };
}

impl Default for BspParams {
    fn default() -> Self {
        Self::SCENE
    }
}

/// BSP node - either an interior node with two children or a leaf with
/// object indices.
#[derive(Debug, Clone)]
pub enum BspNode {
    /// Interior node with exactly two children.
    Interior {
        left: Box<BspNode>,
        right: Box<BspNode>,
        bbox: Aabb,
    },
    /// Leaf node holding indices into the indexed object list.
    Leaf { objects: Vec<usize>, bbox: Aabb },
}

impl BspNode {
    /// Box enclosing everything beneath this node.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BspNode::Interior { bbox, .. } | BspNode::Leaf { bbox, .. } => *bbox,
        }
    }

    fn build(
        mut indices: Vec<usize>,
        boxes: &[Aabb],
        centroids: &[Vec3],
        depth: usize,
        params: &BspParams,
    ) -> Self {
        let bbox = indices.iter().fold(Aabb::EMPTY, |mut acc, &i| {
            acc.subsume(&boxes[i]);
            acc
        });

        // A leaf of zero objects is never requested, so one object always
        // stops the recursion even with a zero leaf size.
        if indices.len() <= params.min_objects_per_leaf.max(1) || depth >= params.max_depth {
            return BspNode::Leaf {
                objects: indices,
                bbox,
            };
        }

        let axis = bbox.longest_axis();
        indices.sort_unstable_by(|&a, &b| {
            Aabb::axis_value(centroids[a], axis).total_cmp(&Aabb::axis_value(centroids[b], axis))
        });

        let mid = indices.len() / 2;
        let right_indices = indices.split_off(mid);

        let left = Self::build(indices, boxes, centroids, depth + 1, params);
        let right = Self::build(right_indices, boxes, centroids, depth + 1, params);

        BspNode::Interior {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    fn visit<F: FnMut(usize)>(&self, ray: &Ray, f: &mut F, found: &mut usize) {
        match self {
            BspNode::Leaf { objects, bbox } => {
                if !bbox.intersects(ray) {
                    return;
                }
                for &index in objects {
                    f(index);
                }
                *found += objects.len();
            }
            BspNode::Interior { left, right, bbox } => {
                if !bbox.intersects(ray) {
                    return;
                }
                // Straddling objects may sit on either side of the split, so
                // both children are visited.
                left.visit(ray, f, found);
                right.visit(ray, f, found);
            }
        }
    }
}

/// Owning handle to a BSP node tree; empty until built.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    root: Option<BspNode>,
}

impl BspTree {
    /// Create an empty tree. Queries against it report no candidates.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Build a tree over `boxes`; leaves refer to positions in that slice.
    pub fn from_boxes(boxes: &[Aabb], params: BspParams) -> Self {
        let mut tree = Self::new();
        tree.build(boxes, params);
        tree
    }

    /// Rebuild the tree from scratch, discarding any previous nodes.
    ///
    /// Objects are split at the median of their box centers along the
    /// longest axis of the enclosing box, recursively.
    pub fn build(&mut self, boxes: &[Aabb], params: BspParams) {
        if boxes.is_empty() {
            self.root = None;
            return;
        }

        let centroids: Vec<Vec3> = boxes.iter().map(Aabb::centroid).collect();
        let indices: Vec<usize> = (0..boxes.len()).collect();
        self.root = Some(BspNode::build(indices, boxes, &centroids, 0, &params));
    }

    /// True if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&BspNode> {
        self.root.as_ref()
    }

    /// Box enclosing every indexed object, or `Aabb::EMPTY`.
    pub fn bounding_box(&self) -> Aabb {
        self.root
            .as_ref()
            .map_or(Aabb::EMPTY, BspNode::bounding_box)
    }

    /// Collect candidate indices for `ray` into `candidates` (cleared
    /// first). Returns whether any candidate was found.
    pub fn intersects(&self, ray: &Ray, candidates: &mut Vec<usize>) -> bool {
        candidates.clear();
        self.visit_candidates(ray, |index| candidates.push(index));
        !candidates.is_empty()
    }

    /// Call `f` for every candidate index without collecting them.
    /// Returns the number of candidates visited.
    pub fn visit_candidates<F: FnMut(usize)>(&self, ray: &Ray, mut f: F) -> usize {
        let mut found = 0;
        if let Some(root) = &self.root {
            root.visit(ray, &mut f, &mut found);
        }
        found
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        fn count(node: &BspNode) -> usize {
            match node {
                BspNode::Leaf { .. } => 1,
                BspNode::Interior { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        self.root.as_ref().map_or(0, count)
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        fn count(node: &BspNode) -> usize {
            match node {
                BspNode::Leaf { .. } => 1,
                BspNode::Interior { left, right, .. } => count(left) + count(right),
            }
        }
        self.root.as_ref().map_or(0, count)
    }

    /// Number of levels; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        fn depth(node: &BspNode) -> usize {
            match node {
                BspNode::Leaf { .. } => 1,
                BspNode::Interior { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        self.root.as_ref().map_or(0, depth)
    }
}
