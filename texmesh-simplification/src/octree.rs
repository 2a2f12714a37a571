//! Capacity-bounded octree over a vertex set
//!
//! Nodes live in a flat arena and refer to their children by index, so a
//! tree is built in one call and dropped in one step. A node stops
//! splitting once it holds at most `leaf_capacity` vertices or lies deeper
//! than `max_depth`; otherwise it is bisected on every axis into eight octants
//! that tile it exactly.

use texmesh_core::{BoundingBox, Point3f};

/// Index of a node in its [`Octree`] arena
pub type NodeId = usize;

/// Default depth limit, reached only by heavily clustered input.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Largest accepted depth limit. Deeper splits only separate points closer
/// than `f32` can resolve relative to the root.
pub const MAX_OCTREE_DEPTH: usize = 32;

/// One octree cell
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialNode {
    pub bounds: BoundingBox,
    pub depth: usize,
    /// Vertices contained in `bounds` (half-open)
    pub vertex_count: usize,
    /// Octants in corner order (bit `i` of the slot selects the upper half
    /// on axis `i`); `None` for a leaf
    pub children: Option<[NodeId; 8]>,
}

impl SpatialNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-allocated octree
#[derive(Debug, Clone, PartialEq)]
pub struct Octree {
    nodes: Vec<SpatialNode>,
}

/// The eight octants of `bounds`, bit `i` of the slot selecting the upper
/// half on axis `i`.
///
/// Siblings share their split planes exactly, so under half-open
/// containment every point of the parent lies in exactly one octant.
pub fn octants(bounds: &BoundingBox) -> [BoundingBox; 8] {
    let mid = nalgebra::center(&bounds.min, &bounds.max);
    std::array::from_fn(|slot| {
        let mut min = bounds.min;
        let mut max = mid;
        for axis in 0..3 {
            if slot & (1 << axis) != 0 {
                min[axis] = mid[axis];
                max[axis] = bounds.max[axis];
            }
        }
        BoundingBox::new(min, max)
    })
}

fn octant_of(mid: &Point3f, p: &Point3f) -> usize {
    (0..3).filter(|&axis| p[axis] >= mid[axis]).map(|axis| 1 << axis).sum()
}

impl Octree {
    /// Build the tree over `positions` inside `root`.
    ///
    /// Vertices outside `root` are ignored. `leaf_capacity` of 0 behaves
    /// like 1 would for every non-empty node; callers validate it.
    pub fn build(positions: &[Point3f], root: BoundingBox, leaf_capacity: usize, max_depth: usize) -> Self {
        let contained = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| root.contains(p))
            .map(|(i, _)| i)
            .collect();

        let mut tree = Self { nodes: Vec::new() };
        tree.build_node(positions, root, 0, contained, leaf_capacity, max_depth);
        tree
    }

    fn build_node(
        &mut self,
        positions: &[Point3f],
        bounds: BoundingBox,
        depth: usize,
        vertices: Vec<usize>,
        leaf_capacity: usize,
        max_depth: usize,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SpatialNode {
            bounds,
            depth,
            vertex_count: vertices.len(),
            children: None,
        });

        if vertices.len() <= leaf_capacity || depth > max_depth {
            return id;
        }

        let mid = nalgebra::center(&bounds.min, &bounds.max);
        let mut buckets: [Vec<usize>; 8] = Default::default();
        for i in vertices {
            buckets[octant_of(&mid, &positions[i])].push(i);
        }

        let mut children = [0; 8];
        for ((child, octant), bucket) in children.iter_mut().zip(octants(&bounds)).zip(buckets) {
            *child = self.build_node(positions, octant, depth + 1, bucket, leaf_capacity, max_depth);
        }
        self.nodes[id].children = Some(children);
        id
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &SpatialNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[SpatialNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest level reached
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Leaves in depth-first order, children visited in octant order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match &self.nodes[id].children {
                Some(children) => stack.extend(children.iter().rev()),
                None => leaves.push(id),
            }
        }
        leaves
    }

    /// The leaf containing `p`, `None` when `p` is outside the root.
    ///
    /// Leaves are disjoint, so this is also the first containing leaf in
    /// [`Octree::leaves`] order.
    pub fn locate(&self, p: &Point3f) -> Option<NodeId> {
        let mut id = self.root();
        if !self.nodes[id].bounds.contains(p) {
            return None;
        }
        while let Some(children) = &self.nodes[id].children {
            let node = &self.nodes[id];
            let mid = nalgebra::center(&node.bounds.min, &node.bounds.max);
            id = children[octant_of(&mid, p)];
        }
        Some(id)
    }
}
