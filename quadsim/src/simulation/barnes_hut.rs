//! # Barnes–Hut Quadtree (2D)
//!
//! This module implements a **2D Barnes–Hut quadtree** over a fixed world
//! rectangle. It replaces the naive `O(N²)` all-pairs acceleration sum with an
//! approximate `O(N log N)` one: a group of bodies that is far enough away is
//! treated as a single pseudo-body sitting at the group's center of mass.
//!
//! ## Core Concepts
//!
//! - The root covers the world rectangle and never changes size.
//! - A node is in exactly one of three states ([`NodeKind`]):
//!   - `Empty`: nothing below it,
//!   - `External`: a leaf holding one body,
//!   - `Internal`: four children covering the four equal quadrants of its bounds.
//! - Bodies are inserted one at a time. Inserting into a leaf splits it and
//!   pushes both bodies down into the matching children.
//! - Every node stores the total mass and center of mass (COM) of its
//!   subtree, refreshed bottom-up after every insertion that passes through it.
//!
//! The tree is rebuilt from scratch every step. It borrows the body slice it was
//! built from and refers to bodies by index, so it cannot outlive that slice.

use log::debug;

use crate::simulation::engine::MAX_DEPTH_LIMIT;
use crate::simulation::forces::pairwise_acceleration;
use crate::simulation::params::World;
use crate::simulation::states::{Body, NVec2};

/// Index of a body in the slice a [`QuadTree`] was built from
pub type BodyHandle = usize;

/// An axis-aligned rectangle in screen orientation (y grows downward).
///
/// Stored as `min` (top-left) and `max` (bottom-right) corners. Containment is
/// half-open on both axes: `x ∈ [min.x, max.x)`, `y ∈ [min.y, max.y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: NVec2,
    pub max: NVec2,
}

impl Rect {
    pub fn from_top_left(top_left: NVec2, width: f64, height: f64) -> Self {
        Self {
            min: top_left,
            max: top_left + NVec2::new(width, height),
        }
    }

    /// The world rectangle, with its top-left corner at the origin
    pub fn world(world: &World) -> Self {
        Self::from_top_left(NVec2::zeros(), world.width, world.height)
    }

    pub fn top_left(&self) -> NVec2 {
        self.min
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> NVec2 {
        (self.min + self.max) * 0.5
    }

    /// Half-open containment test, the same one used for every quadrant decision
    pub fn contains(&self, p: &NVec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Bounds of child quadrant `q`.
    ///
    /// Quadrant order (screen coordinates):
    /// ```text
    /// +-------+-------+
    /// |   1   |   0   |  (top-left, top-right)
    /// +-------+-------+
    /// |   2   |   3   |  (bottom-left, bottom-right)
    /// +-------+-------+
    /// ```
    ///
    /// Children share the parent's exact corners and midpoint, so the four
    /// half-open children partition the parent with no gaps or overlaps.
    pub fn quadrant(&self, q: usize) -> Rect {
        let mid = self.center();
        let (min_x, max_x) = match q {
            1 | 2 => (self.min.x, mid.x),
            _ => (mid.x, self.max.x),
        };
        let (min_y, max_y) = match q {
            0 | 1 => (self.min.y, mid.y),
            _ => (mid.y, self.max.y),
        };
        Rect {
            min: NVec2::new(min_x, min_y),
            max: NVec2::new(max_x, max_y),
        }
    }

    /// Quadrant index for `p` decided by the midpoint alone. Always returns a
    /// valid index; only used when no child's containment test matches.
    fn quadrant_index(&self, p: &NVec2) -> usize {
        let mid = self.center();
        match (p.x >= mid.x, p.y >= mid.y) {
            (true, false) => 0,
            (false, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    /// Pull `p` to the nearest point this rectangle contains.
    ///
    /// Coordinates at or past the exclusive upper edge land a small epsilon
    /// inside it. Non-finite coordinates collapse to the lower edge.
    pub fn clamp_inside(&self, p: &NVec2) -> NVec2 {
        NVec2::new(
            clamp_half_open(p.x, self.min.x, self.max.x),
            clamp_half_open(p.y, self.min.y, self.max.y),
        )
    }
}

fn clamp_half_open(value: f64, lower: f64, upper: f64) -> f64 {
    if value.is_nan() || value < lower {
        return lower;
    }
    if value < upper {
        return value;
    }
    let below = upper - (upper - lower) * 1e-9;
    if below < upper && below >= lower {
        below
    } else {
        lower
    }
}

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node currently represents.
///
/// The three states are exclusive, so a node can never hold an occupant and
/// children at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// No body in this region
    Empty,

    /// Leaf holding one body.
    ///
    /// `merged` is only non-empty at the maximum depth, where bodies that
    /// could not be separated are folded into the leaf instead of splitting it.
    External {
        occupant: BodyHandle,
        merged: Vec<BodyHandle>,
    },

    /// Region split into four quadrants, in [`Rect::quadrant`] order
    Internal { children: [NodeId; 4] },
}

/// A single quadtree node: fixed bounds plus the aggregate of its subtree.
#[derive(Debug, Clone)]
pub struct QuadNode {
    bounds: Rect,
    depth: u32,
    mass: f64,
    com: NVec2,
    kind: NodeKind,
}

impl QuadNode {
    fn empty(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            mass: 0.0,
            com: NVec2::zeros(),
            kind: NodeKind::Empty,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Distance from the root (the root is at depth 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Total mass of the subtree, zero for an empty node
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Center of mass of the subtree; meaningless for an empty node
    pub fn center_of_mass(&self) -> NVec2 {
        self.com
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Bodies held directly by this node (empty unless the node is external)
    pub fn occupants(&self) -> Vec<BodyHandle> {
        match &self.kind {
            NodeKind::External { occupant, merged } => {
                std::iter::once(*occupant).chain(merged.iter().copied()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A complete 2D Barnes–Hut quadtree built over one snapshot of the bodies.
///
/// This structure owns:
/// - the node arena (`nodes`), root at index 0,
/// - one placement point per body (`points`): the body's position, pulled
///   inside the world rectangle if it was outside.
///
/// It borrows the body slice for masses and radii.
pub struct QuadTree<'a> {
    nodes: Vec<QuadNode>,
    bodies: &'a [Body],
    points: Vec<NVec2>,
    root: NodeId,
    max_depth: u32,
}

impl<'a> QuadTree<'a> {
    /// Build a quadtree over `bodies` covering the `world` rectangle.
    ///
    /// This:
    /// 1. Creates an empty root covering the world.
    /// 2. Resolves a placement point for every body (positions outside the
    ///    world are pulled to the nearest in-bounds point).
    /// 3. Inserts the bodies one by one in slice order, splitting leaves as
    ///    needed and refreshing mass and COM on the way back up.
    ///
    /// # Parameters
    /// - `bodies`   : The bodies to index. Handles are indices into this slice.
    /// - `world`    : The fixed world rectangle, becomes the root's bounds.
    /// - `max_depth`: Deepest level a node may be split to. Bodies that still
    ///   share a leaf at this depth are merged into it. Values above
    ///   [`MAX_DEPTH_LIMIT`] are lowered to it.
    ///
    /// # Returns
    /// A tree where every body sits in exactly one external node and every
    /// node's mass and COM describe its subtree.
    pub fn build(bodies: &'a [Body], world: &World, max_depth: u32) -> Self {
        let bounds = Rect::world(world);
        let max_depth = max_depth.min(MAX_DEPTH_LIMIT);

        let points = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if bounds.contains(&b.x) {
                    b.x
                } else {
                    let placed = bounds.clamp_inside(&b.x);
                    debug!(
                        "body {i} at ({}, {}) lies outside the world, placed at ({}, {})",
                        b.x.x, b.x.y, placed.x, placed.y
                    );
                    placed
                }
            })
            .collect();

        let mut tree = QuadTree {
            nodes: Vec::with_capacity(bodies.len() * 2 + 1),
            bodies,
            points,
            root: NodeId::new(0),
            max_depth,
        };
        tree.nodes.push(QuadNode::empty(bounds, 0));

        for handle in 0..bodies.len() {
            tree.insert(tree.root, handle);
        }

        debug!(
            "quadtree built: {} bodies, {} nodes, depth {}",
            bodies.len(),
            tree.nodes.len(),
            tree.depth()
        );

        tree
    }

    /// Compute the net gravitational acceleration on a body using the tree.
    ///
    /// Traverses from the root:
    /// - empty nodes contribute nothing,
    /// - external nodes contribute the exact pairwise term for each body they
    ///   hold, except the query body itself,
    /// - internal nodes with `width / distance_to_com < theta` contribute a
    ///   single term from a radius-0 pseudo-body at their COM; otherwise all
    ///   four children are visited.
    ///
    /// # Parameters
    /// - `handle`: Index of the query body in the slice the tree was built
    ///   from, used to skip its own leaf.
    /// - `body`  : The query body's current state. Its position may differ
    ///   from the one the tree was built with.
    /// - `g`     : Gravitational constant.
    /// - `theta` : Opening-angle threshold. Smaller is more accurate and slower;
    ///   as it approaches 0 the result approaches the direct sum.
    pub fn acceleration_on(&self, handle: BodyHandle, body: &Body, g: f64, theta: f64) -> NVec2 {
        self.accumulate(self.root, handle, body, g, theta)
    }

    /// The root node, whose aggregate covers every body in the tree
    pub fn root(&self) -> &QuadNode {
        &self.nodes[self.root.index()]
    }

    pub fn node(&self, id: NodeId) -> Option<&QuadNode> {
        self.nodes.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level any node reached
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// All external nodes
    pub fn leaves(&self) -> impl Iterator<Item = &QuadNode> + '_ {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::External { .. }))
    }

    /// Where body `handle` was placed in the tree
    pub fn placement(&self, handle: BodyHandle) -> Option<NVec2> {
        self.points.get(handle).copied()
    }

    // helpers ==============================================================================

    /// Insert body `handle` into the subtree rooted at `node_id`.
    ///
    /// - Empty node: the body becomes its occupant.
    /// - External node below `max_depth`: split into four children, move the
    ///   current occupant down, then insert the new body below as well.
    /// - External node at `max_depth`: fold the body into the leaf.
    /// - Internal node: forward to the child quadrant containing the body.
    ///
    /// The node's mass and COM are refreshed once the insertion below it is done.
    fn insert(&mut self, node_id: NodeId, handle: BodyHandle) {
        let idx = node_id.index();
        let depth = self.nodes[idx].depth;

        match self.nodes[idx].kind {
            NodeKind::Empty => {
                self.nodes[idx].kind = NodeKind::External {
                    occupant: handle,
                    merged: Vec::new(),
                };
            }
            NodeKind::External { occupant, .. } if depth >= self.max_depth => {
                debug!("depth cap {depth} reached, merging body {handle} into leaf of body {occupant}");
                if let NodeKind::External { merged, .. } = &mut self.nodes[idx].kind {
                    merged.push(handle);
                }
            }
            NodeKind::External { occupant, .. } => {
                let bounds = self.nodes[idx].bounds;
                let children = self.subdivide(node_id);
                self.insert_into_child(children, bounds, occupant);
                self.insert_into_child(children, bounds, handle);
            }
            NodeKind::Internal { children } => {
                let bounds = self.nodes[idx].bounds;
                self.insert_into_child(children, bounds, handle);
            }
        }

        self.refresh_aggregate(node_id);
    }

    /// Turn node `node_id` into an internal node with four empty children.
    /// The node's occupant is dropped here; the caller re-inserts it.
    fn subdivide(&mut self, node_id: NodeId) -> [NodeId; 4] {
        let idx = node_id.index();
        let bounds = self.nodes[idx].bounds;
        let depth = self.nodes[idx].depth + 1;

        let children = std::array::from_fn(|q| {
            let id = NodeId::new(self.nodes.len());
            self.nodes.push(QuadNode::empty(bounds.quadrant(q), depth));
            id
        });

        self.nodes[idx].kind = NodeKind::Internal { children };
        children
    }

    /// Insert `handle` into the first child whose bounds contain its placement.
    ///
    /// Placements are already inside the world and children partition their
    /// parent exactly, so the midpoint decision is only a last resort.
    fn insert_into_child(&mut self, children: [NodeId; 4], bounds: Rect, handle: BodyHandle) {
        let point = self.points[handle];
        let child = children
            .iter()
            .copied()
            .find(|c| self.nodes[c.index()].bounds.contains(&point))
            .unwrap_or(children[bounds.quadrant_index(&point)]);

        self.insert(child, handle);
    }

    /// Recompute mass and COM of `node_id` from its occupants or its children.
    ///
    /// A plain leaf copies its occupant's mass and placement directly. A merged
    /// leaf and an internal node take the mass-weighted mean.
    fn refresh_aggregate(&mut self, node_id: NodeId) {
        let idx = node_id.index();

        let (mass, com) = match &self.nodes[idx].kind {
            NodeKind::Empty => (0.0, NVec2::zeros()),
            NodeKind::External { occupant, merged } if merged.is_empty() => {
                (self.bodies[*occupant].m, self.points[*occupant])
            }
            NodeKind::External { occupant, merged } => weighted_mean(
                std::iter::once(*occupant)
                    .chain(merged.iter().copied())
                    .map(|h| (self.bodies[h].m, self.points[h])),
            ),
            NodeKind::Internal { children } => weighted_mean(
                children
                    .iter()
                    .map(|c| &self.nodes[c.index()])
                    .filter(|n| n.mass > 0.0)
                    .map(|n| (n.mass, n.com)),
            ),
        };

        let node = &mut self.nodes[idx];
        node.mass = mass;
        node.com = com;
    }

    /// Recursive helper for [`QuadTree::acceleration_on`]
    fn accumulate(&self, node_id: NodeId, handle: BodyHandle, body: &Body, g: f64, theta: f64) -> NVec2 {
        let node = &self.nodes[node_id.index()];

        match &node.kind {
            NodeKind::Empty => NVec2::zeros(),

            NodeKind::External { occupant, merged } => std::iter::once(occupant)
                .chain(merged.iter())
                .filter(|&&other| other != handle)
                .fold(NVec2::zeros(), |acc, &other| {
                    let source = &self.bodies[other];
                    acc + pairwise_acceleration(body, self.points[other], source.m, source.radius, g)
                }),

            NodeKind::Internal { children } => {
                let distance = (node.com - body.x).norm();
                let ratio = node.bounds.width() / distance;

                if ratio < theta {
                    // Far enough away: the whole subtree acts as one point mass
                    match self.aggregate_without(node, handle) {
                        Some((mass, com)) => pairwise_acceleration(body, com, mass, 0.0, g),
                        None => NVec2::zeros(),
                    }
                } else {
                    children
                        .iter()
                        .fold(NVec2::zeros(), |acc, &child| {
                            acc + self.accumulate(child, handle, body, g, theta)
                        })
                }
            }
        }
    }

    /// Mass and COM of `node` with the query body taken out when its placement
    /// lies inside the node. `None` when nothing else is left.
    ///
    /// The query position may have drifted away from the placement the tree
    /// was built with, so an accepted node can still hold the body's own mass.
    fn aggregate_without(&self, node: &QuadNode, handle: BodyHandle) -> Option<(f64, NVec2)> {
        let own = self
            .points
            .get(handle)
            .filter(|p| node.bounds.contains(p))
            .map(|p| (self.bodies[handle].m, *p));

        let Some((m, p)) = own else {
            return Some((node.mass, node.com));
        };

        let rest = node.mass - m;
        if rest <= node.mass * 1e-12 {
            return None;
        }
        Some((rest, (node.com * node.mass - p * m) / rest))
    }
}

/// Total mass and mass-weighted mean position of `(mass, position)` pairs
fn weighted_mean(items: impl Iterator<Item = (f64, NVec2)>) -> (f64, NVec2) {
    let (mass, weighted) = items.fold((0.0, NVec2::zeros()), |(m, w), (mi, pi)| (m + mi, w + pi * mi));
    if mass > 0.0 {
        (mass, weighted / mass)
    } else {
        (0.0, NVec2::zeros())
    }
}
