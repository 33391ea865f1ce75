use crate::{
    config::Connectivity,
    error::GraphError,
    sampling::SampleGrid,
    types::{Generation, NodeId, UP},
};
use glam::{IVec3, UVec3, Vec3};

/// Per-sample growth state.
///
/// `outgoing` is fixed at construction; every other field is reset and
/// rewritten by each growth iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub distance: f32,
    /// `None` while the node has not been reached from the seed set.
    pub hops: Option<u32>,
    pub guide: Vec3,
    /// One slot per direction of the active connectivity.
    pub outgoing: Box<[Option<NodeId>]>,
    /// Iteration that first claimed this node, if any. Never overwritten.
    pub stem_tag: Option<Generation>,
}

impl GrowthNode {
    fn new(id: NodeId, slots: usize) -> Self {
        Self {
            id,
            parent: None,
            distance: f32::INFINITY,
            hops: None,
            guide: Vec3::ZERO,
            outgoing: vec![None; slots].into_boxed_slice(),
            stem_tag: None,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.distance.is_finite()
    }

    pub fn is_stem(&self) -> bool {
        self.stem_tag.is_some()
    }

    /// Existing neighbors, in slot order.
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.iter().filter_map(|&n| n)
    }

    fn seed(&mut self) {
        self.distance = 0.0;
        self.hops = Some(0);
    }

    fn unreach(&mut self) {
        self.parent = None;
        self.distance = f32::INFINITY;
        self.hops = None;
        self.guide = Vec3::ZERO;
    }
}

/// Immutable adjacency over a fixed sample set, plus the mutable growth state
/// of every node.
///
/// Nodes live in an arena indexed by [`NodeId`]; parents and neighbors are
/// plain indices into it.
#[derive(Clone, Debug)]
pub struct SpatialGraph {
    pub nodes: Vec<GrowthNode>,
    samples: SampleGrid,
    root: NodeId,
    connectivity: Connectivity,
}

impl SpatialGraph {
    /// Builds one node per occupied cell of `samples`.
    ///
    /// For every occupied cell all 26 neighbor offsets are examined and the
    /// ones in the active direction set become edges when the neighboring
    /// cell is in range and occupied. Missing neighbors leave their slot
    /// empty.
    ///
    /// The root is the sample in the horizontally centered cell of the lowest
    /// layer. If that cell is empty construction fails rather than picking
    /// some other cell.
    pub fn build(samples: SampleGrid, connectivity: Connectivity) -> Result<Self, GraphError> {
        if samples.is_empty() {
            return Err(GraphError::NoSamples);
        }

        let dims = samples.dims();
        let slots = connectivity.slot_count();
        let mut nodes: Vec<GrowthNode> = (0..samples.len())
            .map(|id| GrowthNode::new(id, slots))
            .collect();

        for node in &mut nodes {
            let cell = samples.cell_of(node.id).as_ivec3();
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let offset = IVec3::new(dx, dy, dz);
                        if offset == IVec3::ZERO {
                            continue;
                        }
                        let Some(slot) = connectivity.slot_of(offset) else {
                            continue;
                        };
                        node.outgoing[slot] = samples.occupied(cell + offset);
                    }
                }
            }
        }

        let root_cell = UVec3::new(dims.x / 2, 0, dims.z / 2);
        let root = samples
            .occupied(root_cell.as_ivec3())
            .ok_or(GraphError::RootCellEmpty(root_cell))?;

        tracing::debug!(
            nodes = nodes.len(),
            root,
            slots,
            "built spatial graph"
        );

        Ok(Self {
            nodes,
            samples,
            root,
            connectivity,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn samples(&self) -> &SampleGrid {
        &self.samples
    }

    pub fn position(&self, id: NodeId) -> Vec3 {
        self.samples.position(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves the root sample to an exact stem position.
    pub fn anchor_root(&mut self, pos: Vec3) {
        self.samples.set_position(self.root, pos);
    }

    /// Prepares node state for the next path pass and returns the seed count.
    ///
    /// Claimed nodes become seeds: distance and hops drop to zero while their
    /// parent and guiding vector are kept. Everything else is returned to the
    /// unreached state. The root is always seeded, pointing up.
    pub fn reset_for_iteration(&mut self) -> usize {
        let mut seeds = 0;
        for node in &mut self.nodes {
            if node.is_stem() {
                node.seed();
                seeds += 1;
            } else {
                node.unreach();
            }
        }

        let root = &mut self.nodes[self.root];
        if !root.is_stem() {
            seeds += 1;
        }
        root.seed();
        root.parent = None;
        root.guide = UP;
        seeds
    }

    /// Walks from `id` towards the seed set via parent links, `id` first.
    pub fn path_to_seed(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&n| self.nodes[n].parent)
    }

    /// Nodes claimed by any iteration so far.
    pub fn stem_nodes(&self) -> impl Iterator<Item = &GrowthNode> + '_ {
        self.nodes.iter().filter(|n| n.is_stem())
    }
}
