use crate::{
    graph::SpatialGraph,
    types::{Generation, NodeId},
};
use glam::Vec3;
use serde::Serialize;

/// A claimed node as handed to the meshing stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StemNode {
    pub id: NodeId,
    pub position: Vec3,
    pub parent: Option<NodeId>,
    pub generation: Generation,
    pub guide: Vec3,
}

/// One skeleton edge, from a claimed node to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StemSegment {
    pub child: NodeId,
    pub parent: NodeId,
    /// Generation of the child end; thicker branches have lower numbers.
    pub generation: Generation,
    pub from: Vec3,
    pub to: Vec3,
}

/// The grown tree: every claimed node and every node-to-parent edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Skeleton {
    pub root: Option<NodeId>,
    pub nodes: Vec<StemNode>,
    pub segments: Vec<StemSegment>,
}

impl Skeleton {
    /// Extracts the skeleton from a grown graph.
    ///
    /// An edge exists between a node and its parent exactly when the node
    /// carries a stem tag.
    pub fn from_graph(graph: &SpatialGraph) -> Self {
        let mut nodes = Vec::new();
        let mut segments = Vec::new();

        for n in graph.stem_nodes() {
            let Some(generation) = n.stem_tag else {
                continue;
            };
            let position = graph.position(n.id);
            nodes.push(StemNode {
                id: n.id,
                position,
                parent: n.parent,
                generation,
                guide: n.guide,
            });
            if let Some(parent) = n.parent {
                segments.push(StemSegment {
                    child: n.id,
                    parent,
                    generation,
                    from: position,
                    to: graph.position(parent),
                });
            }
        }

        let root = graph.nodes[graph.root()]
            .is_stem()
            .then_some(graph.root());

        Self {
            root,
            nodes,
            segments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest generation present, i.e. the number of iterations that claimed
    /// anything.
    pub fn generations(&self) -> Generation {
        self.nodes.iter().map(|n| n.generation).max().unwrap_or(0)
    }

    pub fn segments_of(&self, generation: Generation) -> impl Iterator<Item = &StemSegment> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.generation == generation)
    }

    /// Claimed nodes that no other claimed node uses as a parent.
    pub fn tip_ids(&self) -> Vec<NodeId> {
        let mut is_parent = std::collections::HashSet::new();
        for s in &self.segments {
            is_parent.insert(s.parent);
        }
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !is_parent.contains(id))
            .collect()
    }
}
