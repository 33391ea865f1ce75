//! Direction-biased shortest paths from the seed set.
//!
//! The pass is a Dijkstra relaxation whose edge cost depends on the guiding
//! vector of the node being left:
//!
//! ```text
//! cost(u -> v) = |v - u| * (1 - dot(guide(u), normalize(v - u)))
//! ```
//!
//! Moving along the guide is free, moving sideways costs the edge length and
//! doubling back costs twice that. Because the cost reads `guide(u)`, each
//! node's guide is fixed the moment it leaves the queue, before its edges
//! are relaxed.

use crate::{
    config::Twist,
    error::QueueError,
    graph::SpatialGraph,
    queue::MinQueue,
    types::{NodeId, UP},
};
use glam::{Quat, Vec3};
use std::time::Instant;

/// Cost of extending a path from `from` (with guiding vector `guide`) to `to`.
///
/// Never negative; rounding in the dot product is clamped away so that a
/// zero-distance seed can never be "improved".
pub fn edge_cost(from: Vec3, guide: Vec3, to: Vec3) -> f32 {
    let along = to - from;
    let len = along.length();
    if len == 0.0 {
        return 0.0;
    }
    (len * (1.0 - guide.dot(along / len))).max(0.0)
}

/// Summary of one path pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathStats {
    /// Nodes with a finite distance after the pass.
    pub reached: usize,
    /// Successful relaxations.
    pub relaxations: usize,
}

/// Computes guided shortest paths over the whole graph.
///
/// Expects the graph to have been seeded with
/// [`SpatialGraph::reset_for_iteration`]. On return every reachable node has
/// a finite `distance`, `hops`, a `parent` (unless it is a seed) and a fixed
/// `guide`. Unreachable nodes keep an infinite distance and no parent.
pub fn compute_paths(graph: &mut SpatialGraph, twist: &Twist) -> Result<PathStats, QueueError> {
    let start = Instant::now();
    let mut queue = MinQueue::with_capacity(graph.len());
    for node in &graph.nodes {
        queue.enqueue(node.id, node.distance)?;
    }

    let mut stats = PathStats::default();
    while !queue.is_empty() {
        let (id, _) = queue.dequeue_min()?;
        finalize(graph, id, twist);

        let node = &graph.nodes[id];
        if !node.is_reached() {
            // Everything still queued is unreachable too.
            continue;
        }
        let from = graph.position(id);
        let guide = node.guide;
        let base = node.distance;
        let hops = node.hops.map_or(0, |h| h + 1);

        for slot in 0..node.outgoing.len() {
            let Some(next) = graph.nodes[id].outgoing[slot] else {
                continue;
            };
            if !queue.contains(next) {
                continue;
            }
            let candidate = base + edge_cost(from, guide, graph.position(next));
            let target = &mut graph.nodes[next];
            if candidate < target.distance {
                target.distance = candidate;
                target.hops = Some(hops);
                target.parent = Some(id);
                queue.decrease_key(next, candidate)?;
                stats.relaxations += 1;
            }
        }
    }

    stats.reached = graph.nodes.iter().filter(|n| n.is_reached()).count();
    tracing::debug!(
        reached = stats.reached,
        relaxations = stats.relaxations,
        elapsed_us = start.elapsed().as_micros() as u64,
        "guided shortest paths computed"
    );
    Ok(stats)
}

/// Fixes the guiding vector of a node that has just left the queue.
///
/// Parentless nodes (the root, and anything unreachable) point up. Claimed
/// seeds keep the guide they were grown with. Every other node rotates its
/// parent's guide around `up x parent_guide` by the twist angle for its hop
/// count.
fn finalize(graph: &mut SpatialGraph, id: NodeId, twist: &Twist) {
    let node = &graph.nodes[id];
    let guide = match node.parent {
        None => UP,
        Some(_) if node.is_stem() => node.guide,
        Some(parent) => {
            let parent_guide = graph.nodes[parent].guide;
            let angle = twist.angle_for(node.hops.unwrap_or(0));
            rotate_guide(parent_guide, angle)
        }
    };
    graph.nodes[id].guide = guide;
}

/// Rotates `guide` by `angle` radians around `up x guide`.
///
/// A guide parallel to up has no defined axis and is returned unchanged.
fn rotate_guide(guide: Vec3, angle: f32) -> Vec3 {
    let axis = UP.cross(guide).normalize_or_zero();
    if axis == Vec3::ZERO {
        return guide;
    }
    (Quat::from_axis_angle(axis, angle) * guide).normalize_or_zero()
}
