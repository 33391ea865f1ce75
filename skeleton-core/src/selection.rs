//! Endpoint selection and stem tagging.
//!
//! After a path pass, every node matching the iteration's placement rule is a
//! candidate branch tip. A fixed number of tips is drawn uniformly without
//! replacement, and each tip's path back towards the seed set is claimed for
//! the current iteration.

use crate::{
    config::{IterationConfig, PlacementRule},
    error::SelectionError,
    graph::SpatialGraph,
    types::{Generation, NodeId},
};
use rand::Rng;

/// Nodes satisfying `rule`, in id order.
///
/// Only nodes reached by the last path pass are eligible.
pub fn collect_candidates(graph: &SpatialGraph, rule: &PlacementRule) -> Vec<NodeId> {
    graph
        .nodes
        .iter()
        .filter(|n| n.is_reached())
        .filter(|n| match rule {
            PlacementRule::Hops { target } => n.hops == Some(*target),
            PlacementRule::Volume { region } => region.contains(graph.position(n.id)),
        })
        .map(|n| n.id)
        .collect()
}

/// Outcome of one endpoint selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub candidates: usize,
    /// Chosen tips, in draw order.
    pub tips: Vec<NodeId>,
    /// Nodes newly tagged by this selection.
    pub claimed: usize,
}

/// Picks `cfg.n_branches` tips and tags their paths with `iteration`.
///
/// Fails without touching any tag when there are fewer candidates than
/// requested branches.
pub fn select_endpoints(
    graph: &mut SpatialGraph,
    iteration: Generation,
    cfg: &IterationConfig,
    rng: &mut impl Rng,
) -> Result<Selection, SelectionError> {
    let candidates = collect_candidates(graph, &cfg.placement);
    if candidates.len() < cfg.n_branches {
        return Err(SelectionError::NotEnoughCandidates {
            iteration,
            requested: cfg.n_branches,
            available: candidates.len(),
        });
    }

    let tips: Vec<NodeId> = rand::seq::index::sample(rng, candidates.len(), cfg.n_branches)
        .into_iter()
        .map(|i| candidates[i])
        .collect();

    let claimed = tips
        .iter()
        .map(|&tip| mark_stem(graph, tip, iteration))
        .sum();

    Ok(Selection {
        candidates: candidates.len(),
        tips,
        claimed,
    })
}

/// Tags `tip` and its ancestors with `iteration`, stopping at the first node
/// that is already tagged. Returns the number of nodes tagged.
pub fn mark_stem(graph: &mut SpatialGraph, tip: NodeId, iteration: Generation) -> usize {
    let mut tagged = 0;
    let mut current = Some(tip);
    while let Some(id) = current {
        let node = &mut graph.nodes[id];
        if node.stem_tag.is_some() {
            break;
        }
        node.stem_tag = Some(iteration);
        tagged += 1;
        current = node.parent;
    }
    tracing::trace!(tip, iteration, tagged, "marked stem path");
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Connectivity, Twist},
        paths::compute_paths,
        region::Region,
        sampling::SampleGrid,
    };
    use glam::{IVec3, UVec3, Vec3};
    use rand::{SeedableRng, rngs::StdRng};

    fn grown_cube(n: u32) -> SpatialGraph {
        let grid = SampleGrid::lattice(UVec3::splat(n), 1.0, Vec3::ZERO).unwrap();
        let mut g = SpatialGraph::build(grid, Connectivity::Six).unwrap();
        g.reset_for_iteration();
        compute_paths(&mut g, &Twist::default()).unwrap();
        g
    }

    #[test]
    fn hops_rule_collects_exact_hop_count() {
        let g = grown_cube(3);
        let c = collect_candidates(&g, &PlacementRule::Hops { target: 1 });

        // The root's five face neighbors inside the cube.
        assert_eq!(c.len(), 5);
        assert!(c.iter().all(|&id| g.nodes[id].hops == Some(1)));
    }

    #[test]
    fn volume_rule_uses_region_containment() {
        let g = grown_cube(3);
        let top_layer = Region::aabb(Vec3::new(-0.5, 1.5, -0.5), Vec3::new(2.5, 2.5, 2.5));
        let c = collect_candidates(&g, &PlacementRule::Volume { region: top_layer });

        assert_eq!(c.len(), 9);
        assert!(c.iter().all(|&id| g.position(id).y == 2.0));
    }

    #[test]
    fn mark_stem_tags_up_to_the_first_tagged_ancestor() {
        let mut g = grown_cube(3);
        let tip = g.samples().occupied(IVec3::new(1, 2, 1)).unwrap();
        let mid = g.samples().occupied(IVec3::new(1, 1, 1)).unwrap();
        let root = g.root();

        g.nodes[mid].stem_tag = Some(1);
        let tagged = mark_stem(&mut g, tip, 2);

        assert_eq!(tagged, 1);
        assert_eq!(g.nodes[tip].stem_tag, Some(2));
        assert_eq!(g.nodes[mid].stem_tag, Some(1));
        // The walk stopped at `mid`, so the root is untouched.
        assert_eq!(g.nodes[root].stem_tag, None);
    }

    #[test]
    fn mark_stem_never_overwrites_a_tagged_tip() {
        let mut g = grown_cube(3);
        let tip = g.samples().occupied(IVec3::new(1, 1, 1)).unwrap();
        g.nodes[tip].stem_tag = Some(1);

        assert_eq!(mark_stem(&mut g, tip, 2), 0);
        assert_eq!(g.nodes[tip].stem_tag, Some(1));
    }

    #[test]
    fn selection_tags_whole_path_to_root() {
        let mut g = grown_cube(3);
        let mut rng = StdRng::seed_from_u64(3);
        let sel = select_endpoints(&mut g, 1, &IterationConfig::hops(2, 2), &mut rng).unwrap();

        assert_eq!(sel.tips.len(), 2);
        assert_ne!(sel.tips[0], sel.tips[1]);
        for &tip in &sel.tips {
            for id in g.path_to_seed(tip) {
                assert_eq!(g.nodes[id].stem_tag, Some(1));
            }
        }
        let tagged = g.stem_nodes().count();
        assert_eq!(tagged, sel.claimed);
    }

    #[test]
    fn not_enough_candidates_fails_without_tagging() {
        let mut g = grown_cube(3);
        let mut rng = StdRng::seed_from_u64(0);
        let available = collect_candidates(&g, &PlacementRule::Hops { target: 2 }).len();

        let err = select_endpoints(
            &mut g,
            1,
            &IterationConfig::hops(2, available + 1),
            &mut rng,
        )
        .unwrap_err();

        assert_eq!(
            err,
            SelectionError::NotEnoughCandidates {
                iteration: 1,
                requested: available + 1,
                available,
            }
        );
        assert_eq!(g.stem_nodes().count(), 0);
    }

    #[test]
    fn same_seed_selects_same_tips() {
        let cfg = IterationConfig::hops(3, 4);

        let mut a = grown_cube(5);
        let sa = select_endpoints(&mut a, 1, &cfg, &mut StdRng::seed_from_u64(11)).unwrap();
        let mut b = grown_cube(5);
        let sb = select_endpoints(&mut b, 1, &cfg, &mut StdRng::seed_from_u64(11)).unwrap();

        assert_eq!(sa, sb);
    }
}
