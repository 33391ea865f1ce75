//! Multi-iteration growth driver.
//!
//! Each iteration is a full batch pass over the graph:
//! 1. seed: claimed nodes (and the root) get distance zero, everything else
//!    is reset via [`SpatialGraph::reset_for_iteration`].
//! 2. paths: [`compute_paths`] grows guided shortest paths from the seeds.
//! 3. endpoints: [`select_endpoints`] claims the paths to the new tips.
//!
//! Tags written in iteration `i` become seeds of iteration `i + 1`.

use crate::{
    config::GrowthConfig,
    error::GrowthError,
    graph::SpatialGraph,
    paths::{PathStats, compute_paths},
    sampling::SampleGrid,
    selection::select_endpoints,
    types::{Generation, NodeId},
};
use rand::Rng;

/// Where the controller is in its iteration cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthState {
    /// Nothing has run yet.
    Idle,
    /// Iteration `n` has reset node state and seeded the graph.
    Seeded(Generation),
    /// Iteration `n` has finished its path pass.
    PathsComputed(Generation),
    /// Iteration `n` has claimed its endpoints.
    EndpointsSelected(Generation),
    /// All configured iterations have completed.
    Done,
}

/// What a single iteration did.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationReport {
    pub iteration: Generation,
    pub seeds: usize,
    pub paths: PathStats,
    pub candidates: usize,
    pub tips: Vec<NodeId>,
    /// Nodes newly claimed in this iteration.
    pub claimed: usize,
}

/// Runs the configured growth iterations over one spatial graph.
#[derive(Debug)]
pub struct GrowthController {
    graph: SpatialGraph,
    cfg: GrowthConfig,
    state: GrowthState,
    completed: usize,
}

impl GrowthController {
    /// Validates `cfg` and takes ownership of an already-built graph.
    pub fn new(mut graph: SpatialGraph, cfg: GrowthConfig) -> Result<Self, GrowthError> {
        cfg.validate()?;
        if let Some(anchor) = cfg.stem_anchor {
            graph.anchor_root(anchor);
        }
        Ok(Self {
            graph,
            cfg,
            state: GrowthState::Idle,
            completed: 0,
        })
    }

    /// Validates `cfg`, then builds the graph from `samples` with the
    /// configured connectivity.
    pub fn from_samples(samples: SampleGrid, cfg: GrowthConfig) -> Result<Self, GrowthError> {
        cfg.validate()?;
        let graph = SpatialGraph::build(samples, cfg.connectivity)?;
        Self::new(graph, cfg)
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    pub fn graph(&self) -> &SpatialGraph {
        &self.graph
    }

    pub fn into_graph(self) -> SpatialGraph {
        self.graph
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.cfg
    }

    /// Number of iterations that have fully completed.
    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.cfg.iterations.len()
    }

    /// Runs the next iteration to completion.
    ///
    /// A failed iteration leaves the controller in the state it reached;
    /// the run is not retried.
    pub fn step(&mut self, rng: &mut impl Rng) -> Result<IterationReport, GrowthError> {
        if self.is_done() {
            return Err(GrowthError::Finished(self.cfg.iterations.len()));
        }
        let iteration = self.completed as Generation + 1;
        let it_cfg = self.cfg.iterations[self.completed];
        let span = tracing::info_span!("iteration", n = iteration);
        let _guard = span.enter();

        let seeds = self.graph.reset_for_iteration();
        self.state = GrowthState::Seeded(iteration);

        let paths = compute_paths(&mut self.graph, &it_cfg.twist)?;
        self.state = GrowthState::PathsComputed(iteration);

        let selection = select_endpoints(&mut self.graph, iteration, &it_cfg, rng)?;
        self.state = GrowthState::EndpointsSelected(iteration);

        self.completed += 1;
        if self.is_done() {
            self.state = GrowthState::Done;
        }

        tracing::info!(
            seeds,
            reached = paths.reached,
            candidates = selection.candidates,
            tips = selection.tips.len(),
            claimed = selection.claimed,
            "growth iteration finished"
        );

        Ok(IterationReport {
            iteration,
            seeds,
            paths,
            candidates: selection.candidates,
            tips: selection.tips,
            claimed: selection.claimed,
        })
    }

    /// Runs every remaining iteration.
    pub fn run(&mut self, rng: &mut impl Rng) -> Result<Vec<IterationReport>, GrowthError> {
        let mut reports = Vec::with_capacity(self.cfg.iterations.len() - self.completed);
        while !self.is_done() {
            reports.push(self.step(rng)?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Connectivity, IterationConfig},
        error::{ConfigError, SelectionError},
    };
    use glam::{UVec3, Vec3};
    use rand::{SeedableRng, rngs::StdRng};

    fn cube_samples(n: u32) -> SampleGrid {
        SampleGrid::lattice(UVec3::splat(n), 1.0, Vec3::ZERO).unwrap()
    }

    fn config(iterations: Vec<IterationConfig>) -> GrowthConfig {
        GrowthConfig {
            connectivity: Connectivity::Six,
            stem_anchor: None,
            iterations,
        }
    }

    #[test]
    fn state_machine_walks_through_every_iteration() {
        let cfg = config(vec![IterationConfig::hops(2, 1), IterationConfig::hops(1, 1)]);
        let mut ctl = GrowthController::from_samples(cube_samples(3), cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(ctl.state(), GrowthState::Idle);

        let r1 = ctl.step(&mut rng).unwrap();
        assert_eq!(r1.iteration, 1);
        assert_eq!(ctl.state(), GrowthState::EndpointsSelected(1));
        assert!(!ctl.is_done());

        let r2 = ctl.step(&mut rng).unwrap();
        assert_eq!(r2.iteration, 2);
        assert_eq!(ctl.state(), GrowthState::Done);
        assert!(ctl.is_done());

        assert_eq!(ctl.step(&mut rng), Err(GrowthError::Finished(2)));
    }

    #[test]
    fn first_iteration_seeds_only_the_root() {
        let cfg = config(vec![IterationConfig::hops(2, 1), IterationConfig::hops(1, 1)]);
        let mut ctl = GrowthController::from_samples(cube_samples(3), cfg).unwrap();
        let reports = ctl.run(&mut StdRng::seed_from_u64(9)).unwrap();

        assert_eq!(reports[0].seeds, 1);
        // Root plus the two path nodes claimed in iteration 1.
        assert_eq!(reports[1].seeds, 3);
    }

    #[test]
    fn invalid_config_fails_before_graph_work() {
        // An empty grid would fail graph construction, but config comes first.
        let empty = SampleGrid::new(UVec3::splat(3), 1.0).unwrap();
        let err = GrowthController::from_samples(empty, config(Vec::new())).unwrap_err();
        assert_eq!(err, GrowthError::Config(ConfigError::NoIterations));
    }

    #[test]
    fn insufficient_candidates_stop_the_run() {
        // Hop 9 doesn't exist on a 3x3x3 cube.
        let cfg = config(vec![IterationConfig::hops(2, 1), IterationConfig::hops(9, 1)]);
        let mut ctl = GrowthController::from_samples(cube_samples(3), cfg).unwrap();
        let err = ctl.run(&mut StdRng::seed_from_u64(2)).unwrap_err();

        assert!(matches!(
            err,
            GrowthError::Selection(SelectionError::NotEnoughCandidates {
                iteration: 2,
                available: 0,
                ..
            })
        ));
        assert_eq!(ctl.completed(), 1);
        assert_eq!(ctl.state(), GrowthState::PathsComputed(2));
    }

    #[test]
    fn stem_anchor_moves_the_root_before_growth() {
        let mut cfg = config(vec![IterationConfig::hops(1, 1)]);
        cfg.stem_anchor = Some(Vec3::new(1.0, -0.25, 1.0));
        let ctl = GrowthController::from_samples(cube_samples(3), cfg).unwrap();

        let root = ctl.graph().root();
        assert_eq!(ctl.graph().position(root), Vec3::new(1.0, -0.25, 1.0));
    }
}
