//! Headless driver that owns the growth state for one run.
//!
//! This module defines [`Runner`], which owns the sample grid, the growth
//! controller and the random source, and exposes the whole run as a single
//! call that yields a [`Skeleton`].

use crate::run_config::RunConfig;
use rand::{SeedableRng, rngs::StdRng};
use skeleton_core::{
    GrowthController, GrowthError, IterationReport, SampleGrid, Skeleton,
    error::ConfigError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("growth: {0}")]
    Growth(#[from] GrowthError),
}

/// Main state for one headless run.
///
/// [`Runner`] glues together:
/// - The sampler output: a jittered [`SampleGrid`].
/// - The simulation core: a [`GrowthController`] over the grid.
/// - A seeded [`StdRng`] shared by the sampler and endpoint selection.
///
/// ### Fields
/// - `ctl` - Growth controller owning the spatial graph.
/// - `rng` - Random number generator, already advanced past the sampler.
/// - `reports` - Per-iteration reports collected so far.
pub struct Runner {
    ctl: GrowthController,
    rng: StdRng,
    reports: Vec<IterationReport>,
}

impl Runner {
    /// Samples the volume and prepares the controller.
    ///
    /// The growth configuration is validated before sampling, so a bad
    /// iteration list fails before any point is generated.
    ///
    /// ### Parameters
    /// - `cfg` - The run configuration; its `seed` fixes every random choice.
    ///
    /// ### Returns
    /// A [`Runner`] in the idle state, or the first configuration error.
    pub fn new(cfg: &RunConfig) -> Result<Self, RunError> {
        cfg.growth.validate()?;
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let samples = SampleGrid::jittered(&cfg.sampler, &mut rng)?;

        let mut growth = cfg.growth.clone();
        // The root sample sits on the stem top unless told otherwise.
        growth.stem_anchor = growth.stem_anchor.or(Some(cfg.sampler.anchor));

        let ctl = GrowthController::from_samples(samples, growth)?;
        Ok(Self {
            ctl,
            rng,
            reports: Vec::new(),
        })
    }

    /// Runs every remaining iteration and returns the grown skeleton.
    pub fn run(&mut self) -> Result<Skeleton, RunError> {
        while !self.ctl.is_done() {
            let report = self.ctl.step(&mut self.rng)?;
            self.reports.push(report);
        }
        Ok(Skeleton::from_graph(self.ctl.graph()))
    }

    pub fn reports(&self) -> &[IterationReport] {
        &self.reports
    }

    pub fn controller(&self) -> &GrowthController {
        &self.ctl
    }
}
