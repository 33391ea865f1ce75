//! Error types for skeleton growth.

use crate::types::{Generation, NodeId};
use glam::UVec3;
use thiserror::Error;

/// Invalid run or iteration configuration. Always raised before any graph
/// work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unsupported connectivity: {0} neighbors (expected 6 or 14)")]
    UnsupportedConnectivity(u32),

    #[error("at least one growth iteration is required")]
    NoIterations,

    #[error("iteration {iteration}: branch count must be at least 1")]
    ZeroBranches { iteration: Generation },

    #[error("iteration {iteration}: twist angles must be finite")]
    NonFiniteTwist { iteration: Generation },

    #[error("iteration {iteration}: degenerate placement region ({reason})")]
    DegenerateRegion {
        iteration: Generation,
        reason: &'static str,
    },

    #[error("stem anchor must be finite")]
    NonFiniteAnchor,

    #[error("grid dimensions must be non-zero, got {0}")]
    EmptyDimensions(UVec3),

    #[error("cell size must be positive and finite, got {0}")]
    BadCellSize(f32),

    #[error("sampler extents must be positive and finite")]
    BadExtents,

    #[error("sample count must be at least 1")]
    NoSamples,

    #[error("minimum distance fraction must lie in [0, 1], got {0}")]
    BadMinDistance(f32),
}

/// Failures while building or indexing a [`crate::graph::SpatialGraph`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("sample grid has no occupied cells")]
    NoSamples,

    #[error("root cell {0} is not occupied")]
    RootCellEmpty(UVec3),

    #[error("cell {cell} lies outside grid of size {dims}")]
    CellOutOfBounds { cell: UVec3, dims: UVec3 },

    #[error("cell {0} is already occupied")]
    CellOccupied(UVec3),
}

/// Misuse of the [`crate::queue::MinQueue`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,

    #[error("node {0} is not in the queue")]
    NotQueued(NodeId),

    #[error("node {0} is already in the queue")]
    AlreadyQueued(NodeId),

    #[error("node {node}: key may only decrease ({old} -> {new})")]
    KeyIncreased { node: NodeId, old: f32, new: f32 },
}

/// Endpoint selection could not be satisfied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error(
        "iteration {iteration}: not enough candidates ({available} available, {requested} requested)"
    )]
    NotEnoughCandidates {
        iteration: Generation,
        requested: usize,
        available: usize,
    },
}

/// Any failure surfaced by [`crate::growth::GrowthController`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("all {0} iterations have already run")]
    Finished(usize),
}
