//! Core 3-D tree skeleton growth library.
//!
//! Main components:
//! - [`sampling`] - the sample grid consumed by the graph, and a jittered sampler.
//! - [`graph`] - per-sample growth nodes and the immutable neighbor graph.
//! - [`queue`] - min-priority queue with key decrease.
//! - [`paths`] - direction-biased shortest paths and guiding vectors.
//! - [`selection`] - endpoint selection and stem tagging.
//! - [`growth`] - the multi-iteration growth controller.
//! - [`skeleton`] - the grown tree as handed to meshing.
//! - [`region`] - placement volumes.
//! - [`config`] - connectivity, twist and per-iteration configuration.
//! - [`error`] - error types.
//! - [`types`] - shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod graph;
pub mod growth;
pub mod paths;
pub mod queue;
pub mod region;
pub mod sampling;
pub mod selection;
pub mod skeleton;
pub mod types;

pub use config::{Connectivity, GrowthConfig, IterationConfig, PlacementRule, Twist};
pub use error::GrowthError;
pub use graph::{GrowthNode, SpatialGraph};
pub use growth::{GrowthController, GrowthState, IterationReport};
pub use region::Region;
pub use sampling::{JitterParams, SampleGrid};
pub use skeleton::{Skeleton, StemSegment};
