use glam::Vec3;

/// Identifier for a sample produced by the sampler.
///
/// This is an index into `SampleGrid::samples`, and is stable for the
/// lifetime of a given `SampleGrid` instance.
pub type SampleId = usize;

/// Identifier for a node in a [`crate::graph::SpatialGraph`].
///
/// Every occupied grid cell becomes exactly one node and the node id is the
/// id of the sample in that cell, so `NodeId` and [`SampleId`] index the same
/// arrays.
pub type NodeId = usize;

/// 1-based number of the growth iteration that first claimed a node.
pub type Generation = u32;

/// Fixed world-up direction. Seed roots always point this way.
pub const UP: Vec3 = Vec3::Y;
