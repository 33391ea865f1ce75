//! Sample grid consumed by graph construction, plus a jittered grid sampler.
//!
//! A [`SampleGrid`] is a 3-D array of cells, each either empty or holding
//! one sample. Sample ids are handed out in insertion order and never
//! change, so they can double as node ids.

use crate::{
    error::{ConfigError, GraphError},
    types::SampleId,
};
use glam::{IVec3, UVec3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    dims: UVec3,
    cell_size: f32,
    /// Cell contents in x-major, then y, then z order.
    cells: Vec<Option<SampleId>>,
    samples: Vec<Vec3>,
    /// Cell coordinate of each sample.
    sample_cells: Vec<UVec3>,
}

impl SampleGrid {
    /// Creates an empty grid of `dims` cells.
    pub fn new(dims: UVec3, cell_size: f32) -> Result<Self, ConfigError> {
        if dims.min_element() == 0 {
            return Err(ConfigError::EmptyDimensions(dims));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigError::BadCellSize(cell_size));
        }
        let n = (dims.x * dims.y * dims.z) as usize;
        Ok(Self {
            dims,
            cell_size,
            cells: vec![None; n],
            samples: Vec::with_capacity(n),
            sample_cells: Vec::with_capacity(n),
        })
    }

    /// Creates a fully occupied grid with one sample per cell, placed
    /// exactly at `origin + cell * cell_size`.
    ///
    /// Samples are inserted in x, y, z loop order, so the sample id of cell
    /// `(x, y, z)` is `(x * dims.y + y) * dims.z + z`.
    pub fn lattice(dims: UVec3, cell_size: f32, origin: Vec3) -> Result<Self, ConfigError> {
        let mut grid = Self::new(dims, cell_size)?;
        for x in 0..dims.x {
            for y in 0..dims.y {
                for z in 0..dims.z {
                    let cell = UVec3::new(x, y, z);
                    let pos = origin + cell.as_vec3() * cell_size;
                    grid.push(cell, pos);
                }
            }
        }
        Ok(grid)
    }

    /// Generates a jittered grid sampling of a box above `anchor`.
    ///
    /// The requested sample count is reduced to the largest odd cube not
    /// exceeding it, so the grid always has a middle column. That column is
    /// centered on `anchor` and the lowest layer sits at the anchor height.
    /// Every sample is then displaced by up to `cell * (1 - min_dist) / 2`
    /// along each axis, which keeps neighbors at least `min_dist * cell`
    /// apart.
    pub fn jittered(params: &JitterParams, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        params.validate()?;

        let base = odd_cube_base(params.n_samples);
        let n = base.pow(3);
        let extent = params.extent;
        let cell_size = (extent.x * extent.y * extent.z / n as f32).cbrt();
        // Tolerate cbrt rounding so exact fits don't gain an extra layer.
        let dims = (extent / cell_size - 1e-4).ceil().as_uvec3().max(UVec3::ONE);

        let half_span = (dims.as_vec3() - Vec3::ONE) * cell_size * 0.5;
        let origin = params.anchor - Vec3::new(half_span.x, 0.0, half_span.z);

        let mut grid = Self::lattice(dims, cell_size, origin)?;

        let j = cell_size * (1.0 - params.min_dist) * 0.5;
        for p in &mut grid.samples {
            *p += Vec3::new(
                rng.random_range(-j..=j),
                rng.random_range(-j..=j),
                rng.random_range(-j..=j),
            );
        }

        tracing::debug!(
            samples = grid.len(),
            cell_size,
            jitter = j,
            dims = ?dims,
            "generated jittered sample grid"
        );
        Ok(grid)
    }

    /// Places a new sample at `pos` in `cell`.
    pub fn insert(&mut self, cell: UVec3, pos: Vec3) -> Result<SampleId, GraphError> {
        let idx = self.index_of(cell).ok_or(GraphError::CellOutOfBounds {
            cell,
            dims: self.dims,
        })?;
        if self.cells[idx].is_some() {
            return Err(GraphError::CellOccupied(cell));
        }
        Ok(self.push(cell, pos))
    }

    fn push(&mut self, cell: UVec3, pos: Vec3) -> SampleId {
        let id = self.samples.len();
        let idx = self.flat(cell);
        self.cells[idx] = Some(id);
        self.samples.push(pos);
        self.sample_cells.push(cell);
        id
    }

    /// Sample stored in `cell`, or `None` for empty or out-of-range cells.
    ///
    /// Takes signed coordinates so neighbor offsets can be applied without
    /// bounds juggling at the call site.
    pub fn occupied(&self, cell: IVec3) -> Option<SampleId> {
        if cell.min_element() < 0 {
            return None;
        }
        let idx = self.index_of(cell.as_uvec3())?;
        self.cells[idx]
    }

    pub fn position(&self, id: SampleId) -> Vec3 {
        self.samples[id]
    }

    pub fn set_position(&mut self, id: SampleId, pos: Vec3) {
        self.samples[id] = pos;
    }

    /// Grid cell holding sample `id`.
    pub fn cell_of(&self, id: SampleId) -> UVec3 {
        self.sample_cells[id]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn index_of(&self, cell: UVec3) -> Option<usize> {
        if cell.cmplt(self.dims).all() {
            Some(self.flat(cell))
        } else {
            None
        }
    }

    #[inline]
    fn flat(&self, cell: UVec3) -> usize {
        ((cell.x * self.dims.y + cell.y) * self.dims.z + cell.z) as usize
    }
}

/// Largest odd `b` with `b^3 <= n` (at least 1).
fn odd_cube_base(n: usize) -> u32 {
    let mut b = (n as f64).cbrt().floor() as u32;
    // Guard against cbrt rounding just below an exact cube.
    while ((b + 1) as usize).pow(3) <= n {
        b += 1;
    }
    if b % 2 == 0 {
        b = b.saturating_sub(1);
    }
    b.max(1)
}

/// Settings for [`SampleGrid::jittered`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterParams {
    /// Bottom-center of the sampled box, usually the top of the stem.
    pub anchor: Vec3,
    /// Width, height and depth of the sampled box.
    pub extent: Vec3,
    /// Minimum sample spacing as a fraction of the cell size, in `[0, 1]`.
    pub min_dist: f32,
    /// Requested sample count; rounded down to an odd cube.
    pub n_samples: usize,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            anchor: Vec3::ZERO,
            extent: Vec3::splat(10.0),
            min_dist: 0.5,
            n_samples: 1000,
        }
    }
}

impl JitterParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.extent.is_finite() || self.extent.min_element() <= 0.0 {
            return Err(ConfigError::BadExtents);
        }
        if self.n_samples == 0 {
            return Err(ConfigError::NoSamples);
        }
        if !(0.0..=1.0).contains(&self.min_dist) {
            return Err(ConfigError::BadMinDistance(self.min_dist));
        }
        if !self.anchor.is_finite() {
            return Err(ConfigError::NonFiniteAnchor);
        }
        Ok(())
    }
}
