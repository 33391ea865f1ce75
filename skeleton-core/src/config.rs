use crate::{
    error::ConfigError,
    region::Region,
    types::Generation,
};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Grid offsets eligible to become graph edges.
///
/// `Six` keeps the face neighbors only. `Fourteen` adds the eight corner
/// diagonals but deliberately leaves out the twelve edge diagonals, so it is
/// not full 26-connectivity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Connectivity {
    Six,
    #[default]
    Fourteen,
}

/// Face directions, in slot order.
const FACE_DIRECTIONS: [IVec3; 6] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

/// Face directions followed by corner diagonals, in slot order.
const FACE_AND_CORNER_DIRECTIONS: [IVec3; 14] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
    IVec3::new(-1, 1, 1),
    IVec3::new(1, 1, 1),
    IVec3::new(-1, -1, 1),
    IVec3::new(1, -1, 1),
    IVec3::new(-1, 1, -1),
    IVec3::new(1, 1, -1),
    IVec3::new(-1, -1, -1),
    IVec3::new(1, -1, -1),
];

impl Connectivity {
    /// The active direction set. Index `i` is edge slot `i` of every node.
    pub fn directions(self) -> &'static [IVec3] {
        match self {
            Connectivity::Six => &FACE_DIRECTIONS,
            Connectivity::Fourteen => &FACE_AND_CORNER_DIRECTIONS,
        }
    }

    /// Number of edge slots per node.
    pub fn slot_count(self) -> usize {
        self.directions().len()
    }

    /// Edge slot for a grid offset, or `None` if the offset is not part of
    /// this direction set.
    pub fn slot_of(self, offset: IVec3) -> Option<usize> {
        self.directions().iter().position(|&d| d == offset)
    }
}

impl TryFrom<u32> for Connectivity {
    type Error = ConfigError;

    fn try_from(neighbors: u32) -> Result<Self, Self::Error> {
        match neighbors {
            6 => Ok(Connectivity::Six),
            14 => Ok(Connectivity::Fourteen),
            other => Err(ConfigError::UnsupportedConnectivity(other)),
        }
    }
}

impl From<Connectivity> for u32 {
    fn from(c: Connectivity) -> Self {
        c.slot_count() as u32
    }
}

/// Step-function twist applied to guiding vectors along a path.
///
/// Nodes fewer than `switch_hop` hops from the seed set rotate their parent's
/// guiding vector by `angle_before` degrees, later nodes by `angle_after`.
/// The sign flip produces an S-curve along each branch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub switch_hop: u32,
    pub angle_before: f32,
    pub angle_after: f32,
}

impl Twist {
    /// Symmetric twist: `+theta` before `switch_hop`, `-theta` from there on.
    pub fn symmetric(theta: f32, switch_hop: u32) -> Self {
        Self {
            switch_hop,
            angle_before: theta,
            angle_after: -theta,
        }
    }

    /// Rotation angle in radians for a node `hops` away from the seeds.
    pub fn angle_for(&self, hops: u32) -> f32 {
        let degrees = if hops < self.switch_hop {
            self.angle_before
        } else {
            self.angle_after
        };
        degrees.to_radians()
    }
}

impl Default for Twist {
    fn default() -> Self {
        Self::symmetric(4.0, 5)
    }
}

/// How endpoint candidates are chosen after a path pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PlacementRule {
    /// Nodes exactly `target` hops from the seed set.
    Hops { target: u32 },
    /// Nodes whose position lies inside `region`.
    Volume { region: Region },
}

impl Default for PlacementRule {
    fn default() -> Self {
        PlacementRule::Hops { target: 5 }
    }
}

/// Parameters of a single growth iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationConfig {
    pub placement: PlacementRule,
    pub n_branches: usize,
    pub twist: Twist,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            placement: PlacementRule::default(),
            n_branches: 3,
            twist: Twist::default(),
        }
    }
}

impl IterationConfig {
    pub fn hops(target: u32, n_branches: usize) -> Self {
        Self {
            placement: PlacementRule::Hops { target },
            n_branches,
            ..Self::default()
        }
    }

    pub fn volume(region: Region, n_branches: usize) -> Self {
        Self {
            placement: PlacementRule::Volume { region },
            n_branches,
            ..Self::default()
        }
    }

    pub fn with_twist(mut self, twist: Twist) -> Self {
        self.twist = twist;
        self
    }

    fn validate(&self, iteration: Generation) -> Result<(), ConfigError> {
        if self.n_branches == 0 {
            return Err(ConfigError::ZeroBranches { iteration });
        }
        if !self.twist.angle_before.is_finite() || !self.twist.angle_after.is_finite() {
            return Err(ConfigError::NonFiniteTwist { iteration });
        }
        if let PlacementRule::Volume { region } = &self.placement
            && let Some(reason) = region.degeneracy()
        {
            return Err(ConfigError::DegenerateRegion { iteration, reason });
        }
        Ok(())
    }
}

/// Configuration of a whole growth run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub connectivity: Connectivity,
    /// Exact stem position the root sample is moved to before growth.
    pub stem_anchor: Option<Vec3>,
    /// One entry per growth iteration, run in order.
    pub iterations: Vec<IterationConfig>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::default(),
            stem_anchor: None,
            iterations: vec![
                IterationConfig::hops(10, 3),
                IterationConfig::hops(6, 6),
                IterationConfig::hops(3, 12),
            ],
        }
    }
}

impl GrowthConfig {
    /// Checks every iteration before any graph work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations.is_empty() {
            return Err(ConfigError::NoIterations);
        }
        if let Some(anchor) = self.stem_anchor
            && !anchor.is_finite()
        {
            return Err(ConfigError::NonFiniteAnchor);
        }
        for (i, it) in self.iterations.iter().enumerate() {
            it.validate(i as Generation + 1)?;
        }
        Ok(())
    }
}
