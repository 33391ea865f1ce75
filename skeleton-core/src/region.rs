use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A bounded region of space used by volume-based endpoint placement.
///
/// Each variant carries its own containment test; callers only ever ask
/// [`Region::contains`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Region {
    /// Axis-aligned ellipsoid around `center` with semi-axes `radii`.
    ///
    /// With `upper_half_only` set, points below the center plane are
    /// rejected, which gives a dome-shaped crown volume.
    Ellipsoid {
        center: Vec3,
        radii: Vec3,
        #[serde(default)]
        upper_half_only: bool,
    },
    /// Axis-aligned box, bounds inclusive.
    Aabb { min: Vec3, max: Vec3 },
}

impl Region {
    pub fn ellipsoid(center: Vec3, radii: Vec3) -> Self {
        Self::Ellipsoid {
            center,
            radii,
            upper_half_only: false,
        }
    }

    pub fn dome(center: Vec3, radii: Vec3) -> Self {
        Self::Ellipsoid {
            center,
            radii,
            upper_half_only: true,
        }
    }

    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Self::Aabb { min, max }
    }

    /// Returns `true` if `p` lies inside (or on the boundary of) the region.
    pub fn contains(&self, p: Vec3) -> bool {
        match *self {
            Region::Ellipsoid {
                center,
                radii,
                upper_half_only,
            } => {
                let d = p - center;
                if upper_half_only && d.y < 0.0 {
                    return false;
                }
                // Normalized quadric: sum((d_i / r_i)^2) <= 1.
                let q = d / radii;
                q.length_squared() <= 1.0
            }
            Region::Aabb { min, max } => p.cmpge(min).all() && p.cmple(max).all(),
        }
    }

    /// Describes why the region can never contain a point, if it can't.
    pub(crate) fn degeneracy(&self) -> Option<&'static str> {
        match *self {
            Region::Ellipsoid { center, radii, .. } => {
                if !center.is_finite() || !radii.is_finite() {
                    Some("ellipsoid has non-finite parameters")
                } else if radii.min_element() <= 0.0 {
                    Some("ellipsoid radii must be positive")
                } else {
                    None
                }
            }
            Region::Aabb { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    Some("box has non-finite bounds")
                } else if min.cmpgt(max).any() {
                    Some("box min exceeds max")
                } else {
                    None
                }
            }
        }
    }
}
