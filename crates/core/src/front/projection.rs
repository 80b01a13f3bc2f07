//! Linear growth projections of a fire perimeter.

use super::{sector_bearing, SECTOR_COUNT};
use crate::core_types::units::{Hours, Meters};
use crate::core_types::{bearing_unit, Vec2};
use serde::{Deserialize, Serialize};

/// Horizons reported by default: +1h, +3h and +6h
pub const STANDARD_HORIZONS: [Hours; 3] = [Hours::new(1.0), Hours::new(3.0), Hours::new(6.0)];

/// Sector radii estimated at one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPerimeter {
    pub horizon: Hours,
    pub radii: [Meters; SECTOR_COUNT],
}

impl ProjectedPerimeter {
    /// Perimeter vertices around `origin`, one per sector
    #[must_use]
    pub fn polygon(&self, origin: Vec2) -> [Vec2; SECTOR_COUNT] {
        std::array::from_fn(|i| origin + bearing_unit(sector_bearing(i)) * *self.radii[i])
    }

    /// Distance from `origin` to the projected perimeter's farthest vertex
    #[must_use]
    pub fn max_radius(&self) -> Meters {
        self.radii.iter().copied().max().unwrap_or(Meters::ZERO)
    }
}

/// Disposable per-sector growth estimate. Never the source of truth for a fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    /// Ignition point the radii are measured from
    pub origin: Vec2,
    pub perimeters: Vec<ProjectedPerimeter>,
}

impl GrowthProjection {
    /// Projected perimeter at exactly `horizon`, if it was requested
    #[must_use]
    pub fn at(&self, horizon: Hours) -> Option<&ProjectedPerimeter> {
        self.perimeters.iter().find(|p| p.horizon == horizon)
    }
}
