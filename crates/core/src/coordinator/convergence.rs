//! Pairwise convergence of projected fire perimeters.
//!
//! Two fires are compared by the closest approach between their perimeters
//! projected to the configured horizon, not by ignition points. The pair is
//! always evaluated in canonical (lower id first) order so the result is
//! exactly symmetric.

use crate::config::CoordinatorConfig;
use crate::core_types::polygon_distance;
use crate::core_types::units::{Hours, Meters};
use crate::front::{FireFrontModel, FireId};
use serde::{Deserialize, Serialize};

/// Severity of two perimeters meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConvergenceRisk {
    Low,
    Moderate,
    High,
}

impl ConvergenceRisk {
    #[must_use]
    pub fn from_distance(distance: f32, config: &CoordinatorConfig) -> Self {
        if distance < config.convergence_high {
            ConvergenceRisk::High
        } else if distance < config.convergence_moderate {
            ConvergenceRisk::Moderate
        } else {
            ConvergenceRisk::Low
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ConvergenceRisk::Low => "LOW",
            ConvergenceRisk::Moderate => "MODERATE",
            ConvergenceRisk::High => "HIGH",
        }
    }

    #[must_use]
    pub const fn weight(self) -> f32 {
        match self {
            ConvergenceRisk::Low => 0.0,
            ConvergenceRisk::Moderate => 5.0,
            ConvergenceRisk::High => 10.0,
        }
    }
}

/// Convergence between two fires, stored with the lower id first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePair {
    pub first: FireId,
    pub second: FireId,
    /// Closest approach of the projected perimeters
    pub distance: Meters,
    pub risk: ConvergenceRisk,
}

impl ConvergencePair {
    #[must_use]
    pub fn involves(&self, fire: FireId) -> bool {
        self.first == fire || self.second == fire
    }

    /// The other fire in the pair, if `fire` is one of them
    #[must_use]
    pub fn partner(&self, fire: FireId) -> Option<FireId> {
        if self.first == fire {
            Some(self.second)
        } else if self.second == fire {
            Some(self.first)
        } else {
            None
        }
    }

    /// Risk weight scaled by how far inside the MODERATE threshold the pair is
    #[must_use]
    pub fn proximity_weight(&self, config: &CoordinatorConfig) -> f32 {
        let closeness = 1.0 - (*self.distance / config.convergence_moderate).clamp(0.0, 1.0);
        self.risk.weight() * (0.5 + 0.5 * closeness)
    }
}

/// Convergence between two fires. Argument order does not matter.
#[must_use]
pub fn convergence(a: &FireFrontModel, b: &FireFrontModel, config: &CoordinatorConfig) -> ConvergencePair {
    let (first, second) = if a.id() <= b.id() { (a, b) } else { (b, a) };
    let horizon = [Hours::new(config.convergence_horizon)];
    let pa = first.project(&horizon);
    let pb = second.project(&horizon);

    let distance = match (pa.perimeters.first(), pb.perimeters.first()) {
        (Some(p), Some(q)) => polygon_distance(&p.polygon(pa.origin), &q.polygon(pb.origin)),
        _ => polygon_distance(&first.perimeter_polygon(), &second.perimeter_polygon()),
    };

    ConvergencePair {
        first: first.id(),
        second: second.id(),
        distance: Meters::new(distance),
        risk: ConvergenceRisk::from_distance(distance, config),
    }
}

/// Every unordered pair of `fires`, in (first, second) id order
#[must_use]
pub fn all_pairs(fires: &[&FireFrontModel], config: &CoordinatorConfig) -> Vec<ConvergencePair> {
    let mut pairs = Vec::with_capacity(fires.len() * fires.len().saturating_sub(1) / 2);
    for (i, a) in fires.iter().enumerate() {
        for b in &fires[i + 1..] {
            pairs.push(convergence(a, b, config));
        }
    }
    pairs.sort_by_key(|p| (p.first, p.second));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpreadConfig;
    use crate::core_types::units::{Degrees, SimTime};
    use crate::core_types::{FuelType, Vec2, WeatherSample};
    use crate::grid::GridTerrain;

    fn fire(id: u32, at: Vec2, terrain: &GridTerrain, weather: &WeatherSample) -> FireFrontModel {
        FireFrontModel::ignite(FireId(id), at, terrain, weather, &SpreadConfig::default()).unwrap()
    }

    #[test]
    fn convergence_is_symmetric() {
        let terrain = GridTerrain::flat(10_000.0, 10_000.0, 20.0, 0.0, FuelType::SparseFynbos);
        let weather = WeatherSample::mild(Degrees::new(45.0), SimTime::from_day_hour(0, 14.0)).unwrap();
        let a = fire(1, Vec2::new(3000.0, 3000.0), &terrain, &weather);
        let b = fire(2, Vec2::new(6000.0, 4200.0), &terrain, &weather);
        let cfg = CoordinatorConfig::default();
        assert_eq!(convergence(&a, &b, &cfg), convergence(&b, &a, &cfg));
    }

    #[test]
    fn distance_buckets() {
        let cfg = CoordinatorConfig::default();
        assert_eq!(ConvergenceRisk::from_distance(800.0, &cfg), ConvergenceRisk::High);
        assert_eq!(ConvergenceRisk::from_distance(2500.0, &cfg), ConvergenceRisk::Moderate);
        assert_eq!(ConvergenceRisk::from_distance(9000.0, &cfg), ConvergenceRisk::Low);
    }

    #[test]
    fn projected_perimeters_not_ignitions() {
        let terrain = GridTerrain::flat(10_000.0, 10_000.0, 20.0, 0.0, FuelType::DryGrass);
        // Wind pushes fire 1 east toward fire 2
        let weather = WeatherSample::berg_wind(Degrees::new(90.0), SimTime::from_day_hour(0, 13.0)).unwrap();
        let a = fire(1, Vec2::new(2000.0, 5000.0), &terrain, &weather);
        let b = fire(2, Vec2::new(7000.0, 5000.0), &terrain, &weather);
        let pair = convergence(&a, &b, &CoordinatorConfig::default());
        assert!(*pair.distance < 4000.0, "head run closes most of the 5 km gap within the hour");
    }
}
