//! Fuel continuity around a fire's perimeter.
//!
//! The analyzer lays a polar grid of sample points over the annulus between
//! the current perimeter and `radius` beyond it:
//!
//! ```text
//!            spoke j
//!              |
//!        k=n   *
//!              *        samples every radius/n meters
//!        k=1   *
//!     ~~~~~~~~~~~~~~~~  perimeter
//! ```
//!
//! Adjacent samples (along a spoke and between neighbouring spokes at the
//! same depth) feed three measures:
//!
//! - continuity: fraction of adjacent pairs that are both burnable
//! - ladder contacts: canopy fuel adjoining ladder-forming surface fuel
//! - firebreak runs: consecutive blocking samples along a spoke
//!
//! Firebreak runs on neighbouring spokes are merged into segments and rated
//! against the fuel load on the fire side of the break.

use crate::config::ContinuityConfig;
use crate::core_types::units::{Degrees, Meters, Percent};
use crate::core_types::{bearing_unit, FuelType};
use crate::error::{FireError, Result};
use crate::front::FireFrontModel;
use crate::grid::{TerrainField, TerrainSample};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Likelihood of the fire transitioning into the canopy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CrownFirePotential {
    Low,
    Medium,
    High,
}

impl CrownFirePotential {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CrownFirePotential::Low => "LOW",
            CrownFirePotential::Medium => "MEDIUM",
            CrownFirePotential::High => "HIGH",
        }
    }
}

/// How well a natural or cut break will hold the approaching front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BreakEffectiveness {
    Inadequate,
    Minimal,
    Moderate,
    Adequate,
}

impl BreakEffectiveness {
    /// Rating from measured width relative to the width the fuel load demands
    #[must_use]
    pub fn from_width_ratio(ratio: f32) -> Self {
        if ratio < 0.5 {
            BreakEffectiveness::Inadequate
        } else if ratio < 1.0 {
            BreakEffectiveness::Minimal
        } else if ratio < 1.5 {
            BreakEffectiveness::Moderate
        } else {
            BreakEffectiveness::Adequate
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BreakEffectiveness::Inadequate => "INADEQUATE",
            BreakEffectiveness::Minimal => "MINIMAL",
            BreakEffectiveness::Moderate => "MODERATE",
            BreakEffectiveness::Adequate => "ADEQUATE",
        }
    }
}

/// A contiguous stretch of barrier crossing neighbouring spokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirebreakSegment {
    /// Bearing of the first spoke in the segment (clockwise order)
    pub start_bearing: Degrees,
    /// Bearing of the last spoke in the segment
    pub end_bearing: Degrees,
    pub spokes: usize,
    /// Mean radial width across the segment's spokes
    pub mean_width: Meters,
    /// Narrowest radial width; the break fails where it is thinnest
    pub min_width: Meters,
    /// Mean fuel load on the fire side of the break (kg/m²)
    pub fire_side_load: f32,
    pub required_width: Meters,
    /// Fuel continues around both ends of the break
    pub flanked: bool,
    pub effectiveness: BreakEffectiveness,
}

/// Fuel picture around one fire's perimeter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelContinuityReport {
    /// Annulus depth analyzed beyond the perimeter
    pub radius: Meters,
    /// Samples inside terrain coverage
    pub samples: usize,
    /// Samples skipped as outside terrain coverage
    pub out_of_domain: usize,
    /// Mean available fuel load over burnable samples (kg/m²)
    pub mean_fuel_load: f32,
    pub mean_moisture: Percent,
    pub mean_slope: Degrees,
    /// Sample count per fuel type, indexed by [`FuelType::index`]
    pub fuel_counts: [usize; 8],
    pub dominant_fuel: FuelType,
    /// Fraction of adjacent sample pairs that are both burnable, 0-1
    pub continuity_score: f32,
    /// Fraction of samples in high or very-high ignitability fuel, 0-1
    pub high_ignitability_coverage: f32,
    /// Samples on open water
    pub water_samples: usize,
    pub ladder_contacts: usize,
    pub ladder_fuel: bool,
    pub crown_fire_potential: CrownFirePotential,
    pub firebreaks: Vec<FirebreakSegment>,
}

impl FuelContinuityReport {
    /// Fraction of in-domain samples on open water, 0-1
    #[must_use]
    pub fn water_fraction(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            self.water_samples as f32 / self.samples as f32
        }
    }

    /// Best-rated firebreak, if any was found
    #[must_use]
    pub fn best_firebreak(&self) -> Option<&FirebreakSegment> {
        self.firebreaks.iter().max_by_key(|b| b.effectiveness)
    }
}

/// First blocking run found along one spoke
#[derive(Debug, Clone, Copy)]
struct SpokeBreak {
    width: f32,
    /// Mean load of samples between the perimeter and the break
    fire_side_load: Option<f32>,
}

/// Samples the fuel annulus around a fire
#[derive(Debug, Clone, Default)]
pub struct FuelContinuityAnalyzer {
    config: ContinuityConfig,
}

impl FuelContinuityAnalyzer {
    #[must_use]
    pub fn new(config: ContinuityConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ContinuityConfig {
        &self.config
    }

    /// Analyze fuel between the fire's perimeter and `radius` beyond it.
    ///
    /// Sample points outside terrain coverage are skipped and counted in
    /// [`FuelContinuityReport::out_of_domain`].
    ///
    /// # Errors
    ///
    /// [`FireError::OutOfDomain`] when no sample point at all lies inside
    /// terrain coverage.
    pub fn analyze(
        &self,
        fire: &FireFrontModel,
        terrain: &dyn TerrainField,
        radius: Meters,
    ) -> Result<FuelContinuityReport> {
        let spokes = self.config.spoke_count.max(1);
        let depth = self.config.samples_per_spoke.max(1);
        let step = *radius / depth as f32;
        let spoke_width = 360.0 / spokes as f32;

        // grid[j][k]: spoke j, k-th sample outward from the perimeter
        let mut grid: Vec<Vec<Option<TerrainSample>>> = Vec::with_capacity(spokes);
        let mut first_miss = None;
        for j in 0..spokes {
            let bearing = Degrees::new(j as f32 * spoke_width);
            let direction = bearing_unit(bearing);
            let start = *fire.radius_toward(bearing);
            let row = (1..=depth)
                .map(|k| {
                    let position = fire.ignition() + direction * (start + k as f32 * step);
                    match terrain.sample(position) {
                        Ok(sample) => Some(sample),
                        Err(err) => {
                            if first_miss.is_none() {
                                first_miss = Some(err);
                            }
                            None
                        }
                    }
                })
                .collect();
            grid.push(row);
        }

        let valid: Vec<&TerrainSample> = grid.iter().flatten().flatten().collect();
        if valid.is_empty() {
            return Err(first_miss.unwrap_or(FireError::OutOfDomain {
                x: fire.ignition().x,
                y: fire.ignition().y,
            }));
        }
        let out_of_domain = spokes * depth - valid.len();

        let mut fuel_counts = [0usize; 8];
        let mut load_sum = 0.0;
        let mut moisture_sum = 0.0;
        let mut burnable = 0usize;
        let mut slope_sum = 0.0;
        let mut highly_ignitable = 0usize;
        let mut water_samples = 0usize;
        for sample in &valid {
            fuel_counts[sample.fuel.index()] += 1;
            if sample.barriers.water {
                water_samples += 1;
            }
            slope_sum += *sample.slope;
            if sample.barriers.blocks_spread() {
                continue;
            }
            burnable += 1;
            load_sum += sample.fuel.fuel_load();
            moisture_sum += *sample.fuel.base_moisture();
            if sample.fuel.is_highly_ignitable() {
                highly_ignitable += 1;
            }
        }
        let mean_of = |sum: f32| if burnable > 0 { sum / burnable as f32 } else { 0.0 };

        let (pairs, burnable_pairs, ladder_contacts) = adjacency(&grid);
        let continuity_score = if pairs > 0 {
            burnable_pairs as f32 / pairs as f32
        } else {
            0.0
        };
        let high_ignitability_coverage = highly_ignitable as f32 / valid.len() as f32;
        let ladder_fuel = ladder_contacts >= self.config.min_ladder_contacts;

        let crown_fire_potential = match (
            high_ignitability_coverage > self.config.high_ignitability_threshold,
            ladder_fuel,
        ) {
            (true, true) => CrownFirePotential::High,
            (true, false) | (false, true) => CrownFirePotential::Medium,
            (false, false) => CrownFirePotential::Low,
        };

        let mean_fuel_load = mean_of(load_sum);
        let breaks: Vec<Option<SpokeBreak>> = grid.iter().map(|row| spoke_break(row, step)).collect();
        let fuelled: Vec<bool> = grid
            .iter()
            .map(|row| row.iter().flatten().any(|s| !s.barriers.blocks_spread()))
            .collect();
        let firebreaks = self.segments(&breaks, &fuelled, spoke_width, mean_fuel_load);

        let dominant_fuel = FuelType::ALL
            .into_iter()
            .max_by_key(|f| (fuel_counts[f.index()], std::cmp::Reverse(f.index())))
            .unwrap_or(FuelType::MODERATE_DEFAULT);

        trace!(
            fire = %fire.id(),
            samples = valid.len(),
            out_of_domain,
            continuity_score,
            ladder_contacts,
            firebreaks = firebreaks.len(),
            "Fuel continuity analyzed"
        );

        Ok(FuelContinuityReport {
            radius,
            samples: valid.len(),
            out_of_domain,
            mean_fuel_load,
            mean_moisture: Percent::new(mean_of(moisture_sum)),
            mean_slope: Degrees::new(slope_sum / valid.len() as f32),
            fuel_counts,
            dominant_fuel,
            continuity_score,
            high_ignitability_coverage,
            water_samples,
            ladder_contacts,
            ladder_fuel,
            crown_fire_potential,
            firebreaks,
        })
    }

    /// Merge per-spoke breaks on neighbouring spokes into rated segments.
    ///
    /// `fuelled[j]` is true when spoke `j` has at least one burnable sample
    /// inside terrain coverage.
    fn segments(
        &self,
        breaks: &[Option<SpokeBreak>],
        fuelled: &[bool],
        spoke_width: f32,
        fallback_load: f32,
    ) -> Vec<FirebreakSegment> {
        let n = breaks.len();
        if n == 0 || breaks.iter().all(Option::is_none) {
            return Vec::new();
        }

        // A ring of breaks around every spoke is a single unflanked segment
        let Some(open) = breaks.iter().position(Option::is_none) else {
            return vec![self.rate_segment(breaks, 0, n, spoke_width, fallback_load, false)];
        };

        let mut segments = Vec::new();
        let mut offset = 1;
        while offset <= n {
            let start = (open + offset) % n;
            if breaks[start].is_none() {
                offset += 1;
                continue;
            }
            let mut len = 0;
            while len < n && breaks[(start + len) % n].is_some() {
                len += 1;
            }
            // Fuel on a neighbouring spoke lets the fire wrap around that end
            let before = (start + n - 1) % n;
            let after = (start + len) % n;
            let flanked = fuelled[before] || fuelled[after];
            segments.push(self.rate_segment(breaks, start, len, spoke_width, fallback_load, flanked));
            offset += len;
        }
        segments
    }

    fn rate_segment(
        &self,
        breaks: &[Option<SpokeBreak>],
        start: usize,
        len: usize,
        spoke_width: f32,
        fallback_load: f32,
        flanked: bool,
    ) -> FirebreakSegment {
        let n = breaks.len();
        let members: Vec<SpokeBreak> = (0..len).filter_map(|i| breaks[(start + i) % n]).collect();
        let count = members.len().max(1) as f32;
        let mean_width = members.iter().map(|b| b.width).sum::<f32>() / count;
        let min_width = members.iter().map(|b| b.width).fold(f32::INFINITY, f32::min);
        let loads: Vec<f32> = members.iter().filter_map(|b| b.fire_side_load).collect();
        let fire_side_load = if loads.is_empty() {
            fallback_load
        } else {
            loads.iter().sum::<f32>() / loads.len() as f32
        };

        let required = self.config.break_width_base + self.config.break_width_per_load * fire_side_load;
        let mut effectiveness = BreakEffectiveness::from_width_ratio(min_width / required);
        if flanked {
            effectiveness = effectiveness.min(BreakEffectiveness::Moderate);
        }

        FirebreakSegment {
            start_bearing: Degrees::new(start as f32 * spoke_width),
            end_bearing: Degrees::new(((start + len - 1) % n) as f32 * spoke_width),
            spokes: len,
            mean_width: Meters::new(mean_width),
            min_width: Meters::new(min_width),
            fire_side_load,
            required_width: Meters::new(required),
            flanked,
            effectiveness,
        }
    }
}

/// Count adjacent pairs, burnable pairs and canopy/ladder contacts
fn adjacency(grid: &[Vec<Option<TerrainSample>>]) -> (usize, usize, usize) {
    let spokes = grid.len();
    let mut pairs = 0;
    let mut burnable_pairs = 0;
    let mut ladder = 0;

    let mut visit = |a: Option<&TerrainSample>, b: Option<&TerrainSample>| {
        let (Some(a), Some(b)) = (a, b) else {
            return;
        };
        pairs += 1;
        if !a.barriers.blocks_spread() && !b.barriers.blocks_spread() {
            burnable_pairs += 1;
            if (a.fuel.is_canopy() && b.fuel.is_ladder_surface())
                || (b.fuel.is_canopy() && a.fuel.is_ladder_surface())
            {
                ladder += 1;
            }
        }
    };

    for j in 0..spokes {
        let row = &grid[j];
        for k in 0..row.len() {
            if k + 1 < row.len() {
                visit(row[k].as_ref(), row[k + 1].as_ref());
            }
            if spokes > 1 {
                let next = &grid[(j + 1) % spokes];
                if let Some(other) = next.get(k) {
                    visit(row[k].as_ref(), other.as_ref());
                }
            }
        }
    }
    (pairs, burnable_pairs, ladder)
}

/// First run of blocking samples along a spoke
fn spoke_break(row: &[Option<TerrainSample>], step: f32) -> Option<SpokeBreak> {
    let start = row
        .iter()
        .position(|s| s.is_some_and(|s| s.barriers.blocks_spread()))?;
    let len = row[start..]
        .iter()
        .take_while(|s| s.is_some_and(|s| s.barriers.blocks_spread()))
        .count();

    let behind: Vec<f32> = row[..start]
        .iter()
        .flatten()
        .map(|s| s.fuel.fuel_load())
        .collect();
    let fire_side_load = if behind.is_empty() {
        None
    } else {
        Some(behind.iter().sum::<f32>() / behind.len() as f32)
    };

    Some(SpokeBreak {
        width: len as f32 * step,
        fire_side_load,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpreadConfig;
    use crate::core_types::units::{Celsius, KilometersPerHour, SimTime};
    use crate::core_types::{Vec2, WeatherSample};
    use crate::front::FireId;
    use crate::grid::{BarrierFlags, GridTerrain};

    fn weather() -> WeatherSample {
        WeatherSample::new(
            KilometersPerHour::new(20.0),
            Degrees::new(0.0),
            Percent::new(30.0),
            Celsius::new(25.0),
            SimTime::from_day_hour(0, 11.0),
        )
        .unwrap()
    }

    fn fire_on(terrain: &GridTerrain) -> FireFrontModel {
        FireFrontModel::ignite(
            FireId(1),
            Vec2::new(1500.0, 1500.0),
            terrain,
            &weather(),
            &SpreadConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn uniform_grass_is_fully_continuous() {
        let terrain = GridTerrain::flat(3000.0, 3000.0, 10.0, 0.0, FuelType::DryGrass);
        let report = FuelContinuityAnalyzer::default()
            .analyze(&fire_on(&terrain), &terrain, Meters::new(500.0))
            .unwrap();

        assert_eq!(report.out_of_domain, 0);
        assert_eq!(report.dominant_fuel, FuelType::DryGrass);
        assert_eq!(report.continuity_score, 1.0);
        assert!(!report.ladder_fuel, "grass alone has no canopy to climb into");
        assert!(report.firebreaks.is_empty());
        approx::assert_relative_eq!(report.mean_fuel_load, FuelType::DryGrass.fuel_load(), epsilon = 1e-4);
    }

    #[test]
    fn grass_under_pine_gives_high_crown_potential() {
        // Pine plantation to the north, dry grass everywhere else
        let terrain = GridTerrain::flat(3000.0, 3000.0, 10.0, 0.0, FuelType::DryGrass).with_fuel_rect(
            Vec2::new(0.0, 1700.0),
            Vec2::new(3000.0, 3000.0),
            FuelType::PinePlantation,
        );
        let report = FuelContinuityAnalyzer::default()
            .analyze(&fire_on(&terrain), &terrain, Meters::new(500.0))
            .unwrap();

        assert!(report.ladder_fuel, "grass/pine edge is ladder fuel");
        assert!(report.high_ignitability_coverage > 0.4);
        assert_eq!(report.crown_fire_potential, CrownFirePotential::High);
    }

    #[test]
    fn partial_break_is_capped_at_moderate() {
        // Wide river east of the fire, but fuel continues north and south of it
        let terrain = GridTerrain::flat(3000.0, 3000.0, 10.0, 0.0, FuelType::DenseFynbos).with_barrier_rect(
            Vec2::new(1700.0, 1100.0),
            Vec2::new(1900.0, 1900.0),
            BarrierFlags::WATER,
        );
        let report = FuelContinuityAnalyzer::default()
            .analyze(&fire_on(&terrain), &terrain, Meters::new(500.0))
            .unwrap();

        let river = report.best_firebreak().expect("river should be detected");
        assert!(river.flanked);
        assert!(river.min_width >= river.required_width, "river is wider than required");
        assert_eq!(river.effectiveness, BreakEffectiveness::Moderate);
    }

    #[test]
    fn encircling_break_can_be_adequate() {
        // Fire on an island: water ring from 200 m to 400 m out
        let terrain = GridTerrain::flat(3000.0, 3000.0, 10.0, 0.0, FuelType::GreenGrass)
            .with_barrier_where(BarrierFlags::WATER, |p| {
                (200.0..=400.0).contains(&(p - Vec2::new(1500.0, 1500.0)).norm())
            });
        let report = FuelContinuityAnalyzer::default()
            .analyze(&fire_on(&terrain), &terrain, Meters::new(500.0))
            .unwrap();

        assert_eq!(report.firebreaks.len(), 1);
        let ring = &report.firebreaks[0];
        assert!(!ring.flanked);
        assert_eq!(ring.effectiveness, BreakEffectiveness::Adequate);
    }

    #[test]
    fn break_ends_without_fuel_are_not_flanked() {
        let analyzer = FuelContinuityAnalyzer::default();
        let wide = Some(SpokeBreak {
            width: 400.0,
            fire_side_load: Some(1.0),
        });
        let breaks = [None, wide, wide, None, None, None];

        // Neighbours 0 and 3 lie entirely off the map
        let off_map = [false, true, true, false, true, true];
        let segments = analyzer.segments(&breaks, &off_map, 60.0, 1.0);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].flanked);
        assert_eq!(segments[0].effectiveness, BreakEffectiveness::Adequate);

        let wrapped = [false, true, true, true, true, true];
        let segments = analyzer.segments(&breaks, &wrapped, 60.0, 1.0);
        assert!(segments[0].flanked, "fuel past one end lets the fire around");
        assert_eq!(segments[0].effectiveness, BreakEffectiveness::Moderate);
    }

    #[test]
    fn fire_off_the_map_is_out_of_domain() {
        let terrain = GridTerrain::flat(3000.0, 3000.0, 10.0, 0.0, FuelType::DryGrass);
        let fire = fire_on(&terrain);
        let small = GridTerrain::flat(100.0, 100.0, 10.0, 0.0, FuelType::DryGrass);
        let result = FuelContinuityAnalyzer::default().analyze(&fire, &small, Meters::new(500.0));
        assert!(matches!(result, Err(FireError::OutOfDomain { .. })));
    }
}
