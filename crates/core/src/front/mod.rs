//! Single-fire perimeter model.
//!
//! A fire's perimeter is 16 radii measured from the ignition point, one per
//! 22.5° sector (sector 0 faces north, sector 4 east). Each tick the model
//! samples terrain just beyond every sector's perimeter, computes a directional
//! spread rate and grows the radius, never past the nearest blocking barrier.
//!
//! Radii only grow. Any computed regression is reported as
//! [`FireError::InconsistentFireState`] and the previous perimeter is kept.

pub mod classify;
pub mod projection;

use crate::analysis::{FuelContinuityReport, ZoneAssessment};
use crate::config::{SpreadConfig, TerrainFallback};
use crate::core_types::units::{Degrees, Hours, Meters, MetersPerMinute, SimTime};
use crate::core_types::{bearing_unit, FuelType, Vec2, WeatherSample};
use crate::error::{FireError, Result};
use crate::grid::{TerrainField, TerrainSample};
use crate::spread::sector_spread;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

pub use classify::{classify_sectors, wind_band, FrontClass, SectorSignal};
pub use projection::{GrowthProjection, ProjectedPerimeter, STANDARD_HORIZONS};

/// Number of perimeter sectors
pub const SECTOR_COUNT: usize = 16;

/// Angular width of one sector
pub const SECTOR_WIDTH: f32 = 360.0 / SECTOR_COUNT as f32;

/// Outward bearing of sector `index`
#[inline]
#[must_use]
pub fn sector_bearing(index: usize) -> Degrees {
    Degrees::new((index % SECTOR_COUNT) as f32 * SECTOR_WIDTH)
}

/// Sector whose centre line is closest to `bearing`
#[must_use]
pub fn sector_for_bearing(bearing: Degrees) -> usize {
    ((*bearing.normalized() / SECTOR_WIDTH).round() as usize) % SECTOR_COUNT
}

/// Unique fire identifier assigned by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FireId(pub u32);

impl fmt::Display for FireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireStatus {
    Active,
    /// Declared contained; the perimeter no longer advances
    Contained,
}

/// State of one perimeter sector after the latest advance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorState {
    pub radius: Meters,
    pub rate: MetersPerMinute,
    pub class: FrontClass,
    /// Fuel just beyond the perimeter
    pub fuel: FuelType,
    /// Distance from ignition to the nearest blocking barrier along the sector
    pub barrier_distance: Option<Meters>,
    pub channelled: bool,
}

/// One fire's perimeter, classification and latest analysis outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireFrontModel {
    id: FireId,
    ignition: Vec2,
    ignited_at: SimTime,
    updated_at: SimTime,
    status: FireStatus,
    sectors: [SectorState; SECTOR_COUNT],
    /// Square meters
    burned_area: f32,
    continuity: Option<FuelContinuityReport>,
    zone_risk: Vec<ZoneAssessment>,
}

impl FireFrontModel {
    /// Ignite a new fire at the weather sample's timestamp.
    ///
    /// # Errors
    ///
    /// See [`ignite_at`](Self::ignite_at).
    pub fn ignite(
        id: FireId,
        ignition: Vec2,
        terrain: &dyn TerrainField,
        weather: &WeatherSample,
        config: &SpreadConfig,
    ) -> Result<Self> {
        Self::ignite_at(id, ignition, weather.timestamp(), terrain, weather, config)
    }

    /// Ignite a new fire and derive its initial rates and classification.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier, unique within the coordinator
    /// * `ignition` - Ignition point in the terrain frame
    /// * `ignited_at` - Simulation time of ignition
    /// * `terrain` - Terrain the fire burns on
    /// * `weather` - Current weather
    /// * `config` - Spread parameters
    ///
    /// # Errors
    ///
    /// [`FireError::OutOfDomain`] if the ignition point or the terrain just
    /// beyond the initial perimeter is outside coverage (unless the config
    /// opts into the moderate-fuel fallback).
    pub fn ignite_at(
        id: FireId,
        ignition: Vec2,
        ignited_at: SimTime,
        terrain: &dyn TerrainField,
        weather: &WeatherSample,
        config: &SpreadConfig,
    ) -> Result<Self> {
        let origin = sample_with_policy(terrain, ignition, config.terrain_fallback)?;
        let initial = SectorState {
            radius: Meters::new(config.initial_radius),
            rate: MetersPerMinute::ZERO,
            class: FrontClass::Backing,
            fuel: origin.fuel,
            barrier_distance: None,
            channelled: false,
        };
        let mut fire = Self {
            id,
            ignition,
            ignited_at,
            updated_at: ignited_at,
            status: FireStatus::Active,
            sectors: [initial; SECTOR_COUNT],
            burned_area: 0.0,
            continuity: None,
            zone_risk: Vec::new(),
        };
        fire.advance(terrain, weather, config, 0.0)?;
        debug!(
            fire = %id,
            x = ignition.x,
            y = ignition.y,
            fuel = origin.fuel.name(),
            "Fire ignited"
        );
        Ok(fire)
    }

    /// Advance the perimeter by `dt_seconds` and re-derive classification.
    ///
    /// A zero `dt_seconds` refreshes rates and classes without growth. The
    /// update is computed in full before anything is committed, so on error
    /// the fire keeps its previous state.
    ///
    /// # Errors
    ///
    /// * [`FireError::OutOfDomain`] when a sector's look-ahead point leaves
    ///   terrain coverage and the fallback is not configured
    /// * [`FireError::InconsistentFireState`] when a sector radius would shrink
    pub fn advance(
        &mut self,
        terrain: &dyn TerrainField,
        weather: &WeatherSample,
        config: &SpreadConfig,
        dt_seconds: f32,
    ) -> Result<()> {
        if self.status == FireStatus::Contained {
            return Ok(());
        }

        let mut next = self.sectors;
        let mut signals = [SectorSignal {
            rate: 0.0,
            fuel_factor: 1.0,
            channelled: false,
        }; SECTOR_COUNT];

        for (i, sector) in next.iter_mut().enumerate() {
            let bearing = sector_bearing(i);
            let direction = bearing_unit(bearing);
            let radius = *sector.radius;

            let ahead_at = self.ignition + direction * (radius + config.look_ahead);
            let ahead = sample_with_policy(terrain, ahead_at, config.terrain_fallback)?;

            let near_limit = radius + config.barrier_scan_distance;
            let mut barrier_distance =
                scan_for_barrier(terrain, self.ignition, direction, radius, near_limit);
            let barrier_ahead =
                barrier_distance.is_some_and(|d| *d - radius <= config.look_ahead);
            let spread = sector_spread(config, weather, bearing, &ahead, barrier_ahead);

            let step = *spread.rate.distance_over(dt_seconds.max(0.0));
            let mut grown = radius + step;

            // Projections must see every barrier the sector can reach
            let reach = step.max(*spread.rate * config.projection_reach * 60.0);
            if barrier_distance.is_none() && radius + reach > near_limit {
                barrier_distance =
                    scan_for_barrier(terrain, self.ignition, direction, near_limit, radius + reach);
            }
            if let Some(limit) = barrier_distance {
                grown = grown.min((*limit).max(radius));
            }

            *sector = SectorState {
                radius: Meters::new(grown),
                rate: spread.rate,
                class: sector.class,
                fuel: ahead.fuel,
                barrier_distance,
                channelled: spread.channelled,
            };
            signals[i] = SectorSignal {
                rate: *spread.rate,
                fuel_factor: spread.fuel_factor,
                channelled: spread.channelled,
            };
        }

        let radii: [Meters; SECTOR_COUNT] = std::array::from_fn(|i| next[i].radius);
        self.check_growth(&radii)?;

        let classes = classify_sectors(&signals, weather.wind_direction(), config);
        for (sector, class) in next.iter_mut().zip(classes) {
            sector.class = class;
        }

        self.sectors = next;
        self.burned_area = polygon_area(&radii);
        self.updated_at = self.updated_at.advanced_by(dt_seconds.max(0.0));
        Ok(())
    }

    /// Replace the perimeter with externally observed radii (e.g. a mapped
    /// perimeter from a reconnaissance flight). Rates and classes are kept.
    ///
    /// # Errors
    ///
    /// [`FireError::InconsistentFireState`] if any observed radius is smaller
    /// than the current one. The perimeter is left unchanged.
    pub fn observe_perimeter(&mut self, radii: [Meters; SECTOR_COUNT]) -> Result<()> {
        self.check_growth(&radii)?;
        for (sector, radius) in self.sectors.iter_mut().zip(radii) {
            sector.radius = radius;
        }
        self.burned_area = polygon_area(&radii);
        Ok(())
    }

    /// Stop advancing this fire. Its perimeter is frozen as-is.
    pub fn contain(&mut self) {
        self.status = FireStatus::Contained;
        for sector in &mut self.sectors {
            sector.rate = MetersPerMinute::ZERO;
        }
    }

    /// Extrapolate each sector's current rate linearly over each horizon.
    ///
    /// Projected radii never exceed the sector's nearest barrier and never
    /// fall below the current radius. Barriers are known out to the distance
    /// each sector covers within `SpreadConfig::projection_reach`. Pure: repeated calls without an
    /// intervening [`advance`](Self::advance) return identical projections.
    #[must_use]
    pub fn project(&self, horizons: &[Hours]) -> GrowthProjection {
        let perimeters = horizons
            .iter()
            .map(|&horizon| ProjectedPerimeter {
                horizon,
                radii: std::array::from_fn(|i| {
                    let sector = &self.sectors[i];
                    let minutes = (*horizon).max(0.0) * 60.0;
                    let mut projected = *sector.radius + *sector.rate * minutes;
                    if let Some(limit) = sector.barrier_distance {
                        projected = projected.min((*limit).max(*sector.radius));
                    }
                    Meters::new(projected)
                }),
            })
            .collect();
        GrowthProjection {
            origin: self.ignition,
            perimeters,
        }
    }

    /// Projection at the standard +1h, +3h, +6h horizons
    #[must_use]
    pub fn project_standard(&self) -> GrowthProjection {
        self.project(&STANDARD_HORIZONS)
    }

    fn check_growth(&self, radii: &[Meters; SECTOR_COUNT]) -> Result<()> {
        for (i, (current, attempted)) in self.sectors.iter().zip(radii).enumerate() {
            let attempted = **attempted;
            if attempted.is_nan() || attempted < *current.radius {
                let err = FireError::InconsistentFireState {
                    fire: self.id,
                    sector: i,
                    previous: *current.radius,
                    attempted,
                };
                error!(fire = %self.id, sector = i, "{err}");
                return Err(err);
            }
        }
        Ok(())
    }

    pub(crate) fn set_analysis(
        &mut self,
        continuity: Option<FuelContinuityReport>,
        zone_risk: Vec<ZoneAssessment>,
    ) {
        self.continuity = continuity;
        self.zone_risk = zone_risk;
    }

    pub(crate) fn set_zone_risk(&mut self, zone_risk: Vec<ZoneAssessment>) {
        self.zone_risk = zone_risk;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> FireId {
        self.id
    }

    #[must_use]
    pub fn ignition(&self) -> Vec2 {
        self.ignition
    }

    #[must_use]
    pub fn ignited_at(&self) -> SimTime {
        self.ignited_at
    }

    /// Simulation time the perimeter was last advanced to
    #[must_use]
    pub fn updated_at(&self) -> SimTime {
        self.updated_at
    }

    #[must_use]
    pub fn status(&self) -> FireStatus {
        self.status
    }

    #[must_use]
    pub fn sectors(&self) -> &[SectorState; SECTOR_COUNT] {
        &self.sectors
    }

    #[must_use]
    pub fn radii(&self) -> [Meters; SECTOR_COUNT] {
        std::array::from_fn(|i| self.sectors[i].radius)
    }

    #[must_use]
    pub fn classes(&self) -> [FrontClass; SECTOR_COUNT] {
        std::array::from_fn(|i| self.sectors[i].class)
    }

    #[must_use]
    pub fn sector_rate(&self, index: usize) -> MetersPerMinute {
        self.sectors[index % SECTOR_COUNT].rate
    }

    /// Burned area in square meters
    #[must_use]
    pub fn burned_area(&self) -> f32 {
        self.burned_area
    }

    /// Burned area in hectares
    #[must_use]
    pub fn burned_hectares(&self) -> f32 {
        self.burned_area / 10_000.0
    }

    /// Fastest sector, lowest index on ties
    #[must_use]
    pub fn head_sector(&self) -> usize {
        let mut best = 0;
        for (i, sector) in self.sectors.iter().enumerate() {
            if sector.rate > self.sectors[best].rate {
                best = i;
            }
        }
        best
    }

    #[must_use]
    pub fn max_rate(&self) -> MetersPerMinute {
        self.sectors[self.head_sector()].rate
    }

    /// World position of sector `index`'s perimeter vertex
    #[must_use]
    pub fn perimeter_point(&self, index: usize) -> Vec2 {
        let i = index % SECTOR_COUNT;
        self.ignition + bearing_unit(sector_bearing(i)) * *self.sectors[i].radius
    }

    /// Perimeter radius toward an arbitrary bearing, interpolated between
    /// the two neighbouring sectors
    #[must_use]
    pub fn radius_toward(&self, bearing: Degrees) -> Meters {
        let position = *bearing.normalized() / SECTOR_WIDTH;
        let lower = position.floor() as usize % SECTOR_COUNT;
        let upper = (lower + 1) % SECTOR_COUNT;
        let t = position - position.floor();
        let r0 = *self.sectors[lower].radius;
        let r1 = *self.sectors[upper].radius;
        Meters::new(r0 + (r1 - r0) * t)
    }

    /// Current perimeter as a closed polygon, one vertex per sector
    #[must_use]
    pub fn perimeter_polygon(&self) -> [Vec2; SECTOR_COUNT] {
        std::array::from_fn(|i| self.perimeter_point(i))
    }

    /// Latest fuel continuity analysis, if one has been run
    #[must_use]
    pub fn continuity(&self) -> Option<&FuelContinuityReport> {
        self.continuity.as_ref()
    }

    /// Latest residential assessments, highest priority first
    #[must_use]
    pub fn zone_risk(&self) -> &[ZoneAssessment] {
        &self.zone_risk
    }
}

/// Sample terrain, substituting moderate fuel for out-of-domain points only
/// when `fallback` says so.
pub(crate) fn sample_with_policy(
    terrain: &dyn TerrainField,
    position: Vec2,
    fallback: TerrainFallback,
) -> Result<TerrainSample> {
    match terrain.sample(position) {
        Err(FireError::OutOfDomain { .. }) if fallback == TerrainFallback::AssumeModerateFuel => {
            Ok(TerrainSample::moderate_fallback())
        }
        other => other,
    }
}

/// Distance from `origin` to the first blocking barrier along `direction`
/// between `from` and `to`. Terrain edges end the search.
fn scan_for_barrier(
    terrain: &dyn TerrainField,
    origin: Vec2,
    direction: Vec2,
    from: f32,
    to: f32,
) -> Option<Meters> {
    let step = (*terrain.resolution()).max(1.0);
    let steps = ((to - from).max(0.0) / step).ceil() as usize;
    for k in 0..=steps {
        let distance = (from + k as f32 * step).min(to);
        match terrain.sample(origin + direction * distance) {
            Ok(sample) if sample.barriers.blocks_spread() => return Some(Meters::new(distance)),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

/// Area of the star polygon formed by consecutive sector radii
fn polygon_area(radii: &[Meters; SECTOR_COUNT]) -> f32 {
    let wedge = SECTOR_WIDTH.to_radians().sin();
    (0..SECTOR_COUNT)
        .map(|i| 0.5 * *radii[i] * *radii[(i + 1) % SECTOR_COUNT] * wedge)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Celsius, KilometersPerHour, Percent};
    use crate::grid::{BarrierFlags, GridTerrain};
    use approx::assert_relative_eq;

    fn north_wind(speed: f32) -> WeatherSample {
        WeatherSample::new(
            KilometersPerHour::new(speed),
            Degrees::new(0.0),
            Percent::new(25.0),
            Celsius::new(28.0),
            SimTime::from_day_hour(0, 12.0),
        )
        .unwrap()
    }

    fn flat_grass() -> GridTerrain {
        GridTerrain::flat(4000.0, 4000.0, 10.0, 100.0, FuelType::DryGrass)
    }

    #[test]
    fn sector_geometry() {
        assert_eq!(sector_bearing(4), Degrees::new(90.0));
        assert_eq!(sector_for_bearing(Degrees::new(350.0)), 0);
        assert_eq!(sector_for_bearing(Degrees::new(100.0)), 4);
        assert_eq!(sector_for_bearing(Degrees::new(-90.0)), 12);
    }

    #[test]
    fn ignition_sets_initial_perimeter_and_classes() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let fire = FireFrontModel::ignite(FireId(1), Vec2::new(2000.0, 2000.0), &terrain, &north_wind(30.0), &cfg).unwrap();

        assert!(fire.radii().iter().all(|r| **r == cfg.initial_radius));
        assert_eq!(fire.classes()[0], FrontClass::Head);
        assert_eq!(fire.classes()[8], FrontClass::Backing);
        assert_eq!(fire.classes()[4], FrontClass::RightFlank);
        assert_eq!(fire.classes()[12], FrontClass::LeftFlank);
        assert_eq!(fire.head_sector(), 0);
    }

    #[test]
    fn ignition_outside_terrain_is_rejected() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let result = FireFrontModel::ignite(FireId(1), Vec2::new(-50.0, 10.0), &terrain, &north_wind(20.0), &cfg);
        assert!(matches!(result, Err(FireError::OutOfDomain { .. })));
    }

    #[test]
    fn advance_grows_head_fastest() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let mut fire = FireFrontModel::ignite(FireId(1), Vec2::new(2000.0, 2000.0), &terrain, &north_wind(30.0), &cfg).unwrap();
        fire.advance(&terrain, &north_wind(30.0), &cfg, 600.0).unwrap();

        let radii = fire.radii();
        assert!(radii[0] > radii[4], "head should outrun flank");
        assert!(radii[4] > radii[8], "flank should outrun backing");
        assert!(fire.burned_area() > 0.0);
    }

    #[test]
    fn advance_failure_keeps_previous_state() {
        let terrain = GridTerrain::flat(300.0, 300.0, 10.0, 0.0, FuelType::DryGrass);
        let cfg = SpreadConfig::default();
        let weather = north_wind(60.0);
        let mut fire = FireFrontModel::ignite(FireId(7), Vec2::new(150.0, 150.0), &terrain, &weather, &cfg).unwrap();

        // Long enough for the head to leave the 300 m grid
        fire.advance(&terrain, &weather, &cfg, 3600.0).unwrap();
        let before = fire.radii();
        let err = fire.advance(&terrain, &weather, &cfg, 60.0).unwrap_err();
        assert!(matches!(err, FireError::OutOfDomain { .. }));
        assert_eq!(fire.radii(), before, "failed advance must not mutate the perimeter");
    }

    #[test]
    fn moderate_fallback_keeps_spreading_off_grid() {
        let terrain = GridTerrain::flat(300.0, 300.0, 10.0, 0.0, FuelType::DryGrass);
        let cfg = SpreadConfig {
            terrain_fallback: TerrainFallback::AssumeModerateFuel,
            ..SpreadConfig::default()
        };
        let weather = north_wind(60.0);
        let mut fire = FireFrontModel::ignite(FireId(7), Vec2::new(150.0, 150.0), &terrain, &weather, &cfg).unwrap();
        fire.advance(&terrain, &weather, &cfg, 3600.0).unwrap();
        fire.advance(&terrain, &weather, &cfg, 60.0).unwrap();
        assert_eq!(fire.sectors()[0].fuel, FuelType::Scrubland);
    }

    #[test]
    fn water_stops_the_sector_at_the_shore() {
        let terrain = flat_grass().with_barrier_rect(
            Vec2::new(0.0, 2200.0),
            Vec2::new(4000.0, 2300.0),
            BarrierFlags::WATER,
        );
        let cfg = SpreadConfig::default();
        let weather = north_wind(60.0);
        let mut fire = FireFrontModel::ignite(FireId(2), Vec2::new(2000.0, 2000.0), &terrain, &weather, &cfg).unwrap();
        for _ in 0..12 {
            fire.advance(&terrain, &weather, &cfg, 600.0).unwrap();
        }
        let shore = fire.sectors()[0].barrier_distance.expect("north sector should see the lake");
        assert!(fire.radii()[0] <= shore);
        assert_relative_eq!(*shore, 200.0, epsilon = 10.0);
    }

    #[test]
    fn observed_perimeter_cannot_shrink() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let mut fire = FireFrontModel::ignite(FireId(3), Vec2::new(2000.0, 2000.0), &terrain, &north_wind(20.0), &cfg).unwrap();

        let mut radii = fire.radii();
        radii[5] = Meters::new(2.0);
        let err = fire.observe_perimeter(radii).unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(matches!(err, FireError::InconsistentFireState { sector: 5, .. }));

        let grown = [Meters::new(50.0); SECTOR_COUNT];
        fire.observe_perimeter(grown).unwrap();
        assert_eq!(fire.radii(), grown);
    }

    #[test]
    fn contained_fire_stops_advancing() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let weather = north_wind(30.0);
        let mut fire = FireFrontModel::ignite(FireId(4), Vec2::new(2000.0, 2000.0), &terrain, &weather, &cfg).unwrap();
        fire.contain();
        let before = fire.radii();
        fire.advance(&terrain, &weather, &cfg, 3600.0).unwrap();
        assert_eq!(fire.radii(), before);
        assert_eq!(fire.status(), FireStatus::Contained);
    }

    #[test]
    fn projection_is_linear_and_pure() {
        let terrain = flat_grass();
        let cfg = SpreadConfig::default();
        let fire = FireFrontModel::ignite(FireId(5), Vec2::new(2000.0, 2000.0), &terrain, &north_wind(30.0), &cfg).unwrap();

        let a = fire.project_standard();
        let b = fire.project_standard();
        assert_eq!(a, b);

        let one = a.at(Hours::new(1.0)).unwrap();
        let three = a.at(Hours::new(3.0)).unwrap();
        let grow_1 = *one.radii[0] - cfg.initial_radius;
        let grow_3 = *three.radii[0] - cfg.initial_radius;
        assert_relative_eq!(grow_3, 3.0 * grow_1, max_relative = 1e-4);
    }

    #[test]
    fn circle_area_matches_polygon() {
        let radii = [Meters::new(100.0); SECTOR_COUNT];
        // 16-gon inscribed in r=100 covers ~97.4% of the circle
        let area = polygon_area(&radii);
        assert_relative_eq!(area, 8.0 * 100.0 * 100.0 * (std::f32::consts::PI / 8.0).sin(), max_relative = 1e-4);
        assert!(area < std::f32::consts::PI * 100.0 * 100.0);
    }
}
