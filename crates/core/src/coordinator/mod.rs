//! Multi-incident coordination.
//!
//! [`MultiFireCoordinator`] owns every active fire. A tick runs in two phases:
//!
//! 1. **Per-fire phase** (parallel): each fire advances its perimeter from the
//!    shared terrain and the current weather sample, then refreshes its fuel
//!    continuity and residential assessments. Fires never touch each other.
//! 2. **Cross-fire phase** (after the barrier): convergence pairs, resource
//!    strain, priority ranking, incident assessments and tactics are derived
//!    from the updated fires.
//!
//! A fire whose update fails keeps its previous state and is reported in the
//! [`TickReport`]; the other fires advance normally.

pub mod assessment;
pub mod convergence;
pub mod priority;
pub mod resources;
pub mod tactics;

use crate::analysis::{
    EvacuationPriority, FuelContinuityAnalyzer, FuelContinuityReport, ResidentialRiskAssessor,
    StructureZone, ThreatLevel, ZoneAssessment, ZoneId,
};
use crate::config::CoreConfig;
use crate::core_types::units::{Degrees, Meters, MetersPerMinute, SimTime};
use crate::core_types::{distance_to_polygon, Vec2, WeatherSample};
use crate::error::{FireError, Result};
use crate::front::{
    FireFrontModel, FireId, FireStatus, FrontClass, GrowthProjection, SECTOR_COUNT,
};
use crate::grid::TerrainField;
use crate::spread::{SpotFireCandidate, SpotFireModel};
use rand::Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use assessment::{
    assess_incident, ContainmentDifficulty, IncidentAssessment, ResponseStrategy, RiskFlag,
    TerrainAccess,
};
pub use convergence::{all_pairs, convergence, ConvergencePair, ConvergenceRisk};
pub use priority::{rank, score_fire, FirePriority, PriorityComponents};
pub use resources::{
    nearest_station, ResourceStrain, Station, StationId, StationResponse, StrainLevel,
};
pub use tactics::{actions_for, recommend, TacticalAction, TacticalRecommendation};

/// A fire whose per-tick update failed
#[derive(Debug, Clone, PartialEq)]
pub struct FireFailure {
    pub fire: FireId,
    pub error: FireError,
}

/// Cross-incident view produced after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub tick: u64,
    pub time: SimTime,
    /// Fires in resource-allocation order
    pub ranking: Vec<FirePriority>,
    pub convergence: Vec<ConvergencePair>,
    pub strain: ResourceStrain,
    pub tactics: Vec<TacticalRecommendation>,
}

impl CoordinatorSnapshot {
    fn empty() -> Self {
        Self {
            tick: 0,
            time: SimTime::EPOCH,
            ranking: Vec::new(),
            convergence: Vec::new(),
            strain: ResourceStrain {
                active_fires: 0,
                available_stations: 0,
                available_capacity: 0,
                ratio: 0.0,
                level: StrainLevel::Low,
                unified_command: false,
            },
            tactics: Vec::new(),
        }
    }

    /// Convergence between two fires in either order
    #[must_use]
    pub fn pair(&self, a: FireId, b: FireId) -> Option<&ConvergencePair> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        self.convergence
            .iter()
            .find(|p| p.first == first && p.second == second)
    }

    /// Fire ids in ranking order
    #[must_use]
    pub fn ranked_ids(&self) -> Vec<FireId> {
        self.ranking.iter().map(|p| p.fire).collect()
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Fires that advanced successfully, by id
    pub advanced: Vec<FireId>,
    pub failures: Vec<FireFailure>,
    /// At least one fire failed to update
    pub degraded: bool,
    pub snapshot: CoordinatorSnapshot,
}

/// Per-fire query result for visualization layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireView {
    pub id: FireId,
    pub status: FireStatus,
    pub ignition: Vec2,
    pub ignited_at: SimTime,
    pub radii: [Meters; SECTOR_COUNT],
    pub classes: [FrontClass; SECTOR_COUNT],
    pub rates: [MetersPerMinute; SECTOR_COUNT],
    /// Square meters
    pub burned_area: f32,
    pub projection: GrowthProjection,
    pub continuity: Option<FuelContinuityReport>,
}

/// Per-zone query result for dashboards and alerting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub zone: ZoneId,
    pub perimeter_distance: Option<Meters>,
    pub threat: ThreatLevel,
    pub evacuation: EvacuationPriority,
    pub structures_at_risk: u32,
    /// Assessments from every fire threatening the zone, highest priority first
    pub assessments: Vec<ZoneAssessment>,
}

/// Owns the active fires and produces the cross-incident view
#[derive(Debug)]
pub struct MultiFireCoordinator {
    config: CoreConfig,
    weather: Arc<WeatherSample>,
    fires: FxHashMap<FireId, FireFrontModel>,
    zones: Vec<StructureZone>,
    stations: Vec<Station>,
    incidents: FxHashMap<FireId, IncidentAssessment>,
    continuity: FuelContinuityAnalyzer,
    risk: ResidentialRiskAssessor,
    spotting: SpotFireModel,
    snapshot: CoordinatorSnapshot,
    next_id: u32,
    tick: u64,
    clock: SimTime,
}

impl MultiFireCoordinator {
    /// Create a coordinator with no fires, zones or stations.
    ///
    /// # Errors
    ///
    /// [`FireError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: CoreConfig, weather: WeatherSample) -> Result<Self> {
        config.validate()?;
        let clock = weather.timestamp();
        Ok(Self {
            continuity: FuelContinuityAnalyzer::new(config.continuity.clone()),
            risk: ResidentialRiskAssessor::new(config.risk.clone()),
            spotting: SpotFireModel::default(),
            config,
            weather: Arc::new(weather),
            fires: FxHashMap::default(),
            zones: Vec::new(),
            stations: Vec::new(),
            incidents: FxHashMap::default(),
            snapshot: CoordinatorSnapshot::empty(),
            next_id: 1,
            tick: 0,
            clock,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Replace the spotting parameters
    pub fn set_spotting(&mut self, model: SpotFireModel) {
        self.spotting = model;
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Current weather sample. Holders keep their copy when it is replaced.
    #[must_use]
    pub fn weather(&self) -> Arc<WeatherSample> {
        Arc::clone(&self.weather)
    }

    /// Replace the weather sample wholesale
    pub fn set_weather(&mut self, sample: WeatherSample) {
        debug!(
            wind = %sample.wind_speed(),
            direction = %sample.wind_direction(),
            danger = sample.danger_index().label(),
            "Weather updated"
        );
        self.weather = Arc::new(sample);
    }

    /// Validate raw readings and make them the current sample.
    ///
    /// # Errors
    ///
    /// [`FireError::InvalidWeatherSample`] for out-of-range readings; the
    /// previous sample stays in effect.
    pub fn ingest_weather(
        &mut self,
        wind_speed: f32,
        wind_direction: f32,
        humidity: f32,
        temperature: f32,
        timestamp: SimTime,
    ) -> Result<()> {
        match WeatherSample::new(
            wind_speed.into(),
            Degrees::new(wind_direction),
            humidity.into(),
            temperature.into(),
            timestamp,
        ) {
            Ok(sample) => {
                self.set_weather(sample);
                Ok(())
            }
            Err(err) => {
                warn!("Rejected weather sample, keeping previous: {err}");
                Err(err)
            }
        }
    }

    /// Register a response station
    pub fn add_station(&mut self, station: Station) {
        self.stations.retain(|s| s.id != station.id);
        self.stations.push(station);
        self.stations.sort_by_key(|s| s.id);
    }

    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Register or replace a structure zone. Active fires are reassessed
    /// against the new dataset immediately.
    pub fn add_zone(&mut self, zone: StructureZone) {
        self.zones.retain(|z| z.id != zone.id);
        self.zones.push(zone);
        self.zones.sort_by_key(|z| z.id);
        self.reassess_zones();
    }

    /// Remove a structure zone from the dataset.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownZone`] if no zone has this id.
    pub fn remove_zone(&mut self, id: ZoneId) -> Result<StructureZone> {
        let index = self
            .zones
            .iter()
            .position(|z| z.id == id)
            .ok_or(FireError::UnknownZone(id))?;
        let zone = self.zones.remove(index);
        self.reassess_zones();
        Ok(zone)
    }

    /// Rerun residential risk for every fire, then the cross-fire phase
    fn reassess_zones(&mut self) {
        let risk = &self.risk;
        let zones = &self.zones;
        for fire in self.fires.values_mut() {
            let assessments = risk.assess(fire, zones);
            fire.set_zone_risk(assessments);
        }
        if !self.fires.is_empty() {
            self.cross_fire_phase();
        }
    }

    #[must_use]
    pub fn zones(&self) -> &[StructureZone] {
        &self.zones
    }

    // ------------------------------------------------------------------
    // Fire lifecycle
    // ------------------------------------------------------------------

    /// Start tracking a new fire at `position` under the current weather.
    ///
    /// # Errors
    ///
    /// [`FireError::OutOfDomain`] if the ignition point is outside terrain
    /// coverage (and no fallback is configured).
    pub fn ignite(&mut self, terrain: &dyn TerrainField, position: Vec2) -> Result<FireId> {
        let id = FireId(self.next_id);
        let mut fire = FireFrontModel::ignite_at(
            id,
            position,
            self.clock,
            terrain,
            &self.weather,
            &self.config.spread,
        )?;
        self.next_id += 1;
        analyze_fire(&mut fire, terrain, &self.continuity, &self.risk, &self.zones, self.config.continuity.radius);
        info!(
            fire = %id,
            x = position.x,
            y = position.y,
            danger = self.weather.danger_index().label(),
            "Fire ignited"
        );
        self.fires.insert(id, fire);
        self.cross_fire_phase();
        Ok(id)
    }

    /// Stop tracking a fire and hand it back to the caller.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownFire`] if the fire is not active.
    pub fn declare_contained(&mut self, id: FireId) -> Result<FireFrontModel> {
        let mut fire = self.fires.remove(&id).ok_or(FireError::UnknownFire(id))?;
        fire.contain();
        self.incidents.remove(&id);
        info!(
            fire = %id,
            hectares = fire.burned_hectares(),
            "Fire declared contained"
        );
        self.cross_fire_phase();
        Ok(fire)
    }

    /// Replace a fire's perimeter with observed radii.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownFire`] or [`FireError::InconsistentFireState`] if
    /// the observation would shrink any sector.
    pub fn observe_perimeter(&mut self, id: FireId, radii: [Meters; SECTOR_COUNT]) -> Result<()> {
        self.fires
            .get_mut(&id)
            .ok_or(FireError::UnknownFire(id))?
            .observe_perimeter(radii)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance every active fire by `dt_seconds`, then recompute the
    /// cross-incident view.
    pub fn tick(&mut self, terrain: &dyn TerrainField, dt_seconds: f32) -> TickReport {
        self.tick += 1;
        let weather = Arc::clone(&self.weather);
        let spread = &self.config.spread;
        let radius = self.config.continuity.radius;
        let continuity = &self.continuity;
        let risk = &self.risk;
        let zones = &self.zones;

        // Per-fire phase; collecting is the barrier
        let mut outcomes: Vec<(FireId, Result<()>)> = self
            .fires
            .par_iter_mut()
            .map(|(&id, fire)| {
                let result = fire.advance(terrain, &weather, spread, dt_seconds);
                if result.is_ok() {
                    analyze_fire(fire, terrain, continuity, risk, zones, radius);
                }
                (id, result)
            })
            .collect();
        outcomes.sort_by_key(|(id, _)| *id);

        let mut advanced = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (fire, outcome) in outcomes {
            match outcome {
                Ok(()) => advanced.push(fire),
                Err(err) => {
                    if err.is_invariant_violation() {
                        error!(fire = %fire, tick = self.tick, "Invariant violation: {err}");
                    } else {
                        warn!(fire = %fire, tick = self.tick, "Fire update failed: {err}");
                    }
                    failures.push(FireFailure { fire, error: err });
                }
            }
        }

        self.clock = self.clock.advanced_by(dt_seconds);
        self.cross_fire_phase();

        let degraded = !failures.is_empty();
        if degraded {
            warn!(
                tick = self.tick,
                failed = failures.len(),
                advanced = advanced.len(),
                "Degraded tick"
            );
        }
        debug!(
            tick = self.tick,
            fires = self.fires.len(),
            strain = self.snapshot.strain.level.label(),
            high_convergence = self
                .snapshot
                .convergence
                .iter()
                .filter(|p| p.risk == ConvergenceRisk::High)
                .count(),
            "Tick complete"
        );

        TickReport {
            tick: self.tick,
            advanced,
            failures,
            degraded,
            snapshot: self.snapshot.clone(),
        }
    }

    /// Convergence, strain, ranking, incident assessments and tactics
    fn cross_fire_phase(&mut self) {
        let cfg = &self.config.coordinator;
        let mut fires: Vec<&FireFrontModel> = self.fires.values().collect();
        fires.sort_by_key(|f| f.id());

        for zone in &mut self.zones {
            zone.perimeter_distance = fires
                .iter()
                .map(|f| distance_to_polygon(&f.perimeter_polygon(), zone.position))
                .min_by(f32::total_cmp)
                .map(Meters::new);
        }

        let convergence = all_pairs(&fires, cfg);
        let strain = ResourceStrain::compute(fires.len(), &self.stations, cfg);
        let ranking = rank(fires.iter().map(|f| score_fire(f, &convergence, cfg)).collect());
        let tactics = fires.iter().flat_map(|f| recommend(f)).collect();

        self.incidents = fires
            .iter()
            .map(|f| (f.id(), assess_incident(f, &self.stations, &strain, cfg)))
            .collect();

        if strain.unified_command && !self.snapshot.strain.unified_command {
            info!(fires = fires.len(), "Unified command recommended");
        }

        self.snapshot = CoordinatorSnapshot {
            tick: self.tick,
            time: self.clock,
            ranking,
            convergence,
            strain,
            tactics,
        };
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Latest cross-incident view
    #[must_use]
    pub fn snapshot(&self) -> &CoordinatorSnapshot {
        &self.snapshot
    }

    /// Number of ticks run
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn active_fire_count(&self) -> usize {
        self.fires.len()
    }

    /// Active fire ids in ascending order
    #[must_use]
    pub fn fire_ids(&self) -> Vec<FireId> {
        let mut ids: Vec<FireId> = self.fires.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// # Errors
    ///
    /// [`FireError::UnknownFire`] if the fire is not active.
    pub fn fire(&self, id: FireId) -> Result<&FireFrontModel> {
        self.fires.get(&id).ok_or(FireError::UnknownFire(id))
    }

    /// Perimeter, classification, burned area and standard projection.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownFire`] if the fire is not active.
    pub fn fire_view(&self, id: FireId) -> Result<FireView> {
        let fire = self.fire(id)?;
        let sectors = fire.sectors();
        Ok(FireView {
            id,
            status: fire.status(),
            ignition: fire.ignition(),
            ignited_at: fire.ignited_at(),
            radii: fire.radii(),
            classes: fire.classes(),
            rates: std::array::from_fn(|i| sectors[i].rate),
            burned_area: fire.burned_area(),
            projection: fire.project_standard(),
            continuity: fire.continuity().cloned(),
        })
    }

    /// Threat, evacuation priority and structures at risk for one zone,
    /// taking the most severe assessment across all fires.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownZone`] if the zone is not registered.
    pub fn zone_status(&self, id: ZoneId) -> Result<ZoneStatus> {
        let zone = self
            .zones
            .iter()
            .find(|z| z.id == id)
            .ok_or(FireError::UnknownZone(id))?;
        let mut assessments: Vec<ZoneAssessment> = self
            .fires
            .values()
            .flat_map(|f| f.zone_risk().iter().filter(|a| a.zone == id).cloned())
            .collect();
        assessments.sort_by(|a, b| a.priority_cmp(b).then_with(|| a.fire.cmp(&b.fire)));

        let (threat, evacuation, structures_at_risk) = assessments.first().map_or(
            (ThreatLevel::Low, EvacuationPriority::Monitor, 0),
            |a| (a.threat, a.evacuation, a.structures_at_risk),
        );
        Ok(ZoneStatus {
            zone: id,
            perimeter_distance: zone.perimeter_distance,
            threat,
            evacuation,
            structures_at_risk,
            assessments,
        })
    }

    /// Response assessment for one fire from the latest cross-fire phase.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownFire`] if the fire is not active.
    pub fn incident(&self, id: FireId) -> Result<&IncidentAssessment> {
        self.incidents.get(&id).ok_or(FireError::UnknownFire(id))
    }

    /// Ember spotting candidates downwind of a fire's head. Nothing is ignited.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownFire`] if the fire is not active.
    pub fn spot_fire_candidates<R: Rng + ?Sized>(
        &self,
        id: FireId,
        rng: &mut R,
    ) -> Result<Vec<SpotFireCandidate>> {
        let fire = self.fire(id)?;
        Ok(self.spotting.candidates(fire, &self.weather, rng))
    }
}

/// Refresh a fire's continuity and residential outputs after it advanced.
///
/// A continuity failure (annulus entirely off the terrain) keeps the previous
/// report rather than failing the fire.
fn analyze_fire(
    fire: &mut FireFrontModel,
    terrain: &dyn TerrainField,
    continuity: &FuelContinuityAnalyzer,
    risk: &ResidentialRiskAssessor,
    zones: &[StructureZone],
    radius: f32,
) {
    let report = match continuity.analyze(fire, terrain, Meters::new(radius)) {
        Ok(report) => Some(report),
        Err(err) => {
            debug!(fire = %fire.id(), "Fuel continuity unavailable: {err}");
            fire.continuity().cloned()
        }
    };
    let assessments = risk.assess(fire, zones);
    fire.set_analysis(report, assessments);
}
