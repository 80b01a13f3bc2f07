//! Fire Front Core Library
//!
//! Wildland/urban-interface fire growth and multi-incident coordination.
//! Terrain, fuel and weather are composed into directional spread rates for
//! a 16-sector fire perimeter; the coordinator runs every active fire in
//! parallel and then ranks them for scarce suppression resources.
//!
//! ## Pipeline
//!
//! - [`TerrainField`] and [`WeatherSample`] feed [`FireFrontModel::advance`]
//! - each fire's perimeter feeds [`FuelContinuityAnalyzer`] and [`ResidentialRiskAssessor`]
//! - [`MultiFireCoordinator`] derives convergence, strain, priority and tactics
//!
//! ## Frame conventions
//!
//! Positions are meters in a local frame (x = east, y = north). Bearings are
//! compass degrees, 0 = north, clockwise. Wind direction is the bearing the
//! wind blows toward.
//!
//! ## Example
//!
//! ```
//! use fire_front_core::{
//!     CoreConfig, Degrees, FuelType, GridTerrain, MultiFireCoordinator, SimTime, Vec2,
//!     WeatherSample,
//! };
//!
//! let terrain = GridTerrain::flat(5000.0, 5000.0, 20.0, 0.0, FuelType::DenseFynbos);
//! let weather = WeatherSample::berg_wind(Degrees::new(270.0), SimTime::from_day_hour(0, 11.0)).unwrap();
//! let mut coordinator = MultiFireCoordinator::new(CoreConfig::default(), weather).unwrap();
//!
//! let fire = coordinator.ignite(&terrain, Vec2::new(3500.0, 2500.0)).unwrap();
//! let report = coordinator.tick(&terrain, 300.0);
//! assert!(!report.degraded);
//! assert_eq!(report.snapshot.ranked_ids(), vec![fire]);
//! ```

pub mod analysis;
pub mod config;
pub mod coordinator;
pub mod core_types;
pub mod error;
pub mod front;
pub mod grid;
pub mod spread;

pub use analysis::{
    BreakEffectiveness, CrownFirePotential, EvacuationPriority, FirebreakSegment,
    FuelContinuityAnalyzer, FuelContinuityReport, ResidentialRiskAssessor, StructureZone,
    ThreatLevel, VulnerabilityFlags, ZoneAssessment, ZoneId,
};
pub use config::{
    ContinuityConfig, CoordinatorConfig, CoreConfig, PriorityWeights, RiskConfig, SpreadConfig,
    TerrainFallback,
};
pub use coordinator::{
    ConvergencePair, ConvergenceRisk, CoordinatorSnapshot, FireFailure, FirePriority, FireView,
    IncidentAssessment, MultiFireCoordinator, ResourceStrain, Station, StationId, StrainLevel,
    TacticalAction, TacticalRecommendation, TickReport, ZoneStatus,
};
pub use core_types::{
    Celsius, DangerIndex, Degrees, FuelType, Hours, Ignitability, KilometersPerHour, Meters,
    MetersPerMinute, Percent, SimTime, Vec2, WeatherSample,
};
pub use error::{FireError, Result};
pub use front::{
    FireFrontModel, FireId, FireStatus, FrontClass, GrowthProjection, ProjectedPerimeter,
    SECTOR_COUNT,
};
pub use grid::{BarrierFlags, GridTerrain, TerrainField, TerrainSample};
pub use spread::{SpotFireCandidate, SpotFireModel};
