//! Per-fire analyses run after each perimeter update: fuel continuity around
//! the perimeter and residential threat to nearby structure zones.

pub mod fuel_continuity;
pub mod residential;

pub use fuel_continuity::{
    BreakEffectiveness, CrownFirePotential, FirebreakSegment, FuelContinuityAnalyzer,
    FuelContinuityReport,
};
pub use residential::{
    EvacuationPriority, ResidentialRiskAssessor, StructureZone, ThreatLevel, VulnerabilityFlags,
    ZoneAssessment, ZoneId,
};
