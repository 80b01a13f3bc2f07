//! Per-incident response assessment: containment difficulty, risk flags,
//! primary strategy and the nearest responding station.

use super::resources::{nearest_station, ResourceStrain, Station, StationResponse, StrainLevel};
use crate::analysis::{CrownFirePotential, ThreatLevel};
use crate::config::CoordinatorConfig;
use crate::front::{FireFrontModel, FireId};
use serde::{Deserialize, Serialize};

/// Slope above which terrain is treated as rough for access
const ROUGH_SLOPE_DEGREES: f32 = 15.0;
/// Water fraction of the surrounding annulus above which operations are water-based
const WATER_FRACTION: f32 = 0.5;
/// Sector rate treated as 100% intensity (m/min)
const FULL_INTENSITY_RATE: f32 = 30.0;

/// Terrain character around an incident as it affects access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainAccess {
    Open,
    Rough,
    Coastal,
    Water,
}

impl TerrainAccess {
    fn difficulty(self) -> f32 {
        match self {
            TerrainAccess::Water => 0.0,
            TerrainAccess::Open | TerrainAccess::Coastal => 2.0,
            TerrainAccess::Rough => 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainmentDifficulty {
    Easy,
    Moderate,
    Difficult,
}

impl ContainmentDifficulty {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ContainmentDifficulty::Easy => "EASY",
            ContainmentDifficulty::Moderate => "MODERATE",
            ContainmentDifficulty::Difficult => "DIFFICULT",
        }
    }
}

/// Escalation factors flagged for an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFlag {
    RapidSpread,
    AccessDifficulty,
    StructuralThreat,
    ResourceStrain,
    CrownFire,
}

impl RiskFlag {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RiskFlag::RapidSpread => "RAPID_SPREAD",
            RiskFlag::AccessDifficulty => "ACCESS_DIFFICULTY",
            RiskFlag::StructuralThreat => "STRUCTURAL_THREAT",
            RiskFlag::ResourceStrain => "RESOURCE_STRAIN",
            RiskFlag::CrownFire => "CROWN_FIRE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStrategy {
    Standard,
    AggressiveAttack,
    PerimeterControl,
    WaterAccess,
}

impl ResponseStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ResponseStrategy::Standard => "STANDARD",
            ResponseStrategy::AggressiveAttack => "AGGRESSIVE_ATTACK",
            ResponseStrategy::PerimeterControl => "PERIMETER_CONTROL",
            ResponseStrategy::WaterAccess => "WATER_ACCESS",
        }
    }
}

/// Response picture for one incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentAssessment {
    pub fire: FireId,
    /// Head-fire intensity on a 0-100 scale
    pub intensity: f32,
    pub access: TerrainAccess,
    pub difficulty: ContainmentDifficulty,
    pub risks: Vec<RiskFlag>,
    pub strategy: ResponseStrategy,
    /// `None` when no station is available
    pub primary_station: Option<StationResponse>,
}

impl IncidentAssessment {
    #[must_use]
    pub fn has(&self, flag: RiskFlag) -> bool {
        self.risks.contains(&flag)
    }
}

/// Assess one fire against the station list and current strain
#[must_use]
pub fn assess_incident(
    fire: &FireFrontModel,
    stations: &[Station],
    strain: &ResourceStrain,
    config: &CoordinatorConfig,
) -> IncidentAssessment {
    let max_rate = *fire.max_rate();
    let intensity = (max_rate / FULL_INTENSITY_RATE * 100.0).clamp(0.0, 100.0);
    // Growth in tens of meters per minute
    let growth = max_rate / 10.0;

    let access = match fire.continuity() {
        Some(c) if c.water_fraction() > WATER_FRACTION => TerrainAccess::Water,
        Some(c) if *c.mean_slope > ROUGH_SLOPE_DEGREES => TerrainAccess::Rough,
        Some(c) if c.water_samples > 0 => TerrainAccess::Coastal,
        _ => TerrainAccess::Open,
    };

    let score = access.difficulty() + intensity / 20.0 + growth * 2.0;
    let difficulty = if score < 3.0 {
        ContainmentDifficulty::Easy
    } else if score < 6.0 {
        ContainmentDifficulty::Moderate
    } else {
        ContainmentDifficulty::Difficult
    };

    let primary_station = nearest_station(stations, fire.ignition(), config);

    let mut risks = Vec::new();
    if growth > 1.0 {
        risks.push(RiskFlag::RapidSpread);
    }
    if access == TerrainAccess::Rough {
        risks.push(RiskFlag::AccessDifficulty);
    }
    if fire.zone_risk().iter().any(|z| z.threat >= ThreatLevel::High) {
        risks.push(RiskFlag::StructuralThreat);
    }
    if intensity > 70.0 || strain.level >= StrainLevel::High {
        risks.push(RiskFlag::ResourceStrain);
    }
    if fire
        .continuity()
        .is_some_and(|c| c.crown_fire_potential == CrownFirePotential::High)
    {
        risks.push(RiskFlag::CrownFire);
    }

    let strategy = if intensity > 60.0 {
        ResponseStrategy::AggressiveAttack
    } else {
        match access {
            TerrainAccess::Rough => ResponseStrategy::PerimeterControl,
            TerrainAccess::Water | TerrainAccess::Coastal => ResponseStrategy::WaterAccess,
            TerrainAccess::Open => ResponseStrategy::Standard,
        }
    };

    IncidentAssessment {
        fire: fire.id(),
        intensity,
        access,
        difficulty,
        risks,
        strategy,
        primary_station,
    }
}
