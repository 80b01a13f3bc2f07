//! Threat to structure zones near a fire.
//!
//! For every zone within the relevance radius the assessor finds the
//! perimeter sector that would reach it first (distance over that sector's
//! realized rate), derives a threat level, and maps it to an evacuation
//! priority:
//!
//! | Threat   | Evacuation |
//! |----------|------------|
//! | CRITICAL | IMMEDIATE  |
//! | HIGH     | URGENT     |
//! | MODERATE | STANDBY    |
//! | LOW      | MONITOR    |
//!
//! Evacuation moves up one level for zones with vulnerable residents, and one
//! more if the +1h projection comes within the minimum safe distance.

use crate::config::RiskConfig;
use crate::core_types::units::{Hours, Meters};
use crate::core_types::{bearing_between, distance_to_polygon, Vec2};
use crate::front::{
    sector_bearing, sector_for_bearing, FireFrontModel, FireId, FrontClass, SECTOR_COUNT,
    SECTOR_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a structure zone in the static dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.0)
    }
}

/// Populations that need extra time or help to evacuate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct VulnerabilityFlags {
    pub elderly: bool,
    pub mobility_impaired: bool,
    pub young_children: bool,
}

impl VulnerabilityFlags {
    pub const NONE: VulnerabilityFlags = VulnerabilityFlags {
        elderly: false,
        mobility_impaired: false,
        young_children: false,
    };

    /// Number of flags set
    #[must_use]
    pub fn count(self) -> usize {
        usize::from(self.elderly) + usize::from(self.mobility_impaired) + usize::from(self.young_children)
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.count() > 0
    }
}

/// A cluster of structures from the static dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureZone {
    pub id: ZoneId,
    pub name: String,
    pub position: Vec2,
    pub structures: u32,
    pub vulnerability: VulnerabilityFlags,
    /// Hospital, school, substation or similar
    pub critical_asset: bool,
    /// Distance to the nearest active perimeter, refreshed every tick
    pub perimeter_distance: Option<Meters>,
}

impl StructureZone {
    #[must_use]
    pub fn new(id: ZoneId, name: impl Into<String>, position: Vec2, structures: u32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            structures,
            vulnerability: VulnerabilityFlags::NONE,
            critical_asset: false,
            perimeter_distance: None,
        }
    }

    #[must_use]
    pub fn with_vulnerability(mut self, vulnerability: VulnerabilityFlags) -> Self {
        self.vulnerability = vulnerability;
        self
    }

    #[must_use]
    pub fn with_critical_asset(mut self) -> Self {
        self.critical_asset = true;
        self
    }
}

/// Threat a fire poses to a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl ThreatLevel {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Moderate => "MODERATE",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            ThreatLevel::Low => 0,
            ThreatLevel::Moderate => 1,
            ThreatLevel::High => 2,
            ThreatLevel::Critical => 3,
        }
    }

    /// Weight used when aggregating threat into fire priority
    #[must_use]
    pub const fn severity(self) -> f32 {
        match self {
            ThreatLevel::Low => 1.0,
            ThreatLevel::Moderate => 3.0,
            ThreatLevel::High => 6.0,
            ThreatLevel::Critical => 10.0,
        }
    }

    /// Direct mapping before vulnerability and projection upgrades
    #[must_use]
    pub const fn evacuation(self) -> EvacuationPriority {
        match self {
            ThreatLevel::Low => EvacuationPriority::Monitor,
            ThreatLevel::Moderate => EvacuationPriority::Standby,
            ThreatLevel::High => EvacuationPriority::Urgent,
            ThreatLevel::Critical => EvacuationPriority::Immediate,
        }
    }
}

/// Evacuation instruction for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvacuationPriority {
    Monitor,
    Standby,
    Urgent,
    Immediate,
}

impl EvacuationPriority {
    /// One level more urgent, saturating at IMMEDIATE
    #[must_use]
    pub const fn upgraded(self) -> Self {
        match self {
            EvacuationPriority::Monitor => EvacuationPriority::Standby,
            EvacuationPriority::Standby => EvacuationPriority::Urgent,
            EvacuationPriority::Urgent | EvacuationPriority::Immediate => EvacuationPriority::Immediate,
        }
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            EvacuationPriority::Monitor => 0,
            EvacuationPriority::Standby => 1,
            EvacuationPriority::Urgent => 2,
            EvacuationPriority::Immediate => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EvacuationPriority::Monitor => "MONITOR",
            EvacuationPriority::Standby => "STANDBY",
            EvacuationPriority::Urgent => "URGENT",
            EvacuationPriority::Immediate => "IMMEDIATE",
        }
    }
}

/// One fire's threat to one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssessment {
    pub zone: ZoneId,
    pub fire: FireId,
    /// Distance to the nearest point of the current perimeter
    pub distance: Meters,
    /// Sector expected to reach the zone first
    pub threatening_sector: usize,
    pub sector_class: FrontClass,
    /// Minutes until the threatening sector arrives at its current rate
    pub arrival_minutes: f32,
    pub threat: ThreatLevel,
    pub evacuation: EvacuationPriority,
    pub structures_at_risk: u32,
    pub vulnerable_flags: usize,
    pub critical_asset: bool,
    /// Ordering score: evacuation rank, then threat level, then proximity
    pub score: f32,
}

impl ZoneAssessment {
    /// Priority order: score descending, then more vulnerable flags, then zone id
    #[must_use]
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.vulnerable_flags.cmp(&self.vulnerable_flags))
            .then_with(|| self.zone.cmp(&other.zone))
    }
}

/// Turns a fire's perimeter into per-zone threat and evacuation advice
#[derive(Debug, Clone, Default)]
pub struct ResidentialRiskAssessor {
    config: RiskConfig,
}

impl ResidentialRiskAssessor {
    #[must_use]
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Assess every zone within the relevance radius of the fire's perimeter.
    ///
    /// Results are ordered by [`ZoneAssessment::priority_cmp`].
    #[must_use]
    pub fn assess(&self, fire: &FireFrontModel, zones: &[StructureZone]) -> Vec<ZoneAssessment> {
        let perimeter = fire.perimeter_polygon();
        let one_hour = fire.project(&[Hours::new(1.0)]);
        let projected = one_hour
            .perimeters
            .first()
            .map(|p| p.polygon(one_hour.origin));

        let mut out: Vec<ZoneAssessment> = zones
            .iter()
            .filter_map(|zone| {
                let distance = distance_to_polygon(&perimeter, zone.position);
                if distance > self.config.relevance_radius {
                    return None;
                }
                let projected_distance = projected
                    .as_ref()
                    .map_or(distance, |poly| distance_to_polygon(poly, zone.position));
                Some(self.assess_zone(fire, zone, distance, projected_distance))
            })
            .collect();
        out.sort_by(ZoneAssessment::priority_cmp);
        out
    }

    fn assess_zone(
        &self,
        fire: &FireFrontModel,
        zone: &StructureZone,
        distance: f32,
        projected_distance: f32,
    ) -> ZoneAssessment {
        let cfg = &self.config;
        let sectors = fire.sectors();

        // Sectors whose outward direction points at the zone, give or take one
        let toward_zone = bearing_between(fire.ignition(), zone.position);
        let mut threatening = sector_for_bearing(toward_zone);
        let mut arrival = f32::INFINITY;
        let mut running_nearby = false;
        for i in 0..SECTOR_COUNT {
            if sector_bearing(i).separation(toward_zone) > SECTOR_WIDTH {
                continue;
            }
            let gap = if distance <= 0.0 {
                0.0
            } else {
                (zone.position - fire.perimeter_point(i)).norm()
            };
            let minutes = gap / (*sectors[i].rate).max(cfg.min_rate);
            if minutes < arrival {
                arrival = minutes;
                threatening = i;
            }
            if sectors[i].class.is_running() && gap <= cfg.head_fire_floor_distance {
                running_nearby = true;
            }
        }

        let mut threat = if distance < cfg.critical_distance || arrival < cfg.critical_arrival {
            ThreatLevel::Critical
        } else if arrival < cfg.high_arrival {
            ThreatLevel::High
        } else if arrival < cfg.moderate_arrival {
            ThreatLevel::Moderate
        } else {
            ThreatLevel::Low
        };
        if running_nearby {
            threat = threat.max(ThreatLevel::High);
        }

        let mut evacuation = threat.evacuation();
        if zone.vulnerability.any() {
            evacuation = evacuation.upgraded();
        }
        if projected_distance < cfg.min_safe_distance {
            evacuation = evacuation.upgraded();
        }

        let structures_at_risk = match threat {
            ThreatLevel::Critical | ThreatLevel::High => zone.structures,
            ThreatLevel::Moderate => zone.structures.div_ceil(2),
            ThreatLevel::Low => 0,
        };

        let closeness = 1.0 - (distance / cfg.relevance_radius).clamp(0.0, 1.0);
        let score = f32::from(evacuation.rank()) * 100.0 + f32::from(threat.rank()) * 10.0 + closeness * 10.0;

        ZoneAssessment {
            zone: zone.id,
            fire: fire.id(),
            distance: Meters::new(distance),
            threatening_sector: threatening,
            sector_class: sectors[threatening].class,
            arrival_minutes: arrival,
            threat,
            evacuation,
            structures_at_risk,
            vulnerable_flags: zone.vulnerability.count(),
            critical_asset: zone.critical_asset,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpreadConfig;
    use crate::core_types::units::{Celsius, Degrees, KilometersPerHour, Percent, SimTime};
    use crate::core_types::{FuelType, WeatherSample};
    use crate::grid::GridTerrain;

    fn setup(wind: f32) -> FireFrontModel {
        let terrain = GridTerrain::flat(6000.0, 6000.0, 10.0, 0.0, FuelType::DenseFynbos);
        let weather = WeatherSample::new(
            KilometersPerHour::new(wind),
            Degrees::new(90.0),
            Percent::new(15.0),
            Celsius::new(32.0),
            SimTime::from_day_hour(0, 13.0),
        )
        .unwrap();
        FireFrontModel::ignite(FireId(1), Vec2::new(3000.0, 3000.0), &terrain, &weather, &SpreadConfig::default())
            .unwrap()
    }

    #[test]
    fn fast_head_outranks_closer_backing() {
        let fire = setup(50.0);
        let head_zone = StructureZone::new(ZoneId(1), "downwind", Vec2::new(3310.0, 3000.0), 40);
        let back_zone = StructureZone::new(ZoneId(2), "upwind", Vec2::new(2750.0, 3000.0), 40);
        let out = ResidentialRiskAssessor::default().assess(&fire, &[back_zone, head_zone]);

        let head = out.iter().find(|a| a.zone == ZoneId(1)).unwrap();
        let back = out.iter().find(|a| a.zone == ZoneId(2)).unwrap();
        assert_eq!(head.threat, ThreatLevel::Critical, "300 m ahead of a fast head fire");
        assert!(back.threat < head.threat, "closer zone behind a slow backing fire is less threatened");
        assert_eq!(out[0].zone, ZoneId(1));
    }

    #[test]
    fn vulnerable_zone_is_upgraded() {
        let fire = setup(10.0);
        let plain = StructureZone::new(ZoneId(1), "plain", Vec2::new(3000.0, 4500.0), 10);
        let aged = StructureZone::new(ZoneId(2), "aged care", Vec2::new(3000.0, 4500.0), 10)
            .with_vulnerability(VulnerabilityFlags {
                elderly: true,
                ..VulnerabilityFlags::NONE
            });
        let out = ResidentialRiskAssessor::default().assess(&fire, &[plain, aged]);
        let plain = out.iter().find(|a| a.zone == ZoneId(1)).unwrap();
        let aged = out.iter().find(|a| a.zone == ZoneId(2)).unwrap();
        assert_eq!(plain.threat, aged.threat);
        assert_eq!(aged.evacuation, plain.evacuation.upgraded());
    }

    #[test]
    fn equal_scores_prefer_more_vulnerable_flags() {
        let base = |zone: u32, flags: usize| ZoneAssessment {
            zone: ZoneId(zone),
            fire: FireId(1),
            distance: Meters::new(400.0),
            threatening_sector: 0,
            sector_class: FrontClass::Head,
            arrival_minutes: 30.0,
            threat: ThreatLevel::Critical,
            evacuation: EvacuationPriority::Immediate,
            structures_at_risk: 5,
            vulnerable_flags: flags,
            critical_asset: false,
            score: 390.0,
        };
        let mut list = vec![base(1, 0), base(2, 2), base(3, 1)];
        list.sort_by(ZoneAssessment::priority_cmp);
        let order: Vec<u32> = list.iter().map(|a| a.zone.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn distant_zones_are_ignored() {
        let fire = setup(20.0);
        let far = StructureZone::new(ZoneId(9), "far", Vec2::new(3000.0, 9000.0), 100);
        assert!(ResidentialRiskAssessor::default().assess(&fire, &[far]).is_empty());
    }

    #[test]
    fn moderate_threat_counts_half_the_structures() {
        // Calm air: every sector spreads at the same ~5.3 m/min, 1.5 km away
        let fire = setup(0.0);
        let zone = StructureZone::new(ZoneId(1), "edge", Vec2::new(3000.0, 4510.0), 7);
        let out = ResidentialRiskAssessor::default().assess(&fire, &[zone]);
        assert_eq!(out[0].threat, ThreatLevel::Moderate);
        assert_eq!(out[0].evacuation, EvacuationPriority::Standby);
        assert_eq!(out[0].structures_at_risk, 4);
    }
}
