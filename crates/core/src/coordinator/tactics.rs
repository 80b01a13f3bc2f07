//! Tactical recommendations per front classification.
//!
//! A fixed lookup from front class to actions, refined by whether the
//! sectors in that class are the ones threatening structures.

use crate::analysis::ThreatLevel;
use crate::front::{FireFrontModel, FireId, FrontClass};
use serde::{Deserialize, Serialize};

/// Suppression actions the coordinator can recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticalAction {
    HeavyGroundCrews,
    AerialSupport,
    StructureProtection,
    ContainmentLine,
    SafetyZone,
    Monitor,
    CorridorBlocking,
    AcceleratedSpreadWarning,
}

impl TacticalAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TacticalAction::HeavyGroundCrews => "heavy ground crews",
            TacticalAction::AerialSupport => "aerial support",
            TacticalAction::StructureProtection => "structure protection",
            TacticalAction::ContainmentLine => "containment line",
            TacticalAction::SafetyZone => "safety zone",
            TacticalAction::Monitor => "monitor",
            TacticalAction::CorridorBlocking => "terrain corridor blocking",
            TacticalAction::AcceleratedSpreadWarning => "accelerated spread warning",
        }
    }
}

/// Recommendation for all sectors of one fire sharing a front class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalRecommendation {
    pub fire: FireId,
    pub class: FrontClass,
    pub sectors: Vec<usize>,
    pub actions: Vec<TacticalAction>,
    /// These sectors are the first to reach a threatened zone
    pub threatens_structures: bool,
}

/// Lookup for a class given whether its sectors threaten structures or a critical asset
#[must_use]
pub fn actions_for(class: FrontClass, threatens_structures: bool, threatens_critical_asset: bool) -> Vec<TacticalAction> {
    use TacticalAction::{
        AcceleratedSpreadWarning, AerialSupport, ContainmentLine, CorridorBlocking,
        HeavyGroundCrews, Monitor, SafetyZone, StructureProtection,
    };
    match class {
        FrontClass::Head if threatens_structures => {
            vec![HeavyGroundCrews, AerialSupport, StructureProtection]
        }
        FrontClass::Head => vec![HeavyGroundCrews, AerialSupport],
        FrontClass::LeftFlank | FrontClass::RightFlank => vec![ContainmentLine, SafetyZone],
        FrontClass::Backing if threatens_critical_asset => vec![ContainmentLine, StructureProtection],
        FrontClass::Backing => vec![Monitor],
        FrontClass::Finger => vec![CorridorBlocking, AcceleratedSpreadWarning],
    }
}

/// Recommendations for every front class present on `fire`
#[must_use]
pub fn recommend(fire: &FireFrontModel) -> Vec<TacticalRecommendation> {
    const ORDER: [FrontClass; 5] = [
        FrontClass::Head,
        FrontClass::Finger,
        FrontClass::LeftFlank,
        FrontClass::RightFlank,
        FrontClass::Backing,
    ];
    let classes = fire.classes();
    let threats: Vec<_> = fire
        .zone_risk()
        .iter()
        .filter(|z| z.threat >= ThreatLevel::Moderate)
        .collect();

    ORDER
        .into_iter()
        .filter_map(|class| {
            let sectors: Vec<usize> = (0..classes.len()).filter(|&i| classes[i] == class).collect();
            if sectors.is_empty() {
                return None;
            }
            let facing: Vec<_> = threats
                .iter()
                .filter(|z| sectors.contains(&z.threatening_sector))
                .collect();
            let threatens_structures = !facing.is_empty();
            let threatens_asset = facing.iter().any(|z| z.critical_asset);
            Some(TacticalRecommendation {
                fire: fire.id(),
                class,
                actions: actions_for(class, threatens_structures, threatens_asset),
                sectors,
                threatens_structures,
            })
        })
        .collect()
}
