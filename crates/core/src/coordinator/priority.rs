//! Composite fire priority scoring and ranking.
//!
//! ```text
//! score = w_res  × Σ zone threat severity
//!       + w_area × ln(1 + burned hectares)
//!       + w_rate × max sector rate / 10
//!       + w_crown × crown-fire weight
//!       + w_conv × Σ proximity-weighted convergence risk
//! ```
//!
//! Ranking is a total order: score descending, then earliest ignition, then
//! lowest id.

use super::convergence::ConvergencePair;
use crate::analysis::{CrownFirePotential, ThreatLevel};
use crate::config::CoordinatorConfig;
use crate::core_types::units::SimTime;
use crate::front::{FireFrontModel, FireId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score components before weighting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriorityComponents {
    pub residential: f32,
    pub burned_area: f32,
    pub spread_rate: f32,
    pub crown_fire: f32,
    pub convergence: f32,
}

/// One fire's place in the resource-allocation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirePriority {
    pub fire: FireId,
    pub score: f32,
    pub ignited_at: SimTime,
    pub components: PriorityComponents,
}

impl FirePriority {
    /// Ranking order: higher score first, older fire first on ties
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.ignited_at.cmp(&other.ignited_at))
            .then_with(|| self.fire.cmp(&other.fire))
    }
}

fn crown_weight(potential: CrownFirePotential) -> f32 {
    match potential {
        CrownFirePotential::Low => 0.0,
        CrownFirePotential::Medium => 5.0,
        CrownFirePotential::High => 10.0,
    }
}

/// Score one fire against the current convergence pairs
#[must_use]
pub fn score_fire(
    fire: &FireFrontModel,
    pairs: &[ConvergencePair],
    config: &CoordinatorConfig,
) -> FirePriority {
    let residential = fire
        .zone_risk()
        .iter()
        .map(|z| {
            let asset = if z.critical_asset && z.threat >= ThreatLevel::High {
                2.0
            } else {
                1.0
            };
            z.threat.severity() * asset
        })
        .sum::<f32>();
    let components = PriorityComponents {
        residential,
        burned_area: fire.burned_hectares().ln_1p(),
        spread_rate: *fire.max_rate() / 10.0,
        crown_fire: fire
            .continuity()
            .map_or(0.0, |c| crown_weight(c.crown_fire_potential)),
        convergence: pairs
            .iter()
            .filter(|p| p.involves(fire.id()))
            .map(|p| p.proximity_weight(config))
            .sum(),
    };

    let w = &config.weights;
    let score = w.residential * components.residential
        + w.burned_area * components.burned_area
        + w.spread_rate * components.spread_rate
        + w.crown_fire * components.crown_fire
        + w.convergence * components.convergence;

    FirePriority {
        fire: fire.id(),
        score,
        ignited_at: fire.ignited_at(),
        components,
    }
}

/// Sort priorities into allocation order
#[must_use]
pub fn rank(mut priorities: Vec<FirePriority>) -> Vec<FirePriority> {
    priorities.sort_by(FirePriority::rank_cmp);
    priorities
}
