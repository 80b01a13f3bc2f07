//! Tunable constants for the growth model and the coordination engine.
//!
//! Every threshold here is configuration rather than law: the defaults are
//! reasonable starting points for fynbos/urban-interface fires and are expected
//! to be overridden per region. All structs deserialize with serde so callers
//! can load them from whatever format their pipeline uses.

use crate::error::{FireError, Result};
use serde::{Deserialize, Serialize};

/// What to do when a terrain query falls outside coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainFallback {
    /// Fail the query with `OutOfDomain`
    #[default]
    Propagate,
    /// Treat the location as flat, barrier-free moderate fuel
    AssumeModerateFuel,
}

/// Directional spread-rate and front-classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Spread rate on flat ground in reference fuel, no wind, neutral weather (m/min)
    pub base_rate: f32,
    /// Upper bound on the upslope multiplier
    pub max_slope_multiplier: f32,
    /// Lower bound on the downslope multiplier
    pub downslope_floor: f32,
    /// Head-side wind gain per km/h at full alignment
    pub head_wind_coefficient: f32,
    /// Backing-side wind suppression per km/h at full opposition
    pub backing_wind_coefficient: f32,
    /// Extra multiplier for wind-aligned sectors crossing a wind channel
    pub wind_channel_boost: f32,
    /// Half-angle of the HEAD cone around the wind bearing (degrees)
    pub head_cone: f32,
    /// Half-angle of the BACKING cone around the upwind bearing (degrees)
    pub backing_cone: f32,
    /// Rate ratio over the neighbour mean that marks a FINGER
    pub finger_ratio: f32,
    /// Distance ahead of the perimeter sampled for fuel, slope and barriers (m)
    pub look_ahead: f32,
    /// Minimum distance past the perimeter searched for the nearest barrier (m)
    pub barrier_scan_distance: f32,
    /// Longest projection horizon barriers are searched for (hours). The
    /// search extends to whatever the sector covers in this time.
    pub projection_reach: f32,
    /// Radius of a fresh ignition (m)
    pub initial_radius: f32,
    pub terrain_fallback: TerrainFallback,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            base_rate: 1.5,
            max_slope_multiplier: 4.0,
            downslope_floor: 0.5,
            head_wind_coefficient: 0.05,
            backing_wind_coefficient: 0.03,
            wind_channel_boost: 1.5,
            head_cone: 45.0,
            backing_cone: 45.0,
            finger_ratio: 1.5,
            look_ahead: 30.0,
            barrier_scan_distance: 2000.0,
            projection_reach: 6.0,
            initial_radius: 10.0,
            terrain_fallback: TerrainFallback::Propagate,
        }
    }
}

/// Fuel continuity sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityConfig {
    /// Annulus depth beyond the perimeter (m)
    pub radius: f32,
    /// Radial spokes sampled around the perimeter
    pub spoke_count: usize,
    /// Samples along each spoke
    pub samples_per_spoke: usize,
    /// High-ignitability coverage fraction that counts toward crown-fire potential
    pub high_ignitability_threshold: f32,
    /// Surface/canopy contacts needed to call ladder fuel present
    pub min_ladder_contacts: usize,
    /// Firebreak width needed per kg/m² of fuel it must stop (m)
    pub break_width_per_load: f32,
    /// Firebreak width needed regardless of load (m)
    pub break_width_base: f32,
}

impl Default for ContinuityConfig {
    fn default() -> Self {
        Self {
            radius: 500.0,
            spoke_count: 32,
            samples_per_spoke: 25,
            high_ignitability_threshold: 0.4,
            min_ladder_contacts: 2,
            break_width_per_load: 5.0,
            break_width_base: 5.0,
        }
    }
}

/// Residential threat thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Zones farther than this from the perimeter are not assessed (m)
    pub relevance_radius: f32,
    /// Projected 1-hour perimeter inside this distance escalates evacuation (m)
    pub min_safe_distance: f32,
    /// Anything closer than this is CRITICAL regardless of spread rate (m)
    pub critical_distance: f32,
    /// A HEAD or FINGER sector within this distance makes a zone at least HIGH (m)
    pub head_fire_floor_distance: f32,
    /// Arrival time below which threat is CRITICAL (minutes)
    pub critical_arrival: f32,
    /// Arrival time below which threat is HIGH (minutes)
    pub high_arrival: f32,
    /// Arrival time below which threat is MODERATE (minutes)
    pub moderate_arrival: f32,
    /// Spread rate assumed for a stalled sector when estimating arrival (m/min)
    pub min_rate: f32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            relevance_radius: 5000.0,
            min_safe_distance: 200.0,
            critical_distance: 100.0,
            head_fire_floor_distance: 500.0,
            critical_arrival: 60.0,
            high_arrival: 180.0,
            moderate_arrival: 360.0,
            min_rate: 0.05,
        }
    }
}

/// Weights for the composite fire priority score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub residential: f32,
    pub burned_area: f32,
    pub spread_rate: f32,
    pub crown_fire: f32,
    pub convergence: f32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            residential: 1.0,
            burned_area: 2.0,
            spread_rate: 1.0,
            crown_fire: 1.0,
            convergence: 1.0,
        }
    }
}

/// Cross-incident coordination thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Projected perimeters closer than this are HIGH convergence risk (m)
    pub convergence_high: f32,
    /// Projected perimeters closer than this are MODERATE convergence risk (m)
    pub convergence_moderate: f32,
    /// Projection horizon used for convergence (hours)
    pub convergence_horizon: f32,
    /// Fire/station ratio at or above which strain is MODERATE
    pub strain_moderate: f32,
    /// Fire/station ratio at or above which strain is HIGH
    pub strain_high: f32,
    /// Fire/station ratio at or above which strain is CRITICAL
    pub strain_critical: f32,
    /// Active fires at which unified command is recommended
    pub unified_command_fires: usize,
    /// Turnout time before a crew leaves the station (minutes)
    pub turnout_minutes: f32,
    /// Average road speed for response estimates (km/h)
    pub travel_speed_kmh: f32,
    pub weights: PriorityWeights,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            convergence_high: 1500.0,
            convergence_moderate: 4000.0,
            convergence_horizon: 1.0,
            strain_moderate: 0.4,
            strain_high: 0.7,
            strain_critical: 1.0,
            unified_command_fires: 3,
            turnout_minutes: 3.0,
            travel_speed_kmh: 50.0,
            weights: PriorityWeights::default(),
        }
    }
}

/// Complete core configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub spread: SpreadConfig,
    pub continuity: ContinuityConfig,
    pub risk: RiskConfig,
    pub coordinator: CoordinatorConfig,
}

impl CoreConfig {
    /// Check ranges and orderings that the algorithms rely on.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let s = &self.spread;
        positive("spread.base_rate", s.base_rate)?;
        if s.max_slope_multiplier < 1.0 {
            return invalid("spread.max_slope_multiplier must be >= 1.0");
        }
        if !(0.0..=1.0).contains(&s.downslope_floor) {
            return invalid("spread.downslope_floor must be within 0..=1");
        }
        if s.head_cone + s.backing_cone >= 180.0 {
            return invalid("spread.head_cone + spread.backing_cone must leave room for flanks");
        }
        if s.finger_ratio <= 1.0 {
            return invalid("spread.finger_ratio must exceed 1.0");
        }
        positive("spread.look_ahead", s.look_ahead)?;
        positive("spread.barrier_scan_distance", s.barrier_scan_distance)?;
        positive("spread.projection_reach", s.projection_reach)?;
        positive("spread.initial_radius", s.initial_radius)?;

        let c = &self.continuity;
        positive("continuity.radius", c.radius)?;
        if c.spoke_count < 4 || c.samples_per_spoke < 2 {
            return invalid("continuity needs at least 4 spokes and 2 samples per spoke");
        }

        let r = &self.risk;
        if !(r.critical_arrival < r.high_arrival && r.high_arrival < r.moderate_arrival) {
            return invalid("risk arrival thresholds must be strictly increasing");
        }
        positive("risk.min_rate", r.min_rate)?;

        let k = &self.coordinator;
        if k.convergence_high >= k.convergence_moderate {
            return invalid("coordinator.convergence_high must be below convergence_moderate");
        }
        if !(k.strain_moderate < k.strain_high && k.strain_high < k.strain_critical) {
            return invalid("coordinator strain thresholds must be strictly increasing");
        }
        positive("coordinator.travel_speed_kmh", k.travel_speed_kmh)?;
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FireError::InvalidConfig(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn invalid(message: &str) -> Result<()> {
    Err(FireError::InvalidConfig(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn overlapping_cones_are_rejected() {
        let mut cfg = CoreConfig::default();
        cfg.spread.head_cone = 100.0;
        cfg.spread.backing_cone = 90.0;
        assert!(matches!(cfg.validate(), Err(FireError::InvalidConfig(_))));
    }

    #[test]
    fn unordered_strain_thresholds_are_rejected() {
        let mut cfg = CoreConfig::default();
        cfg.coordinator.strain_high = 0.2;
        assert!(cfg.validate().is_err());
    }
}
