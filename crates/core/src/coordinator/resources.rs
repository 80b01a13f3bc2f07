//! Response stations and resource strain.

use crate::config::CoordinatorConfig;
use crate::core_types::units::Meters;
use crate::core_types::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a response station
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A fire station or staging base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub position: Vec2,
    /// Minutes from alert to wheels rolling; the coordinator default applies when `None`
    pub turnout_minutes: Option<f32>,
    /// Crews or appliances the station can commit at once
    pub capacity: u32,
    /// Stations taken out of service do not count toward supply
    pub available: bool,
}

impl Station {
    #[must_use]
    pub fn new(id: StationId, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            turnout_minutes: None,
            capacity: 1,
            available: true,
        }
    }

    #[must_use]
    pub fn with_turnout(mut self, minutes: f32) -> Self {
        self.turnout_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Turnout plus road travel to `target`, in minutes
    #[must_use]
    pub fn response_minutes(&self, target: Vec2, config: &CoordinatorConfig) -> f32 {
        let km = (target - self.position).norm() / 1000.0;
        let turnout = self.turnout_minutes.unwrap_or(config.turnout_minutes);
        turnout + km / config.travel_speed_kmh * 60.0
    }
}

/// Closest available station to a fire and how long it takes to get there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationResponse {
    pub station: StationId,
    pub distance: Meters,
    pub response_minutes: f32,
}

/// Nearest available station to `target`, lowest id on ties
#[must_use]
pub fn nearest_station(
    stations: &[Station],
    target: Vec2,
    config: &CoordinatorConfig,
) -> Option<StationResponse> {
    stations
        .iter()
        .filter(|s| s.available)
        .map(|s| (s, (target - s.position).norm()))
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))
        .map(|(station, distance)| StationResponse {
            station: station.id,
            distance: Meters::new(distance),
            response_minutes: station.response_minutes(target, config),
        })
}

/// Demand on response capacity across all incidents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrainLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl StrainLevel {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StrainLevel::Low => "LOW",
            StrainLevel::Moderate => "MODERATE",
            StrainLevel::High => "HIGH",
            StrainLevel::Critical => "CRITICAL",
        }
    }
}

/// Fire-to-capacity ratio and the command structure it calls for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStrain {
    pub active_fires: usize,
    pub available_stations: usize,
    /// Summed capacity of the available stations
    pub available_capacity: u32,
    /// Active fires per unit of available capacity; infinite with none
    pub ratio: f32,
    pub level: StrainLevel,
    pub unified_command: bool,
}

impl ResourceStrain {
    /// Bucket the ratio of active fires to available station capacity.
    ///
    /// With no available capacity any active fire is CRITICAL strain.
    #[must_use]
    pub fn compute(active_fires: usize, stations: &[Station], config: &CoordinatorConfig) -> Self {
        let (available_stations, available_capacity) = stations
            .iter()
            .filter(|s| s.available)
            .fold((0, 0u32), |(n, cap), s| (n + 1, cap.saturating_add(s.capacity)));
        let ratio = match (active_fires, available_capacity) {
            (0, _) => 0.0,
            (_, 0) => f32::INFINITY,
            (f, c) => f as f32 / c as f32,
        };
        let level = if ratio >= config.strain_critical {
            StrainLevel::Critical
        } else if ratio >= config.strain_high {
            StrainLevel::High
        } else if ratio >= config.strain_moderate {
            StrainLevel::Moderate
        } else {
            StrainLevel::Low
        };
        Self {
            active_fires,
            available_stations,
            available_capacity,
            ratio,
            level,
            unified_command: active_fires >= config.unified_command_fires,
        }
    }
}
