//! Ember spotting ahead of the head fire.
//!
//! Strong wind and an intense head fire loft burning material downwind,
//! starting spot fires beyond the main perimeter. The model is deliberately
//! coarse: a launch probability scaled by wind and head-fire intensity, and
//! landing points scattered within ±45° of the wind between 100 m and a
//! wind/intensity-scaled maximum. Candidates are handed back to the caller,
//! which decides whether to ignite them.

use crate::core_types::units::{Degrees, Meters, MetersPerMinute};
use crate::core_types::{bearing_unit, Vec2, WeatherSample};
use crate::front::FireFrontModel;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A potential spot-fire landing point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotFireCandidate {
    pub position: Vec2,
    /// Distance from the head-fire launch point
    pub distance: Meters,
    pub bearing: Degrees,
}

/// Ember spotting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotFireModel {
    /// Shortest spotting distance considered (m)
    pub min_distance: f32,
    /// Longest spotting distance regardless of conditions (m)
    pub max_distance_cap: f32,
    /// Angular scatter either side of the wind bearing (degrees)
    pub scatter_half_angle: f32,
    /// Launch probability at 30 km/h wind and full intensity
    pub probability_scale: f32,
    /// Head-fire rate treated as full intensity (m/min)
    pub intense_rate: f32,
    /// Most landing points generated per call
    pub max_candidates: usize,
}

impl Default for SpotFireModel {
    fn default() -> Self {
        Self {
            min_distance: 100.0,
            max_distance_cap: 2000.0,
            scatter_half_angle: 45.0,
            probability_scale: 0.3,
            intense_rate: 20.0,
            max_candidates: 3,
        }
    }
}

impl SpotFireModel {
    /// Head-fire intensity on a 0-1 scale
    fn intensity(&self, head_rate: MetersPerMinute) -> f32 {
        (*head_rate / self.intense_rate).clamp(0.0, 1.0)
    }

    /// Chance that the head fire launches spotting embers this call
    #[must_use]
    pub fn probability(&self, weather: &WeatherSample, head_rate: MetersPerMinute) -> f32 {
        let wind = *weather.wind_speed() / 30.0;
        (wind * self.intensity(head_rate) * self.probability_scale).clamp(0.0, 1.0)
    }

    /// Maximum spotting distance under these conditions
    #[must_use]
    pub fn max_distance(&self, weather: &WeatherSample, head_rate: MetersPerMinute) -> Meters {
        let reach = self.min_distance
            + *weather.wind_speed() * 30.0
            + self.intensity(head_rate) * 1000.0;
        Meters::new(reach.min(self.max_distance_cap))
    }

    /// Draw spot-fire landing points downwind of the fire's head.
    ///
    /// Returns an empty list when no embers launch. Results are deterministic
    /// for a seeded `rng`.
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        fire: &FireFrontModel,
        weather: &WeatherSample,
        rng: &mut R,
    ) -> Vec<SpotFireCandidate> {
        let head = fire.head_sector();
        let head_rate = fire.sector_rate(head);
        let p = self.probability(weather, head_rate);
        if p <= 0.0 || rng.random::<f32>() >= p || self.max_candidates == 0 {
            return Vec::new();
        }

        let launch = fire.perimeter_point(head);
        let max_distance = *self.max_distance(weather, head_rate);
        let count = rng.random_range(1..=self.max_candidates);
        (0..count)
            .map(|_| {
                let distance = if max_distance > self.min_distance {
                    rng.random_range(self.min_distance..=max_distance)
                } else {
                    self.min_distance
                };
                let scatter = rng.random_range(-self.scatter_half_angle..=self.scatter_half_angle);
                let bearing = (weather.wind_direction() + scatter).normalized();
                SpotFireCandidate {
                    position: launch + bearing_unit(bearing) * distance,
                    distance: Meters::new(distance),
                    bearing,
                }
            })
            .collect()
    }
}
