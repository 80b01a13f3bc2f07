//! Directional spread-rate computation.
//!
//! Each perimeter sector's rate of spread is the product of four independent
//! multipliers on a weather-scaled base rate:
//!
//! ```text
//! rate = base_rate × slope_factor × fuel_factor × wind_factor
//! ```
//!
//! A blocking barrier (water, cliff, firebreak) ahead of the sector is a hard
//! ceiling: the rate is zero regardless of the multipliers.

pub mod spotting;
pub mod terrain_slope;
pub mod wind;

use crate::config::SpreadConfig;
use crate::core_types::units::{Degrees, MetersPerMinute};
use crate::core_types::WeatherSample;
use crate::grid::TerrainSample;

pub use spotting::{SpotFireCandidate, SpotFireModel};
pub use terrain_slope::{calculate_effective_slope, calculate_slope_factor};
pub use wind::{channel_factor, wind_factor};

/// Breakdown of one sector's spread rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorSpread {
    pub rate: MetersPerMinute,
    pub slope_factor: f32,
    pub fuel_factor: f32,
    /// Wind alignment factor including any wind-channel boost
    pub wind_factor: f32,
    /// A blocking barrier clamped the rate to zero
    pub blocked: bool,
    /// The sector crosses a wind channel while facing downwind
    pub channelled: bool,
}

/// Weather-scaled base rate before directional multipliers
#[must_use]
pub fn base_rate(config: &SpreadConfig, weather: &WeatherSample) -> MetersPerMinute {
    MetersPerMinute::new(config.base_rate * weather.base_spread_factor())
}

/// Compute the spread rate for a sector facing `bearing`.
///
/// # Arguments
///
/// * `config` - Spread parameters
/// * `weather` - Current weather sample
/// * `bearing` - Outward bearing of the sector
/// * `ahead` - Terrain just beyond the sector's perimeter
/// * `barrier_ahead` - A blocking barrier lies within look-ahead distance
#[must_use]
pub fn sector_spread(
    config: &SpreadConfig,
    weather: &WeatherSample,
    bearing: Degrees,
    ahead: &TerrainSample,
    barrier_ahead: bool,
) -> SectorSpread {
    let effective_slope = calculate_effective_slope(ahead.slope, ahead.aspect, bearing);
    let slope_factor = calculate_slope_factor(
        effective_slope,
        config.max_slope_multiplier,
        config.downslope_floor,
    );
    let fuel_factor = ahead.fuel.spread_multiplier();

    let wind_bearing = weather.wind_direction();
    let mut wind = wind_factor(
        bearing,
        wind_bearing,
        weather.wind_speed(),
        config.head_wind_coefficient,
        config.backing_wind_coefficient,
    );
    let channelled = ahead.barriers.wind_channel && bearing.separation(wind_bearing) < 90.0;
    if channelled {
        wind *= channel_factor(bearing, wind_bearing, config.wind_channel_boost);
    }

    let blocked = barrier_ahead || ahead.barriers.blocks_spread();
    let rate = if blocked {
        MetersPerMinute::ZERO
    } else {
        base_rate(config, weather) * (slope_factor * fuel_factor * wind)
    };

    SectorSpread {
        rate,
        slope_factor,
        fuel_factor,
        wind_factor: wind,
        blocked,
        channelled,
    }
}
