//! Regional weather state for fire behavior modeling
//!
//! A [`WeatherSample`] is an immutable, validated snapshot of wind, humidity and
//! temperature at a point in simulation time. Callers replace the sample
//! wholesale when new observations arrive; nothing mutates a sample in place.
//!
//! The derived [`DangerIndex`] follows the shape of the McArthur Mark 5 forest
//! fire danger index (Noble et al. 1980) with a fixed drought factor, raised
//! during the afternoon peak burning window.

use crate::core_types::units::{Celsius, Degrees, KilometersPerHour, Percent, SimTime};
use crate::core_types::vec2::{bearing_unit, Vec2};
use crate::error::{FireError, Result};
use serde::{Deserialize, Serialize};

/// Danger-index threshold constants.
///
/// Rust `Range` types use an inclusive lower bound and exclusive upper bound.
pub mod danger_ranges {
    use std::ops::{Range, RangeFrom};

    /// "Low" `[0.0, 12.0)`
    pub const LOW: Range<f32> = 0.0..12.0;

    /// "Moderate" `[12.0, 24.0)`
    pub const MODERATE: Range<f32> = 12.0..24.0;

    /// "High" `[24.0, 50.0)`
    pub const HIGH: Range<f32> = 24.0..50.0;

    /// "Very High" `[50.0, 100.0)`
    pub const VERY_HIGH: Range<f32> = 50.0..100.0;

    /// "Extreme" `[100.0, ∞)`
    pub const EXTREME: RangeFrom<f32> = 100.0..;
}

/// Drought factor assumed by the danger index (McArthur scale 0-10)
pub const DROUGHT_FACTOR: f32 = 7.0;

/// Local hours bounding the afternoon peak burning window `[start, end)`
pub const PEAK_WINDOW_HOURS: (f32, f32) = (10.0, 16.0);

/// Multiplier applied to the raw index inside the peak window
pub const PEAK_WINDOW_FACTOR: f32 = 1.25;

/// Discretized fire danger rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DangerIndex {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl DangerIndex {
    /// Bucket a raw index value
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        match value {
            _ if danger_ranges::EXTREME.contains(&value) => DangerIndex::Extreme,
            _ if danger_ranges::VERY_HIGH.contains(&value) => DangerIndex::VeryHigh,
            _ if danger_ranges::HIGH.contains(&value) => DangerIndex::High,
            _ if danger_ranges::MODERATE.contains(&value) => DangerIndex::Moderate,
            _ => DangerIndex::Low,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DangerIndex::Low => "LOW",
            DangerIndex::Moderate => "MODERATE",
            DangerIndex::High => "HIGH",
            DangerIndex::VeryHigh => "VERY_HIGH",
            DangerIndex::Extreme => "EXTREME",
        }
    }
}

/// Time-stamped regional weather state
///
/// # Example
/// ```
/// use fire_front_core::core_types::{Celsius, Degrees, KilometersPerHour, Percent, SimTime};
/// use fire_front_core::{DangerIndex, WeatherSample};
///
/// let sample = WeatherSample::new(
///     KilometersPerHour::new(60.0),
///     Degrees::new(225.0),
///     Percent::new(10.0),
///     Celsius::new(36.0),
///     SimTime::from_day_hour(0, 13.0),
/// )
/// .unwrap();
/// assert_eq!(sample.danger_index(), DangerIndex::Extreme);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    wind_speed: KilometersPerHour,
    /// Bearing the wind blows toward
    wind_direction: Degrees,
    humidity: Percent,
    temperature: Celsius,
    timestamp: SimTime,
    danger_value: f32,
    danger: DangerIndex,
}

impl WeatherSample {
    /// Largest wind speed accepted at ingestion
    pub const MAX_WIND: KilometersPerHour = KilometersPerHour::new(250.0);
    /// Accepted air temperature range
    pub const TEMPERATURE_RANGE: (f32, f32) = (-30.0, 60.0);

    /// Validate readings and derive the danger index.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::InvalidWeatherSample`] for non-finite values, wind
    /// speed outside `0..=250` km/h, humidity outside `0..=100` % or temperature
    /// outside `-30..=60` °C.
    pub fn new(
        wind_speed: KilometersPerHour,
        wind_direction: Degrees,
        humidity: Percent,
        temperature: Celsius,
        timestamp: SimTime,
    ) -> Result<Self> {
        check("wind_speed", *wind_speed, 0.0, *Self::MAX_WIND)?;
        if !wind_direction.is_finite() {
            return Err(FireError::InvalidWeatherSample {
                field: "wind_direction",
                value: *wind_direction,
                reason: "must be finite",
            });
        }
        check("humidity", *humidity, 0.0, 100.0)?;
        let (t_min, t_max) = Self::TEMPERATURE_RANGE;
        check("temperature", *temperature, t_min, t_max)?;
        if !timestamp.is_finite() || *timestamp < 0.0 {
            return Err(FireError::InvalidWeatherSample {
                field: "timestamp",
                value: *timestamp as f32,
                reason: "must be finite and non-negative",
            });
        }

        let danger_value =
            danger_index_value(wind_speed, humidity, temperature, timestamp.hour_of_day());

        Ok(Self {
            wind_speed,
            wind_direction: wind_direction.normalized(),
            humidity,
            temperature,
            timestamp,
            danger_value,
            danger: DangerIndex::from_value(danger_value),
        })
    }

    /// Hot, dry, strong offshore wind typical of Berg-wind days
    ///
    /// # Errors
    ///
    /// Propagates validation failure for a non-finite `direction` or `timestamp`.
    pub fn berg_wind(direction: Degrees, timestamp: SimTime) -> Result<Self> {
        Self::new(
            KilometersPerHour::new(65.0),
            direction,
            Percent::new(8.0),
            Celsius::new(38.0),
            timestamp,
        )
    }

    /// Mild, humid conditions with a light breeze
    ///
    /// # Errors
    ///
    /// Propagates validation failure for a non-finite `direction` or `timestamp`.
    pub fn mild(direction: Degrees, timestamp: SimTime) -> Result<Self> {
        Self::new(
            KilometersPerHour::new(10.0),
            direction,
            Percent::new(60.0),
            Celsius::new(20.0),
            timestamp,
        )
    }

    /// The same conditions observed at a different time
    ///
    /// # Errors
    ///
    /// Returns [`FireError::InvalidWeatherSample`] for a non-finite or negative timestamp.
    pub fn at_time(&self, timestamp: SimTime) -> Result<Self> {
        Self::new(
            self.wind_speed,
            self.wind_direction,
            self.humidity,
            self.temperature,
            timestamp,
        )
    }

    #[must_use]
    pub fn wind_speed(&self) -> KilometersPerHour {
        self.wind_speed
    }

    /// Bearing the wind blows toward (head-fire direction)
    #[must_use]
    pub fn wind_direction(&self) -> Degrees {
        self.wind_direction
    }

    #[must_use]
    pub fn humidity(&self) -> Percent {
        self.humidity
    }

    #[must_use]
    pub fn temperature(&self) -> Celsius {
        self.temperature
    }

    #[must_use]
    pub fn timestamp(&self) -> SimTime {
        self.timestamp
    }

    /// Wind vector in m/s
    #[must_use]
    pub fn wind_vector(&self) -> Vec2 {
        bearing_unit(self.wind_direction) * self.wind_speed.to_mps()
    }

    #[must_use]
    pub fn danger_index(&self) -> DangerIndex {
        self.danger
    }

    /// Raw index value before bucketing
    #[must_use]
    pub fn danger_value(&self) -> f32 {
        self.danger_value
    }

    /// Whether the sample falls inside the afternoon peak burning window
    #[must_use]
    pub fn in_peak_window(&self) -> bool {
        in_peak_window(self.timestamp.hour_of_day())
    }

    /// Weather scaling of the base spread rate from humidity and temperature.
    ///
    /// Drier air and higher temperatures dry fine fuels and speed the front:
    /// `(2 - RH) × (T / 25)`, clamped to `0.2..=3.0`. 25 °C at 100 % humidity
    /// gives 1.0.
    #[must_use]
    pub fn base_spread_factor(&self) -> f32 {
        let dryness = 2.0 - self.humidity.to_fraction();
        let heat = *self.temperature / 25.0;
        (dryness * heat).clamp(0.2, 3.0)
    }
}

fn check(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(FireError::InvalidWeatherSample {
            field,
            value,
            reason: "must be finite",
        });
    }
    if value < min || value > max {
        return Err(FireError::InvalidWeatherSample {
            field,
            value,
            reason: "out of accepted range",
        });
    }
    Ok(())
}

fn in_peak_window(hour: f32) -> bool {
    let (start, end) = PEAK_WINDOW_HOURS;
    hour >= start && hour < end
}

/// Raw danger index value.
///
/// McArthur Mark 5 exponent with drought factor [`DROUGHT_FACTOR`], multiplied
/// by [`PEAK_WINDOW_FACTOR`] between 10:00 and 16:00.
#[must_use]
pub fn danger_index_value(
    wind_speed: KilometersPerHour,
    humidity: Percent,
    temperature: Celsius,
    hour_of_day: f32,
) -> f32 {
    let exponent = -0.45 + 0.987 * DROUGHT_FACTOR.ln() - 0.0345 * *humidity
        + 0.0338 * *temperature
        + 0.0234 * *wind_speed;
    let raw = 2.11 * exponent.exp();
    let peak = if in_peak_window(hour_of_day) {
        PEAK_WINDOW_FACTOR
    } else {
        1.0
    };
    (raw * peak).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(wind: f32, rh: f32, temp: f32, hour: f64) -> Result<WeatherSample> {
        WeatherSample::new(
            KilometersPerHour::new(wind),
            Degrees::new(90.0),
            Percent::new(rh),
            Celsius::new(temp),
            SimTime::from_day_hour(0, hour),
        )
    }

    #[test]
    fn berg_wind_is_extreme() {
        let w = WeatherSample::berg_wind(Degrees::new(225.0), SimTime::from_day_hour(0, 14.0))
            .unwrap();
        assert_eq!(w.danger_index(), DangerIndex::Extreme);
        assert!(w.in_peak_window());
    }

    #[test]
    fn mild_morning_is_low() {
        let w = WeatherSample::mild(Degrees::new(0.0), SimTime::from_day_hour(0, 7.0)).unwrap();
        assert_eq!(w.danger_index(), DangerIndex::Low);
    }

    #[test]
    fn peak_window_raises_index() {
        let morning = sample(30.0, 25.0, 30.0, 8.0).unwrap();
        let afternoon = sample(30.0, 25.0, 30.0, 14.0).unwrap();
        assert!(
            afternoon.danger_value() > morning.danger_value(),
            "peak window should elevate danger: {} vs {}",
            afternoon.danger_value(),
            morning.danger_value()
        );
        assert!((afternoon.danger_value() / morning.danger_value() - PEAK_WINDOW_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn danger_is_pure_function_of_inputs() {
        let a = sample(40.0, 15.0, 33.0, 11.0).unwrap();
        let b = sample(40.0, 15.0, 33.0, 11.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_out_of_range_readings() {
        assert!(matches!(
            sample(30.0, 120.0, 25.0, 12.0),
            Err(FireError::InvalidWeatherSample { field: "humidity", .. })
        ));
        assert!(matches!(
            sample(-5.0, 40.0, 25.0, 12.0),
            Err(FireError::InvalidWeatherSample { field: "wind_speed", .. })
        ));
        assert!(matches!(
            sample(10.0, 40.0, 75.0, 12.0),
            Err(FireError::InvalidWeatherSample { field: "temperature", .. })
        ));
        assert!(matches!(
            sample(f32::NAN, 40.0, 25.0, 12.0),
            Err(FireError::InvalidWeatherSample { reason: "must be finite", .. })
        ));
    }

    #[test]
    fn drier_hotter_air_spreads_faster() {
        let humid = sample(20.0, 80.0, 20.0, 12.0).unwrap();
        let dry = sample(20.0, 10.0, 35.0, 12.0).unwrap();
        assert!(dry.base_spread_factor() > humid.base_spread_factor());
    }
}
