//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep distances, bearings, speeds and percentages from
//! being mixed up across the spread model and the coordination engine.
//!
//! # Design Philosophy
//! - All quantities are `f32` except [`SimTime`], which accumulates over a
//!   whole incident and uses `f64`
//! - `Deref` to the raw float for arithmetic-heavy code
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use fire_front_core::core_types::units::{Degrees, Meters};
//!
//! let a = Meters::new(250.0);
//! let b = Meters::new(100.0);
//! assert_eq!(a.max(b), Meters::new(250.0));
//!
//! let bearing = Degrees::new(-90.0).normalized();
//! assert_eq!(*bearing, 270.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul, Sub};

/// Compare f32 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f32_total_cmp(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

/// Shared boilerplate for the `f32` unit newtypes: ordering, deref,
/// conversions and display with the unit suffix.
macro_rules! f32_unit {
    ($name:ident, $suffix:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f32_total_cmp(self.0, other.0)
            }
        }

        impl Deref for $name {
            type Target = f32;
            #[inline]
            fn deref(&self) -> &f32 {
                &self.0
            }
        }

        impl From<f32> for $name {
            fn from(v: f32) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f32 {
            fn from(v: $name) -> f32 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}{}", self.0, $suffix)
            }
        }
    };
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f32);

f32_unit!(Meters, " m");

impl Meters {
    /// Zero distance
    pub const ZERO: Meters = Meters(0.0);

    /// Create a new distance
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Meters(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to kilometers
    #[inline]
    #[must_use]
    pub fn to_kilometers(self) -> f32 {
        self.0 / 1000.0
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

impl AddAssign for Meters {
    fn add_assign(&mut self, rhs: Meters) {
        self.0 += rhs.0;
    }
}

impl Sub for Meters {
    type Output = Meters;
    fn sub(self, rhs: Meters) -> Meters {
        Meters(self.0 - rhs.0)
    }
}

impl Mul<f32> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f32) -> Meters {
        Meters(self.0 * rhs)
    }
}

impl Div<f32> for Meters {
    type Output = Meters;
    fn div(self, rhs: f32) -> Meters {
        Meters(self.0 / rhs)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle or compass bearing in degrees (0 = north, clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f32);

f32_unit!(Degrees, "°");

impl Degrees {
    /// Create a new angle
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Degrees(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Wrap into the `[0, 360)` range
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid of a tiny negative value rounds up to exactly 360.0 in f32
        if wrapped >= 360.0 {
            Degrees(0.0)
        } else {
            Degrees(wrapped)
        }
    }

    /// Signed shortest rotation from `self` to `other`, in `(-180, 180]`.
    ///
    /// Positive values mean `other` lies clockwise of `self`.
    #[must_use]
    pub fn signed_delta_to(self, other: Degrees) -> f32 {
        let d = (other.0 - self.0).rem_euclid(360.0);
        if d > 180.0 {
            d - 360.0
        } else {
            d
        }
    }

    /// Unsigned angular separation in `[0, 180]`
    #[must_use]
    pub fn separation(self, other: Degrees) -> f32 {
        self.signed_delta_to(other).abs()
    }
}

impl Add<f32> for Degrees {
    type Output = Degrees;
    fn add(self, rhs: f32) -> Degrees {
        Degrees(self.0 + rhs)
    }
}

// ============================================================================
// SPEEDS
// ============================================================================

/// Speed in kilometers per hour (wind)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f32);

f32_unit!(KilometersPerHour, " km/h");

impl KilometersPerHour {
    /// Create a new speed
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        KilometersPerHour(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to meters per second
    #[inline]
    #[must_use]
    pub fn to_mps(self) -> f32 {
        self.0 / 3.6
    }
}

/// Rate of spread in meters per minute
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerMinute(f32);

f32_unit!(MetersPerMinute, " m/min");

impl MetersPerMinute {
    /// Stationary front
    pub const ZERO: MetersPerMinute = MetersPerMinute(0.0);

    /// Create a new spread rate
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        MetersPerMinute(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Distance covered over `seconds` at this rate
    #[inline]
    #[must_use]
    pub fn distance_over(self, seconds: f32) -> Meters {
        Meters(self.0 * seconds / 60.0)
    }
}

impl Mul<f32> for MetersPerMinute {
    type Output = MetersPerMinute;
    fn mul(self, rhs: f32) -> MetersPerMinute {
        MetersPerMinute(self.0 * rhs)
    }
}

// ============================================================================
// ATMOSPHERE
// ============================================================================

/// Percentage (0-100 for relative humidity and fuel moisture)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f32);

f32_unit!(Percent, "%");

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Percent(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to fraction (0-1)
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> f32 {
        self.0 / 100.0
    }
}

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f32);

f32_unit!(Celsius, "°C");

impl Celsius {
    /// Create a new temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Celsius(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Duration in hours (projection horizons)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hours(f32);

f32_unit!(Hours, " h");

impl Hours {
    /// Create a new duration
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Hours(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to seconds
    #[inline]
    #[must_use]
    pub fn to_seconds(self) -> f32 {
        self.0 * 3600.0
    }
}

/// Simulation clock: seconds since local midnight of the first simulated day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SimTime(f64);

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for SimTime {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl SimTime {
    /// Midnight of day zero
    pub const EPOCH: SimTime = SimTime(0.0);

    /// Create from seconds since epoch
    #[inline]
    #[must_use]
    pub const fn from_seconds(seconds: f64) -> Self {
        SimTime(seconds)
    }

    /// Create from a day index and a local hour of day
    #[inline]
    #[must_use]
    pub fn from_day_hour(day: u32, hour: f64) -> Self {
        SimTime(f64::from(day) * 86_400.0 + hour * 3600.0)
    }

    /// Seconds since epoch
    #[inline]
    #[must_use]
    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Local hour of day in `[0, 24)`
    #[must_use]
    pub fn hour_of_day(self) -> f32 {
        ((self.0 / 3600.0).rem_euclid(24.0)) as f32
    }

    /// Advance the clock by `seconds`
    #[inline]
    #[must_use]
    pub fn advanced_by(self, seconds: f32) -> Self {
        SimTime(self.0 + f64::from(seconds))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = (self.0 / 86_400.0).floor();
        let hour = self.hour_of_day();
        write!(f, "day {day} {hour:05.2}h")
    }
}
