//! Wind alignment effects on directional spread.
//!
//! A sector running with the wind is the head fire and spreads fastest; a sector
//! running into the wind is the backing fire and is suppressed; sectors
//! perpendicular to the wind (the flanks) spread at roughly the no-wind rate.
//! Valleys and gaps aligned with the wind funnel it and speed the head further.

use crate::core_types::units::{Degrees, KilometersPerHour};

/// Multiplier from the angle between a sector and the wind.
///
/// With `c = cos(angle)` and `v` the wind speed in km/h:
/// - downwind half (`c ≥ 0`): `1 + head_coefficient × v × c`
/// - upwind half (`c < 0`): `1 / (1 + backing_coefficient × v × |c|)`
///
/// The result depends only on the unsigned separation between the sector
/// and wind bearings, so it is symmetric about the wind axis.
#[must_use]
pub fn wind_factor(
    sector_bearing: Degrees,
    wind_bearing: Degrees,
    wind_speed: KilometersPerHour,
    head_coefficient: f32,
    backing_coefficient: f32,
) -> f32 {
    let alignment = alignment(sector_bearing, wind_bearing);
    let v = wind_speed.max(KilometersPerHour::new(0.0));
    if alignment >= 0.0 {
        1.0 + head_coefficient * *v * alignment
    } else {
        1.0 / (1.0 + backing_coefficient * *v * -alignment)
    }
}

/// Additional multiplier for a wind-aligned sector crossing a wind channel.
///
/// Scales from 1.0 at perpendicular to `boost` at full alignment; sectors
/// facing upwind get no boost.
#[must_use]
pub fn channel_factor(sector_bearing: Degrees, wind_bearing: Degrees, boost: f32) -> f32 {
    let alignment = alignment(sector_bearing, wind_bearing);
    if alignment > 0.0 {
        1.0 + (boost - 1.0) * alignment
    } else {
        1.0
    }
}

/// Cosine of the unsigned separation between two bearings
#[inline]
fn alignment(a: Degrees, b: Degrees) -> f32 {
    a.separation(b).to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: f32 = 0.05;
    const BACK: f32 = 0.03;

    #[test]
    fn head_flank_backing_ordering() {
        let wind = Degrees::new(90.0);
        let speed = KilometersPerHour::new(40.0);
        let head = wind_factor(Degrees::new(90.0), wind, speed, HEAD, BACK);
        let flank = wind_factor(Degrees::new(0.0), wind, speed, HEAD, BACK);
        let back = wind_factor(Degrees::new(270.0), wind, speed, HEAD, BACK);
        assert!(head > flank && flank > back, "head {head}, flank {flank}, back {back}");
        assert!((head - 3.0).abs() < 1e-4);
        assert!((flank - 1.0).abs() < 1e-4);
        assert!(back < 1.0);
    }

    #[test]
    fn calm_air_is_neutral() {
        for b in [0.0, 45.0, 180.0, 300.0] {
            let f = wind_factor(Degrees::new(b), Degrees::new(10.0), KilometersPerHour::new(0.0), HEAD, BACK);
            assert!((f - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn symmetric_about_wind_axis() {
        let wind = Degrees::new(200.0);
        let speed = KilometersPerHour::new(55.0);
        for offset in [10.0, 22.5, 67.5, 120.0, 170.0] {
            let left = wind_factor(wind + -offset, wind, speed, HEAD, BACK);
            let right = wind_factor(wind + offset, wind, speed, HEAD, BACK);
            assert!((left - right).abs() < 1e-5, "offset {offset}: {left} vs {right}");
        }
    }

    #[test]
    fn channel_boosts_only_downwind() {
        let wind = Degrees::new(0.0);
        assert!((channel_factor(Degrees::new(0.0), wind, 1.5) - 1.5).abs() < 1e-6);
        assert_eq!(channel_factor(Degrees::new(180.0), wind, 1.5), 1.0);
    }
}
