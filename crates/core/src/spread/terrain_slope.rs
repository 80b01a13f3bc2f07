//! Terrain slope effects on fire spread rate.
//!
//! Implements slope factors following A.G. `McArthur` (1967) and
//! R.C. Rothermel (1972) for fire spread rate modification based on
//! terrain slope and aspect.
//!
//! # Scientific Background
//!
//! Fire spreads faster uphill due to:
//! - Preheating of uphill fuels by radiation and convection
//! - Flame contact with uphill fuels (flames tilt toward slope)
//!
//! Empirical observation: fire spread rate approximately doubles
//! for every 10° of uphill slope. Downhill spread is suppressed because
//! flames tilt away from the unburnt fuel.
//!
//! # References
//!
//! - A.G. `McArthur` (1967). Fire behaviour in eucalypt forests. Forestry and
//!   Timber Bureau Leaflet No. 107, Canberra.
//! - R.C. Rothermel (1972). A mathematical model for predicting fire spread
//!   in wildland fuels. USDA Forest Service Research Paper INT-115.

use crate::core_types::units::Degrees;

/// Calculate slope factor based on empirical observations from A.G. `McArthur` (1967).
///
/// # Physics
///
/// For uphill spread (positive effective slope):
/// - Factor = 1.0 + (slope / 10)^1.5 × 2.0, capped at `max_multiplier`
/// - At 10°: factor ≈ 3.0
///
/// For downhill spread (negative effective slope):
/// - Factor = (1.0 + slope / 30), never below `floor`
///
/// # Arguments
///
/// * `effective_slope` - Slope in degrees relative to spread direction.
///   Positive values indicate uphill spread, negative values indicate downhill.
/// * `max_multiplier` - Ceiling for steep upslope runs (4.0 by default)
/// * `floor` - Minimum multiplier for steep downslope (0.5 by default)
///
/// # Example
///
/// ```
/// use fire_front_core::spread::terrain_slope::calculate_slope_factor;
///
/// assert!((calculate_slope_factor(0.0, 4.0, 0.5) - 1.0).abs() < 1e-6);
/// assert!((calculate_slope_factor(10.0, 4.0, 0.5) - 3.0).abs() < 0.01);
/// assert_eq!(calculate_slope_factor(30.0, 4.0, 0.5), 4.0);
/// assert_eq!(calculate_slope_factor(-40.0, 4.0, 0.5), 0.5);
/// ```
#[must_use]
pub fn calculate_slope_factor(effective_slope: f32, max_multiplier: f32, floor: f32) -> f32 {
    if effective_slope > 0.0 {
        (1.0 + (effective_slope / 10.0).powf(1.5) * 2.0).min(max_multiplier)
    } else if effective_slope < 0.0 {
        (1.0 + effective_slope / 30.0).max(floor)
    } else {
        1.0
    }
}

/// Calculate effective slope based on fire spread direction and terrain aspect.
///
/// The effective slope is the component of the terrain slope that aligns with
/// the spread direction:
/// ```text
/// effective_slope = slope_angle × cos(spread_direction - uphill_direction)
/// ```
/// where the uphill direction is opposite to the aspect.
///
/// # Arguments
///
/// * `slope_angle` - Terrain slope magnitude in degrees (0-90)
/// * `aspect` - Bearing of steepest descent
/// * `spread_direction` - Bearing the front is moving along
///
/// # Returns
///
/// Positive for uphill, negative for downhill, zero across the slope.
#[must_use]
pub fn calculate_effective_slope(slope_angle: Degrees, aspect: Degrees, spread_direction: Degrees) -> f32 {
    if slope_angle.abs() < 0.001 {
        return 0.0;
    }
    let uphill = (aspect + 180.0).normalized();
    let delta = uphill.signed_delta_to(spread_direction);
    *slope_angle * delta.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10° uphill roughly triples the flat-ground rate
    #[test]
    fn slope_factor_uphill_10_degrees() {
        let factor = calculate_slope_factor(10.0, 4.0, 0.5);
        assert!(
            (factor - 3.0).abs() < 0.01,
            "10° uphill should give factor ~3.0, got {factor}"
        );
    }

    #[test]
    fn slope_factor_is_capped_upslope() {
        for slope in [15.0, 20.0, 45.0, 80.0] {
            let factor = calculate_slope_factor(slope, 4.0, 0.5);
            assert!(
                factor <= 4.0,
                "{slope}° uphill exceeded the cap: {factor}"
            );
        }
        assert_eq!(calculate_slope_factor(20.0, 4.0, 0.5), 4.0);
    }

    #[test]
    fn slope_factor_downhill_respects_floor() {
        let mild = calculate_slope_factor(-10.0, 4.0, 0.5);
        assert!(
            (mild - 0.667).abs() < 0.01,
            "10° downhill should give factor ~0.667, got {mild}"
        );
        let steep = calculate_slope_factor(-30.0, 4.0, 0.5);
        assert!(
            (steep - 0.5).abs() < 1e-6,
            "30° downhill should hit the floor, got {steep}"
        );
    }

    /// Fire spreading across the slope sees no slope effect
    #[test]
    fn cross_slope_has_no_effect() {
        // North-facing slope: uphill is south
        let east = calculate_effective_slope(Degrees::new(20.0), Degrees::new(0.0), Degrees::new(90.0));
        assert!(east.abs() < 0.1, "cross-slope should be ~0, got {east}");
        let west = calculate_effective_slope(Degrees::new(20.0), Degrees::new(0.0), Degrees::new(270.0));
        assert!(west.abs() < 0.1, "cross-slope should be ~0, got {west}");
    }

    #[test]
    fn effective_slope_directions() {
        let slope = Degrees::new(15.0);
        let aspect = Degrees::new(0.0);

        let uphill = calculate_effective_slope(slope, aspect, Degrees::new(180.0));
        assert!((uphill - 15.0).abs() < 0.1, "uphill got {uphill}");

        let downhill = calculate_effective_slope(slope, aspect, Degrees::new(0.0));
        assert!((downhill + 15.0).abs() < 0.1, "downhill got {downhill}");

        let diagonal = calculate_effective_slope(slope, aspect, Degrees::new(135.0));
        let expected = 15.0 * 45.0_f32.to_radians().cos();
        assert!((diagonal - expected).abs() < 0.1, "diagonal got {diagonal}");
    }

    /// Aspect near the 360° boundary still resolves the uphill direction
    #[test]
    fn aspect_angle_wrapping() {
        let a = calculate_effective_slope(Degrees::new(10.0), Degrees::new(350.0), Degrees::new(170.0));
        assert!((a - 10.0).abs() < 0.1, "got {a}");
        let b = calculate_effective_slope(Degrees::new(10.0), Degrees::new(10.0), Degrees::new(190.0));
        assert!((b - 10.0).abs() < 0.1, "got {b}");
    }
}
