//! Front classification of perimeter sectors.
//!
//! Each sector first gets a band from its angle to the wind:
//!
//! ```text
//!              wind →
//!      BACKING  |  LEFT_FLANK / RIGHT_FLANK  |  HEAD
//!   ≥ 180°-cone |                            | ≤ cone
//! ```
//!
//! A sector running much faster than its neighbours through a wind channel or
//! a richer fuel corridor is then promoted to FINGER, overriding its band.

use super::{sector_bearing, SECTOR_COUNT};
use crate::config::SpreadConfig;
use crate::core_types::units::Degrees;
use serde::{Deserialize, Serialize};

/// Label describing how a perimeter sector is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontClass {
    /// Running with the wind
    Head,
    /// Lateral band counter-clockwise of the wind
    LeftFlank,
    /// Lateral band clockwise of the wind
    RightFlank,
    /// Creeping against the wind
    Backing,
    /// Anomalous run along a channel or fuel corridor
    Finger,
}

impl FrontClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FrontClass::Head => "HEAD",
            FrontClass::LeftFlank => "LEFT_FLANK",
            FrontClass::RightFlank => "RIGHT_FLANK",
            FrontClass::Backing => "BACKING",
            FrontClass::Finger => "FINGER",
        }
    }

    #[must_use]
    pub const fn is_flank(self) -> bool {
        matches!(self, FrontClass::LeftFlank | FrontClass::RightFlank)
    }

    /// Head and finger sectors are the ones that outrun everything else
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, FrontClass::Head | FrontClass::Finger)
    }
}

/// Wind-angle band for a sector facing `bearing`
#[must_use]
pub fn wind_band(bearing: Degrees, wind_bearing: Degrees, config: &SpreadConfig) -> FrontClass {
    let delta = wind_bearing.signed_delta_to(bearing);
    let separation = delta.abs();
    if separation <= config.head_cone {
        FrontClass::Head
    } else if separation >= 180.0 - config.backing_cone {
        FrontClass::Backing
    } else if delta < 0.0 {
        FrontClass::LeftFlank
    } else {
        FrontClass::RightFlank
    }
}

/// Per-sector inputs to classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorSignal {
    /// Realized rate (m/min)
    pub rate: f32,
    pub fuel_factor: f32,
    pub channelled: bool,
}

/// Classify all sectors from their realized rates and the wind bearing.
#[must_use]
pub fn classify_sectors(
    signals: &[SectorSignal; SECTOR_COUNT],
    wind_bearing: Degrees,
    config: &SpreadConfig,
) -> [FrontClass; SECTOR_COUNT] {
    std::array::from_fn(|i| {
        let band = wind_band(sector_bearing(i), wind_bearing, config);
        let left = &signals[(i + SECTOR_COUNT - 1) % SECTOR_COUNT];
        let right = &signals[(i + 1) % SECTOR_COUNT];
        let own = &signals[i];

        let neighbour_mean = 0.5 * (left.rate + right.rate);
        let outruns = own.rate > 0.0 && own.rate > config.finger_ratio * neighbour_mean;
        let corridor = own.channelled
            || (own.fuel_factor > left.fuel_factor && own.fuel_factor > right.fuel_factor);

        if outruns && corridor {
            FrontClass::Finger
        } else {
            band
        }
    })
}
