use serde::{Deserialize, Serialize};

use super::units::Percent;

/// How readily a fuel bed takes fire from an approaching front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ignitability {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Vegetation classes found across the wildland/urban interface
///
/// Every location in a terrain field carries exactly one of these. The
/// per-type constants below drive spread rate, continuity analysis and
/// crown-fire inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    /// Mature, closed fynbos shrubland with heavy dead fraction
    DenseFynbos,
    /// Young or patchy fynbos
    SparseFynbos,
    /// Pine plantation: resinous canopy over deep needle litter
    PinePlantation,
    /// Indigenous (Afromontane) forest, moist and shaded
    IndigenousForest,
    /// Cured grassland
    DryGrass,
    /// Green, actively growing grass
    GreenGrass,
    /// Gardens, hedges and street trees in built-up areas
    UrbanVegetation,
    /// Mixed scrub; the reference "moderate" fuel
    Scrubland,
}

impl FuelType {
    /// All fuel types in a fixed order, used for per-type tallies
    pub const ALL: [FuelType; 8] = [
        FuelType::DenseFynbos,
        FuelType::SparseFynbos,
        FuelType::PinePlantation,
        FuelType::IndigenousForest,
        FuelType::DryGrass,
        FuelType::GreenGrass,
        FuelType::UrbanVegetation,
        FuelType::Scrubland,
    ];

    /// Fuel assumed where the terrain source has no coverage and the
    /// caller opted into a fallback
    pub const MODERATE_DEFAULT: FuelType = FuelType::Scrubland;

    /// Position of this fuel type in [`FuelType::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            FuelType::DenseFynbos => 0,
            FuelType::SparseFynbos => 1,
            FuelType::PinePlantation => 2,
            FuelType::IndigenousForest => 3,
            FuelType::DryGrass => 4,
            FuelType::GreenGrass => 5,
            FuelType::UrbanVegetation => 6,
            FuelType::Scrubland => 7,
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FuelType::DenseFynbos => "Dense fynbos",
            FuelType::SparseFynbos => "Sparse fynbos",
            FuelType::PinePlantation => "Pine plantation",
            FuelType::IndigenousForest => "Indigenous forest",
            FuelType::DryGrass => "Dry grass",
            FuelType::GreenGrass => "Green grass",
            FuelType::UrbanVegetation => "Urban vegetation",
            FuelType::Scrubland => "Scrubland",
        }
    }

    #[must_use]
    pub const fn ignitability(self) -> Ignitability {
        match self {
            FuelType::DryGrass | FuelType::PinePlantation => Ignitability::VeryHigh,
            FuelType::DenseFynbos => Ignitability::High,
            FuelType::SparseFynbos | FuelType::Scrubland | FuelType::UrbanVegetation => {
                Ignitability::Moderate
            }
            FuelType::IndigenousForest | FuelType::GreenGrass => Ignitability::Low,
        }
    }

    /// Spread-rate multiplier for a front running into this fuel.
    ///
    /// Ranges from 0.6 (green grass) to 1.8 (cured grass, pine litter);
    /// scrubland is the 1.0 reference.
    #[must_use]
    pub const fn spread_multiplier(self) -> f32 {
        match self {
            FuelType::DryGrass | FuelType::PinePlantation => 1.8,
            FuelType::DenseFynbos => 1.5,
            FuelType::SparseFynbos => 1.1,
            FuelType::Scrubland => 1.0,
            FuelType::UrbanVegetation => 0.9,
            FuelType::IndigenousForest => 0.7,
            FuelType::GreenGrass => 0.6,
        }
    }

    /// Available fuel load in kg/m²
    #[must_use]
    pub const fn fuel_load(self) -> f32 {
        match self {
            FuelType::DenseFynbos => 3.0,
            FuelType::SparseFynbos => 1.5,
            FuelType::PinePlantation => 4.5,
            FuelType::IndigenousForest => 3.5,
            FuelType::DryGrass => 0.6,
            FuelType::GreenGrass => 0.4,
            FuelType::UrbanVegetation => 1.2,
            FuelType::Scrubland => 2.0,
        }
    }

    /// Typical dead fuel moisture content
    #[must_use]
    pub const fn base_moisture(self) -> Percent {
        match self {
            FuelType::DenseFynbos => Percent::new(12.0),
            FuelType::SparseFynbos => Percent::new(10.0),
            FuelType::PinePlantation => Percent::new(14.0),
            FuelType::IndigenousForest => Percent::new(25.0),
            FuelType::DryGrass => Percent::new(6.0),
            FuelType::GreenGrass => Percent::new(35.0),
            FuelType::UrbanVegetation => Percent::new(20.0),
            FuelType::Scrubland => Percent::new(15.0),
        }
    }

    /// Tall tree canopy that a surface fire can climb into
    #[must_use]
    pub const fn is_canopy(self) -> bool {
        matches!(self, FuelType::PinePlantation | FuelType::IndigenousForest)
    }

    /// Surface fuel tall or fine enough to carry flame up into an adjoining canopy
    #[must_use]
    pub const fn is_ladder_surface(self) -> bool {
        matches!(
            self,
            FuelType::DryGrass | FuelType::DenseFynbos | FuelType::Scrubland
        )
    }

    /// High or very-high ignitability
    #[must_use]
    pub fn is_highly_ignitable(self) -> bool {
        self.ignitability() >= Ignitability::High
    }
}
