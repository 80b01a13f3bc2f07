//! Terrain elevation, fuel and barrier lookup for fire-front modeling
//!
//! [`TerrainField`] is the point-query contract the growth model consumes.
//! [`GridTerrain`] is the reference raster implementation: elevation, fuel type
//! and barrier flags on a regular grid, with slope and aspect precomputed once
//! using Horn's method. Terrain is immutable once built and is shared read-only
//! across worker threads.

use crate::core_types::units::{Degrees, Meters};
use crate::core_types::{FuelType, Vec2};
use crate::error::{FireError, Result};
use serde::{Deserialize, Serialize};

/// Natural and man-made features that interrupt or channel a fire front.
///
/// The flags are independent: a firebreak can also lie along a wind channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct BarrierFlags {
    pub water: bool,
    pub cliff: bool,
    pub firebreak: bool,
    /// Valley or gap that funnels wind along its axis
    pub wind_channel: bool,
}

impl BarrierFlags {
    /// No features
    pub const NONE: BarrierFlags = BarrierFlags {
        water: false,
        cliff: false,
        firebreak: false,
        wind_channel: false,
    };

    /// Open water
    pub const WATER: BarrierFlags = BarrierFlags {
        water: true,
        ..BarrierFlags::NONE
    };

    /// Cleared firebreak
    pub const FIREBREAK: BarrierFlags = BarrierFlags {
        firebreak: true,
        ..BarrierFlags::NONE
    };

    /// Cliff line
    pub const CLIFF: BarrierFlags = BarrierFlags {
        cliff: true,
        ..BarrierFlags::NONE
    };

    /// Wind-channel corridor
    pub const WIND_CHANNEL: BarrierFlags = BarrierFlags {
        wind_channel: true,
        ..BarrierFlags::NONE
    };

    /// Whether the location stops a surface front outright
    #[must_use]
    pub fn blocks_spread(self) -> bool {
        self.water || self.cliff || self.firebreak
    }

    /// Combine two flag sets
    #[must_use]
    pub fn union(self, other: BarrierFlags) -> BarrierFlags {
        BarrierFlags {
            water: self.water || other.water,
            cliff: self.cliff || other.cliff,
            firebreak: self.firebreak || other.firebreak,
            wind_channel: self.wind_channel || other.wind_channel,
        }
    }
}

/// Everything the core needs to know about one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    /// Elevation above sea level
    pub elevation: Meters,
    /// Slope magnitude, 0-90°
    pub slope: Degrees,
    /// Aspect: bearing of steepest descent (0 = north)
    pub aspect: Degrees,
    pub fuel: FuelType,
    pub barriers: BarrierFlags,
}

impl TerrainSample {
    /// Flat, barrier-free moderate fuel. Used only when a caller explicitly
    /// opts into a fallback for locations outside terrain coverage.
    #[must_use]
    pub fn moderate_fallback() -> Self {
        Self {
            elevation: Meters::ZERO,
            slope: Degrees::new(0.0),
            aspect: Degrees::new(0.0),
            fuel: FuelType::MODERATE_DEFAULT,
            barriers: BarrierFlags::NONE,
        }
    }
}

/// Point-query contract for terrain consumed by the growth model.
///
/// Implementations must be immutable for the lifetime of a simulation run.
pub trait TerrainField: Send + Sync {
    /// Sample terrain at a world position (meters, x = east, y = north).
    ///
    /// # Errors
    ///
    /// Returns [`FireError::OutOfDomain`] when the position is outside coverage
    /// or not finite. Implementations must not extrapolate.
    fn sample(&self, position: Vec2) -> Result<TerrainSample>;

    /// Natural sampling step of the field
    fn resolution(&self) -> Meters;
}

/// Raster terrain on a regular grid
///
/// Grid nodes sit at `(ix * resolution, iy * resolution)`; queries snap to
/// the nearest node for fuel and barriers and interpolate elevation bilinearly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridTerrain {
    /// Width of terrain in meters
    width: f32,
    /// Height of terrain in meters
    height: f32,
    /// Grid resolution in meters per sample
    resolution: f32,
    /// Number of samples in X direction
    nx: usize,
    /// Number of samples in Y direction
    ny: usize,
    /// Elevation data in meters (row-major order: [y * nx + x])
    elevations: Vec<f32>,
    fuels: Vec<FuelType>,
    barriers: Vec<BarrierFlags>,
    /// Precomputed slope at each node (degrees)
    slope: Vec<f32>,
    /// Precomputed aspect at each node (degrees, 0-360)
    aspect: Vec<f32>,
}

impl GridTerrain {
    /// Create flat terrain at a given elevation covered by one fuel type
    #[must_use]
    pub fn flat(width: f32, height: f32, resolution: f32, elevation: f32, fuel: FuelType) -> Self {
        Self::from_fn(width, height, resolution, fuel, |_, _| elevation)
    }

    /// Create terrain with a single Gaussian hill at the center
    #[must_use]
    pub fn single_hill(
        width: f32,
        height: f32,
        resolution: f32,
        base_elevation: f32,
        hill_height: f32,
        hill_radius: f32,
        fuel: FuelType,
    ) -> Self {
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        Self::from_fn(width, height, resolution, fuel, |x, y| {
            let dx = x - center_x;
            let dy = y - center_y;
            let dist_sq = dx * dx + dy * dy;
            base_elevation + hill_height * (-dist_sq / (hill_radius * hill_radius)).exp()
        })
    }

    /// Create terrain from an elevation function of world position
    #[must_use]
    pub fn from_fn(
        width: f32,
        height: f32,
        resolution: f32,
        fuel: FuelType,
        elevation: impl Fn(f32, f32) -> f32,
    ) -> Self {
        let nx = (width / resolution).ceil() as usize + 1;
        let ny = (height / resolution).ceil() as usize + 1;
        let mut elevations = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                elevations.push(elevation(ix as f32 * resolution, iy as f32 * resolution));
            }
        }
        Self::from_layers(
            width,
            height,
            resolution,
            elevations,
            vec![fuel; nx * ny],
            vec![BarrierFlags::NONE; nx * ny],
        )
    }

    /// Build terrain from pre-rasterized layers.
    ///
    /// Layers are row-major with `(ceil(width / resolution) + 1) × (ceil(height / resolution) + 1)`
    /// entries each. Layers of the wrong length are padded with the last
    /// entry (or flat scrubland) and truncated, so the grid is always complete.
    #[must_use]
    pub fn from_layers(
        width: f32,
        height: f32,
        resolution: f32,
        mut elevations: Vec<f32>,
        mut fuels: Vec<FuelType>,
        mut barriers: Vec<BarrierFlags>,
    ) -> Self {
        let nx = (width / resolution).ceil() as usize + 1;
        let ny = (height / resolution).ceil() as usize + 1;
        let n = nx * ny;
        let last_elev = elevations.last().copied().unwrap_or(0.0);
        elevations.resize(n, last_elev);
        let last_fuel = fuels.last().copied().unwrap_or(FuelType::MODERATE_DEFAULT);
        fuels.resize(n, last_fuel);
        barriers.resize(n, BarrierFlags::NONE);

        let mut terrain = GridTerrain {
            width,
            height,
            resolution,
            nx,
            ny,
            elevations,
            fuels,
            barriers,
            slope: vec![0.0; n],
            aspect: vec![0.0; n],
        };
        terrain.rebuild_slope_cache();
        terrain
    }

    /// Paint a fuel type over an axis-aligned rectangle (world coordinates)
    #[must_use]
    pub fn with_fuel_rect(mut self, min: Vec2, max: Vec2, fuel: FuelType) -> Self {
        for idx in self.nodes_in_rect(min, max) {
            self.fuels[idx] = fuel;
        }
        self
    }

    /// Add barrier flags over an axis-aligned rectangle (world coordinates)
    #[must_use]
    pub fn with_barrier_rect(mut self, min: Vec2, max: Vec2, flags: BarrierFlags) -> Self {
        for idx in self.nodes_in_rect(min, max) {
            self.barriers[idx] = self.barriers[idx].union(flags);
        }
        self
    }

    /// Add barrier flags at every node whose world position satisfies `predicate`
    #[must_use]
    pub fn with_barrier_where(mut self, flags: BarrierFlags, predicate: impl Fn(Vec2) -> bool) -> Self {
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let position = Vec2::new(ix as f32 * self.resolution, iy as f32 * self.resolution);
                if predicate(position) {
                    let idx = iy * self.nx + ix;
                    self.barriers[idx] = self.barriers[idx].union(flags);
                }
            }
        }
        self
    }

    fn nodes_in_rect(&self, min: Vec2, max: Vec2) -> Vec<usize> {
        let to_ix = |v: f32, n: usize| ((v / self.resolution).round().max(0.0) as usize).min(n - 1);
        let (x0, x1) = (to_ix(min.x.min(max.x), self.nx), to_ix(min.x.max(max.x), self.nx));
        let (y0, y1) = (to_ix(min.y.min(max.y), self.ny), to_ix(min.y.max(max.y), self.ny));
        let mut out = Vec::with_capacity((x1 - x0 + 1) * (y1 - y0 + 1));
        for iy in y0..=y1 {
            for ix in x0..=x1 {
                out.push(iy * self.nx + ix);
            }
        }
        out
    }

    /// Precompute slope and aspect at every node with Horn's method.
    ///
    /// # Scientific Reference
    /// Horn, B.K.P. (1981). "Hill Shading and the Reflectance Map."
    /// Proceedings of the IEEE, 69(1), 14-47.
    fn rebuild_slope_cache(&mut self) {
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let (dz_dx, dz_dy) = self.horn_gradient(ix, iy);
                let idx = iy * self.nx + ix;
                self.slope[idx] = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan().to_degrees();
                // Aspect is the direction of steepest descent, as a compass bearing
                self.aspect[idx] = Degrees::new((-dz_dx).atan2(-dz_dy).to_degrees())
                    .normalized()
                    .value();
            }
        }
    }

    /// Elevation gradient at a node: (east, north) rise per meter
    fn horn_gradient(&self, ix: usize, iy: usize) -> (f32, f32) {
        let z = |dx: isize, dy: isize| {
            let x = (ix as isize + dx).clamp(0, self.nx as isize - 1) as usize;
            let y = (iy as isize + dy).clamp(0, self.ny as isize - 1) as usize;
            self.elevations[y * self.nx + x]
        };
        let d = self.resolution;

        // z(-1, 1)  z(0, 1)  z(1, 1)     (NW) (N) (NE)
        // z(-1, 0)  z(0, 0)  z(1, 0)     (W)  (C) (E)
        // z(-1,-1)  z(0,-1)  z(1,-1)     (SW) (S) (SE)
        let dz_dx = ((z(1, 1) + 2.0 * z(1, 0) + z(1, -1)) - (z(-1, 1) + 2.0 * z(-1, 0) + z(-1, -1)))
            / (8.0 * d);
        let dz_dy = ((z(-1, 1) + 2.0 * z(0, 1) + z(1, 1)) - (z(-1, -1) + 2.0 * z(0, -1) + z(1, -1)))
            / (8.0 * d);
        (dz_dx, dz_dy)
    }

    /// Query elevation at world position (x, y) using bilinear interpolation
    fn elevation_at(&self, x: f32, y: f32) -> f32 {
        let gx = x / self.resolution;
        let gy = y / self.resolution;

        let ix0 = (gx.floor() as usize).min(self.nx.saturating_sub(2));
        let iy0 = (gy.floor() as usize).min(self.ny.saturating_sub(2));
        let ix1 = (ix0 + 1).min(self.nx - 1);
        let iy1 = (iy0 + 1).min(self.ny - 1);

        let fx = (gx - ix0 as f32).clamp(0.0, 1.0);
        let fy = (gy - iy0 as f32).clamp(0.0, 1.0);

        let e00 = self.elevations[iy0 * self.nx + ix0];
        let e10 = self.elevations[iy0 * self.nx + ix1];
        let e01 = self.elevations[iy1 * self.nx + ix0];
        let e11 = self.elevations[iy1 * self.nx + ix1];

        let e0 = e00 * (1.0 - fx) + e10 * fx;
        let e1 = e01 * (1.0 - fx) + e11 * fx;
        e0 * (1.0 - fy) + e1 * fy
    }

    /// Whether a position lies inside terrain coverage
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x.is_finite()
            && position.y.is_finite()
            && (0.0..=self.width).contains(&position.x)
            && (0.0..=self.height).contains(&position.y)
    }

    /// Width of terrain in meters
    #[must_use]
    pub fn width(&self) -> Meters {
        Meters::new(self.width)
    }

    /// Height of terrain in meters
    #[must_use]
    pub fn height(&self) -> Meters {
        Meters::new(self.height)
    }

    /// Grid dimensions in nodes
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }
}

impl TerrainField for GridTerrain {
    fn sample(&self, position: Vec2) -> Result<TerrainSample> {
        if !self.contains(position) {
            return Err(FireError::OutOfDomain {
                x: position.x,
                y: position.y,
            });
        }
        let ix = ((position.x / self.resolution).round() as usize).min(self.nx - 1);
        let iy = ((position.y / self.resolution).round() as usize).min(self.ny - 1);
        let idx = iy * self.nx + ix;
        Ok(TerrainSample {
            elevation: Meters::new(self.elevation_at(position.x, position.y)),
            slope: Degrees::new(self.slope[idx]),
            aspect: Degrees::new(self.aspect[idx]),
            fuel: self.fuels[idx],
            barriers: self.barriers[idx],
        })
    }

    fn resolution(&self) -> Meters {
        Meters::new(self.resolution)
    }
}
