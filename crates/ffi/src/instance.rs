use fire_front_core::{
    CoreConfig, Degrees, FuelType, GridTerrain, MultiFireCoordinator, SimTime, WeatherSample,
};
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultFfiError, FireFrontErrorCode};
use crate::helpers::{track_error, track_result};
use crate::queries::{ConvergenceRecord, RankedFire};

/// Raw weather reading as supplied by the host.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WeatherReading {
    /// Wind speed (km/h, 0-250).
    pub wind_speed_kmh: f32,
    /// Bearing the wind blows toward (degrees, 0 = north, clockwise).
    pub wind_direction_deg: f32,
    /// Relative humidity (%, 0-100).
    pub humidity_percent: f32,
    /// Air temperature (°C, -30 to 60).
    pub temperature_c: f32,
    /// Simulation time of the reading (seconds since epoch of the run).
    pub time_seconds: f64,
}

impl WeatherReading {
    pub(crate) fn to_sample(self) -> Result<WeatherSample, DefaultFfiError> {
        WeatherSample::new(
            self.wind_speed_kmh.into(),
            Degrees::new(self.wind_direction_deg),
            self.humidity_percent.into(),
            self.temperature_c.into(),
            SimTime::from_seconds(self.time_seconds),
        )
        .map_err(DefaultFfiError::from)
    }
}

/// The fire-front context: coordinator, terrain and cached query buffers.
///
/// # Thread Safety
/// The coordinator sits behind an `RwLock`: queries take the read lock and may
/// run concurrently from any host thread; `fire_front_tick` and the mutating
/// calls take the write lock. Terrain is immutable after creation.
pub struct FireFrontInstance {
    pub(crate) coordinator: RwLock<MultiFireCoordinator>,
    pub(crate) terrain: GridTerrain,
    /// Reused by `fire_front_get_ranking`; valid until the next call.
    pub(crate) ranking_snapshot: Mutex<Vec<RankedFire>>,
    /// Reused by `fire_front_get_convergence`; valid until the next call.
    pub(crate) convergence_snapshot: Mutex<Vec<ConvergenceRecord>>,
}

impl FireFrontInstance {
    /// Build an instance over flat terrain of a single fuel type.
    ///
    /// # Errors
    ///
    /// - `InvalidTerrainParameters` for non-finite or non-positive dimensions
    /// - `InvalidParameter` for an unknown fuel code
    /// - `InvalidWeatherSample` for an out-of-range reading
    pub(crate) fn new_flat(
        width: f32,
        height: f32,
        resolution: f32,
        elevation: f32,
        fuel: u8,
        weather: WeatherReading,
    ) -> Result<Box<Self>, DefaultFfiError> {
        for (name, value) in [("width", width), ("height", height), ("resolution", resolution)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DefaultFfiError::invalid_terrain_parameter(name, value));
            }
        }
        if !elevation.is_finite() {
            return Err(DefaultFfiError::invalid_terrain_parameter("elevation", elevation));
        }
        let fuel = fuel_from_code(fuel)?;
        let weather = weather.to_sample()?;

        let terrain = GridTerrain::flat(width, height, resolution, elevation, fuel);
        let coordinator = MultiFireCoordinator::new(CoreConfig::default(), weather)?;

        Ok(Box::new(Self {
            coordinator: RwLock::new(coordinator),
            terrain,
            ranking_snapshot: Mutex::new(Vec::new()),
            convergence_snapshot: Mutex::new(Vec::new()),
        }))
    }
}

/// Fuel code as listed in `FuelType::ALL`:
/// 0 dense fynbos, 1 sparse fynbos, 2 pine plantation, 3 indigenous forest,
/// 4 dry grass, 5 green grass, 6 urban vegetation, 7 scrubland.
fn fuel_from_code(code: u8) -> Result<FuelType, DefaultFfiError> {
    FuelType::ALL
        .get(usize::from(code))
        .copied()
        .ok_or_else(|| DefaultFfiError::invalid_parameter(format!("Unknown fuel code {code}")))
}

/// Create a new instance over flat terrain and return it via out-parameter.
///
/// Parameters
/// - `width`, `height`, `resolution`: terrain extent and grid spacing (m)
/// - `elevation`: terrain elevation (m)
/// - `fuel`: fuel code 0-7 (see `FuelType::ALL` ordering)
/// - `weather`: initial weather sample
/// - `out_instance`: receives the instance; set to null on failure
///
/// Returns `FireFrontErrorCode::Ok` on success. Call `fire_front_get_last_error()`
/// for a description of any failure.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `fire_front_destroy`
///   exactly once.
///
/// Example (C++)
/// ```cpp
/// WeatherReading w = { 65.0f, 270.0f, 8.0f, 38.0f, 43200.0 };
/// FireFrontInstance* sim = nullptr;
/// if (fire_front_new_flat(8000.0f, 8000.0f, 20.0f, 0.0f, 0, w, &sim) != FireFrontErrorCode::Ok) {
///     fprintf(stderr, "%s\n", fire_front_get_last_error());
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_front_new_flat(
    width: f32,
    height: f32,
    resolution: f32,
    elevation: f32,
    fuel: u8,
    weather: WeatherReading,
    out_instance: *mut *mut FireFrontInstance,
) -> FireFrontErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_instance"));
    }

    match track_result(FireFrontInstance::new_flat(width, height, resolution, elevation, fuel, weather)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireFrontErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy an instance created by `fire_front_new_flat`. Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_front_new_flat` and not freed already.
/// - The caller must not use the pointer after this call.
#[no_mangle]
pub unsafe extern "C" fn fire_front_destroy(ptr: *mut FireFrontInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `fire_front_new_flat`; reclaiming
    // ownership drops the coordinator and terrain.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
