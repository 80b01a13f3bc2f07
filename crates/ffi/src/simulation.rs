use fire_front_core::{
    FireId, SimTime, Station, StationId, StructureZone, Vec2, VulnerabilityFlags, ZoneId,
};
use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::{DefaultFfiError, FireFrontErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_coordinator_mut};
use crate::instance::{FireFrontInstance, WeatherReading};

/// Vulnerability bit: elderly residents
pub const FIRE_FRONT_VULNERABLE_ELDERLY: u8 = 1;
/// Vulnerability bit: mobility-impaired residents
pub const FIRE_FRONT_VULNERABLE_MOBILITY: u8 = 1 << 1;
/// Vulnerability bit: young children present
pub const FIRE_FRONT_VULNERABLE_CHILDREN: u8 = 1 << 2;

/// Outcome of one `fire_front_tick` call.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TickSummary {
    /// Tick number after this call (1-based).
    pub tick: u64,
    /// Fires that advanced.
    pub advanced: u32,
    /// Fires whose update failed and kept their previous perimeter.
    pub failed: u32,
    /// At least one fire failed.
    pub degraded: bool,
}

/// Replace the current weather sample.
///
/// Returns `InvalidWeatherSample` for out-of-range readings; the previous
/// sample stays in effect.
#[no_mangle]
pub extern "C" fn fire_front_set_weather(
    ptr: *const FireFrontInstance,
    weather: WeatherReading,
) -> FireFrontErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_coordinator_mut(instance, |c| {
            c.ingest_weather(
                weather.wind_speed_kmh,
                weather.wind_direction_deg,
                weather.humidity_percent,
                weather.temperature_c,
                SimTime::from_seconds(weather.time_seconds),
            )
        })??;
        Ok(())
    })
}

/// Register or replace a response station.
///
/// `turnout_minutes` below zero uses the configured default. `capacity` is the
/// number of crews the station can commit at once.
#[no_mangle]
pub extern "C" fn fire_front_add_station(
    ptr: *const FireFrontInstance,
    station_id: u32,
    x: f32,
    y: f32,
    turnout_minutes: f32,
    capacity: u32,
    available: bool,
) -> FireFrontErrorCode {
    handle_ffi_result_error(|| {
        if !x.is_finite() || !y.is_finite() {
            return Err(DefaultFfiError::invalid_parameter(format!(
                "Station position ({x}, {y}) is not finite"
            )));
        }
        let instance = instance_from_ptr(ptr)?;
        let id = StationId(station_id);
        let mut station = Station::new(id, id.to_string(), Vec2::new(x, y)).with_capacity(capacity);
        if turnout_minutes >= 0.0 {
            station = station.with_turnout(turnout_minutes);
        }
        station.available = available;
        with_coordinator_mut(instance, |c| c.add_station(station))
    })
}

/// Register or replace a structure zone.
///
/// `vulnerability` is a bitmask of `FIRE_FRONT_VULNERABLE_*`.
///
/// # Safety
///
/// `name` may be null; otherwise it must point to a null-terminated string.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fire_front_add_zone(
    ptr: *const FireFrontInstance,
    zone_id: u32,
    name: *const c_char,
    x: f32,
    y: f32,
    structures: u32,
    vulnerability: u8,
    critical_asset: bool,
) -> FireFrontErrorCode {
    if !x.is_finite() || !y.is_finite() {
        return track_error(&DefaultFfiError::invalid_parameter(format!(
            "Zone position ({x}, {y}) is not finite"
        )));
    }
    let id = ZoneId(zone_id);
    let name = if name.is_null() {
        id.to_string()
    } else {
        // SAFETY: caller guarantees a null-terminated string.
        unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
    };

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut zone = StructureZone::new(id, name, Vec2::new(x, y), structures).with_vulnerability(
            VulnerabilityFlags {
                elderly: vulnerability & FIRE_FRONT_VULNERABLE_ELDERLY != 0,
                mobility_impaired: vulnerability & FIRE_FRONT_VULNERABLE_MOBILITY != 0,
                young_children: vulnerability & FIRE_FRONT_VULNERABLE_CHILDREN != 0,
            },
        );
        if critical_asset {
            zone = zone.with_critical_asset();
        }
        with_coordinator_mut(instance, |c| c.add_zone(zone))
    })
}

/// Ignite a fire at `(x, y)` under the current weather.
///
/// Returns `OutOfDomain` if the point lies outside the terrain.
///
/// # Safety
///
/// `out_fire_id` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn fire_front_ignite(
    ptr: *const FireFrontInstance,
    x: f32,
    y: f32,
    out_fire_id: *mut u32,
) -> FireFrontErrorCode {
    if out_fire_id.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_fire_id"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let id = with_coordinator_mut(instance, |c| c.ignite(&instance.terrain, Vec2::new(x, y)))??;
        unsafe {
            *out_fire_id = id.0;
        }
        Ok(())
    })
}

/// Declare a fire contained and stop tracking it.
#[no_mangle]
pub extern "C" fn fire_front_contain(ptr: *const FireFrontInstance, fire_id: u32) -> FireFrontErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_coordinator_mut(instance, |c| c.declare_contained(FireId(fire_id)))??;
        Ok(())
    })
}

/// Advance every active fire by `dt_seconds`.
///
/// A degraded tick (some fires failed) still returns `Ok`; inspect
/// `out_summary` to detect it. `out_summary` may be null.
///
/// # Safety
///
/// `out_summary`, if non-null, must point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn fire_front_tick(
    ptr: *const FireFrontInstance,
    dt_seconds: f32,
    out_summary: *mut TickSummary,
) -> FireFrontErrorCode {
    if !dt_seconds.is_finite() || dt_seconds < 0.0 {
        return track_error(&DefaultFfiError::invalid_parameter(format!(
            "dt_seconds must be finite and non-negative, got {dt_seconds}"
        )));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let report = with_coordinator_mut(instance, |c| c.tick(&instance.terrain, dt_seconds))?;
        if !out_summary.is_null() {
            unsafe {
                *out_summary = TickSummary {
                    tick: report.tick,
                    advanced: report.advanced.len() as u32,
                    failed: report.failures.len() as u32,
                    degraded: report.degraded,
                };
            }
        }
        Ok(())
    })
}
