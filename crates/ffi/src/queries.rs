use fire_front_core::{
    ConvergencePair, FireId, FireView, FirePriority, FrontClass, Hours, ResourceStrain, ZoneId,
    ZoneStatus, SECTOR_COUNT,
};
use std::ptr;

use crate::error::{DefaultFfiError, FireFrontErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_coordinator};
use crate::instance::FireFrontInstance;

/// Front classification of one perimeter sector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontClassCode {
    Head = 0,
    LeftFlank = 1,
    RightFlank = 2,
    Backing = 3,
    Finger = 4,
}

impl From<FrontClass> for FrontClassCode {
    fn from(class: FrontClass) -> Self {
        match class {
            FrontClass::Head => FrontClassCode::Head,
            FrontClass::LeftFlank => FrontClassCode::LeftFlank,
            FrontClass::RightFlank => FrontClassCode::RightFlank,
            FrontClass::Backing => FrontClassCode::Backing,
            FrontClass::Finger => FrontClassCode::Finger,
        }
    }
}

/// Perimeter, classification and standard projection of one fire.
///
/// Sector `i` faces compass bearing `i × 22.5°` from the ignition point.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FirePerimeter {
    pub fire_id: u32,
    pub ignition_x: f32,
    pub ignition_y: f32,
    /// Current sector radii (m).
    pub radii: [f32; SECTOR_COUNT],
    pub classes: [FrontClassCode; SECTOR_COUNT],
    /// Current sector spread rates (m/min).
    pub rates: [f32; SECTOR_COUNT],
    /// Burned area (m²).
    pub burned_area_m2: f32,
    /// Projected radii at +1 h, +3 h and +6 h (m).
    pub projected_1h: [f32; SECTOR_COUNT],
    pub projected_3h: [f32; SECTOR_COUNT],
    pub projected_6h: [f32; SECTOR_COUNT],
}

impl From<&FireView> for FirePerimeter {
    fn from(view: &FireView) -> Self {
        let projected = |hours: f32| -> [f32; SECTOR_COUNT] {
            view.projection
                .at(Hours::new(hours))
                .map_or([0.0; SECTOR_COUNT], |p| p.radii.map(|r| *r))
        };
        Self {
            fire_id: view.id.0,
            ignition_x: view.ignition.x,
            ignition_y: view.ignition.y,
            radii: view.radii.map(|r| *r),
            classes: view.classes.map(FrontClassCode::from),
            rates: view.rates.map(|r| *r),
            burned_area_m2: view.burned_area,
            projected_1h: projected(1.0),
            projected_3h: projected(3.0),
            projected_6h: projected(6.0),
        }
    }
}

/// Threat to one structure zone, most severe across all fires.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ZoneStatusRecord {
    pub zone_id: u32,
    /// False while no fire is active; `perimeter_distance` is then meaningless.
    pub has_perimeter: bool,
    /// Distance to the nearest perimeter (m).
    pub perimeter_distance: f32,
    /// 0 LOW, 1 MODERATE, 2 HIGH, 3 CRITICAL
    pub threat: u8,
    /// 0 MONITOR, 1 STANDBY, 2 URGENT, 3 IMMEDIATE
    pub evacuation: u8,
    pub structures_at_risk: u32,
    /// Fire posing the most severe threat, 0 if none.
    pub threatening_fire: u32,
}

impl From<&ZoneStatus> for ZoneStatusRecord {
    fn from(status: &ZoneStatus) -> Self {
        Self {
            zone_id: status.zone.0,
            has_perimeter: status.perimeter_distance.is_some(),
            perimeter_distance: status.perimeter_distance.map_or(f32::INFINITY, |d| *d),
            threat: status.threat.rank(),
            evacuation: status.evacuation.rank(),
            structures_at_risk: status.structures_at_risk,
            threatening_fire: status.assessments.first().map_or(0, |a| a.fire.0),
        }
    }
}

/// One entry of the resource-allocation ranking.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RankedFire {
    pub fire_id: u32,
    pub score: f32,
    pub residential: f32,
    pub burned_area: f32,
    pub spread_rate: f32,
    pub crown_fire: f32,
    pub convergence: f32,
}

impl From<&FirePriority> for RankedFire {
    fn from(p: &FirePriority) -> Self {
        Self {
            fire_id: p.fire.0,
            score: p.score,
            residential: p.components.residential,
            burned_area: p.components.burned_area,
            spread_rate: p.components.spread_rate,
            crown_fire: p.components.crown_fire,
            convergence: p.components.convergence,
        }
    }
}

/// Convergence between two active fires (lower id first).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceRecord {
    pub first: u32,
    pub second: u32,
    /// Closest approach of the projected perimeters (m).
    pub distance: f32,
    /// 0 LOW, 1 MODERATE, 2 HIGH
    pub risk: u8,
}

impl From<&ConvergencePair> for ConvergenceRecord {
    fn from(p: &ConvergencePair) -> Self {
        Self {
            first: p.first.0,
            second: p.second.0,
            distance: *p.distance,
            risk: p.risk as u8,
        }
    }
}

/// Resource strain across all incidents.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StrainRecord {
    pub active_fires: u32,
    pub available_stations: u32,
    /// Summed capacity of the available stations.
    pub available_capacity: u32,
    /// Active fires per unit of available capacity; infinite with none.
    pub ratio: f32,
    /// 0 LOW, 1 MODERATE, 2 HIGH, 3 CRITICAL
    pub level: u8,
    pub unified_command: bool,
}

impl From<&ResourceStrain> for StrainRecord {
    fn from(s: &ResourceStrain) -> Self {
        Self {
            active_fires: s.active_fires as u32,
            available_stations: s.available_stations as u32,
            available_capacity: s.available_capacity,
            ratio: s.ratio,
            level: s.level as u8,
            unified_command: s.unified_command,
        }
    }
}

/// Fill `out_perimeter` with the current perimeter of `fire_id`.
///
/// Returns `UnknownFire` if the fire is not active.
///
/// # Safety
///
/// `out_perimeter` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn fire_front_get_perimeter(
    ptr: *const FireFrontInstance,
    fire_id: u32,
    out_perimeter: *mut FirePerimeter,
) -> FireFrontErrorCode {
    if out_perimeter.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_perimeter"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let view = with_coordinator(instance, |c| c.fire_view(FireId(fire_id)))??;
        unsafe {
            *out_perimeter = FirePerimeter::from(&view);
        }
        Ok(())
    })
}

/// Fill `out_status` with the threat to `zone_id`.
///
/// Returns `UnknownZone` if the zone is not registered.
///
/// # Safety
///
/// `out_status` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn fire_front_get_zone_status(
    ptr: *const FireFrontInstance,
    zone_id: u32,
    out_status: *mut ZoneStatusRecord,
) -> FireFrontErrorCode {
    if out_status.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_status"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let status = with_coordinator(instance, |c| c.zone_status(ZoneId(zone_id)))??;
        unsafe {
            *out_status = ZoneStatusRecord::from(&status);
        }
        Ok(())
    })
}

/// Borrow the current priority ranking, highest priority first.
///
/// The array lives in a buffer owned by the instance. It stays valid until
/// the next call to this function. **DO NOT FREE THIS POINTER**.
///
/// # Safety
///
/// `out_len` and `out_array` must be valid, non-null pointers.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const RankedFire* ranking = nullptr;
/// if (fire_front_get_ranking(sim, &len, &ranking) == FireFrontErrorCode::Ok) {
///     for (uintptr_t i = 0; i < len; i++) {
///         printf("fire %u score %.1f\n", ranking[i].fire_id, ranking[i].score);
///     }
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_front_get_ranking(
    ptr: *const FireFrontInstance,
    out_len: *mut usize,
    out_array: *mut *const RankedFire,
) -> FireFrontErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultFfiError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut snapshot = instance
            .ranking_snapshot
            .lock()
            .map_err(|_| DefaultFfiError::lock_poisoned("ranking_snapshot Mutex"))?;
        snapshot.clear();
        with_coordinator(instance, |c| {
            snapshot.extend(c.snapshot().ranking.iter().map(RankedFire::from));
        })?;
        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok(())
    });

    if result != FireFrontErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }
    result
}

/// Borrow the current convergence pairs. Same buffer contract as
/// `fire_front_get_ranking`.
///
/// # Safety
///
/// `out_len` and `out_array` must be valid, non-null pointers.
#[no_mangle]
pub unsafe extern "C" fn fire_front_get_convergence(
    ptr: *const FireFrontInstance,
    out_len: *mut usize,
    out_array: *mut *const ConvergenceRecord,
) -> FireFrontErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultFfiError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut snapshot = instance
            .convergence_snapshot
            .lock()
            .map_err(|_| DefaultFfiError::lock_poisoned("convergence_snapshot Mutex"))?;
        snapshot.clear();
        with_coordinator(instance, |c| {
            snapshot.extend(c.snapshot().convergence.iter().map(ConvergenceRecord::from));
        })?;
        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok(())
    });

    if result != FireFrontErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }
    result
}

/// Fill `out_strain` with the current resource strain.
///
/// # Safety
///
/// `out_strain` must be a valid, non-null pointer.
#[no_mangle]
pub unsafe extern "C" fn fire_front_get_strain(
    ptr: *const FireFrontInstance,
    out_strain: *mut StrainRecord,
) -> FireFrontErrorCode {
    if out_strain.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_strain"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let strain = with_coordinator(instance, |c| StrainRecord::from(&c.snapshot().strain))?;
        unsafe {
            *out_strain = strain;
        }
        Ok(())
    })
}
