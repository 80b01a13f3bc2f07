//! C ABI for the fire-front model.
//!
//! An opaque [`FireFrontInstance`] owns a [`fire_front_core::MultiFireCoordinator`]
//! and its terrain. Every `fire_front_*` function returns a
//! [`FireFrontErrorCode`]; on failure `fire_front_get_last_error()` yields a
//! message for the calling thread. Bindings are generated into
//! `FireFrontFFI.h` by the build script.

mod error;
mod helpers;
pub mod instance;
pub mod queries;
pub mod simulation;

pub use error::{fire_front_get_last_error, fire_front_get_last_error_code, FireFrontErrorCode};
pub use instance::{fire_front_destroy, fire_front_new_flat, FireFrontInstance, WeatherReading};
pub use queries::{
    fire_front_get_convergence, fire_front_get_perimeter, fire_front_get_ranking,
    fire_front_get_strain, fire_front_get_zone_status, ConvergenceRecord, FirePerimeter,
    FrontClassCode, RankedFire, StrainRecord, ZoneStatusRecord,
};
pub use simulation::{
    fire_front_add_station, fire_front_add_zone, fire_front_contain, fire_front_ignite,
    fire_front_set_weather, fire_front_tick, TickSummary, FIRE_FRONT_VULNERABLE_CHILDREN,
    FIRE_FRONT_VULNERABLE_ELDERLY, FIRE_FRONT_VULNERABLE_MOBILITY,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn berg_wind() -> WeatherReading {
        WeatherReading {
            wind_speed_kmh: 65.0,
            wind_direction_deg: 90.0,
            humidity_percent: 8.0,
            temperature_c: 38.0,
            time_seconds: 11.0 * 3600.0,
        }
    }

    fn create() -> *mut FireFrontInstance {
        let mut sim = ptr::null_mut();
        let code = unsafe { fire_front_new_flat(6000.0, 6000.0, 20.0, 0.0, 0, berg_wind(), &mut sim) };
        assert_eq!(code, FireFrontErrorCode::Ok);
        assert!(!sim.is_null());
        sim
    }

    fn last_error() -> String {
        let msg = fire_front_get_last_error();
        assert!(!msg.is_null());
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }

    #[test]
    fn null_out_instance_is_rejected() {
        let code = unsafe { fire_front_new_flat(1000.0, 1000.0, 10.0, 0.0, 0, berg_wind(), ptr::null_mut()) };
        assert_eq!(code, FireFrontErrorCode::NullPointer);
        assert!(last_error().contains("out_instance"));
    }

    #[test]
    fn invalid_creation_parameters_map_to_codes() {
        let mut sim = ptr::null_mut();
        let code = unsafe { fire_front_new_flat(-5.0, 1000.0, 10.0, 0.0, 0, berg_wind(), &mut sim) };
        assert_eq!(code, FireFrontErrorCode::InvalidTerrainParameters);
        assert!(sim.is_null());

        let code = unsafe { fire_front_new_flat(1000.0, 1000.0, 10.0, 0.0, 42, berg_wind(), &mut sim) };
        assert_eq!(code, FireFrontErrorCode::InvalidParameter);
        assert!(last_error().contains("42"));

        let mut humid = berg_wind();
        humid.humidity_percent = 140.0;
        let code = unsafe { fire_front_new_flat(1000.0, 1000.0, 10.0, 0.0, 0, humid, &mut sim) };
        assert_eq!(code, FireFrontErrorCode::InvalidWeatherSample);
        assert_eq!(fire_front_get_last_error_code(), FireFrontErrorCode::InvalidWeatherSample);
    }

    #[test]
    fn ignite_tick_and_query_perimeter() {
        let sim = create();
        let mut fire_id = 0;
        assert_eq!(unsafe { fire_front_ignite(sim, 2500.0, 3000.0, &mut fire_id) }, FireFrontErrorCode::Ok);
        assert!(fire_front_get_last_error().is_null());

        let mut summary = TickSummary::default();
        for _ in 0..5 {
            assert_eq!(unsafe { fire_front_tick(sim, 60.0, &mut summary) }, FireFrontErrorCode::Ok);
        }
        assert_eq!(summary.tick, 5);
        assert_eq!(summary.advanced, 1);
        assert!(!summary.degraded);

        let mut perimeter = std::mem::MaybeUninit::<FirePerimeter>::uninit();
        let code = unsafe { fire_front_get_perimeter(sim, fire_id, perimeter.as_mut_ptr()) };
        assert_eq!(code, FireFrontErrorCode::Ok);
        let perimeter = unsafe { perimeter.assume_init() };

        assert_eq!(perimeter.fire_id, fire_id);
        // Wind blows toward the east: sector 4 (90°) leads, sector 12 (270°) backs.
        assert_eq!(perimeter.classes[4], FrontClassCode::Head);
        assert_eq!(perimeter.classes[12], FrontClassCode::Backing);
        assert!(perimeter.radii[4] > perimeter.radii[12]);
        assert!(perimeter.burned_area_m2 > 0.0);
        for i in 0..16 {
            assert!(perimeter.projected_1h[i] >= perimeter.radii[i]);
            assert!(perimeter.projected_6h[i] >= perimeter.projected_3h[i]);
        }

        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn ignition_outside_terrain_is_out_of_domain() {
        let sim = create();
        let mut fire_id = 0;
        let code = unsafe { fire_front_ignite(sim, 9000.0, 100.0, &mut fire_id) };
        assert_eq!(code, FireFrontErrorCode::OutOfDomain);
        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn unknown_fire_and_zone_report_codes() {
        let sim = create();
        let mut perimeter = std::mem::MaybeUninit::<FirePerimeter>::uninit();
        let code = unsafe { fire_front_get_perimeter(sim, 77, perimeter.as_mut_ptr()) };
        assert_eq!(code, FireFrontErrorCode::UnknownFire);
        assert!(last_error().contains("77"));

        let mut status = std::mem::MaybeUninit::<ZoneStatusRecord>::uninit();
        let code = unsafe { fire_front_get_zone_status(sim, 5, status.as_mut_ptr()) };
        assert_eq!(code, FireFrontErrorCode::UnknownZone);

        assert_eq!(fire_front_contain(sim, 77), FireFrontErrorCode::UnknownFire);
        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn zone_downwind_is_threatened() {
        let sim = create();
        let code = unsafe {
            fire_front_add_zone(
                sim,
                1,
                c"Hillside".as_ptr(),
                3200.0,
                3000.0,
                120,
                FIRE_FRONT_VULNERABLE_ELDERLY | FIRE_FRONT_VULNERABLE_CHILDREN,
                false,
            )
        };
        assert_eq!(code, FireFrontErrorCode::Ok);

        let mut status = std::mem::MaybeUninit::<ZoneStatusRecord>::uninit();
        assert_eq!(
            unsafe { fire_front_get_zone_status(sim, 1, status.as_mut_ptr()) },
            FireFrontErrorCode::Ok
        );
        let before = unsafe { status.assume_init() };
        assert!(!before.has_perimeter);
        assert_eq!(before.structures_at_risk, 0);

        let mut fire_id = 0;
        assert_eq!(unsafe { fire_front_ignite(sim, 2500.0, 3000.0, &mut fire_id) }, FireFrontErrorCode::Ok);
        assert_eq!(unsafe { fire_front_tick(sim, 120.0, ptr::null_mut()) }, FireFrontErrorCode::Ok);

        let mut status = std::mem::MaybeUninit::<ZoneStatusRecord>::uninit();
        assert_eq!(
            unsafe { fire_front_get_zone_status(sim, 1, status.as_mut_ptr()) },
            FireFrontErrorCode::Ok
        );
        let after = unsafe { status.assume_init() };
        assert!(after.has_perimeter);
        assert!(after.perimeter_distance < 700.0);
        assert!(after.threat >= 2);
        assert_eq!(after.threatening_fire, fire_id);

        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn ranking_and_strain_cover_every_fire() {
        let sim = create();
        assert_eq!(fire_front_add_station(sim, 1, 500.0, 500.0, -1.0, 2, true), FireFrontErrorCode::Ok);

        let mut ids = [0u32; 3];
        for (i, id) in ids.iter_mut().enumerate() {
            let x = 1000.0 + 1500.0 * i as f32;
            assert_eq!(unsafe { fire_front_ignite(sim, x, 1500.0, id) }, FireFrontErrorCode::Ok);
        }
        assert_eq!(unsafe { fire_front_tick(sim, 60.0, ptr::null_mut()) }, FireFrontErrorCode::Ok);

        let mut len = 0usize;
        let mut array: *const RankedFire = ptr::null();
        assert_eq!(unsafe { fire_front_get_ranking(sim, &mut len, &mut array) }, FireFrontErrorCode::Ok);
        assert_eq!(len, 3);
        let ranking = unsafe { std::slice::from_raw_parts(array, len) };
        let mut ranked: Vec<u32> = ranking.iter().map(|r| r.fire_id).collect();
        ranked.sort_unstable();
        assert_eq!(ranked, ids.to_vec());
        assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));

        let mut strain = std::mem::MaybeUninit::<StrainRecord>::uninit();
        assert_eq!(unsafe { fire_front_get_strain(sim, strain.as_mut_ptr()) }, FireFrontErrorCode::Ok);
        let strain = unsafe { strain.assume_init() };
        assert_eq!(strain.active_fires, 3);
        assert_eq!(strain.available_stations, 1);
        assert_eq!(strain.available_capacity, 2);
        assert!((strain.ratio - 1.5).abs() < 1e-6);
        assert_eq!(strain.level, 3);
        assert!(strain.unified_command);

        let mut len = 0usize;
        let mut pairs: *const ConvergenceRecord = ptr::null();
        assert_eq!(unsafe { fire_front_get_convergence(sim, &mut len, &mut pairs) }, FireFrontErrorCode::Ok);
        assert_eq!(len, 3);

        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn rejected_weather_keeps_previous_sample() {
        let sim = create();
        let mut bad = berg_wind();
        bad.wind_speed_kmh = -3.0;
        assert_eq!(fire_front_set_weather(sim, bad), FireFrontErrorCode::InvalidWeatherSample);
        assert_eq!(fire_front_set_weather(sim, berg_wind()), FireFrontErrorCode::Ok);
        assert!(fire_front_get_last_error().is_null());
        unsafe { fire_front_destroy(sim) };
    }

    #[test]
    fn null_instance_is_reported() {
        assert_eq!(fire_front_contain(ptr::null(), 1), FireFrontErrorCode::NullPointer);
        let mut len = 5usize;
        let mut array: *const RankedFire = ptr::null();
        assert_eq!(
            unsafe { fire_front_get_ranking(ptr::null(), &mut len, &mut array) },
            FireFrontErrorCode::NullPointer
        );
        assert_eq!(len, 0);
        unsafe { fire_front_destroy(ptr::null_mut()) };
    }
}
