//! End-to-end coordinator scenarios: converging fires on a Berg-wind day,
//! evacuation of vulnerable zones, degraded ticks and resource strain.

use fire_front_core::coordinator::{convergence, rank, PriorityComponents};
use fire_front_core::{
    ConvergenceRisk, CoreConfig, Degrees, EvacuationPriority, FireError, FireId, FirePriority,
    FrontClass, FuelType, GridTerrain, Meters, MultiFireCoordinator, SimTime, SpreadConfig,
    Station, StationId, StrainLevel, StructureZone, TacticalAction, TerrainFallback, ThreatLevel,
    Vec2, VulnerabilityFlags, WeatherSample, ZoneId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fynbos() -> GridTerrain {
    GridTerrain::flat(8000.0, 8000.0, 20.0, 0.0, FuelType::DenseFynbos)
}

fn berg_coordinator(direction: f32) -> MultiFireCoordinator {
    let weather = WeatherSample::berg_wind(Degrees::new(direction), SimTime::from_day_hour(0, 12.0)).unwrap();
    MultiFireCoordinator::new(CoreConfig::default(), weather).unwrap()
}

fn mild_coordinator(direction: f32) -> MultiFireCoordinator {
    let weather = WeatherSample::mild(Degrees::new(direction), SimTime::from_day_hour(0, 9.0)).unwrap();
    MultiFireCoordinator::new(CoreConfig::default(), weather).unwrap()
}

fn elderly() -> VulnerabilityFlags {
    VulnerabilityFlags {
        elderly: true,
        ..VulnerabilityFlags::NONE
    }
}

#[test]
fn berg_wind_fires_a_kilometre_apart_converge() {
    let terrain = fynbos();
    let mut c = berg_coordinator(270.0);
    let a = c.ignite(&terrain, Vec2::new(5000.0, 4000.0)).unwrap();
    let b = c.ignite(&terrain, Vec2::new(5000.0, 5200.0)).unwrap();

    let mut high_at = None;
    for tick in 1..=3 {
        let report = c.tick(&terrain, 300.0);
        assert!(!report.degraded);
        let pair = report.snapshot.pair(a, b).expect("pair should be tracked");
        if pair.risk == ConvergenceRisk::High {
            high_at.get_or_insert(tick);
        }
    }
    assert!(high_at.is_some(), "fires 1.2 km apart should be HIGH convergence risk");

    // Both fires carry the convergence term in their priority
    for p in &c.snapshot().ranking {
        assert!(p.components.convergence > 0.0, "{} missing convergence", p.fire);
    }
}

#[test]
fn convergence_is_symmetric() {
    let terrain = fynbos();
    let mut c = berg_coordinator(300.0);
    let a = c.ignite(&terrain, Vec2::new(3000.0, 3000.0)).unwrap();
    let b = c.ignite(&terrain, Vec2::new(5200.0, 3900.0)).unwrap();
    c.tick(&terrain, 600.0);

    let cfg = &c.config().coordinator;
    let fa = c.fire(a).unwrap();
    let fb = c.fire(b).unwrap();
    let ab = convergence(fa, fb, cfg);
    let ba = convergence(fb, fa, cfg);
    assert_eq!(ab, ba);
    assert_eq!(c.snapshot().pair(a, b), c.snapshot().pair(b, a));
    assert_eq!(ab.partner(a), Some(b));
}

#[test]
fn elderly_zone_ahead_of_the_head_is_evacuated_immediately() {
    let terrain = GridTerrain::flat(8000.0, 8000.0, 20.0, 0.0, FuelType::Scrubland);
    let mut c = mild_coordinator(90.0);
    // 250 m beyond the fresh 10 m perimeter, downwind
    c.add_zone(StructureZone::new(ZoneId(1), "Rest home", Vec2::new(3260.0, 3000.0), 12).with_vulnerability(elderly()));
    // Same vulnerability, well upwind
    c.add_zone(StructureZone::new(ZoneId(2), "Retirement village", Vec2::new(2390.0, 3000.0), 30).with_vulnerability(elderly()));
    let fire = c.ignite(&terrain, Vec2::new(3000.0, 3000.0)).unwrap();

    let ahead = c.zone_status(ZoneId(1)).unwrap();
    assert_eq!(ahead.evacuation, EvacuationPriority::Immediate);
    assert!(ahead.threat >= ThreatLevel::High);
    assert_eq!(ahead.assessments[0].fire, fire);
    assert_eq!(ahead.assessments[0].sector_class, FrontClass::Head);
    assert_eq!(ahead.structures_at_risk, 12);

    let behind = c.zone_status(ZoneId(2)).unwrap();
    assert!(behind.evacuation.rank() < EvacuationPriority::Immediate.rank());

    // The head recommendation now includes protecting structures
    let head = c
        .snapshot()
        .tactics
        .iter()
        .find(|t| t.fire == fire && t.class == FrontClass::Head)
        .expect("head recommendation");
    assert!(head.threatens_structures);
    assert!(head.actions.contains(&TacticalAction::StructureProtection));
}

#[test]
fn priority_ranking_orders_by_score() {
    let entry = |fire: u32, score: f32| FirePriority {
        fire: FireId(fire),
        score,
        ignited_at: SimTime::from_day_hour(0, 10.0),
        components: PriorityComponents::default(),
    };
    let ranked = rank(vec![entry(1, 38.7), entry(2, 30.2), entry(3, 43.2)]);
    let ids: Vec<FireId> = ranked.iter().map(|p| p.fire).collect();
    assert_eq!(ids, vec![FireId(3), FireId(1), FireId(2)]);
}

#[test]
fn threatened_fire_outranks_a_remote_one() {
    let terrain = fynbos();
    let mut c = mild_coordinator(0.0);
    c.add_zone(StructureZone::new(ZoneId(7), "Township", Vec2::new(2000.0, 2300.0), 200));
    let remote = c.ignite(&terrain, Vec2::new(6500.0, 6500.0)).unwrap();
    let threatening = c.ignite(&terrain, Vec2::new(2000.0, 2000.0)).unwrap();
    let report = c.tick(&terrain, 300.0);

    assert_eq!(report.snapshot.ranked_ids(), vec![threatening, remote]);
    let top = &report.snapshot.ranking[0];
    assert!(top.components.residential > 0.0);
}

#[test]
fn a_failing_fire_degrades_the_tick_but_keeps_its_state() {
    let terrain = GridTerrain::flat(2000.0, 2000.0, 10.0, 0.0, FuelType::DryGrass);
    let mut c = berg_coordinator(90.0);
    let edge = c.ignite(&terrain, Vec2::new(1900.0, 1000.0)).unwrap();
    let inland = c.ignite(&terrain, Vec2::new(300.0, 1000.0)).unwrap();

    let mut frozen = None;
    let mut degraded = None;
    for _ in 0..4 {
        let before = c.fire(edge).unwrap().radii();
        let report = c.tick(&terrain, 300.0);
        if report.degraded {
            frozen = Some((before, c.fire(edge).unwrap().radii()));
            degraded = Some(report);
            break;
        }
    }

    let report = degraded.expect("edge fire should leave the grid");
    let (before, after) = frozen.unwrap();
    assert_eq!(before, after, "failed fire keeps its previous perimeter");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].fire, edge);
    assert!(matches!(report.failures[0].error, FireError::OutOfDomain { .. }));
    assert!(report.advanced.contains(&inland));
    // The cross-fire phase still sees both fires
    assert_eq!(report.snapshot.ranking.len(), 2);
}

#[test]
fn fallback_config_keeps_edge_fires_running() {
    let terrain = GridTerrain::flat(2000.0, 2000.0, 10.0, 0.0, FuelType::DryGrass);
    let weather = WeatherSample::berg_wind(Degrees::new(90.0), SimTime::from_day_hour(0, 12.0)).unwrap();
    let config = CoreConfig {
        spread: SpreadConfig {
            terrain_fallback: TerrainFallback::AssumeModerateFuel,
            ..SpreadConfig::default()
        },
        ..CoreConfig::default()
    };
    let mut c = MultiFireCoordinator::new(config, weather).unwrap();
    let edge = c.ignite(&terrain, Vec2::new(1900.0, 1000.0)).unwrap();

    for _ in 0..4 {
        assert!(!c.tick(&terrain, 300.0).degraded);
    }
    assert!(c.fire(edge).unwrap().radii()[4] > Meters::new(100.0));
}

#[test]
fn three_fires_and_one_station_need_unified_command() {
    let terrain = fynbos();
    let mut c = mild_coordinator(45.0);
    c.add_station(Station::new(StationId(1), "Central", Vec2::new(4000.0, 4000.0)));
    for (x, y) in [(1000.0, 1000.0), (4000.0, 6500.0), (7000.0, 2000.0)] {
        c.ignite(&terrain, Vec2::new(x, y)).unwrap();
    }
    let report = c.tick(&terrain, 60.0);

    let strain = &report.snapshot.strain;
    assert_eq!(strain.active_fires, 3);
    assert_eq!(strain.level, StrainLevel::Critical);
    assert!(strain.unified_command);

    for id in c.fire_ids() {
        let incident = c.incident(id).unwrap();
        assert_eq!(incident.primary_station.as_ref().map(|s| s.station), Some(StationId(1)));
    }
}

#[test]
fn containment_clears_the_fire_from_every_view() {
    let terrain = fynbos();
    let mut c = mild_coordinator(180.0);
    let a = c.ignite(&terrain, Vec2::new(2000.0, 2000.0)).unwrap();
    let b = c.ignite(&terrain, Vec2::new(2600.0, 2000.0)).unwrap();
    c.tick(&terrain, 600.0);
    assert!(c.snapshot().pair(a, b).is_some());

    c.declare_contained(a).unwrap();
    assert!(c.snapshot().pair(a, b).is_none());
    assert_eq!(c.snapshot().ranked_ids(), vec![b]);
    assert!(matches!(c.incident(a), Err(FireError::UnknownFire(_))));
}

#[test]
fn spot_fire_candidates_land_downwind() {
    let terrain = fynbos();
    let mut c = berg_coordinator(0.0);
    let id = c.ignite(&terrain, Vec2::new(4000.0, 2000.0)).unwrap();
    c.tick(&terrain, 600.0);

    let mut rng = StdRng::seed_from_u64(7);
    let candidates = c.spot_fire_candidates(id, &mut rng).unwrap();
    let head = c.fire(id).unwrap().perimeter_point(0);
    for spot in &candidates {
        assert!(spot.position.y > head.y, "spot at {:?} is not downwind", spot.position);
    }
}

#[test]
fn zones_can_be_removed() {
    let mut c = mild_coordinator(0.0);
    c.add_zone(StructureZone::new(ZoneId(3), "Farm", Vec2::new(100.0, 100.0), 4));
    let removed = c.remove_zone(ZoneId(3)).unwrap();
    assert_eq!(removed.name, "Farm");
    assert!(c.zones().is_empty());
    assert!(matches!(c.remove_zone(ZoneId(3)), Err(FireError::UnknownZone(_))));
}

#[test]
fn late_ignition_takes_the_coordinator_clock() {
    let terrain = fynbos();
    let mut c = mild_coordinator(0.0);
    let a = c.ignite(&terrain, Vec2::new(2000.0, 2000.0)).unwrap();
    for _ in 0..6 {
        c.tick(&terrain, 600.0);
    }
    let b = c.ignite(&terrain, Vec2::new(6000.0, 6000.0)).unwrap();

    let ta = c.fire(a).unwrap().ignited_at();
    let tb = c.fire(b).unwrap().ignited_at();
    assert_eq!(ta, SimTime::from_day_hour(0, 9.0));
    assert_eq!(tb, SimTime::from_day_hour(0, 10.0), "ignited at {tb}, clock {}", c.snapshot().time);
    assert_eq!(c.fire_view(b).unwrap().ignited_at, c.snapshot().time);
    assert!(tb > ta);
}

#[test]
fn zone_added_mid_incident_is_assessed_at_once() {
    let terrain = fynbos();
    let mut c = berg_coordinator(90.0);
    let id = c.ignite(&terrain, Vec2::new(3000.0, 4000.0)).unwrap();
    c.tick(&terrain, 300.0);

    let head = c.fire(id).unwrap().perimeter_point(4);
    c.add_zone(
        StructureZone::new(ZoneId(9), "Ridge Road", head + Vec2::new(50.0, 0.0), 30).with_vulnerability(elderly()),
    );

    let status = c.zone_status(ZoneId(9)).unwrap();
    let distance = status.perimeter_distance.expect("distance is known before the next tick");
    assert!(*distance < 100.0, "zone is {distance} from the perimeter");
    assert_eq!(status.threat, ThreatLevel::Critical);
    assert_eq!(status.evacuation, EvacuationPriority::Immediate);
    assert_eq!(status.structures_at_risk, 30);

    c.remove_zone(ZoneId(9)).unwrap();
    assert!(c.fire(id).unwrap().zone_risk().is_empty());
}
