//! Route scheduling tests
//!
//! Tests for the clock walk, lunch and end-of-day handling, segment costs and
//! the exact-to-estimated fallback.

mod fixtures;

use territory_planner::config::{EngineConfig, TimeWindow};
use territory_planner::cost::CostPolicy;
use territory_planner::haversine::{zone_distance_km, HaversineEstimator};
use territory_planner::model::{RepId, Sector, Visit, VisitStatus, VisitType, Zone};
use territory_planner::scheduler::{Route, RouteScheduler};
use territory_planner::traits::{DistanceProvider, ProviderKind};
use territory_planner::travel::TravelResolver;

use fixtures::{day, hm, FailingExact, FixedTravel, UnreachableZone, VisitBuilder};

// ============================================================================
// Helpers
// ============================================================================

/// 09:00-17:00, lunch 12:00-13:00, 10 minute buffer.
fn office_day() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.schedule.working_hours = TimeWindow::hm((9, 0), (17, 0));
    config.schedule.lunch = TimeWindow::hm((12, 0), (13, 0));
    config.schedule.buffer_minutes = 10;
    config
}

fn exact(provider: impl DistanceProvider + 'static) -> TravelResolver {
    TravelResolver::with_exact(HaversineEstimator::default(), Box::new(provider), 4)
}

fn twenty_minutes() -> FixedTravel {
    FixedTravel {
        distance_km: 10.0,
        duration_min: 20.0,
    }
}

fn schedule(config: &EngineConfig, resolver: &TravelResolver, visits: &[Visit]) -> Route {
    RouteScheduler::new(config, resolver)
        .schedule(&RepId::new("rep"), day(), visits)
        .unwrap()
}

fn starts(route: &Route) -> Vec<(String, chrono::NaiveTime)> {
    route
        .visits
        .iter()
        .map(|s| (s.visit.id.to_string(), s.start))
        .collect()
}

// ============================================================================
// Clock walk
// ============================================================================

#[test]
fn test_three_discovery_visits_with_lunch_straddle() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let visits: Vec<Visit> = ["a", "b", "c"]
        .iter()
        .map(|id| VisitBuilder::new(id).kind(VisitType::Discovery).build())
        .collect();

    let route = schedule(&config, &resolver, &visits);

    // 09:00, then +45+20+10 = 10:15, then 11:30 would end at 12:15 inside
    // lunch, so the third visit moves to lunch end.
    assert_eq!(
        starts(&route),
        vec![
            ("a".to_string(), hm(9, 0)),
            ("b".to_string(), hm(10, 15)),
            ("c".to_string(), hm(13, 0)),
        ]
    );
    assert_eq!(route.visits[2].end, hm(13, 45));
    assert!(route.is_complete());
}

#[test]
fn test_clock_inside_lunch_moves_to_lunch_end() {
    let mut config = office_day();
    config.schedule.buffer_minutes = 0;
    let resolver = exact(FixedTravel {
        distance_km: 1.0,
        duration_min: 0.0,
    });
    let visits = vec![
        VisitBuilder::new("morning").duration(180).build(),
        VisitBuilder::new("after").duration(30).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    // the morning visit ends at 12:00, leaving the clock on lunch start
    assert_eq!(route.visits[1].start, hm(13, 0));
}

#[test]
fn test_visit_ending_exactly_at_lunch_is_kept() {
    let mut config = office_day();
    config.schedule.buffer_minutes = 0;
    let resolver = exact(FixedTravel {
        distance_km: 1.0,
        duration_min: 0.0,
    });
    let visits = vec![
        VisitBuilder::new("first").duration(150).build(),
        VisitBuilder::new("second").duration(30).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    // 11:30-12:00 touches lunch start without overlapping it
    assert_eq!(route.visits[1].start, hm(11, 30));
    assert_eq!(route.visits[1].end, hm(12, 0));
}

#[test]
fn test_overflowing_visits_are_reported_not_dropped() {
    let mut config = office_day();
    config.schedule.working_hours = TimeWindow::hm((9, 0), (11, 0));
    let resolver = exact(twenty_minutes());
    let visits: Vec<Visit> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| VisitBuilder::new(id).build())
        .collect();

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(route.visits.len(), 2);
    assert_eq!(route.visits[1].end, hm(11, 0));
    let unscheduled: Vec<&str> = route.unscheduled.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(unscheduled, vec!["c", "d"]);
    assert_eq!(route.segments.len(), 1);
}

#[test]
fn test_visit_that_would_run_past_end_of_day_is_unscheduled() {
    let mut config = office_day();
    config.schedule.working_hours = TimeWindow::hm((9, 0), (10, 0));
    let resolver = TravelResolver::estimated_only(HaversineEstimator::default());
    let visits = vec![VisitBuilder::new("long").duration(90).build()];

    let route = schedule(&config, &resolver, &visits);

    assert!(route.visits.is_empty());
    assert_eq!(route.unscheduled.len(), 1);
}

#[test]
fn test_sector_priority_orders_the_day() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let visits = vec![
        VisitBuilder::new("office").sector(Sector::Enterprise).build(),
        VisitBuilder::new("shop").sector(Sector::Retail).build(),
        VisitBuilder::new("pharmacy").sector(Sector::Pharmacy).build(),
        VisitBuilder::new("hotel").sector(Sector::Hotel).build(),
    ];

    let route = schedule(&config, &resolver, &visits);
    let order: Vec<&str> = route.visits.iter().map(|s| s.visit.id.as_str()).collect();

    assert_eq!(order, vec!["hotel", "pharmacy", "office", "shop"]);
}

#[test]
fn test_only_planned_and_confirmed_visits_for_rep_and_day() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let mut cancelled = VisitBuilder::new("cancelled").build();
    cancelled.status = VisitStatus::Cancelled;
    let mut done = VisitBuilder::new("done").build();
    done.status = VisitStatus::Completed;
    let visits = vec![
        VisitBuilder::new("mine").build(),
        VisitBuilder::new("theirs").rep("someone-else").build(),
        cancelled,
        done,
    ];

    let route = schedule(&config, &resolver, &visits);
    assert_eq!(route.visit_ids().len(), 1);
    assert_eq!(route.visits[0].visit.id.as_str(), "mine");
}

// ============================================================================
// Desired start times
// ============================================================================

#[test]
fn test_afternoon_pin_does_not_push_the_day_back() {
    // default 08:00-18:00 day
    let config = EngineConfig::default();
    let resolver = exact(twenty_minutes());
    let visits = vec![
        VisitBuilder::new("ph1").sector(Sector::Pharmacy).build(),
        VisitBuilder::new("ph2").sector(Sector::Pharmacy).build(),
        VisitBuilder::new("ph3").sector(Sector::Pharmacy).build(),
        VisitBuilder::new("hotel").starting(hm(16, 0)).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(
        starts(&route),
        vec![
            ("hotel".to_string(), hm(8, 0)),
            ("ph1".to_string(), hm(9, 15)),
            ("ph2".to_string(), hm(10, 30)),
            ("ph3".to_string(), hm(13, 0)),
        ]
    );
    assert!(route.unscheduled.is_empty());
}

#[test]
fn test_desired_times_order_within_sector_group() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let visits = vec![
        VisitBuilder::new("clinic").sector(Sector::Clinic).build(),
        VisitBuilder::new("clinic-14h")
            .sector(Sector::Clinic)
            .starting(hm(14, 0))
            .build(),
        VisitBuilder::new("clinic-10h")
            .sector(Sector::Clinic)
            .starting(hm(10, 0))
            .build(),
        VisitBuilder::new("hotel").build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(
        starts(&route),
        vec![
            ("hotel".to_string(), hm(9, 0)),
            ("clinic-10h".to_string(), hm(10, 15)),
            ("clinic-14h".to_string(), hm(13, 0)),
            ("clinic".to_string(), hm(14, 15)),
        ]
    );
    assert!(route.unscheduled.is_empty());
}

#[test]
fn test_desired_time_at_or_after_end_of_day_still_fits() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let visits = vec![
        VisitBuilder::new("at-close").starting(hm(17, 0)).build(),
        VisitBuilder::new("after-close").starting(hm(18, 30)).build(),
        VisitBuilder::new("pharmacy").sector(Sector::Pharmacy).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(
        starts(&route),
        vec![
            ("at-close".to_string(), hm(9, 0)),
            ("after-close".to_string(), hm(10, 15)),
            ("pharmacy".to_string(), hm(13, 0)),
        ]
    );
    assert!(route.is_complete());
}

// ============================================================================
// Segments and totals
// ============================================================================

#[test]
fn test_totals_sum_segments_and_visits() {
    let config = office_day();
    let resolver = exact(twenty_minutes());
    let visits: Vec<Visit> = ["a", "b", "c"]
        .iter()
        .map(|id| VisitBuilder::new(id).build())
        .collect();

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(route.segments.len(), 2);
    assert_eq!(route.segments[0].from_visit.as_str(), "a");
    assert_eq!(route.segments[0].to_visit.as_str(), "b");
    assert_eq!(route.totals.distance_km, 20.0);
    assert_eq!(route.totals.travel_minutes, 40.0);
    assert_eq!(route.totals.visit_minutes, 135);
    assert_eq!(route.totals.total_minutes, 175.0);
    // default indemnity at 0.5 per km
    assert!((route.totals.cost - 10.0).abs() < 1e-9);
    assert_eq!(route.totals.exact_segments, 2);
    assert_eq!(route.totals.estimated_segments, 0);
}

#[test]
fn test_consumption_policy_costs_segments() {
    let mut config = office_day();
    config.cost = CostPolicy::Consumption {
        liters_per_100km: 8.0,
        fuel_price_per_liter: 1.5,
    };
    let resolver = exact(FixedTravel {
        distance_km: 50.0,
        duration_min: 30.0,
    });
    let visits = vec![VisitBuilder::new("a").build(), VisitBuilder::new("b").build()];

    let route = schedule(&config, &resolver, &visits);

    assert!((route.segments[0].cost - 6.0).abs() < 1e-9);
    assert!((route.totals.cost - 6.0).abs() < 1e-9);
}

#[test]
fn test_fractional_travel_rounds_clock_up() {
    let mut config = office_day();
    config.schedule.buffer_minutes = 0;
    let resolver = exact(FixedTravel {
        distance_km: 3.0,
        duration_min: 12.2,
    });
    let visits = vec![
        VisitBuilder::new("a").duration(30).build(),
        VisitBuilder::new("b").duration(30).build(),
    ];

    let route = schedule(&config, &resolver, &visits);
    assert_eq!(route.visits[1].start, hm(9, 43));
}

// ============================================================================
// Exact / estimated fallback
// ============================================================================

#[test]
fn test_failed_exact_lookup_falls_back_per_segment() {
    let config = office_day();
    let resolver = exact(FailingExact);
    let visits = vec![
        VisitBuilder::new("a").zone(Zone::North).build(),
        VisitBuilder::new("b").zone(Zone::South).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    assert_eq!(route.segments.len(), 1);
    let segment = &route.segments[0];
    assert_eq!(segment.provider, ProviderKind::Estimated);
    assert_eq!(segment.distance_km, zone_distance_km(Zone::North, Zone::South));
    assert!(segment.cost > 0.0);
    assert_eq!(route.totals.estimated_segments, 1);
}

#[test]
fn test_only_the_failing_segment_is_estimated() {
    let config = office_day();
    let resolver = exact(UnreachableZone {
        unreachable: Zone::East,
        leg: twenty_minutes(),
    });
    let visits = vec![
        VisitBuilder::new("a").zone(Zone::North).build(),
        VisitBuilder::new("b").zone(Zone::East).build(),
        VisitBuilder::new("c").zone(Zone::West).build(),
    ];

    let route = schedule(&config, &resolver, &visits);
    let providers: Vec<ProviderKind> = route.segments.iter().map(|s| s.provider).collect();

    assert_eq!(providers, vec![ProviderKind::Estimated, ProviderKind::Exact]);
    assert_eq!(route.segments[1].distance_km, 10.0);
    assert_eq!(route.totals.exact_segments, 1);
    assert_eq!(route.totals.estimated_segments, 1);
}

#[test]
fn test_estimated_only_mode() {
    let config = office_day();
    let resolver = TravelResolver::from_config(&config);
    let visits = vec![
        VisitBuilder::new("a").zone(Zone::West).build(),
        VisitBuilder::new("b").zone(Zone::Center).build(),
    ];

    let route = schedule(&config, &resolver, &visits);

    // 18 km at 40 km/h = 27 minutes
    assert_eq!(route.segments[0].provider, ProviderKind::Estimated);
    assert!((route.segments[0].duration_min - 27.0).abs() < 1e-9);
    assert_eq!(route.visits[1].start, hm(10, 22));
}
