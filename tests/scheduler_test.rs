//! Full scheduling cycles

use junction_scheduler::simulation::{
    Arrival, CyclePhase, LaneId, LanePolicy, PriorityRule, Scheduler, SchedulerConfig,
    VehicleRecord,
};

fn fill(scheduler: &mut Scheduler, lane: LaneId, count: usize, arrival_time: u64) {
    for i in 0..count {
        let id = format!("{}-{}", lane.label(), i);
        assert!(scheduler.ingest(lane, VehicleRecord::new(id.as_str(), arrival_time)));
    }
}

#[test]
fn test_scheduler_initial_state() {
    let scheduler = Scheduler::default();
    assert_eq!(scheduler.phase(), CyclePhase::Idle);
    assert_eq!(scheduler.lane(LaneId::A).policy(), LanePolicy::Designated);
    for lane in [LaneId::B, LaneId::C, LaneId::D] {
        assert_eq!(scheduler.lane(lane).policy(), LanePolicy::Ordinary);
    }
    assert!(scheduler.priorities().values().all(|&p| p == 0));
    assert_eq!(scheduler.directory().len(), 4);
}

#[test]
fn test_surging_designated_lane_is_drained() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::A, 12, 100);
    for lane in [LaneId::B, LaneId::C, LaneId::D] {
        fill(&mut scheduler, lane, 2, 100);
    }

    let report = scheduler.run_cycle(1_000).unwrap();

    assert_eq!(report.cycle, 1);
    assert_eq!(report.selected_lane, LaneId::A);
    assert!(report.surge_active);
    assert_eq!(report.quota, 12);
    assert_eq!(report.served.len(), 12);
    assert_eq!(report.served[0].id.0, "AL2-0");
    assert_eq!(report.served[11].id.0, "AL2-11");
    assert!(report.served.iter().all(|v| v.wait_time == 900));

    assert_eq!(report.remaining_counts[&LaneId::A], 0);
    assert_eq!(report.remaining_counts[&LaneId::B], 2);
    assert_eq!(report.priorities[&LaneId::A], 0);
    assert_eq!(report.priorities[&LaneId::B], 2);
    assert_eq!(scheduler.phase(), CyclePhase::Idle);
    assert!(scheduler.directory().is_valid_heap());
}

#[test]
fn test_ordinary_lane_serves_average_quota() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::B, 3, 0);
    fill(&mut scheduler, LaneId::C, 6, 0);
    fill(&mut scheduler, LaneId::D, 4, 0);

    let report = scheduler.run_cycle(50).unwrap();

    assert_eq!(report.selected_lane, LaneId::C);
    assert!(!report.surge_active);
    assert_eq!(report.quota, 3);
    assert_eq!(report.served.len(), 3);
    assert_eq!(report.remaining_counts[&LaneId::C], 3);
    assert_eq!(report.priorities[&LaneId::C], 3);
    assert_eq!(report.priorities[&LaneId::D], 4);

    // D now has the longest queue
    let next = scheduler.run_cycle(100).unwrap();
    assert_eq!(next.selected_lane, LaneId::D);
}

#[test]
fn test_empty_junction_serves_nothing() {
    let mut scheduler = Scheduler::default();
    let report = scheduler.run_cycle(10).unwrap();

    assert_eq!(report.quota, 0);
    assert!(report.served.is_empty());
    assert_eq!(scheduler.phase(), CyclePhase::Idle);
    assert_eq!(scheduler.directory().len(), 4);
    assert_eq!(scheduler.stats().idle_cycles, 1);
}

#[test]
fn test_designated_lane_in_band_keeps_low_priority() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::A, 8, 0);
    fill(&mut scheduler, LaneId::B, 1, 0);

    let report = scheduler.run_cycle(10).unwrap();

    // A was at 0 and stays there inside the band
    assert_eq!(report.selected_lane, LaneId::B);
    assert_eq!(report.priorities[&LaneId::A], 0);
    assert_eq!(report.remaining_counts[&LaneId::A], 8);
}

#[test]
fn test_drained_designated_lane_does_not_resurge_in_band() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::A, 11, 0);
    fill(&mut scheduler, LaneId::B, 9, 0);

    let first = scheduler.run_cycle(10).unwrap();
    assert_eq!(first.selected_lane, LaneId::A);
    assert_eq!(first.served.len(), 11);

    // Seven new arrivals sit inside the band; the drained lane was reinserted at 0
    for i in 0..7 {
        let id = format!("late-{}", i);
        scheduler.ingest(LaneId::A, VehicleRecord::new(id.as_str(), 20));
    }
    let second = scheduler.run_cycle(30).unwrap();
    assert_eq!(second.selected_lane, LaneId::B);
    assert_eq!(second.priorities[&LaneId::A], 0);
}

#[test]
fn test_reset_rule_tracks_queue_length_in_band() {
    let config = SchedulerConfig::default().with_priority_rule(PriorityRule::Reset);
    let mut scheduler = Scheduler::new(config);
    fill(&mut scheduler, LaneId::A, 8, 0);
    fill(&mut scheduler, LaneId::B, 1, 0);

    let report = scheduler.run_cycle(10).unwrap();
    assert_eq!(report.selected_lane, LaneId::A);
    assert_eq!(report.quota, 8);
}

#[test]
fn test_designated_lane_is_configurable() {
    let config = SchedulerConfig::default().with_designated_lane(LaneId::C);
    let mut scheduler = Scheduler::new(config);
    assert_eq!(scheduler.lane(LaneId::C).policy(), LanePolicy::Designated);
    assert_eq!(scheduler.lane(LaneId::A).policy(), LanePolicy::Ordinary);

    fill(&mut scheduler, LaneId::A, 10, 0);
    fill(&mut scheduler, LaneId::C, 11, 0);

    let report = scheduler.run_cycle(10).unwrap();
    assert_eq!(report.selected_lane, LaneId::C);
    assert_eq!(report.priorities[&LaneId::C], 0);
    assert!(report.surge_active);
    assert_eq!(report.served.len(), 11);
}

#[test]
fn test_duplicate_arrivals_are_rejected() {
    let mut scheduler = Scheduler::default();
    assert!(scheduler.ingest(LaneId::B, VehicleRecord::new("CAR1", 5)));
    assert!(!scheduler.ingest(LaneId::B, VehicleRecord::new("CAR1", 6)));
    // Same id on another lane is a different vehicle
    assert!(scheduler.ingest(LaneId::C, VehicleRecord::new("CAR1", 6)));
    assert_eq!(scheduler.lane(LaneId::B).len(), 1);

    let accepted = scheduler.ingest_all(vec![
        Arrival::new(LaneId::D, VehicleRecord::new("X", 1)),
        Arrival::new(LaneId::D, VehicleRecord::new("X", 2)),
        Arrival::new(LaneId::D, VehicleRecord::new("Y", 3)),
    ]);
    assert_eq!(accepted, 2);
}

#[test]
fn test_served_vehicle_is_not_queued_again() {
    let mut scheduler = Scheduler::default();
    assert!(scheduler.ingest(LaneId::C, VehicleRecord::new("C1", 0)));
    let report = scheduler.run_cycle(10).unwrap();
    assert_eq!(report.served.len(), 1);

    assert!(!scheduler.ingest(LaneId::C, VehicleRecord::new("C1", 0)));
    assert!(scheduler.lane(LaneId::C).is_empty());
    assert!(scheduler.run_cycle(20).unwrap().served.is_empty());
}

#[test]
fn test_wait_time_never_negative() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::B, 1, 500);
    let report = scheduler.run_cycle(100).unwrap();
    assert_eq!(report.served[0].wait_time, 0);
}

#[test]
fn test_stats_accumulate_over_cycles() {
    let mut scheduler = Scheduler::default();
    fill(&mut scheduler, LaneId::A, 12, 0);
    fill(&mut scheduler, LaneId::B, 2, 0);

    scheduler.run_cycle(100).unwrap();
    scheduler.run_cycle(300).unwrap();
    scheduler.run_cycle(400).unwrap();
    scheduler.run_cycle(500).unwrap();

    let stats = scheduler.stats();
    assert_eq!(stats.cycles, 4);
    assert_eq!(stats.served_for(LaneId::A), 12);
    assert_eq!(stats.served_for(LaneId::B), 2);
    assert_eq!(stats.total_vehicles_passed, 14);
    assert_eq!(stats.surge_cycles, 1);
    assert_eq!(stats.idle_cycles, 1);
    assert_eq!(stats.max_wait_ms, 400);
}

#[test]
fn test_every_cycle_keeps_directory_consistent() {
    let mut scheduler = Scheduler::default();
    for cycle in 0..50u64 {
        let lane = LaneId::from_index((cycle % 4) as usize).unwrap();
        let id = format!("v{}", cycle);
        scheduler.ingest(lane, VehicleRecord::new(id.as_str(), cycle));
        if cycle % 3 == 0 {
            let id = format!("w{}", cycle);
            scheduler.ingest(LaneId::A, VehicleRecord::new(id.as_str(), cycle));
        }

        scheduler.run_cycle(cycle + 1).unwrap();
        assert!(scheduler.directory().is_valid_heap());
        assert_eq!(scheduler.directory().len(), 4);
        assert_eq!(scheduler.phase(), CyclePhase::Idle);
    }
}
