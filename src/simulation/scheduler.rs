//! The scheduling cycle that ties queues, priorities and quotas together
//!
//! A cycle walks `Idle -> PrioritiesRefreshed -> LaneSelected ->
//! VehiclesServed -> Idle`. It runs to completion on the caller's thread;
//! arrivals are ingested between cycles, never during one.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::lane::{LanePolicy, LaneQueue};
use super::policy::{LaneLoad, PriorityPolicy, ServingPolicy};
use super::priority_directory::{PriorityDirectory, PriorityEntry};
use super::stats::SchedulerStats;
use super::types::{Arrival, LaneId, Priority, Timestamp, VehicleId, VehicleRecord, LANE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    PrioritiesRefreshed,
    LaneSelected,
    VehiclesServed,
}

/// A vehicle that left the junction during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedVehicle {
    pub id: VehicleId,
    pub wait_time: Timestamp,
}

/// What a single cycle did, for the presentation layer
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle counter
    pub cycle: u64,
    pub selected_lane: LaneId,
    pub quota: usize,
    /// Vehicles served, in the order they left
    pub served: Vec<ServedVehicle>,
    pub remaining_counts: BTreeMap<LaneId, usize>,
    /// Priorities after the selected lane has been reinserted
    pub priorities: BTreeMap<LaneId, Priority>,
    /// The designated lane held the surge priority when the lane was picked
    pub surge_active: bool,
}

/// Scheduler context owning every lane queue and the priority directory
pub struct Scheduler {
    config: SchedulerConfig,
    priority_policy: PriorityPolicy,
    serving_policy: ServingPolicy,
    lanes: [LaneQueue; LANE_COUNT],
    directory: PriorityDirectory,
    phase: CyclePhase,
    stats: SchedulerStats,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let lanes = LaneId::ALL.map(|lane| {
            let policy = if lane == config.designated_lane {
                LanePolicy::Designated
            } else {
                LanePolicy::Ordinary
            };
            LaneQueue::new(lane, policy)
        });

        Self {
            priority_policy: PriorityPolicy::from_config(&config),
            serving_policy: ServingPolicy,
            config,
            lanes,
            directory: PriorityDirectory::with_all_lanes(),
            phase: CyclePhase::Idle,
            stats: SchedulerStats::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn lane(&self, lane: LaneId) -> &LaneQueue {
        &self.lanes[lane.index()]
    }

    pub fn directory(&self) -> &PriorityDirectory {
        &self.directory
    }

    /// Append an arrival to its lane; `false` if the lane has seen the id before
    pub fn ingest(&mut self, lane: LaneId, record: VehicleRecord) -> bool {
        let queue = &mut self.lanes[lane.index()];
        let id = record.id().clone();
        let accepted = queue.push(record);
        if !accepted {
            warn!("Vehicle {} already seen on {}, ignoring", id, lane);
        }
        accepted
    }

    /// Ingest a batch of arrivals, returning how many were accepted
    pub fn ingest_all(&mut self, arrivals: impl IntoIterator<Item = Arrival>) -> usize {
        arrivals
            .into_iter()
            .map(|arrival| self.ingest(arrival.lane, arrival.record))
            .filter(|accepted| *accepted)
            .count()
    }

    pub fn queue_lengths(&self) -> BTreeMap<LaneId, usize> {
        self.lanes.iter().map(|q| (q.lane(), q.len())).collect()
    }

    pub fn priorities(&self) -> BTreeMap<LaneId, Priority> {
        LaneId::ALL
            .into_iter()
            .map(|lane| (lane, self.directory.peek_priority(lane)))
            .collect()
    }

    /// Run one full cycle at time `now`
    pub fn run_cycle(&mut self, now: Timestamp) -> Result<CycleReport, SchedulerError> {
        self.refresh_priorities()?;

        let surge_active = self.directory.peek_priority(self.config.designated_lane)
            == self.priority_policy.surge_priority();
        let selected = self.select_lane()?;

        let (quota, served) = self.serve(selected.lane, now)?;

        self.reinsert(selected)?;

        let report = CycleReport {
            cycle: self.stats.cycles + 1,
            selected_lane: selected.lane,
            quota,
            served,
            remaining_counts: self.queue_lengths(),
            priorities: self.priorities(),
            surge_active,
        };
        self.stats.record(&report);

        info!(
            "Cycle {}: green {} (priority {}), served {}/{}{}",
            report.cycle,
            report.selected_lane,
            selected.priority,
            report.served.len(),
            report.quota,
            if surge_active { " [surge]" } else { "" }
        );
        Ok(report)
    }

    fn transition(&mut self, next: CyclePhase) {
        debug!("Cycle phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn refresh_priorities(&mut self) -> Result<(), SchedulerError> {
        for queue in &self.lanes {
            let previous = self.directory.peek_priority(queue.lane());
            let priority = self.priority_policy.compute_priority(
                queue.lane(),
                queue.len(),
                queue.policy(),
                previous,
            );
            self.directory.update(queue.lane(), priority)?;
        }
        self.transition(CyclePhase::PrioritiesRefreshed);
        Ok(())
    }

    fn select_lane(&mut self) -> Result<PriorityEntry, SchedulerError> {
        let selected = self.directory.extract_max()?;
        self.transition(CyclePhase::LaneSelected);
        Ok(selected)
    }

    fn serve(
        &mut self,
        lane: LaneId,
        now: Timestamp,
    ) -> Result<(usize, Vec<ServedVehicle>), SchedulerError> {
        let loads: Vec<LaneLoad> = self
            .lanes
            .iter()
            .map(|q| LaneLoad {
                lane: q.lane(),
                policy: q.policy(),
                queue_length: q.len(),
            })
            .collect();
        let quota = self.serving_policy.compute_quota(lane, &loads)?;

        let queue = &mut self.lanes[lane.index()];
        let served = std::iter::from_fn(|| queue.pop())
            .take(quota)
            .map(|record| ServedVehicle {
                wait_time: record.wait_time(now),
                id: record.id().clone(),
            })
            .collect();

        self.transition(CyclePhase::VehiclesServed);
        Ok((quota, served))
    }

    /// Put the selected lane back with a priority based on what is left
    fn reinsert(&mut self, selected: PriorityEntry) -> Result<(), SchedulerError> {
        let queue = &self.lanes[selected.lane.index()];
        let priority = self.priority_policy.compute_priority(
            selected.lane,
            queue.len(),
            queue.policy(),
            selected.priority,
        );
        self.directory.insert(selected.lane, priority)?;
        self.transition(CyclePhase::Idle);
        Ok(())
    }
}
