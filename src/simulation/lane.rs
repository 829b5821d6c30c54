//! Per-approach vehicle queues

use std::collections::{HashSet, VecDeque};

use super::types::{LaneId, VehicleId, VehicleRecord};

/// How a lane's priority is derived from its backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePolicy {
    /// Priority tracks queue length
    Ordinary,
    /// Subject to the surge rule and, under the hysteresis rule, a frozen band
    Designated,
}

impl LanePolicy {
    pub fn is_designated(self) -> bool {
        matches!(self, LanePolicy::Designated)
    }
}

/// FIFO of vehicles waiting on one approach
#[derive(Debug, Clone)]
pub struct LaneQueue {
    lane: LaneId,
    policy: LanePolicy,
    records: VecDeque<VehicleRecord>,
    /// Every id ever accepted on this lane, queued or already served
    seen_ids: HashSet<VehicleId>,
}

impl LaneQueue {
    pub fn new(lane: LaneId, policy: LanePolicy) -> Self {
        Self {
            lane,
            policy,
            records: VecDeque::new(),
            seen_ids: HashSet::new(),
        }
    }

    pub fn lane(&self) -> LaneId {
        self.lane
    }

    pub fn policy(&self) -> LanePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `id` is waiting here now or was served from this lane before
    pub fn has_seen(&self, id: &VehicleId) -> bool {
        self.seen_ids.contains(id)
    }

    /// Append an arrival to the back of the queue
    ///
    /// Returns `false` and leaves the queue untouched if a vehicle with the
    /// same id is waiting here or has already been served from this lane.
    pub fn push(&mut self, record: VehicleRecord) -> bool {
        if !self.seen_ids.insert(record.id().clone()) {
            return false;
        }
        self.records.push_back(record);
        true
    }

    /// Remove the vehicle at the front, if any
    pub fn pop(&mut self) -> Option<VehicleRecord> {
        self.records.pop_front()
    }

    pub fn front(&self) -> Option<&VehicleRecord> {
        self.records.front()
    }

    /// Queued vehicles, front first
    pub fn iter(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.records.iter()
    }
}
