//! Scheduler configuration

use super::types::{LaneId, Priority, RELEASE_THRESHOLD, SURGE_PRIORITY, SURGE_THRESHOLD};

/// Which priority rule the designated lane follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PriorityRule {
    /// Surge above the surge threshold, linear below the release threshold,
    /// and keep the previous priority in between
    #[default]
    Hysteresis,
    /// Surge above the surge threshold, linear otherwise
    Reset,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// The lane that follows the surge rule
    pub designated_lane: LaneId,
    pub priority_rule: PriorityRule,
    /// Designated lane surges when its queue is longer than this
    pub surge_threshold: usize,
    /// Designated lane returns to linear scaling when shorter than this
    pub release_threshold: usize,
    pub surge_priority: Priority,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            designated_lane: LaneId::A,
            priority_rule: PriorityRule::default(),
            surge_threshold: SURGE_THRESHOLD,
            release_threshold: RELEASE_THRESHOLD,
            surge_priority: SURGE_PRIORITY,
        }
    }
}

impl SchedulerConfig {
    pub fn with_designated_lane(mut self, lane: LaneId) -> Self {
        self.designated_lane = lane;
        self
    }

    pub fn with_priority_rule(mut self, rule: PriorityRule) -> Self {
        self.priority_rule = rule;
        self
    }
}
