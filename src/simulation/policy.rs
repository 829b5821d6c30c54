//! Priority and serving rules
//!
//! Both policies are pure: they read queue state and return a number. The
//! scheduler is responsible for persisting what they return.

use log::trace;

use super::config::{PriorityRule, SchedulerConfig};
use super::error::SchedulerError;
use super::lane::LanePolicy;
use super::types::{LaneId, Priority};

/// Computes a lane's priority from its backlog
#[derive(Debug, Clone, Copy)]
pub struct PriorityPolicy {
    rule: PriorityRule,
    surge_threshold: usize,
    release_threshold: usize,
    surge_priority: Priority,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

impl PriorityPolicy {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            rule: config.priority_rule,
            surge_threshold: config.surge_threshold,
            release_threshold: config.release_threshold,
            surge_priority: config.surge_priority,
        }
    }

    pub fn rule(&self) -> PriorityRule {
        self.rule
    }

    pub fn surge_priority(&self) -> Priority {
        self.surge_priority
    }

    /// Priority for `lane` given its current queue length
    ///
    /// `previous` must be the priority the lane held before this call; the
    /// hysteresis band returns it unchanged.
    pub fn compute_priority(
        &self,
        lane: LaneId,
        queue_length: usize,
        policy: LanePolicy,
        previous: Priority,
    ) -> Priority {
        let priority = match policy {
            LanePolicy::Ordinary => linear(queue_length),
            LanePolicy::Designated => {
                if queue_length > self.surge_threshold {
                    self.surge_priority
                } else {
                    match self.rule {
                        PriorityRule::Reset => linear(queue_length),
                        PriorityRule::Hysteresis if queue_length < self.release_threshold => {
                            linear(queue_length)
                        }
                        PriorityRule::Hysteresis => previous,
                    }
                }
            }
        };
        trace!(
            "Lane {} priority {} -> {} (queue {})",
            lane,
            previous,
            priority,
            queue_length
        );
        priority
    }
}

fn linear(queue_length: usize) -> Priority {
    Priority::try_from(queue_length).unwrap_or(Priority::MAX)
}

/// Queue snapshot of one lane, as seen by the serving policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLoad {
    pub lane: LaneId,
    pub policy: LanePolicy,
    pub queue_length: usize,
}

/// Decides how many vehicles the selected lane may discharge
#[derive(Debug, Clone, Copy, Default)]
pub struct ServingPolicy;

impl ServingPolicy {
    /// Quota for `selected` given the queue length of every lane
    ///
    /// The designated lane drains completely. Any other lane serves the
    /// integer average of the other ordinary lanes (1 if there are none),
    /// at least one vehicle and never more than it holds. An empty lane
    /// gets a quota of 0; a lane missing from `lanes` is an error.
    pub fn compute_quota(
        &self,
        selected: LaneId,
        lanes: &[LaneLoad],
    ) -> Result<usize, SchedulerError> {
        let own = lanes
            .iter()
            .find(|load| load.lane == selected)
            .ok_or(SchedulerError::LaneNotFound(selected))?;
        if own.queue_length == 0 {
            return Ok(0);
        }
        if own.policy.is_designated() {
            return Ok(own.queue_length);
        }

        let others: Vec<usize> = lanes
            .iter()
            .filter(|load| load.lane != selected && !load.policy.is_designated())
            .map(|load| load.queue_length)
            .collect();

        let average = if others.is_empty() {
            1
        } else {
            others.iter().sum::<usize>() / others.len()
        };

        Ok(average.max(1).min(own.queue_length))
    }
}
