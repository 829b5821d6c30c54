//! Running statistics over completed cycles

use log::info;

use super::scheduler::CycleReport;
use super::types::{LaneId, Timestamp, LANE_COUNT};

#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    pub cycles: u64,
    pub total_vehicles_passed: u64,
    pub served_per_lane: [u64; LANE_COUNT],
    pub total_wait_ms: u64,
    pub max_wait_ms: Timestamp,
    /// Cycles in which the designated lane held the surge priority
    pub surge_cycles: u64,
    /// Cycles whose selected lane had nothing to serve
    pub idle_cycles: u64,
}

impl SchedulerStats {
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        if report.surge_active {
            self.surge_cycles += 1;
        }
        if report.served.is_empty() {
            self.idle_cycles += 1;
        }
        for vehicle in &report.served {
            self.total_vehicles_passed += 1;
            self.served_per_lane[report.selected_lane.index()] += 1;
            self.total_wait_ms += vehicle.wait_time;
            self.max_wait_ms = self.max_wait_ms.max(vehicle.wait_time);
        }
    }

    pub fn served_for(&self, lane: LaneId) -> u64 {
        self.served_per_lane[lane.index()]
    }

    pub fn average_wait_ms(&self) -> f64 {
        if self.total_vehicles_passed == 0 {
            0.0
        } else {
            self.total_wait_ms as f64 / self.total_vehicles_passed as f64
        }
    }

    pub fn log_summary(&self) {
        info!("=== SCHEDULER SUMMARY ===");
        info!("Cycles run: {}", self.cycles);
        info!("Passed vehicles: {}", self.total_vehicles_passed);
        for lane in LaneId::ALL {
            info!("  {} served: {}", lane, self.served_for(lane));
        }
        info!("Average wait: {:.1}ms", self.average_wait_ms());
        info!("Max wait: {}ms", self.max_wait_ms);
        info!("Surge cycles: {}", self.surge_cycles);
        info!("Idle cycles: {}", self.idle_cycles);
    }
}
