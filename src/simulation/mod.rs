//! Lane priority scheduler for a four-approach junction
//!
//! This module contains the scheduling core (lane queues, the priority
//! directory and the priority/serving policies) plus the collaborators that
//! feed it arrivals. None of it depends on a renderer or event loop.

mod config;
mod error;
mod generator;
mod ingest;
mod lane;
mod policy;
mod priority_directory;
mod scheduler;
mod stats;
mod types;

pub use config::{PriorityRule, SchedulerConfig};
pub use error::SchedulerError;
pub use generator::{ArrivalGenerator, VEHICLE_ID_LEN};
pub use ingest::{
    append_to_traffic_dir, format_arrival_line, parse_arrival_line, parse_lane_file,
    poll_traffic_dir,
};
pub use lane::{LanePolicy, LaneQueue};
pub use policy::{LaneLoad, PriorityPolicy, ServingPolicy};
pub use priority_directory::{PriorityDirectory, PriorityEntry};
pub use scheduler::{CycleReport, CyclePhase, Scheduler, ServedVehicle};
pub use stats::SchedulerStats;
pub use types::{
    Arrival, LaneId, Priority, Timestamp, UnknownLane, VehicleId, VehicleRecord, LANE_COUNT,
    RELEASE_THRESHOLD, SURGE_PRIORITY, SURGE_THRESHOLD,
};
