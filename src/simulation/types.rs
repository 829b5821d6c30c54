//! Core types for the junction scheduler
//!
//! These are plain value types shared by every part of the scheduler.

use std::fmt;
use std::str::FromStr;

/// Milliseconds on a monotonic clock supplied by the driver
pub type Timestamp = u64;

/// Numeric lane priority; larger is served first
pub type Priority = u32;

/// Number of approaches feeding the junction
pub const LANE_COUNT: usize = 4;

/// Priority forced onto the designated lane while it is surging
pub const SURGE_PRIORITY: Priority = 100;

/// Designated lane surges once its queue is longer than this
pub const SURGE_THRESHOLD: usize = 10;

/// Designated lane falls back to linear scaling below this length
pub const RELEASE_THRESHOLD: usize = 5;

/// One of the four fixed approaches to the junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaneId {
    A,
    B,
    C,
    D,
}

impl LaneId {
    /// All lanes in index order
    pub const ALL: [LaneId; LANE_COUNT] = [LaneId::A, LaneId::B, LaneId::C, LaneId::D];

    pub fn index(self) -> usize {
        match self {
            LaneId::A => 0,
            LaneId::B => 1,
            LaneId::C => 2,
            LaneId::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<LaneId> {
        Self::ALL.get(index).copied()
    }

    /// Display label used in reports and lane files
    pub fn label(self) -> &'static str {
        match self {
            LaneId::A => "AL2",
            LaneId::B => "BL2",
            LaneId::C => "CL2",
            LaneId::D => "DL2",
        }
    }

    /// Name of the lane file the ingestion collaborator polls
    pub fn file_name(self) -> &'static str {
        match self {
            LaneId::A => "lanea.txt",
            LaneId::B => "laneb.txt",
            LaneId::C => "lanec.txt",
            LaneId::D => "laned.txt",
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a lane name matches none of the four approaches
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lane name: {0:?}")]
pub struct UnknownLane(pub String);

impl FromStr for LaneId {
    type Err = UnknownLane;

    /// Accepts either the short letter (`a`) or the label (`AL2`), any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "AL2" => Ok(LaneId::A),
            "B" | "BL2" => Ok(LaneId::B),
            "C" | "CL2" => Ok(LaneId::C),
            "D" | "DL2" => Ok(LaneId::D),
            _ => Err(UnknownLane(s.to_string())),
        }
    }
}

/// Opaque vehicle identifier, unique within its lane
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single vehicle waiting at the junction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    id: VehicleId,
    arrival_time: Timestamp,
}

impl VehicleRecord {
    pub fn new(id: impl Into<VehicleId>, arrival_time: Timestamp) -> Self {
        Self {
            id: id.into(),
            arrival_time,
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn arrival_time(&self) -> Timestamp {
        self.arrival_time
    }

    /// Time spent queued as of `now`; clock skew never yields a negative wait
    pub fn wait_time(&self, now: Timestamp) -> Timestamp {
        now.saturating_sub(self.arrival_time)
    }
}

/// An arrival headed for a specific lane, as handed over by ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub lane: LaneId,
    pub record: VehicleRecord,
}

impl Arrival {
    pub fn new(lane: LaneId, record: VehicleRecord) -> Self {
        Self { lane, record }
    }
}
