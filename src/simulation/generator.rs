//! Synthetic arrival generator
//!
//! Produces random vehicles on random lanes. A seeded generator yields the
//! same sequence every run.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::types::{Arrival, LaneId, Timestamp, VehicleRecord};

const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated vehicle ids
pub const VEHICLE_ID_LEN: usize = 9;

pub struct ArrivalGenerator {
    /// Optional seeded RNG for reproducible runs
    rng: Option<StdRng>,
}

impl Default for ArrivalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self { rng: None }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    fn random_index(&mut self, len: usize) -> usize {
        match &mut self.rng {
            Some(rng) => rng.random_range(0..len),
            None => rand::rng().random_range(0..len),
        }
    }

    fn random_lane(&mut self) -> LaneId {
        let lane = match &mut self.rng {
            Some(rng) => LaneId::ALL.choose(rng).copied(),
            None => LaneId::ALL.choose(&mut rand::rng()).copied(),
        };
        lane.unwrap_or(LaneId::A)
    }

    /// A random id over `[0-9A-Z]`
    pub fn vehicle_id(&mut self) -> String {
        (0..VEHICLE_ID_LEN)
            .map(|_| ID_CHARSET[self.random_index(ID_CHARSET.len())] as char)
            .collect()
    }

    /// One arrival on a random lane at `now`
    pub fn next_arrival(&mut self, now: Timestamp) -> Arrival {
        let lane = self.random_lane();
        let id = self.vehicle_id();
        Arrival::new(lane, VehicleRecord::new(id, now))
    }

    /// `count` arrivals at `now`
    pub fn batch(&mut self, count: usize, now: Timestamp) -> Vec<Arrival> {
        (0..count).map(|_| self.next_arrival(now)).collect()
    }
}
