//! Bounded max-heap of lane priorities
//!
//! The directory holds one entry per lane in a contiguous array interpreted
//! as a binary max-heap (children of `i` live at `2i + 1` and `2i + 2`).
//! Capacity is fixed at construction and the backing vector never grows
//! past it. Equal priorities are ordered by heap position only, so ties do
//! not keep a stable relative order across updates.

use super::error::SchedulerError;
use super::types::{LaneId, Priority, LANE_COUNT};

/// A lane and its current priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityEntry {
    pub lane: LaneId,
    pub priority: Priority,
}

#[derive(Debug, Clone)]
pub struct PriorityDirectory {
    heap: Vec<PriorityEntry>,
    capacity: usize,
}

impl Default for PriorityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityDirectory {
    /// Empty directory sized for the four junction lanes
    pub fn new() -> Self {
        Self::with_capacity(LANE_COUNT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Directory holding every lane at priority 0
    pub fn with_all_lanes() -> Self {
        let mut directory = Self::new();
        for lane in LaneId::ALL {
            directory.heap.push(PriorityEntry { lane, priority: 0 });
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, lane: LaneId) -> bool {
        self.position_of(lane).is_some()
    }

    /// Entries in heap-array order
    pub fn entries(&self) -> &[PriorityEntry] {
        &self.heap
    }

    /// Add a lane, or update it in place if it is already present
    ///
    /// A new lane is refused with [`SchedulerError::DirectoryFull`] when the
    /// directory is at capacity; the directory is left untouched.
    pub fn insert(&mut self, lane: LaneId, priority: Priority) -> Result<(), SchedulerError> {
        if self.contains(lane) {
            return self.update(lane, priority);
        }
        if self.heap.len() >= self.capacity {
            return Err(SchedulerError::DirectoryFull {
                lane,
                capacity: self.capacity,
            });
        }
        self.heap.push(PriorityEntry { lane, priority });
        self.sift_up(self.heap.len() - 1);
        Ok(())
    }

    /// Replace a lane's priority and restore heap order
    pub fn update(&mut self, lane: LaneId, new_priority: Priority) -> Result<(), SchedulerError> {
        let index = self
            .position_of(lane)
            .ok_or(SchedulerError::LaneNotFound(lane))?;
        let old_priority = self.heap[index].priority;
        self.heap[index].priority = new_priority;

        if new_priority > old_priority {
            self.sift_up(index);
        } else if new_priority < old_priority {
            self.sift_down(index);
        }
        Ok(())
    }

    /// Highest-priority entry without removing it
    pub fn peek_max(&self) -> Option<PriorityEntry> {
        self.heap.first().copied()
    }

    /// Remove and return the highest-priority entry
    pub fn extract_max(&mut self) -> Result<PriorityEntry, SchedulerError> {
        if self.heap.is_empty() {
            return Err(SchedulerError::EmptyDirectory);
        }
        let max = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(max)
    }

    /// Current priority of `lane`, or 0 if it is not held
    pub fn peek_priority(&self, lane: LaneId) -> Priority {
        self.position_of(lane)
            .map(|index| self.heap[index].priority)
            .unwrap_or(0)
    }

    /// Whether every parent is at least as large as both of its children
    pub fn is_valid_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2].priority >= self.heap[i].priority)
    }

    // Linear scan is fine at this size
    fn position_of(&self, lane: LaneId) -> Option<usize> {
        self.heap.iter().position(|entry| entry.lane == lane)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[parent].priority >= self.heap[index].priority {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;

            if left < len && self.heap[left].priority > self.heap[largest].priority {
                largest = left;
            }
            if right < len && self.heap[right].priority > self.heap[largest].priority {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.heap.swap(index, largest);
            index = largest;
        }
    }
}
