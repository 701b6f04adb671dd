//! Per-floor call registry
//!
//! One up/down flag pair per floor. Flags are set by pickup requests and
//! cleared only when a car serving that direction stops at the floor.

use super::types::{Direction, Floor};

/// Pending call flags for a single floor
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorCall {
    pub up_pending: bool,
    pub down_pending: bool,
}

/// Call flags for every floor in the building
#[derive(Debug, Clone)]
pub struct CallRegistry {
    calls: Vec<FloorCall>,
}

impl CallRegistry {
    pub fn new(total_floors: usize) -> Self {
        Self {
            calls: vec![FloorCall::default(); total_floors],
        }
    }

    /// Set a call flag. Returns false if it was already set (duplicate press).
    pub fn set(&mut self, floor: Floor, direction: Direction) -> bool {
        let flag = self.flag_mut(floor, direction);
        let newly_set = !*flag;
        *flag = true;
        newly_set
    }

    /// Clear a call flag. Returns true if a call was actually pending.
    pub fn clear(&mut self, floor: Floor, direction: Direction) -> bool {
        let flag = self.flag_mut(floor, direction);
        let was_set = *flag;
        *flag = false;
        was_set
    }

    pub fn is_pending(&self, floor: Floor, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.calls[floor].up_pending,
            Direction::Down => self.calls[floor].down_pending,
        }
    }

    /// Number of call flags currently set across all floors
    pub fn pending_count(&self) -> usize {
        self.calls
            .iter()
            .map(|c| c.up_pending as usize + c.down_pending as usize)
            .sum()
    }

    fn flag_mut(&mut self, floor: Floor, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.calls[floor].up_pending,
            Direction::Down => &mut self.calls[floor].down_pending,
        }
    }
}
