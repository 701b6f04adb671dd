//! Car movement logic for the elevator simulation
//!
//! Each car is a self-contained state machine: Idle, Moving, or DoorsOpen.
//! The service order of its destinations is computed fresh on every step, not
//! stored, so new destinations slot into the current sweep naturally.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use log::warn;

use super::config::SimConfig;
use super::types::{CarId, Direction, Floor, Phase};

/// Result of a car step indicating what the building should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarStep {
    /// Nothing externally observable happened
    Continue,
    /// Advanced one floor without stopping
    Moved(Floor),
    /// Stopped at a destination floor and opened the doors
    ///
    /// `direction` is the direction the car will depart in, or `None` when
    /// this was its last stop. The dispatcher uses it to clear call flags.
    Arrived {
        floor: Floor,
        direction: Option<Direction>,
    },
    /// Door hold elapsed and the car resumed its sweep
    DoorsClosed,
    /// Door hold elapsed with no destinations left; the car parked
    BecameIdle,
}

/// A single elevator car
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    pub current_floor: Floor,
    /// Travel direction; `None` while the car is parked
    pub direction: Option<Direction>,
    pub phase: Phase,
    destinations: BTreeSet<Floor>,
    /// Ticks remaining until the car advances one floor
    move_ticks_left: u32,
    /// Ticks remaining until the doors close
    door_ticks_left: u32,
}

impl SimCar {
    pub fn new(id: CarId) -> Self {
        Self {
            id,
            current_floor: 0,
            direction: None,
            phase: Phase::Idle,
            destinations: BTreeSet::new(),
            move_ticks_left: 0,
            door_ticks_left: 0,
        }
    }

    /// Floors this car is committed to visit
    pub fn destinations(&self) -> &BTreeSet<Floor> {
        &self.destinations
    }

    /// Commit the car to visiting a floor
    ///
    /// Both hall pickups routed here by the dispatcher and in-car button
    /// presses go through this single entry point. Returns false when nothing
    /// changed: the floor was already queued, or the car is already sitting
    /// at it with no travel in between.
    pub fn add_destination(&mut self, floor: Floor, cfg: &SimConfig) -> bool {
        if floor == self.current_floor && self.phase != Phase::Moving {
            return false;
        }
        if !self.destinations.insert(floor) {
            return false;
        }
        if self.phase == Phase::Idle {
            if let Some((_, direction)) = self.next_target() {
                self.direction = Some(direction);
                self.phase = Phase::Moving;
                self.move_ticks_left = cfg.ticks_per_floor;
            }
        }
        true
    }

    /// Reopen the doors at the current floor
    ///
    /// Used when a pickup lands on a car already parked at the call floor;
    /// there is no travel to queue, the car just serves the stop in place.
    pub fn open_doors(&mut self, cfg: &SimConfig) {
        self.phase = Phase::DoorsOpen;
        self.door_ticks_left = cfg.door_hold_ticks;
    }

    /// Advance the car by one simulated tick
    pub fn step(&mut self, cfg: &SimConfig) -> CarStep {
        match self.phase {
            Phase::Idle => {
                self.repair_if_inconsistent(cfg);
                CarStep::Continue
            }
            Phase::Moving => self.step_moving(cfg),
            Phase::DoorsOpen => self.step_doors_open(cfg),
        }
    }

    fn step_moving(&mut self, cfg: &SimConfig) -> CarStep {
        // Re-derive the target every tick so destinations added mid-travel
        // extend or redirect the sweep immediately.
        let Some((target, direction)) = self.next_target() else {
            warn!(
                "car {:?} was Moving with no reachable destination; parking",
                self.id
            );
            self.direction = None;
            self.phase = Phase::Idle;
            return CarStep::BecameIdle;
        };
        self.direction = Some(direction);

        if self.move_ticks_left > 1 {
            self.move_ticks_left -= 1;
            return CarStep::Continue;
        }
        self.move_ticks_left = cfg.ticks_per_floor;

        self.current_floor = if target > self.current_floor {
            self.current_floor + 1
        } else {
            self.current_floor - 1
        };

        if self.destinations.remove(&self.current_floor) {
            self.phase = Phase::DoorsOpen;
            self.door_ticks_left = cfg.door_hold_ticks;
            // The departure direction decides which call flag this stop
            // clears; None means last stop, which clears both.
            let departing = self.next_target().map(|(_, d)| d);
            return CarStep::Arrived {
                floor: self.current_floor,
                direction: departing,
            };
        }

        CarStep::Moved(self.current_floor)
    }

    fn step_doors_open(&mut self, cfg: &SimConfig) -> CarStep {
        if self.door_ticks_left > 0 {
            self.door_ticks_left -= 1;
            return CarStep::Continue;
        }
        match self.next_target() {
            Some((_, direction)) => {
                self.direction = Some(direction);
                self.phase = Phase::Moving;
                self.move_ticks_left = cfg.ticks_per_floor;
                CarStep::DoorsClosed
            }
            None => {
                self.direction = None;
                self.phase = Phase::Idle;
                CarStep::BecameIdle
            }
        }
    }

    /// Same-direction-first target selection
    ///
    /// Keep sweeping in the current direction while destinations remain ahead;
    /// reverse only when none do. A parked car picks the closest destination,
    /// ties going to the lower floor.
    fn next_target(&self) -> Option<(Floor, Direction)> {
        let cur = self.current_floor;
        let above = self
            .destinations
            .range((Excluded(cur), Unbounded))
            .next()
            .copied();
        let below = self.destinations.range(..cur).next_back().copied();

        match self.direction {
            Some(Direction::Up) => above
                .map(|f| (f, Direction::Up))
                .or(below.map(|f| (f, Direction::Down))),
            Some(Direction::Down) => below
                .map(|f| (f, Direction::Down))
                .or(above.map(|f| (f, Direction::Up))),
            None => match (above, below) {
                (Some(a), Some(b)) => {
                    if a - cur < cur - b {
                        Some((a, Direction::Up))
                    } else {
                        Some((b, Direction::Down))
                    }
                }
                (Some(a), None) => Some((a, Direction::Up)),
                (None, Some(b)) => Some((b, Direction::Down)),
                (None, None) => None,
            },
        }
    }

    /// Enforce `phase == Idle => destinations empty && direction none`
    ///
    /// A violation is a programming error: fatal in debug builds, repaired in
    /// release by re-deriving phase and direction from the destination set.
    fn repair_if_inconsistent(&mut self, cfg: &SimConfig) {
        debug_assert!(
            self.destinations.is_empty() && self.direction.is_none(),
            "idle car {:?} has destinations {:?} direction {:?}",
            self.id,
            self.destinations,
            self.direction
        );
        if !self.destinations.is_empty() {
            warn!(
                "idle car {:?} had leftover destinations {:?}; resuming",
                self.id, self.destinations
            );
            self.direction = None;
            if let Some((_, direction)) = self.next_target() {
                self.direction = Some(direction);
                self.phase = Phase::Moving;
                self.move_ticks_left = cfg.ticks_per_floor;
            }
        } else {
            self.direction = None;
        }
    }
}
