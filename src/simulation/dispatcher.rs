//! Call assignment and the pending-request retry queue
//!
//! The dispatcher owns the call registry and the pending queue. An incoming
//! call is either assigned to a car immediately or parked in the FIFO queue;
//! the queue is re-swept whenever a car becomes idle. "No car available" is a
//! normal outcome here, never an error.

use std::collections::VecDeque;

use log::debug;

use super::calls::CallRegistry;
use super::car::SimCar;
use super::config::SimConfig;
use super::types::{CarId, Direction, Floor, PendingRequest, Phase};

/// What happened to a pickup request
#[derive(Debug)]
pub enum PickupOutcome {
    /// The call flag was already set; duplicate presses collapse
    Duplicate,
    /// A car took the call right away
    Assigned(Assignment),
    /// No eligible car; the request joined the pending queue
    Queued,
}

/// Record of a call handed to a car, so the building can emit notifications
#[derive(Debug)]
pub struct Assignment {
    pub car: CarId,
    pub floor: Floor,
    /// The car left Idle because of this assignment
    pub phase_changed: bool,
    /// The car's destination set grew
    pub destinations_changed: bool,
    /// Call flags cleared immediately because the car was already parked at
    /// the floor and just reopened its doors
    pub cleared_on_spot: Vec<Direction>,
}

/// Assigns calls to cars and retries the ones nobody could take
#[derive(Debug)]
pub struct Dispatcher {
    calls: CallRegistry,
    pending: VecDeque<PendingRequest>,
}

impl Dispatcher {
    pub fn new(total_floors: usize) -> Self {
        Self {
            calls: CallRegistry::new(total_floors),
            pending: VecDeque::new(),
        }
    }

    /// Handle a hall call at `floor` in `direction`
    pub fn request_pickup(
        &mut self,
        cars: &mut [SimCar],
        cfg: &SimConfig,
        floor: Floor,
        direction: Direction,
        now: u64,
    ) -> PickupOutcome {
        if !self.calls.set(floor, direction) {
            debug!("duplicate {:?} call at floor {}", direction, floor);
            return PickupOutcome::Duplicate;
        }
        match find_best_car(cars, floor, direction) {
            Some(car) => {
                debug!("{:?} call at floor {} assigned to {:?}", direction, floor, car);
                PickupOutcome::Assigned(self.assign(cars, cfg, car, floor))
            }
            None => {
                debug!("{:?} call at floor {} queued; no eligible car", direction, floor);
                self.pending.push_back(PendingRequest {
                    floor,
                    direction,
                    enqueued_at_tick: now,
                });
                PickupOutcome::Queued
            }
        }
    }

    /// Re-sweep the pending queue after a car went idle
    ///
    /// One pass in FIFO order: entries that find a car now are assigned and
    /// removed, the rest keep their relative order. Entries whose call flag
    /// was cleared in the meantime (an idle stop clears both directions) are
    /// dropped as stale.
    pub fn sweep_pending(
        &mut self,
        cars: &mut [SimCar],
        cfg: &SimConfig,
        now: u64,
    ) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let mut remaining = VecDeque::with_capacity(self.pending.len());

        while let Some(req) = self.pending.pop_front() {
            if !self.calls.is_pending(req.floor, req.direction) {
                debug!("dropping stale pending {:?} call at floor {}", req.direction, req.floor);
                continue;
            }
            match find_best_car(cars, req.floor, req.direction) {
                Some(car) => {
                    debug!(
                        "pending {:?} call at floor {} assigned to {:?} after {} ticks",
                        req.direction,
                        req.floor,
                        car,
                        now.saturating_sub(req.enqueued_at_tick)
                    );
                    assignments.push(self.assign(cars, cfg, car, req.floor));
                }
                None => remaining.push_back(req),
            }
        }

        self.pending = remaining;
        assignments
    }

    /// A car stopped at `floor`; clear the call flags this stop serves
    ///
    /// `departing` is the direction the car leaves in. A last stop
    /// (`departing == None`) clears both flags: a car with nowhere else to go
    /// is willing to serve either direction from here.
    ///
    /// A flag still set after that is checked for strandedness: if no car
    /// holds `floor` as a destination anymore and no pending entry covers it,
    /// nothing would ever serve it again. The car is physically here with the
    /// doors open, so the stop serves that call too.
    pub fn note_arrival(
        &mut self,
        cars: &[SimCar],
        floor: Floor,
        departing: Option<Direction>,
    ) -> Vec<Direction> {
        let mut cleared = self.clear_for_stop(floor, departing);

        for direction in [Direction::Up, Direction::Down] {
            if !self.calls.is_pending(floor, direction) {
                continue;
            }
            let assigned = cars.iter().any(|c| c.destinations().contains(&floor));
            let queued = self
                .pending
                .iter()
                .any(|p| p.floor == floor && p.direction == direction);
            if !assigned && !queued && self.calls.clear(floor, direction) {
                debug!(
                    "stop at floor {} also serves stranded {:?} call",
                    floor, direction
                );
                cleared.push(direction);
            }
        }

        cleared
    }

    pub fn is_call_pending(&self, floor: Floor, direction: Direction) -> bool {
        self.calls.is_pending(floor, direction)
    }

    /// Number of requests waiting in the retry queue
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of call flags currently set
    pub fn active_calls(&self) -> usize {
        self.calls.pending_count()
    }

    fn assign(
        &mut self,
        cars: &mut [SimCar],
        cfg: &SimConfig,
        car_id: CarId,
        floor: Floor,
    ) -> Assignment {
        let car = &mut cars[car_id.0];
        if car.phase == Phase::Idle && car.current_floor == floor {
            car.open_doors(cfg);
            let cleared = self.clear_for_stop(floor, None);
            return Assignment {
                car: car_id,
                floor,
                phase_changed: true,
                destinations_changed: false,
                cleared_on_spot: cleared,
            };
        }
        let was_idle = car.phase == Phase::Idle;
        let destinations_changed = car.add_destination(floor, cfg);
        Assignment {
            car: car_id,
            floor,
            phase_changed: was_idle && car.phase == Phase::Moving,
            destinations_changed,
            cleared_on_spot: Vec::new(),
        }
    }

    fn clear_for_stop(&mut self, floor: Floor, departing: Option<Direction>) -> Vec<Direction> {
        let mut cleared = Vec::new();
        match departing {
            Some(direction) => {
                if self.calls.clear(floor, direction) {
                    cleared.push(direction);
                }
            }
            None => {
                for direction in [Direction::Up, Direction::Down] {
                    if self.calls.clear(floor, direction) {
                        cleared.push(direction);
                    }
                }
            }
        }
        cleared
    }
}

/// Pick the best car for a call, in two ranked tiers
///
/// Tier 1: idle cars, closest first. Tier 2: moving cars already sweeping in
/// the call's direction that have not passed the floor. Ties go to the lowest
/// id. An idle car always beats interrupting a sweep, and a moving car is
/// only recruited while the stop is still ahead of it.
pub fn find_best_car(cars: &[SimCar], floor: Floor, direction: Direction) -> Option<CarId> {
    let mut best: Option<(usize, CarId)> = None;

    for car in cars.iter().filter(|c| c.phase == Phase::Idle) {
        let distance = car.current_floor.abs_diff(floor);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, car.id));
        }
    }
    if best.is_some() {
        return best.map(|(_, id)| id);
    }

    for car in cars
        .iter()
        .filter(|c| c.phase == Phase::Moving && c.direction == Some(direction))
    {
        let still_ahead = match direction {
            Direction::Up => car.current_floor <= floor,
            Direction::Down => car.current_floor >= floor,
        };
        if !still_ahead {
            continue;
        }
        let distance = car.current_floor.abs_diff(floor);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, car.id));
        }
    }

    best.map(|(_, id)| id)
}
