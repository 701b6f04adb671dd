//! Main simulation building that ties everything together
//!
//! This is the public surface of the engine: a bank of cars, the dispatcher,
//! and a discrete clock. The host calls `request_pickup` / `request_from_car`
//! between ticks, drives time with `tick`, and drains `SimEvent`s for its
//! presentation layer.

use anyhow::{bail, Result};

use super::car::{CarStep, SimCar};
use super::config::SimConfig;
use super::dispatcher::{Assignment, Dispatcher, PickupOutcome};
use super::types::{CarId, Direction, Floor, Phase, SimEvent};

/// Running counters for the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    /// Hall calls accepted (duplicates excluded)
    pub calls_received: usize,
    /// Hall call flags cleared by a car stopping
    pub calls_served: usize,
    /// In-car button presses accepted
    pub cab_requests: usize,
    /// Total one-floor moves across all cars
    pub floors_traveled: usize,
}

/// The main simulation building
pub struct SimBuilding {
    config: SimConfig,
    cars: Vec<SimCar>,
    dispatcher: Dispatcher,
    /// Simulation time in ticks
    now: u64,
    /// Notifications not yet drained by the host
    events: Vec<SimEvent>,
    pub stats: SimStats,
}

impl SimBuilding {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let cars = (0..config.car_count).map(|i| SimCar::new(CarId(i))).collect();
        Ok(Self {
            config,
            cars,
            dispatcher: Dispatcher::new(config.total_floors),
            now: 0,
            events: Vec::new(),
            stats: SimStats::default(),
        })
    }

    /// A 10-floor, 2-car building with default timing, for tests and demos
    pub fn new_standard() -> Self {
        Self::new(SimConfig::default()).expect("default config is valid")
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current simulation time in ticks
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.cars.get(id.0)
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn is_call_pending(&self, floor: Floor, direction: Direction) -> bool {
        self.dispatcher.is_call_pending(floor, direction)
    }

    /// Number of requests waiting in the dispatcher's retry queue
    pub fn pending_len(&self) -> usize {
        self.dispatcher.pending_len()
    }

    /// True when no call flag is set, the queue is empty, and every car parked
    pub fn is_quiescent(&self) -> bool {
        self.dispatcher.active_calls() == 0
            && self.dispatcher.pending_len() == 0
            && self.cars.iter().all(|c| c.phase == Phase::Idle)
    }

    /// Hall call: someone on `floor` wants to travel in `direction`
    pub fn request_pickup(&mut self, floor: Floor, direction: Direction) -> Result<()> {
        self.validate_floor(floor)?;
        match self
            .dispatcher
            .request_pickup(&mut self.cars, &self.config, floor, direction, self.now)
        {
            PickupOutcome::Duplicate => {}
            PickupOutcome::Assigned(assignment) => {
                self.stats.calls_received += 1;
                self.emit_assignment(&assignment);
            }
            PickupOutcome::Queued => {
                self.stats.calls_received += 1;
            }
        }
        Ok(())
    }

    /// In-car button: a rider in `car` wants to go to `floor`
    ///
    /// The car is already chosen by the rider, so this bypasses selection and
    /// goes straight to the car's destination set.
    pub fn request_from_car(&mut self, car: CarId, floor: Floor) -> Result<()> {
        self.validate_floor(floor)?;
        if car.0 >= self.cars.len() {
            bail!("unknown car {:?}", car);
        }
        self.stats.cab_requests += 1;
        let target = &mut self.cars[car.0];
        let before = (target.phase, target.direction);
        if target.add_destination(floor, &self.config) {
            let destinations = target.destinations().iter().copied().collect();
            let after = (target.phase, target.direction);
            self.events.push(SimEvent::DestinationsChanged { car, destinations });
            if after != before {
                self.events.push(SimEvent::PhaseChanged {
                    car,
                    phase: after.0,
                    direction: after.1,
                });
            }
        }
        Ok(())
    }

    /// Advance simulated time by one tick
    ///
    /// Steps every car in id order and translates the results into dispatcher
    /// callbacks and presentation events. A car going idle triggers a pending
    /// sweep within this same tick.
    pub fn tick(&mut self) {
        self.now += 1;

        for idx in 0..self.cars.len() {
            let id = self.cars[idx].id;
            let before = (self.cars[idx].phase, self.cars[idx].direction);
            let step = self.cars[idx].step(&self.config);

            match step {
                CarStep::Continue => {}
                CarStep::Moved(floor) => {
                    self.stats.floors_traveled += 1;
                    self.events.push(SimEvent::PositionChanged { car: id, floor });
                    self.emit_phase_if_changed(idx, before);
                }
                CarStep::Arrived { floor, direction } => {
                    self.stats.floors_traveled += 1;
                    self.events.push(SimEvent::PositionChanged { car: id, floor });
                    let destinations = self.cars[idx].destinations().iter().copied().collect();
                    self.events.push(SimEvent::DestinationsChanged {
                        car: id,
                        destinations,
                    });
                    self.events.push(SimEvent::PhaseChanged {
                        car: id,
                        phase: Phase::DoorsOpen,
                        direction: self.cars[idx].direction,
                    });
                    let cleared = self.dispatcher.note_arrival(&self.cars, floor, direction);
                    for d in cleared {
                        self.emit_call_cleared(floor, d);
                    }
                }
                CarStep::DoorsClosed => {
                    self.events.push(SimEvent::PhaseChanged {
                        car: id,
                        phase: Phase::Moving,
                        direction: self.cars[idx].direction,
                    });
                }
                CarStep::BecameIdle => {
                    self.events.push(SimEvent::PhaseChanged {
                        car: id,
                        phase: Phase::Idle,
                        direction: None,
                    });
                    let assignments =
                        self.dispatcher
                            .sweep_pending(&mut self.cars, &self.config, self.now);
                    for assignment in assignments {
                        self.emit_assignment(&assignment);
                    }
                }
            }
        }
    }

    /// Take all notifications emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn validate_floor(&self, floor: Floor) -> Result<()> {
        if floor >= self.config.total_floors {
            bail!(
                "floor {} is outside the building (valid range 0..{})",
                floor,
                self.config.total_floors
            );
        }
        Ok(())
    }

    fn emit_assignment(&mut self, assignment: &Assignment) {
        let car = assignment.car;
        if assignment.destinations_changed {
            let destinations = self.cars[car.0].destinations().iter().copied().collect();
            self.events.push(SimEvent::DestinationsChanged { car, destinations });
        }
        if assignment.phase_changed {
            self.events.push(SimEvent::PhaseChanged {
                car,
                phase: self.cars[car.0].phase,
                direction: self.cars[car.0].direction,
            });
        }
        for direction in assignment.cleared_on_spot.iter().copied() {
            self.emit_call_cleared(assignment.floor, direction);
        }
    }

    fn emit_phase_if_changed(&mut self, idx: usize, before: (Phase, Option<Direction>)) {
        let car = &self.cars[idx];
        if (car.phase, car.direction) != before {
            self.events.push(SimEvent::PhaseChanged {
                car: car.id,
                phase: car.phase,
                direction: car.direction,
            });
        }
    }

    fn emit_call_cleared(&mut self, floor: Floor, direction: Direction) {
        self.stats.calls_served += 1;
        self.events.push(SimEvent::CallCleared { floor, direction });
    }

    /// Print a summary of the building state
    pub fn print_summary(&self) {
        println!("=== Elevator Simulation Summary ===");
        println!("Tick: {}", self.now);
        println!("--- Cars ---");
        for car in &self.cars {
            let destinations: Vec<Floor> = car.destinations().iter().copied().collect();
            println!(
                "  Car {}: floor {}, {:?} {}, destinations {:?}",
                car.id.0,
                car.current_floor,
                car.phase,
                match car.direction {
                    Some(Direction::Up) => "up",
                    Some(Direction::Down) => "down",
                    None => "-",
                },
                destinations
            );
        }
        println!(
            "Calls: {} flags set, {} queued",
            self.dispatcher.active_calls(),
            self.dispatcher.pending_len()
        );
        println!(
            "Stats: {} received, {} served, {} cab requests, {} floors traveled",
            self.stats.calls_received,
            self.stats.calls_served,
            self.stats.cab_requests,
            self.stats.floors_traveled
        );
    }

    /// Draw a side view of the shafts in the terminal
    pub fn draw_shaft(&self) {
        println!("\n=== Elevator Bank (tick {}) ===", self.now);
        println!("Legend: ^v=call pending, [n^]=car moving, [nO]=doors open, [n=]=parked");
        for floor in (0..self.config.total_floors).rev() {
            let up = if self.is_call_pending(floor, Direction::Up) {
                '^'
            } else {
                ' '
            };
            let down = if self.is_call_pending(floor, Direction::Down) {
                'v'
            } else {
                ' '
            };
            let mut line = format!("{:>3} {}{} |", floor, up, down);
            for car in &self.cars {
                if car.current_floor == floor {
                    let symbol = match (car.phase, car.direction) {
                        (Phase::DoorsOpen, _) => 'O',
                        (Phase::Moving, Some(Direction::Up)) => '^',
                        (Phase::Moving, Some(Direction::Down)) => 'v',
                        _ => '=',
                    };
                    line.push_str(&format!(" [{}{}]", car.id.0, symbol));
                } else {
                    line.push_str("  .  ");
                }
            }
            println!("{}", line);
        }
        println!();
    }
}
