//! Core types for the elevator simulation
//!
//! These are standalone types that don't depend on any presentation layer.

/// A floor number, counted from 0 (ground) upward
pub type Floor = usize;

/// A unique identifier for an elevator car
/// Cars are created once at simulation start and never destroyed, so ids are
/// stable for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub usize);

/// Travel direction of a call or a moving car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Phase of a car's state machine
///
/// A car with `Idle` phase has no destinations and no travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Moving,
    DoorsOpen,
}

/// A pickup request that could not be assigned when it arrived
///
/// `direction` is the caller's desired travel direction, not a car's current
/// direction. Pending requests never expire; they sit in a FIFO queue until a
/// sweep finds a car for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub floor: Floor,
    pub direction: Direction,
    pub enqueued_at_tick: u64,
}

/// Outbound notification to the presentation sink
///
/// The engine never touches UI state directly; it emits these events and the
/// host drains them after each operation (see `SimBuilding::drain_events`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    PositionChanged {
        car: CarId,
        floor: Floor,
    },
    PhaseChanged {
        car: CarId,
        phase: Phase,
        direction: Option<Direction>,
    },
    CallCleared {
        floor: Floor,
        direction: Direction,
    },
    DestinationsChanged {
        car: CarId,
        destinations: Vec<Floor>,
    },
}
