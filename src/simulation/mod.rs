//! Standalone elevator simulation module
//!
//! This module contains all the core dispatch and movement logic. It runs on
//! a discrete simulated clock, touches no UI state, and can be tested via
//! console without any rendering layer.

mod building;
mod calls;
mod car;
mod config;
mod dispatcher;
mod types;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use building::{SimBuilding, SimStats};
#[allow(unused_imports)]
pub use calls::{CallRegistry, FloorCall};
#[allow(unused_imports)]
pub use car::{CarStep, SimCar};
#[allow(unused_imports)]
pub use config::SimConfig;
#[allow(unused_imports)]
pub use dispatcher::{find_best_car, Assignment, Dispatcher, PickupOutcome};
#[allow(unused_imports)]
pub use types::{CarId, Direction, Floor, PendingRequest, Phase, SimEvent};
