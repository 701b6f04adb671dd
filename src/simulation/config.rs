//! Simulation parameters
//!
//! Timing values are expressed in discrete ticks so the engine stays
//! deterministic and unit-testable; mapping ticks to wall-clock time is the
//! host's business.

use anyhow::{bail, Result};

/// Configuration for a simulated building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of floors in the building, numbered `0..total_floors`
    pub total_floors: usize,

    /// Number of elevator cars in the bank
    pub car_count: usize,

    /// Ticks a car spends traveling between adjacent floors
    pub ticks_per_floor: u32,

    /// Ticks the doors stay open after serving a floor
    pub door_hold_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_floors: 10,
            car_count: 2,
            ticks_per_floor: 1,
            door_hold_ticks: 2,
        }
    }
}

impl SimConfig {
    /// Check that the configuration describes a usable building
    pub fn validate(&self) -> Result<()> {
        if self.total_floors < 2 {
            bail!("total_floors must be at least 2, got {}", self.total_floors);
        }
        if self.car_count < 1 {
            bail!("car_count must be at least 1, got {}", self.car_count);
        }
        if self.ticks_per_floor < 1 {
            bail!(
                "ticks_per_floor must be at least 1, got {}",
                self.ticks_per_floor
            );
        }
        Ok(())
    }

    /// Highest valid floor number
    pub fn top_floor(&self) -> usize {
        self.total_floors - 1
    }
}
