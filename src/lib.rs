//! Elevator Dispatch Simulation Library
//!
//! A dispatch and movement engine for a bank of elevators. The engine is
//! presentation-free and can run headless or be embedded behind any UI.

pub mod simulation;
