//! Adapters - concrete implementations of the engine's ports.

pub mod ephemeris;
pub mod memory;
pub mod narrative;
