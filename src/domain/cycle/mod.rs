//! Cycle module - locating the moment a body returns to its natal longitude.

mod locator;

pub use locator::{locate_cycle, CycleSearchConfig};
