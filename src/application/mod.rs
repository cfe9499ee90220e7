//! Application layer - services orchestrating the domain through the ports.

mod engine;
mod interpretation_cache;

pub use engine::ChartEngine;
pub use interpretation_cache::InterpretationCache;
