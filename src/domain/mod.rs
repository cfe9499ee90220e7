//! Domain layer - pure chart semantics and cache data model.
//!
//! Everything in here is synchronous and free of I/O; the only state is
//! the value objects themselves.

pub mod activation;
pub mod aspect;
pub mod chart;
pub mod cycle;
pub mod foundation;
pub mod interpretation;
