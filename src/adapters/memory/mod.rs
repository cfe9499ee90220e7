//! In-memory adapter implementations for testing and local development.

mod store;

pub use store::InMemoryInterpretationStore;
