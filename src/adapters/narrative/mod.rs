//! Narrative provider adapters.

mod mock;

pub use mock::MockNarrativeProvider;
