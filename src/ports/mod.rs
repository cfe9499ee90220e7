//! Ports - trait seams for the engine's external collaborators.
//!
//! Adapters implement these against real infrastructure; the application
//! layer only ever sees the traits.

mod ephemeris_provider;
mod interpretation_store;
mod narrative_provider;

pub use ephemeris_provider::{EphemerisError, EphemerisProvider};
pub use interpretation_store::{ClaimOutcome, ClaimToken, InterpretationStore, StoreError};
pub use narrative_provider::{NarrativeError, NarrativeProvider};
