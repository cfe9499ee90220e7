//! Foundation module - Shared domain primitives.
//!
//! Identifiers, the timestamp value object, and the engine error taxonomy
//! that form the vocabulary of the Solara domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::EngineError;
pub use ids::{InterpretationId, SubjectId};
pub use timestamp::Timestamp;
