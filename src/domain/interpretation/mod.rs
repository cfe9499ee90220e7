//! Interpretation module - cached narrative artifacts and their budget.

mod budget;
mod content_key;
mod fallback;
mod record;

pub use budget::{BudgetCall, GenerationBudget};
pub use content_key::{AspectSummary, ContentKey};
pub use fallback::render_fallback;
pub use record::{
    CacheKey, GenerationMethod, InterpretationPayload, InterpretationRecord, Section,
};
