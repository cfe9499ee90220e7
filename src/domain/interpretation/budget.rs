//! Per-subject annual generation budget.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubjectId, Timestamp};

/// One recorded call against a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCall {
    /// When the call was made.
    pub at: Timestamp,
    /// Estimated cost of the call in cents.
    pub cost_estimate_cents: u32,
}

/// How many narrative generations a subject may spend in one calendar year.
///
/// Mutated only through the interpretation store's conditional increment;
/// scoping by calendar year gives the implicit annual reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationBudget {
    /// Subject the budget belongs to.
    pub subject: SubjectId,
    /// Calendar year the budget covers.
    pub year: i32,
    /// Calls already spent.
    pub calls_used: u32,
    /// Fixed cap; default 1.
    pub calls_allowed: u32,
    /// Past calls for audit.
    pub history: Vec<BudgetCall>,
}

impl GenerationBudget {
    /// Creates a fresh budget for a subject and year.
    pub fn new(subject: SubjectId, year: i32, calls_allowed: u32) -> Self {
        Self {
            subject,
            year,
            calls_used: 0,
            calls_allowed,
            history: Vec::new(),
        }
    }

    /// True when no further generation call may be made.
    pub fn is_exhausted(&self) -> bool {
        self.calls_used >= self.calls_allowed
    }

    /// Calls still available.
    pub fn remaining(&self) -> u32 {
        self.calls_allowed.saturating_sub(self.calls_used)
    }

    /// Records one call. The store only invokes this after its conditional
    /// check passed; calling it on an exhausted budget is a logic error
    /// guarded by the store, not here.
    pub fn record_call(&mut self, at: Timestamp, cost_estimate_cents: u32) {
        self.calls_used += 1;
        self.history.push(BudgetCall {
            at,
            cost_estimate_cents,
        });
    }
}
