//! InterpretationStore port - Interface to the persistent document store.
//!
//! The store holds the only shared mutable state in the engine: the
//! interpretation records and the generation budgets. Required operations
//! are find-latest-non-expired-by-key, conditional-claim-for-generation,
//! atomic-increment-with-cap, and record insertion. Expiry may be enforced
//! by the store or by the cache's read-time check; the trait contract only
//! requires `find_latest_valid` to never return an expired record.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{SubjectId, Timestamp};
use crate::domain::interpretation::{CacheKey, GenerationBudget, InterpretationRecord};

/// Proof that this caller holds the generation claim for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimToken {
    /// The claimed key.
    pub key: CacheKey,
    /// Identity of this particular claim, so a stale holder cannot
    /// release a successor's claim after its lease expired.
    pub claim_id: Uuid,
}

/// Result of attempting to claim a key for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller now holds the claim.
    Claimed(ClaimToken),
    /// Another generation is in flight; wait for its record.
    HeldByOther,
}

/// Port for the persistent interpretation/budget store.
#[async_trait]
pub trait InterpretationStore: Send + Sync {
    /// Latest record for the key that has not expired at `now`.
    async fn find_latest_valid(
        &self,
        key: &CacheKey,
        now: Timestamp,
    ) -> Result<Option<InterpretationRecord>, StoreError>;

    /// Conditionally claims the key for generation.
    ///
    /// Succeeds when no live claim exists; a claim whose lease has lapsed
    /// at `now` counts as dead and may be taken over.
    async fn claim_generation(
        &self,
        key: &CacheKey,
        lease_secs: i64,
        now: Timestamp,
    ) -> Result<ClaimOutcome, StoreError>;

    /// Releases a held claim. A stale token (lease already taken over) is
    /// ignored rather than an error.
    async fn release_claim(&self, token: &ClaimToken) -> Result<(), StoreError>;

    /// Persists a new record. Records are append-only; a newer record for
    /// the same key supersedes older ones.
    async fn insert(&self, record: InterpretationRecord) -> Result<(), StoreError>;

    /// Atomically consumes one budget call if `calls_used < calls_allowed`.
    ///
    /// Returns false, without mutating anything, when the budget is
    /// already exhausted. Concurrent callers at the boundary must not
    /// both succeed past the cap.
    async fn try_consume_budget(
        &self,
        subject: SubjectId,
        year: i32,
        calls_allowed: u32,
        at: Timestamp,
        cost_estimate_cents: u32,
    ) -> Result<bool, StoreError>;

    /// Current budget state for a subject and year, if any call was made.
    async fn budget_for(
        &self,
        subject: SubjectId,
        year: i32,
    ) -> Result<Option<GenerationBudget>, StoreError>;
}

/// Errors from the interpretation store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store is unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be decoded.
    #[error("corrupt record for {key}: {reason}")]
    Corrupt {
        /// Cache key of the offending record.
        key: String,
        /// Decode failure details.
        reason: String,
    },
}
