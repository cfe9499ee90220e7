//! In-memory InterpretationStore adapter.
//!
//! Backs the interpretation cache with plain maps behind a mutex. Records
//! are append-only per key; claims carry a lease expiry so an abandoned
//! generation frees itself; budget consumption happens under the same
//! lock, which gives the conditional increment its atomicity.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{SubjectId, Timestamp};
use crate::domain::interpretation::{CacheKey, GenerationBudget, InterpretationRecord};
use crate::ports::{ClaimOutcome, ClaimToken, InterpretationStore, StoreError};

#[derive(Default)]
struct Inner {
    /// Records per key in insertion order; the latest valid one wins.
    records: HashMap<CacheKey, Vec<InterpretationRecord>>,
    /// Live claims: claim identity and lease expiry.
    claims: HashMap<CacheKey, (Uuid, Timestamp)>,
    budgets: HashMap<(SubjectId, i32), GenerationBudget>,
}

/// Map-backed interpretation store.
#[derive(Default)]
pub struct InMemoryInterpretationStore {
    inner: Mutex<Inner>,
}

impl InMemoryInterpretationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored for a key, expired ones included.
    pub fn record_count(&self, key: &CacheKey) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.records.get(key).map_or(0, Vec::len)
    }
}

#[async_trait]
impl InterpretationStore for InMemoryInterpretationStore {
    async fn find_latest_valid(
        &self,
        key: &CacheKey,
        now: Timestamp,
    ) -> Result<Option<InterpretationRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .get(key)
            .and_then(|records| records.iter().rev().find(|r| r.is_valid_at(now)))
            .cloned())
    }

    async fn claim_generation(
        &self,
        key: &CacheKey,
        lease_secs: i64,
        now: Timestamp,
    ) -> Result<ClaimOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((_, lease_until)) = inner.claims.get(key) {
            if now < *lease_until {
                return Ok(ClaimOutcome::HeldByOther);
            }
            // Lapsed lease: the previous holder abandoned it.
        }
        let claim_id = Uuid::new_v4();
        inner
            .claims
            .insert(*key, (claim_id, now.plus_seconds(lease_secs)));
        Ok(ClaimOutcome::Claimed(ClaimToken {
            key: *key,
            claim_id,
        }))
    }

    async fn release_claim(&self, token: &ClaimToken) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((claim_id, _)) = inner.claims.get(&token.key) {
            if *claim_id == token.claim_id {
                inner.claims.remove(&token.key);
            }
            // A different id means the lease was taken over; the stale
            // release is a no-op.
        }
        Ok(())
    }

    async fn insert(&self, record: InterpretationRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.records.entry(record.key).or_default().push(record);
        Ok(())
    }

    async fn try_consume_budget(
        &self,
        subject: SubjectId,
        year: i32,
        calls_allowed: u32,
        at: Timestamp,
        cost_estimate_cents: u32,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let budget = inner
            .budgets
            .entry((subject, year))
            .or_insert_with(|| GenerationBudget::new(subject, year, calls_allowed));
        if budget.calls_used >= calls_allowed {
            return Ok(false);
        }
        budget.record_call(at, cost_estimate_cents);
        Ok(true)
    }

    async fn budget_for(
        &self,
        subject: SubjectId,
        year: i32,
    ) -> Result<Option<GenerationBudget>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.budgets.get(&(subject, year)).cloned())
    }
}
