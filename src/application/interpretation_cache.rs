//! InterpretationCache - budget-gated get-or-generate for narratives.
//!
//! The cache is the only path to the narrative provider. A read either
//! serves a stored record, or wins the generation claim and produces one,
//! or waits out another caller's in-flight generation. Provider output is
//! paid for out of a per-subject annual budget; once that budget is gone
//! the subject gets the deterministic fallback until the year turns over.

use std::sync::Arc;

use crate::config::InterpretationConfig;
use crate::domain::chart::ChartKind;
use crate::domain::foundation::Timestamp;
use crate::domain::interpretation::{
    render_fallback, CacheKey, ContentKey, GenerationMethod, InterpretationPayload,
    InterpretationRecord,
};
use crate::ports::{ClaimOutcome, InterpretationStore, NarrativeProvider, StoreError};

/// Read-through cache over the interpretation store.
pub struct InterpretationCache {
    store: Arc<dyn InterpretationStore>,
    config: InterpretationConfig,
}

impl InterpretationCache {
    /// Creates a cache over a store.
    pub fn new(store: Arc<dyn InterpretationStore>, config: InterpretationConfig) -> Self {
        Self { store, config }
    }

    /// Serves the interpretation for a key, generating it if needed.
    ///
    /// A stored non-fallback record is always served as a hit. A stored
    /// fallback record is served too, unless a provider is available to
    /// try upgrading it. Misses go through the claim/budget/provider
    /// pipeline and always come back with some payload; only store
    /// failures surface as errors.
    pub async fn get_or_generate(
        &self,
        key: CacheKey,
        content_key: &ContentKey,
        provider: Option<&dyn NarrativeProvider>,
    ) -> Result<InterpretationRecord, StoreError> {
        let now = Timestamp::now();

        if let Some(record) = self.store.find_latest_valid(&key, now).await? {
            let upgradable = record.method == GenerationMethod::Fallback && provider.is_some();
            if !upgradable {
                tracing::debug!(%key, "interpretation served from cache");
                return Ok(record.with_method(GenerationMethod::ServedFromCache));
            }
        }

        match self
            .store
            .claim_generation(&key, self.config.claim_lease_secs, now)
            .await?
        {
            ClaimOutcome::Claimed(token) => {
                let result = self
                    .generate_under_claim(key, content_key, provider)
                    .await;
                if let Err(err) = self.store.release_claim(&token).await {
                    tracing::warn!(%key, error = %err, "failed to release generation claim");
                }
                result
            }
            ClaimOutcome::HeldByOther => self.wait_for_holder(key, content_key).await,
        }
    }

    async fn generate_under_claim(
        &self,
        key: CacheKey,
        content_key: &ContentKey,
        provider: Option<&dyn NarrativeProvider>,
    ) -> Result<InterpretationRecord, StoreError> {
        // Re-read under the claim: a concurrent winner may have inserted
        // and released between our miss-read and the claim. Proceeding on
        // the stale read would double-generate, or worse, shadow the
        // winner's record with a newer fallback.
        let now = Timestamp::now();
        let existing = self.store.find_latest_valid(&key, now).await?;
        if let Some(record) = &existing {
            let upgradable = record.method == GenerationMethod::Fallback && provider.is_some();
            if !upgradable {
                tracing::debug!(%key, "record appeared before our claim, serving it");
                return Ok(record.with_method(GenerationMethod::ServedFromCache));
            }
        }

        let Some(provider) = provider else {
            // No provider wired in; the fallback costs nothing, so the
            // budget stays untouched.
            return self.persist_fallback(key, content_key, now).await;
        };

        let budget_year = match key.kind {
            ChartKind::Natal => now.year(),
            ChartKind::Cycle | ChartKind::Progressed => key.cycle_id,
        };
        let consumed = self
            .store
            .try_consume_budget(
                key.subject,
                budget_year,
                self.config.annual_generation_cap,
                now,
                self.config.cost_estimate_cents,
            )
            .await?;

        if !consumed {
            tracing::info!(%key, year = budget_year, "generation budget exhausted");
            if let Some(record) = existing {
                // A valid fallback is already stored; no point rewriting it.
                return Ok(record);
            }
            return self.persist_fallback(key, content_key, now).await;
        }

        match self.call_provider(provider, content_key).await {
            Ok(payload) => {
                let record = InterpretationRecord::new(
                    key,
                    payload,
                    GenerationMethod::Generated,
                    now,
                    self.generated_expiry(&key, now),
                );
                self.store.insert(record.clone()).await?;
                tracing::info!(%key, "interpretation generated");
                Ok(record)
            }
            Err(err) => {
                // The budget call stays spent: the provider was paid for
                // the attempt whether or not it answered.
                tracing::warn!(%key, error = %err, "narrative generation failed, falling back");
                self.persist_fallback(key, content_key, now).await
            }
        }
    }

    /// Polls for the record a concurrent claim holder is producing.
    async fn wait_for_holder(
        &self,
        key: CacheKey,
        content_key: &ContentKey,
    ) -> Result<InterpretationRecord, StoreError> {
        let deadline = tokio::time::Instant::now() + self.config.claim_wait_timeout();
        loop {
            tokio::time::sleep(self.config.claim_poll_interval()).await;
            if let Some(record) = self.store.find_latest_valid(&key, Timestamp::now()).await? {
                tracing::debug!(%key, "interpretation arrived from concurrent generation");
                return Ok(record.with_method(GenerationMethod::ServedFromCache));
            }
            if tokio::time::Instant::now() >= deadline {
                break;
            }
        }

        // The holder never delivered. Serve an ephemeral fallback without
        // persisting it: inserting here would race the holder's record and
        // could supersede a real generation.
        tracing::warn!(%key, "timed out waiting on generation claim, serving fallback");
        Ok(InterpretationRecord::new(
            key,
            render_fallback(content_key),
            GenerationMethod::Fallback,
            Timestamp::now(),
            Some(Timestamp::now().plus_days(self.config.fallback_ttl_days)),
        ))
    }

    async fn persist_fallback(
        &self,
        key: CacheKey,
        content_key: &ContentKey,
        now: Timestamp,
    ) -> Result<InterpretationRecord, StoreError> {
        let record = InterpretationRecord::new(
            key,
            render_fallback(content_key),
            GenerationMethod::Fallback,
            now,
            Some(now.plus_days(self.config.fallback_ttl_days)),
        );
        self.store.insert(record.clone()).await?;
        Ok(record)
    }

    /// Expiry policy per chart kind.
    ///
    /// Natal narratives only go stale through a birth-data correction,
    /// which changes the key instead. Cycle narratives die with their
    /// year; progressed ones on a rolling window.
    fn generated_expiry(&self, key: &CacheKey, now: Timestamp) -> Option<Timestamp> {
        match key.kind {
            ChartKind::Natal => None,
            ChartKind::Cycle => Some(Timestamp::end_of_year(key.cycle_id)),
            ChartKind::Progressed => Some(now.plus_days(self.config.progressed_ttl_days)),
        }
    }

    async fn call_provider(
        &self,
        provider: &dyn NarrativeProvider,
        content_key: &ContentKey,
    ) -> Result<InterpretationPayload, crate::ports::NarrativeError> {
        let max_attempts = self.config.max_generation_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match provider.generate(content_key).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "narrative provider failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff() * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
