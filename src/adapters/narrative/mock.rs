//! Mock narrative provider.
//!
//! Produces canned prose shaped by the content key, with optional
//! injectable failures for exercising the cache's retry and fallback
//! paths.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::domain::chart::ChartKind;
use crate::domain::interpretation::{ContentKey, InterpretationPayload, Section};
use crate::ports::{NarrativeError, NarrativeProvider};

/// Canned-output narrative provider.
#[derive(Debug, Default)]
pub struct MockNarrativeProvider {
    failures_left: AtomicU32,
    calls: AtomicU32,
}

impl MockNarrativeProvider {
    /// Provider that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that fails the first `failures` calls with a retryable
    /// error, then succeeds.
    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        }
    }

    /// Total calls received.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeProvider for MockNarrativeProvider {
    async fn generate(&self, key: &ContentKey) -> Result<InterpretationPayload, NarrativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(NarrativeError::unavailable("injected failure"));
        }

        let sections = key
            .activations
            .iter()
            .map(|a| {
                Section::new(
                    a.body.to_string(),
                    format!("{} colors this chart for {}.", a.body, key.subject_label),
                )
            })
            .collect();

        Ok(match key.chart_kind {
            ChartKind::Natal => InterpretationPayload::Natal {
                summary: format!("A generated natal reading for {}.", key.subject_label),
                sections,
            },
            ChartKind::Cycle => InterpretationPayload::Cycle {
                summary: format!(
                    "A generated {} cycle reading for {}.",
                    key.cycle_id, key.subject_label
                ),
                year: key.cycle_id,
                activated_bodies: key.activations.iter().map(|a| a.body.to_string()).collect(),
                sections,
            },
            ChartKind::Progressed => InterpretationPayload::Progressed {
                summary: format!("A generated progressed reading for {}.", key.subject_label),
                sections,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn payload_kind_matches_the_key() {
        let provider = MockNarrativeProvider::new();
        let key = ContentKey::new("Ada", ChartKind::Cycle, 2025);
        let payload = provider.generate(&key).await.unwrap();
        assert_eq!(payload.kind(), ChartKind::Cycle);
        assert!(payload.summary().contains("2025"));
    }

    #[tokio::test]
    async fn injected_failures_run_out() {
        let provider = MockNarrativeProvider::failing_times(2);
        let key = ContentKey::new("Ada", ChartKind::Natal, 1);
        assert!(provider.generate(&key).await.is_err());
        assert!(provider.generate(&key).await.is_err());
        assert!(provider.generate(&key).await.is_ok());
        assert_eq!(provider.calls(), 3);
    }
}
