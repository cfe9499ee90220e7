//! Interpretation records and their cache key.

use serde::{Deserialize, Serialize};

use crate::domain::chart::ChartKind;
use crate::domain::foundation::{InterpretationId, SubjectId, Timestamp};

/// Identity of one cached interpretation.
///
/// `cycle_id` is the target year for cycle and progressed charts; natal
/// interpretations use the subject's birth-data version instead, so a
/// birth-data correction starts a fresh key rather than mutating records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Subject the interpretation belongs to.
    pub subject: SubjectId,
    /// Chart kind the interpretation covers.
    pub kind: ChartKind,
    /// Cycle identifier (target year, or birth-data version for natal).
    pub cycle_id: i32,
}

impl CacheKey {
    /// Creates a cache key.
    pub fn new(subject: SubjectId, kind: ChartKind, cycle_id: i32) -> Self {
        Self {
            subject,
            kind,
            cycle_id,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.kind, self.cycle_id)
    }
}

/// How the payload of a record (or a served response) came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Produced by the narrative provider.
    Generated,
    /// Synthesized deterministically from the structural facts.
    Fallback,
    /// A previously persisted record served unchanged.
    ///
    /// Never stored; stamped on the returned copy of a cache hit.
    ServedFromCache,
}

/// One titled block of narrative prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub text: String,
}

impl Section {
    /// Creates a section.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Narrative content, shaped per chart kind.
///
/// Each kind carries its own explicit schema; there is no untyped blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InterpretationPayload {
    Natal {
        summary: String,
        sections: Vec<Section>,
    },
    Cycle {
        summary: String,
        /// Year the cycle covers.
        year: i32,
        /// Bodies the cycle activates, most emphasized first.
        activated_bodies: Vec<String>,
        sections: Vec<Section>,
    },
    Progressed {
        summary: String,
        sections: Vec<Section>,
    },
}

impl InterpretationPayload {
    /// Chart kind this payload is shaped for.
    pub fn kind(&self) -> ChartKind {
        match self {
            InterpretationPayload::Natal { .. } => ChartKind::Natal,
            InterpretationPayload::Cycle { .. } => ChartKind::Cycle,
            InterpretationPayload::Progressed { .. } => ChartKind::Progressed,
        }
    }

    /// The headline summary text.
    pub fn summary(&self) -> &str {
        match self {
            InterpretationPayload::Natal { summary, .. }
            | InterpretationPayload::Cycle { summary, .. }
            | InterpretationPayload::Progressed { summary, .. } => summary,
        }
    }
}

/// A persisted narrative artifact.
///
/// Created on first successful generation or fallback; superseded by a new
/// record on regeneration, never mutated; dropped once past expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationRecord {
    /// Record identity.
    pub id: InterpretationId,
    /// Cache key this record answers.
    pub key: CacheKey,
    /// Generated or synthesized content.
    pub payload: InterpretationPayload,
    /// How the payload was produced.
    pub method: GenerationMethod,
    /// When the payload was produced.
    pub generated_at: Timestamp,
    /// When the record stops being served; `None` means no forced expiry.
    pub expires_at: Option<Timestamp>,
}

impl InterpretationRecord {
    /// Creates a new record.
    pub fn new(
        key: CacheKey,
        payload: InterpretationPayload,
        method: GenerationMethod,
        generated_at: Timestamp,
        expires_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id: InterpretationId::new(),
            key,
            payload,
            method,
            generated_at,
            expires_at,
        }
    }

    /// True while the record may still be served.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }

    /// Copy of this record stamped with a different method tag.
    ///
    /// Used when serving a hit: the stored record keeps its original
    /// method, the response says where it came from.
    pub fn with_method(&self, method: GenerationMethod) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }
}
