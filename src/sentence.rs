//! Sentence data model shared by all feature processors.
//!
//! A [`Sentence`] holds the tokens produced by an external tokenizer and
//! morphological analyzer together with three per-token accumulators:
//!
//! - `features` — sparse feature ids appended by feature processors,
//! - `previous_stage` — the BILOU/entity outcome of a previous recognizer
//!   stage, read by the `PreviousStage` processor,
//! - `probabilities` — local BILOU probabilities, seeded by the
//!   `URLEmailDetector` processor and consumed by the downstream classifier.

use serde::{Deserialize, Serialize};

/// Identifier of a sparse feature consumed by the downstream classifier.
pub type FeatureId = u32;

/// Sentinel for a feature that is not present in the model.
///
/// Window emission is a no-op for this value.
pub const FEATURE_UNKNOWN: FeatureId = u32::MAX;

/// Identifier of a named-entity type, assigned by [`EntityMap`].
///
/// [`EntityMap`]: crate::EntityMap
pub type EntityTypeId = u32;

/// Sentinel for an unresolved entity type.
pub const ENTITY_TYPE_UNKNOWN: EntityTypeId = u32::MAX;

/// Number of BILOU tags.
pub const BILOU_COUNT: usize = 5;

/// Five-state entity position tag: Begin, Inside, Last, Outside, Unit.
///
/// The numeric discriminants index the local probability slots and are part
/// of the `PreviousStage` feature key encoding, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bilou {
    /// First token of a multi-token entity.
    Begin = 0,
    /// Token inside a multi-token entity.
    Inside = 1,
    /// Last token of a multi-token entity.
    Last = 2,
    /// Token outside any entity.
    Outside = 3,
    /// Single-token entity.
    Unit = 4,
}

impl Bilou {
    /// Slot index of this tag in a local probability array.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One token with its morphological annotation.
///
/// All fields are read-only during feature emission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Surface form of the token.
    pub form: String,
    /// Surface lemma produced by the analyzer.
    pub raw_lemma: String,
    /// Canonical lemma identifier.
    pub lemma_id: String,
    /// Analyzer comments; carries semantic markers in a `_;X` convention.
    pub lemma_comments: String,
    /// Morphological tag.
    pub tag: String,
}

impl Word {
    /// Create a fully annotated word.
    #[must_use]
    pub fn new(
        form: impl Into<String>,
        raw_lemma: impl Into<String>,
        lemma_id: impl Into<String>,
        lemma_comments: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            form: form.into(),
            raw_lemma: raw_lemma.into(),
            lemma_id: lemma_id.into(),
            lemma_comments: lemma_comments.into(),
            tag: tag.into(),
        }
    }

    /// Create a word whose lemma fields all repeat the form.
    ///
    /// Convenient when no morphological analysis is available.
    #[must_use]
    pub fn from_form(form: impl Into<String>) -> Self {
        let form = form.into();
        Self {
            raw_lemma: form.clone(),
            lemma_id: form.clone(),
            form,
            ..Self::default()
        }
    }
}

/// BILOU/entity outcome of a previous recognizer stage for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilouEntity {
    /// Predicted position tag; `None` when the previous stage is unknown.
    pub bilou: Option<Bilou>,
    /// Predicted entity type.
    pub entity: EntityTypeId,
}

impl Default for BilouEntity {
    fn default() -> Self {
        Self {
            bilou: None,
            entity: ENTITY_TYPE_UNKNOWN,
        }
    }
}

/// Probability of one BILOU tag together with its entity type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelProbability {
    /// Probability mass assigned to the tag.
    pub probability: f64,
    /// Entity type the tag refers to.
    pub entity: EntityTypeId,
}

impl Default for LabelProbability {
    fn default() -> Self {
        Self {
            probability: 0.0,
            entity: ENTITY_TYPE_UNKNOWN,
        }
    }
}

/// Local BILOU probabilities of one token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenProbabilities {
    /// One slot per BILOU tag, indexed by [`Bilou::index`].
    pub local: [LabelProbability; BILOU_COUNT],
    /// Whether the local distribution was already determined.
    pub local_filled: bool,
}

/// A tokenized, morphologically annotated sentence with per-token
/// accumulators.
///
/// The `words`, `features`, `previous_stage` and `probabilities` vectors are
/// always kept the same length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Tokens of the sentence.
    pub words: Vec<Word>,
    /// Per-token sparse feature accumulator, grown by processors.
    pub features: Vec<Vec<FeatureId>>,
    /// Per-token previous-stage outcome.
    pub previous_stage: Vec<BilouEntity>,
    /// Per-token local probabilities.
    pub probabilities: Vec<TokenProbabilities>,
}

impl Sentence {
    /// Create a sentence from annotated words, with empty accumulators.
    #[must_use]
    pub fn new(words: Vec<Word>) -> Self {
        let size = words.len();
        Self {
            words,
            features: vec![Vec::new(); size],
            previous_stage: vec![BilouEntity::default(); size],
            probabilities: vec![TokenProbabilities::default(); size],
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Empty every per-token feature list, keeping allocations.
    pub fn clear_features(&mut self) {
        for features in &mut self.features {
            features.clear();
        }
    }
}

/// A recognized named entity spanning whole tokens.
///
/// `start` and `length` count tokens, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Index of the first covered token.
    pub start: usize,
    /// Number of covered tokens.
    pub length: usize,
    /// Entity type label.
    pub entity_type: String,
}

impl NamedEntity {
    /// Create a new entity.
    #[must_use]
    pub fn new(start: usize, length: usize, entity_type: impl Into<String>) -> Self {
        Self {
            start,
            length,
            entity_type: entity_type.into(),
        }
    }

    /// Index one past the last covered token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}
