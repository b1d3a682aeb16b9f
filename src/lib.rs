//! # featex
//!
//! Sparse feature extraction for named-entity recognition: a sealed registry
//! of feature processors that turn a tokenized, morphologically annotated
//! [`Sentence`] into per-token integer features for a downstream sequence
//! classifier.
//!
//! - **Thirteen processors**: surface/lemma/tag lookups, capitalization
//!   classes, numeric and clock-time heuristics, Brown clusters, gazetteers
//!   with positional roles, previous-stage outcomes, deterministic URL/email
//!   seeding, and post-prediction container synthesis.
//! - **Stable feature ids**: ids are allocated globally across processors in
//!   registration order during training and survive binary model
//!   round-trips bit for bit.
//! - **Windowed emission**: one logical feature at position `i` projects
//!   into `2w+1` shifted ids over a `±w` token window.
//!
//! Tokenization, morphology, the statistical classifier and the BILOU
//! decoder are external collaborators; this crate only produces their
//! feature input and post-processes their entity output.
//!
//! ## Quick start
//!
//! ```
//! use featex::{EntityMap, FeatureExtractor, Sentence, Word};
//!
//! let mut entities = EntityMap::new();
//! let mut extractor = FeatureExtractor::new();
//! extractor.parse("Form 2\nNumericTimeValue 2", &mut entities)?;
//!
//! // Training: interns keys and grows the feature space.
//! let mut sentence = Sentence::new(vec![Word::from_form("14"), Word::from_form("July")]);
//! let mut buffer = String::new();
//! extractor.process_sentence(&mut sentence, true, &mut buffer);
//!
//! // The model round-trips through its binary format.
//! let mut model = Vec::new();
//! extractor.save(&mut model)?;
//! let reloaded = featex::FeatureExtractor::load(model.as_slice())?;
//! assert_eq!(reloaded.total_features(), extractor.total_features());
//! # Ok::<(), featex::Error>(())
//! ```

mod codec;
mod entity_map;
mod error;
mod extractor;
pub mod features;
mod sentence;
pub mod url_detector;

pub use entity_map::EntityMap;
pub use error::{Error, Result};
pub use extractor::FeatureExtractor;
pub use features::FeatureProcessor;
pub use sentence::{
    Bilou, BilouEntity, EntityTypeId, FeatureId, LabelProbability, NamedEntity, Sentence,
    TokenProbabilities, Word, BILOU_COUNT, ENTITY_TYPE_UNKNOWN, FEATURE_UNKNOWN,
};
