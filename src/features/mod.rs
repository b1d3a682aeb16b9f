//! Feature processors: a sealed registry of sentence-to-feature transforms.
//!
//! Every processor shares a [`ProcessorBase`] holding the window half-width
//! and an interned string-to-feature-id table, and implements up to five
//! operations:
//!
//! - `parse` — consume configuration arguments during training, allocating
//!   feature ids,
//! - `save` / `load` — binary round-trip of processor state,
//! - `process_sentence` — emit sparse features into a [`Sentence`],
//! - `process_entities` — post-process predicted entities (only
//!   `CzechAddContainers`).
//!
//! The thirteen variants form a closed set; [`FeatureProcessor::from_name`]
//! is the factory over their canonical configuration names.

pub mod brown;
pub mod capitalization;
pub mod containers;
pub mod gazetteers;
pub mod lexical;
pub mod numeric;
pub mod previous_stage;
pub mod url_email;
pub mod window;

use std::collections::HashMap;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec;
use crate::entity_map::EntityMap;
use crate::error::Result;
use crate::sentence::{FeatureId, NamedEntity, Sentence, FEATURE_UNKNOWN};

pub use brown::BrownClusters;
pub use capitalization::{FormCapitalization, RawLemmaCapitalization};
pub use containers::CzechAddContainers;
pub use gazetteers::Gazetteers;
pub use lexical::{CzechLemmaTerm, Form, Lemma, RawLemma, Tag};
pub use numeric::NumericTimeValue;
pub use previous_stage::PreviousStage;
pub use url_email::UrlEmailDetector;

/// State shared by every feature processor: the window half-width and the
/// interned mapping from string keys to the center id of a reserved `2w+1`
/// feature band.
///
/// The map doubles as generic string-to-integer storage: `BrownClusters`
/// keeps form-to-cluster ids in it and `Gazetteers` phrase-to-info indices,
/// which is why the raw accessors exist next to [`lookup`](Self::lookup).
#[derive(Debug, Clone, Default)]
pub struct ProcessorBase {
    window: u32,
    map: HashMap<String, FeatureId>,
}

impl ProcessorBase {
    /// Reset the processor for training with the given window half-width.
    pub(crate) fn parse(&mut self, window: u32) {
        self.window = window;
        self.map.clear();
    }

    /// Window half-width.
    pub(crate) fn window(&self) -> u32 {
        self.window
    }

    /// Reserved feature of the empty-string key: the center of a band that
    /// was never allocated. Emitting it marks virtual out-of-sentence words.
    pub(crate) fn empty_feature(&self) -> FeatureId {
        self.window
    }

    /// Feature id of `key`, allocating a fresh `2w+1` band when a counter is
    /// supplied.
    ///
    /// The empty key always resolves to [`Self::empty_feature`] and is never
    /// stored. Without a counter, unknown keys resolve to
    /// [`FEATURE_UNKNOWN`], which downstream emission ignores.
    pub(crate) fn lookup(&mut self, key: &str, total_features: Option<&mut FeatureId>) -> FeatureId {
        if key.is_empty() {
            return self.window;
        }
        if let Some(&feature) = self.map.get(key) {
            return feature;
        }
        match total_features {
            Some(total) => {
                let feature = *total + self.window;
                *total += 2 * self.window + 1;
                self.map.insert(key.to_owned(), feature);
                feature
            }
            None => FEATURE_UNKNOWN,
        }
    }

    /// Raw map read.
    pub(crate) fn find(&self, key: &str) -> Option<FeatureId> {
        self.map.get(key).copied()
    }

    /// Raw get-or-insert; returns the stored value for existing keys.
    pub(crate) fn get_or_insert(&mut self, key: &str, value: FeatureId) -> FeatureId {
        *self.map.entry(key.to_owned()).or_insert(value)
    }

    /// Raw insert that fails on duplicates.
    pub(crate) fn try_insert(&mut self, key: &str, value: FeatureId) -> bool {
        match self.map.entry(key.to_owned()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Serialize window and intern table.
    ///
    /// Entries are ordered by `(feature_id, key)` so that a load/save cycle
    /// reproduces the file byte for byte.
    pub(crate) fn save<W: Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u32::<LittleEndian>(self.window)?;
        wtr.write_u32::<LittleEndian>(self.map.len() as u32)?;
        let mut entries: Vec<(&str, FeatureId)> =
            self.map.iter().map(|(key, &id)| (key.as_str(), id)).collect();
        entries.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        for (key, id) in entries {
            codec::write_str(&mut wtr, key)?;
            wtr.write_u32::<LittleEndian>(id)?;
        }
        Ok(())
    }

    /// Deserialize window and intern table.
    pub(crate) fn load<R: Read>(&mut self, mut rdr: R) -> Result<()> {
        self.window = rdr.read_u32::<LittleEndian>()?;
        let count = rdr.read_u32::<LittleEndian>()?;
        self.map.clear();
        self.map.reserve(count as usize);
        for _ in 0..count {
            let key = codec::read_str(&mut rdr)?;
            let id = rdr.read_u32::<LittleEndian>()?;
            self.map.insert(key, id);
        }
        Ok(())
    }
}

/// A feature processor: one of the thirteen registry variants.
///
/// The set is sealed; adding a variant is a model-format change.
#[derive(Debug, Clone)]
pub enum FeatureProcessor {
    /// Brown cluster features of the raw lemma.
    BrownClusters(BrownClusters),
    /// Post-prediction synthesis of person/time container entities.
    CzechAddContainers(CzechAddContainers),
    /// Czech semantic-class markers from lemma comments.
    CzechLemmaTerm(CzechLemmaTerm),
    /// Surface form in window.
    Form(Form),
    /// Capitalization classes of the surface form.
    FormCapitalization(FormCapitalization),
    /// Gazetteer phrase matches with positional roles.
    Gazetteers(Gazetteers),
    /// Canonical lemma id in window.
    Lemma(Lemma),
    /// Numeric hour/minute/day/month/year/time heuristics.
    NumericTimeValue(NumericTimeValue),
    /// Previous-stage BILOU/entity outcome, forward window only.
    PreviousStage(PreviousStage),
    /// Surface lemma in window.
    RawLemma(RawLemma),
    /// Capitalization classes of the surface lemma.
    RawLemmaCapitalization(RawLemmaCapitalization),
    /// Morphological tag in window.
    Tag(Tag),
    /// Deterministic URL/email seeding of local probabilities.
    URLEmailDetector(UrlEmailDetector),
}

impl FeatureProcessor {
    /// Construct a processor by its canonical configuration name.
    ///
    /// Names are matched exactly and case-sensitively; unknown names yield
    /// `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BrownClusters" => Some(Self::BrownClusters(BrownClusters::default())),
            "CzechAddContainers" => Some(Self::CzechAddContainers(CzechAddContainers::default())),
            "CzechLemmaTerm" => Some(Self::CzechLemmaTerm(CzechLemmaTerm::default())),
            "Form" => Some(Self::Form(Form::default())),
            "FormCapitalization" => Some(Self::FormCapitalization(FormCapitalization::default())),
            "Gazetteers" => Some(Self::Gazetteers(Gazetteers::default())),
            "Lemma" => Some(Self::Lemma(Lemma::default())),
            "NumericTimeValue" => Some(Self::NumericTimeValue(NumericTimeValue::default())),
            "PreviousStage" => Some(Self::PreviousStage(PreviousStage::default())),
            "RawLemma" => Some(Self::RawLemma(RawLemma::default())),
            "RawLemmaCapitalization" => {
                Some(Self::RawLemmaCapitalization(RawLemmaCapitalization::default()))
            }
            "Tag" => Some(Self::Tag(Tag::default())),
            "URLEmailDetector" => Some(Self::URLEmailDetector(UrlEmailDetector::default())),
            _ => None,
        }
    }

    /// Canonical configuration name of this processor.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BrownClusters(_) => "BrownClusters",
            Self::CzechAddContainers(_) => "CzechAddContainers",
            Self::CzechLemmaTerm(_) => "CzechLemmaTerm",
            Self::Form(_) => "Form",
            Self::FormCapitalization(_) => "FormCapitalization",
            Self::Gazetteers(_) => "Gazetteers",
            Self::Lemma(_) => "Lemma",
            Self::NumericTimeValue(_) => "NumericTimeValue",
            Self::PreviousStage(_) => "PreviousStage",
            Self::RawLemma(_) => "RawLemma",
            Self::RawLemmaCapitalization(_) => "RawLemmaCapitalization",
            Self::Tag(_) => "Tag",
            Self::URLEmailDetector(_) => "URLEmailDetector",
        }
    }

    fn base(&self) -> &ProcessorBase {
        match self {
            Self::BrownClusters(p) => &p.base,
            Self::CzechAddContainers(p) => &p.base,
            Self::CzechLemmaTerm(p) => &p.base,
            Self::Form(p) => &p.base,
            Self::FormCapitalization(p) => &p.base,
            Self::Gazetteers(p) => &p.base,
            Self::Lemma(p) => &p.base,
            Self::NumericTimeValue(p) => &p.base,
            Self::PreviousStage(p) => &p.base,
            Self::RawLemma(p) => &p.base,
            Self::RawLemmaCapitalization(p) => &p.base,
            Self::Tag(p) => &p.base,
            Self::URLEmailDetector(p) => &p.base,
        }
    }

    fn base_mut(&mut self) -> &mut ProcessorBase {
        match self {
            Self::BrownClusters(p) => &mut p.base,
            Self::CzechAddContainers(p) => &mut p.base,
            Self::CzechLemmaTerm(p) => &mut p.base,
            Self::Form(p) => &mut p.base,
            Self::FormCapitalization(p) => &mut p.base,
            Self::Gazetteers(p) => &mut p.base,
            Self::Lemma(p) => &mut p.base,
            Self::NumericTimeValue(p) => &mut p.base,
            Self::PreviousStage(p) => &mut p.base,
            Self::RawLemma(p) => &mut p.base,
            Self::RawLemmaCapitalization(p) => &mut p.base,
            Self::Tag(p) => &mut p.base,
            Self::URLEmailDetector(p) => &mut p.base,
        }
    }

    /// Window half-width this processor was configured with.
    #[must_use]
    pub fn window(&self) -> u32 {
        self.base().window()
    }

    /// Parse textual configuration during training, allocating feature ids.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic naming the offending file, line or argument; the
    /// caller aborts the model build.
    pub fn parse(
        &mut self,
        window: u32,
        args: &[&str],
        entities: &mut EntityMap,
        total_features: &mut FeatureId,
    ) -> Result<()> {
        match self {
            Self::BrownClusters(p) => p.parse(window, args, total_features),
            Self::CzechAddContainers(p) => p.parse(window),
            Self::Gazetteers(p) => p.parse(window, args, total_features),
            Self::URLEmailDetector(p) => p.parse(window, args, entities),
            // The remaining processors take no arguments beyond the window.
            _ => {
                self.base_mut().parse(window);
                Ok(())
            }
        }
    }

    /// Serialize processor state: base first, then variant payload.
    ///
    /// # Errors
    ///
    /// Propagates IO errors of the writer.
    pub fn save<W: Write>(&self, mut wtr: W) -> Result<()> {
        self.base().save(&mut wtr)?;
        match self {
            Self::BrownClusters(p) => p.save_payload(&mut wtr),
            Self::Gazetteers(p) => p.save_payload(&mut wtr),
            Self::URLEmailDetector(p) => p.save_payload(&mut wtr),
            _ => Ok(()),
        }
    }

    /// Deserialize processor state written by [`Self::save`].
    ///
    /// The model file is trusted; corruption surfaces as IO or UTF-8 errors.
    ///
    /// # Errors
    ///
    /// Propagates decoder errors.
    pub fn load<R: Read>(&mut self, mut rdr: R) -> Result<()> {
        self.base_mut().load(&mut rdr)?;
        match self {
            Self::BrownClusters(p) => p.load_payload(&mut rdr),
            Self::Gazetteers(p) => p.load_payload(&mut rdr),
            Self::URLEmailDetector(p) => p.load_payload(&mut rdr),
            _ => Ok(()),
        }
    }

    /// Emit features for one sentence.
    ///
    /// With `total_features` supplied (training), unseen keys are interned
    /// and the counter grows; without it the processor state is read-only.
    /// `buffer` is scratch space reused across calls; its prior contents are
    /// ignored. This operation never fails: malformed input produces no
    /// features.
    pub fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        total_features: Option<&mut FeatureId>,
        buffer: &mut String,
    ) {
        match self {
            Self::BrownClusters(p) => p.process_sentence(sentence),
            Self::CzechAddContainers(_) => {}
            Self::CzechLemmaTerm(p) => p.process_sentence(sentence, total_features, buffer),
            Self::Form(p) => p.process_sentence(sentence, total_features),
            Self::FormCapitalization(p) => p.process_sentence(sentence, total_features),
            Self::Gazetteers(p) => p.process_sentence(sentence, buffer),
            Self::Lemma(p) => p.process_sentence(sentence, total_features),
            Self::NumericTimeValue(p) => p.process_sentence(sentence, total_features),
            Self::PreviousStage(p) => p.process_sentence(sentence, total_features, buffer),
            Self::RawLemma(p) => p.process_sentence(sentence, total_features),
            Self::RawLemmaCapitalization(p) => p.process_sentence(sentence, total_features),
            Self::Tag(p) => p.process_sentence(sentence, total_features),
            Self::URLEmailDetector(p) => p.process_sentence(sentence),
        }
    }

    /// Post-process predicted entities.
    ///
    /// A no-op for every variant except `CzechAddContainers`. `buffer` is
    /// scratch space; its prior contents are ignored.
    pub fn process_entities(
        &self,
        sentence: &mut Sentence,
        entities: &mut Vec<NamedEntity>,
        buffer: &mut Vec<NamedEntity>,
    ) {
        if let Self::CzechAddContainers(p) = self {
            p.process_entities(sentence, entities, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 13] = [
        "BrownClusters",
        "CzechAddContainers",
        "CzechLemmaTerm",
        "Form",
        "FormCapitalization",
        "Gazetteers",
        "Lemma",
        "NumericTimeValue",
        "PreviousStage",
        "RawLemma",
        "RawLemmaCapitalization",
        "Tag",
        "URLEmailDetector",
    ];

    #[test]
    fn test_factory_covers_all_names() {
        for name in NAMES {
            let processor = FeatureProcessor::from_name(name)
                .unwrap_or_else(|| panic!("factory must know {name}"));
            assert_eq!(processor.name(), name);
        }
    }

    #[test]
    fn test_factory_rejects_unknown_and_miscased_names() {
        assert!(FeatureProcessor::from_name("Unknown").is_none());
        assert!(FeatureProcessor::from_name("form").is_none());
        assert!(FeatureProcessor::from_name("urlemaildetector").is_none());
        assert!(FeatureProcessor::from_name("").is_none());
    }

    #[test]
    fn test_lookup_allocates_whole_bands() {
        let mut base = ProcessorBase::default();
        base.parse(2);
        let mut total = 0;

        let first = base.lookup("one", Some(&mut total));
        assert_eq!(first, 2);
        assert_eq!(total, 5);

        let second = base.lookup("two", Some(&mut total));
        assert_eq!(second, 7);
        assert_eq!(total, 10);

        // Existing keys do not grow the counter.
        assert_eq!(base.lookup("one", Some(&mut total)), first);
        assert_eq!(total, 10);
    }

    #[test]
    fn test_lookup_empty_key_is_reserved() {
        let mut base = ProcessorBase::default();
        base.parse(3);
        let mut total = 0;
        assert_eq!(base.lookup("", Some(&mut total)), 3);
        assert_eq!(total, 0, "the empty key must never allocate");
        assert_eq!(base.empty_feature(), 3);
    }

    #[test]
    fn test_lookup_without_counter_is_read_only() {
        let mut base = ProcessorBase::default();
        base.parse(1);
        assert_eq!(base.lookup("new", None), FEATURE_UNKNOWN);
        assert_eq!(base.find("new"), None);
    }

    #[test]
    fn test_base_roundtrip_is_byte_identical() {
        let mut base = ProcessorBase::default();
        base.parse(2);
        let mut total = 100;
        base.lookup("alpha", Some(&mut total));
        base.lookup("beta", Some(&mut total));
        base.lookup("gamma", Some(&mut total));

        let mut first = Vec::new();
        base.save(&mut first).unwrap();

        let mut reloaded = ProcessorBase::default();
        reloaded.load(first.as_slice()).unwrap();
        let mut second = Vec::new();
        reloaded.save(&mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(reloaded.window(), 2);
        assert_eq!(reloaded.find("beta"), base.find("beta"));
    }
}
