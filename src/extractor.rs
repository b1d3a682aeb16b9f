//! Ordered registry of feature processors behind one facade.
//!
//! A [`FeatureExtractor`] owns the processors in registration order together
//! with the global feature-id counter. Registration order is the feature-id
//! assignment order, so it is part of the model and survives serialization
//! unchanged.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec;
use crate::entity_map::EntityMap;
use crate::error::{Error, Result};
use crate::features::FeatureProcessor;
use crate::sentence::{FeatureId, NamedEntity, Sentence};

/// The feature-extraction layer of a recognizer: an ordered set of
/// processors plus the global feature-id counter.
///
/// # Example
///
/// ```
/// use featex::{EntityMap, FeatureExtractor, Sentence, Word};
///
/// let mut entities = EntityMap::new();
/// let mut extractor = FeatureExtractor::new();
/// extractor.parse("Form 2\nFormCapitalization 2\n", &mut entities).unwrap();
///
/// let mut sentence = Sentence::new(vec![Word::from_form("Prague")]);
/// let mut buffer = String::new();
/// extractor.process_sentence(&mut sentence, true, &mut buffer);
/// assert!(!sentence.features[0].is_empty());
/// assert!(extractor.total_features() > 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    processors: Vec<FeatureProcessor>,
    total_features: FeatureId,
}

impl FeatureExtractor {
    /// Create an extractor with no processors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feature ids allocated so far.
    #[must_use]
    pub fn total_features(&self) -> FeatureId {
        self.total_features
    }

    /// Registered processors, in registration order.
    #[must_use]
    pub fn processors(&self) -> &[FeatureProcessor] {
        &self.processors
    }

    /// Register one processor from a `<Name> <window> <args…>` configuration
    /// line.
    ///
    /// # Errors
    ///
    /// Fails on an unknown processor name, an unparsable window, or any
    /// processor-specific configuration error.
    pub fn parse_line(&mut self, line: &str, entities: &mut EntityMap) -> Result<()> {
        let mut fields = line.split_whitespace();
        let Some(name) = fields.next() else {
            return Err(Error::ConfigArity(
                "empty feature processor specification".to_string(),
            ));
        };
        let window_arg = fields.next().ok_or_else(|| {
            Error::ConfigArity(format!("feature processor {name} is missing its window"))
        })?;
        let window: u32 = window_arg.parse().map_err(|_| Error::BadInteger {
            what: "feature processor window",
            value: window_arg.to_string(),
        })?;
        let args: Vec<&str> = fields.collect();

        let mut processor = FeatureProcessor::from_name(name)
            .ok_or_else(|| Error::UnknownProcessorName(name.to_string()))?;
        processor.parse(window, &args, entities, &mut self.total_features)?;
        self.processors.push(processor);
        Ok(())
    }

    /// Register processors from every non-blank line of a configuration
    /// block.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid line; earlier lines stay registered.
    pub fn parse(&mut self, config: &str, entities: &mut EntityMap) -> Result<()> {
        for line in config.lines() {
            if line.trim().is_empty() {
                continue;
            }
            self.parse_line(line, entities)?;
        }
        Ok(())
    }

    /// Run every processor over the sentence, appending features.
    ///
    /// With `allocate` set (training), unseen keys are interned and the
    /// feature-id counter grows; otherwise the pass is a pure read of
    /// processor state. `buffer` is scratch space reused across calls.
    pub fn process_sentence(&mut self, sentence: &mut Sentence, allocate: bool, buffer: &mut String) {
        let Self {
            processors,
            total_features,
        } = self;
        for processor in processors.iter_mut() {
            let total = allocate.then_some(&mut *total_features);
            processor.process_sentence(sentence, total, buffer);
        }
    }

    /// Run every processor's entity post-processing pass.
    ///
    /// `buffer` is scratch space reused across calls.
    pub fn process_entities(
        &self,
        sentence: &mut Sentence,
        entities: &mut Vec<NamedEntity>,
        buffer: &mut Vec<NamedEntity>,
    ) {
        for processor in &self.processors {
            processor.process_entities(sentence, entities, buffer);
        }
    }

    /// Serialize the feature-id counter and the processor list, each entry
    /// as name plus payload, in registration order.
    ///
    /// # Errors
    ///
    /// Propagates IO errors of the writer.
    pub fn save<W: Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u32::<LittleEndian>(self.total_features)?;
        wtr.write_u32::<LittleEndian>(self.processors.len() as u32)?;
        for processor in &self.processors {
            codec::write_str(&mut wtr, processor.name())?;
            processor.save(&mut wtr)?;
        }
        Ok(())
    }

    /// Deserialize an extractor written by [`Self::save`], reconstructing
    /// each processor through the factory.
    ///
    /// # Errors
    ///
    /// Fails on unknown processor names or decoder errors.
    pub fn load<R: Read>(mut rdr: R) -> Result<Self> {
        let total_features = rdr.read_u32::<LittleEndian>()?;
        let count = rdr.read_u32::<LittleEndian>()?;
        let mut processors = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = codec::read_str(&mut rdr)?;
            let mut processor = FeatureProcessor::from_name(&name)
                .ok_or(Error::UnknownProcessorName(name))?;
            processor.load(&mut rdr)?;
            processors.push(processor);
        }
        log::debug!(
            "loaded {} feature processors, {} features",
            processors.len(),
            total_features
        );
        Ok(Self {
            processors,
            total_features,
        })
    }
}
