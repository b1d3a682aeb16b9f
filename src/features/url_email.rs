//! Deterministic URL/email seeding of local probabilities.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::ProcessorBase;
use crate::entity_map::EntityMap;
use crate::error::{Error, Result};
use crate::sentence::{Bilou, EntityTypeId, Sentence, ENTITY_TYPE_UNKNOWN};
use crate::url_detector::{self, UrlKind};

/// Writes a unit-confidence `U` label into the local probabilities of every
/// token the URL detector classifies, unless the token was already
/// determined.
///
/// The downstream classifier respects filled local distributions, so a
/// detected address bypasses statistical labeling entirely.
#[derive(Debug, Clone)]
pub struct UrlEmailDetector {
    pub(super) base: ProcessorBase,
    url: EntityTypeId,
    email: EntityTypeId,
}

impl Default for UrlEmailDetector {
    fn default() -> Self {
        Self {
            base: ProcessorBase::default(),
            url: ENTITY_TYPE_UNKNOWN,
            email: ENTITY_TYPE_UNKNOWN,
        }
    }
}

impl UrlEmailDetector {
    pub(super) fn parse(
        &mut self,
        window: u32,
        args: &[&str],
        entities: &mut EntityMap,
    ) -> Result<()> {
        self.base.parse(window);
        let &[url, email] = args else {
            return Err(Error::ConfigArity(format!(
                "URLEmailDetector requires exactly two arguments, the entity types for URL \
                 and email, got {}",
                args.len()
            )));
        };
        if url.is_empty() || email.is_empty() {
            return Err(Error::UnknownEntityType(format!("{url} / {email}")));
        }
        self.url = entities.id_or_insert(url);
        self.email = entities.id_or_insert(email);
        Ok(())
    }

    pub(super) fn process_sentence(&mut self, sentence: &mut Sentence) {
        for i in 0..sentence.len() {
            let Some(kind) = url_detector::detect(&sentence.words[i].form) else {
                continue;
            };
            if sentence.probabilities[i].local_filled {
                continue;
            }

            // The word is an address and not yet determined: force a unit U.
            let probabilities = &mut sentence.probabilities[i];
            for slot in &mut probabilities.local {
                slot.probability = 0.0;
                slot.entity = ENTITY_TYPE_UNKNOWN;
            }
            let unit = &mut probabilities.local[Bilou::Unit.index()];
            unit.probability = 1.0;
            unit.entity = match kind {
                UrlKind::Email => self.email,
                UrlKind::Url => self.url,
            };
            probabilities.local_filled = true;
        }
    }

    pub(super) fn save_payload<W: Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u32::<LittleEndian>(self.url)?;
        wtr.write_u32::<LittleEndian>(self.email)?;
        Ok(())
    }

    pub(super) fn load_payload<R: Read>(&mut self, mut rdr: R) -> Result<()> {
        self.url = rdr.read_u32::<LittleEndian>()?;
        self.email = rdr.read_u32::<LittleEndian>()?;
        Ok(())
    }
}
