//! Gazetteer phrase features with positional roles.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::window::apply_in_window;
use super::ProcessorBase;
use crate::error::{Error, Result};
use crate::sentence::{FeatureId, Sentence};

// Positional roles of a token within a match; each role shifts the base
// feature by a whole `2w+1` band.
const ROLE_G: u32 = 0;
const ROLE_U: u32 = 1;
const ROLE_B: u32 = 2;
const ROLE_L: u32 = 3;
const ROLE_I: u32 = 4;

/// Interned state of one gazetteer phrase or phrase prefix.
#[derive(Debug, Clone, Default)]
struct GazetteerInfo {
    /// Base feature of every file the full phrase appears in.
    features: Vec<FeatureId>,
    /// Whether some longer phrase extends this one.
    prefix_of_longer: bool,
}

/// Lemma-phrase gazetteer matching.
///
/// Every argument names one gazetteer file of space-separated phrases. All
/// phrases of one file share a single base feature; the file reserves one
/// `2w+1` band per positional role its longest phrase can exercise. The
/// base map stores phrase (and phrase prefix) to info index.
///
/// At inference, matches anchored at a token emit the generic role plus the
/// position-specific role for every covered token; overlapping matches from
/// different anchors all fire.
#[derive(Debug, Clone, Default)]
pub struct Gazetteers {
    pub(super) base: ProcessorBase,
    gazetteers_info: Vec<GazetteerInfo>,
}

impl Gazetteers {
    pub(super) fn parse(
        &mut self,
        window: u32,
        args: &[&str],
        total_features: &mut FeatureId,
    ) -> Result<()> {
        self.base.parse(window);
        self.gazetteers_info.clear();
        let span = 2 * window + 1;

        for arg in args {
            let path = Path::new(arg);
            let file = File::open(path).map_err(|source| Error::FileOpen {
                path: path.to_owned(),
                source,
            })?;

            let mut longest = 0;
            let mut phrase = String::new();
            for line in BufReader::new(file).lines() {
                let line = line?;
                let tokens: Vec<&str> = line.split(' ').filter(|token| !token.is_empty()).collect();
                longest = longest.max(tokens.len());

                phrase.clear();
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        phrase.push(' ');
                    }
                    phrase.push_str(token);

                    let index = self
                        .base
                        .get_or_insert(&phrase, self.gazetteers_info.len() as u32);
                    if index as usize == self.gazetteers_info.len() {
                        self.gazetteers_info.push(GazetteerInfo::default());
                    }
                    let info = &mut self.gazetteers_info[index as usize];
                    if i + 1 < tokens.len() {
                        info.prefix_of_longer = true;
                    } else {
                        let feature = *total_features + window;
                        if !info.features.contains(&feature) {
                            info.features.push(feature);
                        }
                    }
                }
            }

            // Role slots the file's longest phrase can exercise: none for an
            // empty file, G+U for unigrams, G+U+B+L for pairs, all five
            // beyond that.
            let slots = match longest {
                0 => 0,
                1 => ROLE_U + 1,
                2 => ROLE_L + 1,
                _ => ROLE_I + 1,
            };
            *total_features += span * slots;
            log::debug!(
                "loaded gazetteer {} with {} interned phrases",
                path.display(),
                self.gazetteers_info.len()
            );
        }
        Ok(())
    }

    pub(super) fn process_sentence(&mut self, sentence: &mut Sentence, buffer: &mut String) {
        let window = self.base.window();
        let span = 2 * window + 1;

        for i in 0..sentence.len() {
            let Some(index) = self.base.find(&sentence.words[i].raw_lemma) else {
                continue;
            };
            let Some(mut info) = self.gazetteers_info.get(index as usize) else {
                continue;
            };

            // Generic match G plus unigram role U at the anchor.
            for &feature in &info.features {
                apply_in_window(sentence, i as isize, feature + ROLE_G * span, window);
                apply_in_window(sentence, i as isize, feature + ROLE_U * span, window);
            }

            // Extend the phrase to the right as long as a longer entry may
            // match.
            let mut j = i + 1;
            while info.prefix_of_longer && j < sentence.len() {
                if j == i + 1 {
                    buffer.clear();
                    buffer.push_str(&sentence.words[i].raw_lemma);
                }
                buffer.push(' ');
                buffer.push_str(&sentence.words[j].raw_lemma);

                let Some(next) = self.base.find(buffer) else {
                    break;
                };
                let Some(next_info) = self.gazetteers_info.get(next as usize) else {
                    break;
                };
                info = next_info;

                for &feature in &info.features {
                    for g in i..=j {
                        let role = if g == i {
                            ROLE_B
                        } else if g == j {
                            ROLE_L
                        } else {
                            ROLE_I
                        };
                        apply_in_window(sentence, g as isize, feature + ROLE_G * span, window);
                        apply_in_window(sentence, g as isize, feature + role * span, window);
                    }
                }
                j += 1;
            }
        }
    }

    pub(super) fn save_payload<W: Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u32::<LittleEndian>(self.gazetteers_info.len() as u32)?;
        for info in &self.gazetteers_info {
            wtr.write_u8(u8::from(info.prefix_of_longer))?;
            wtr.write_u8(info.features.len() as u8)?;
            for &feature in &info.features {
                wtr.write_u32::<LittleEndian>(feature)?;
            }
        }
        Ok(())
    }

    pub(super) fn load_payload<R: Read>(&mut self, mut rdr: R) -> Result<()> {
        let count = rdr.read_u32::<LittleEndian>()?;
        self.gazetteers_info.clear();
        self.gazetteers_info.reserve(count as usize);
        for _ in 0..count {
            let prefix_of_longer = rdr.read_u8()? != 0;
            let size = rdr.read_u8()?;
            let mut features = Vec::with_capacity(size as usize);
            for _ in 0..size {
                features.push(rdr.read_u32::<LittleEndian>()?);
            }
            self.gazetteers_info.push(GazetteerInfo {
                features,
                prefix_of_longer,
            });
        }
        Ok(())
    }
}
