//! Brown cluster features.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::window::apply_in_window;
use super::ProcessorBase;
use crate::error::{Error, Result};
use crate::sentence::{FeatureId, Sentence};

/// Cluster-membership features of the raw lemma.
///
/// The cluster file is TSV with one `<cluster_bits>\t<form>` line per form.
/// Each cluster carries one feature per requested prefix length of its bit
/// string, plus an implicit whole-string entry; forms sharing a prefix share
/// the interned prefix feature. The base map stores form to cluster id.
#[derive(Debug, Clone, Default)]
pub struct BrownClusters {
    pub(super) base: ProcessorBase,
    clusters: Vec<Vec<FeatureId>>,
}

impl BrownClusters {
    pub(super) fn parse(
        &mut self,
        window: u32,
        args: &[&str],
        total_features: &mut FeatureId,
    ) -> Result<()> {
        self.base.parse(window);
        let Some(&path) = args.first() else {
            return Err(Error::ConfigArity(
                "BrownClusters requires a cluster file as the first argument".to_string(),
            ));
        };
        let path = Path::new(path);

        // Prefix lengths; `None` is the implicit whole-string entry.
        let mut substrings: Vec<Option<usize>> = vec![None];
        for arg in &args[1..] {
            let length: usize = arg.parse().map_err(|_| Error::BadInteger {
                what: "BrownClusters prefix length",
                value: (*arg).to_string(),
            })?;
            if length == 0 {
                return Err(Error::BadInteger {
                    what: "BrownClusters prefix length",
                    value: (*arg).to_string(),
                });
            }
            substrings.push(Some(length));
        }

        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_owned(),
            source,
        })?;

        self.clusters.clear();
        let mut cluster_ids: HashMap<String, u32> = HashMap::new();
        // Cluster bits are arbitrary bytes; prefixes are sliced bytewise.
        let mut prefixes: HashMap<Vec<u8>, FeatureId> = HashMap::new();
        let span = 2 * window + 1;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let mut fields = line.split('\t');
            let (Some(cluster), Some(form), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::FileFormat {
                    path: path.to_owned(),
                    line: index + 1,
                    message: format!("expected '<cluster>\\t<form>', got '{line}'"),
                });
            };

            let cluster_id = match cluster_ids.get(cluster) {
                Some(&id) => id,
                None => {
                    let id = self.clusters.len() as u32;
                    let mut features = Vec::new();
                    for &substring in &substrings {
                        let prefix: &[u8] = match substring {
                            None => cluster.as_bytes(),
                            Some(length) if length < cluster.len() => {
                                &cluster.as_bytes()[..length]
                            }
                            // Requested length reaches past the cluster bits:
                            // covered by the whole-string entry.
                            Some(_) => continue,
                        };
                        let fresh = *total_features + span * prefixes.len() as u32 + window;
                        let feature = *prefixes.entry(prefix.to_vec()).or_insert(fresh);
                        features.push(feature);
                    }
                    self.clusters.push(features);
                    cluster_ids.insert(cluster.to_string(), id);
                    id
                }
            };

            if !self.base.try_insert(form, cluster_id) {
                return Err(Error::DuplicateKey {
                    path: path.to_owned(),
                    form: form.to_string(),
                });
            }
        }

        *total_features += span * prefixes.len() as u32;
        log::debug!(
            "loaded {} Brown clusters with {} prefix features from {}",
            self.clusters.len(),
            prefixes.len(),
            path.display()
        );
        Ok(())
    }

    pub(super) fn process_sentence(&mut self, sentence: &mut Sentence) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let Some(cluster_id) = self.base.find(&sentence.words[i].raw_lemma) else {
                continue;
            };
            let Some(cluster) = self.clusters.get(cluster_id as usize) else {
                continue;
            };
            for &feature in cluster {
                apply_in_window(sentence, i as isize, feature, window);
            }
        }
    }

    pub(super) fn save_payload<W: Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u32::<LittleEndian>(self.clusters.len() as u32)?;
        for cluster in &self.clusters {
            wtr.write_u32::<LittleEndian>(cluster.len() as u32)?;
            for &feature in cluster {
                wtr.write_u32::<LittleEndian>(feature)?;
            }
        }
        Ok(())
    }

    pub(super) fn load_payload<R: Read>(&mut self, mut rdr: R) -> Result<()> {
        let count = rdr.read_u32::<LittleEndian>()?;
        self.clusters.clear();
        self.clusters.reserve(count as usize);
        for _ in 0..count {
            let size = rdr.read_u32::<LittleEndian>()?;
            let mut cluster = Vec::with_capacity(size as usize);
            for _ in 0..size {
                cluster.push(rdr.read_u32::<LittleEndian>()?);
            }
            self.clusters.push(cluster);
        }
        Ok(())
    }
}
