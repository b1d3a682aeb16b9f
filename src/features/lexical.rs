//! Lookup-only processors over single word fields, plus the Czech lemma
//! semantic-class markers.
//!
//! `Form`, `Lemma`, `RawLemma` and `Tag` intern one field of every word and
//! emit it in the window; the reserved empty-string feature marks the
//! virtual words hanging off both sentence edges. `CzechLemmaTerm` scans
//! lemma comments for `_;X` markers and emits the class character `X`.

use super::window::{apply_in_window, apply_outer_words_in_window};
use super::ProcessorBase;
use crate::sentence::{FeatureId, Sentence};

/// Surface-form feature.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub(super) base: ProcessorBase,
}

impl Form {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let feature = self
                .base
                .lookup(&sentence.words[i].form, total_features.as_deref_mut());
            apply_in_window(sentence, i as isize, feature, window);
        }
        apply_outer_words_in_window(sentence, self.base.empty_feature(), window);
    }
}

/// Canonical lemma id feature.
#[derive(Debug, Clone, Default)]
pub struct Lemma {
    pub(super) base: ProcessorBase,
}

impl Lemma {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let feature = self
                .base
                .lookup(&sentence.words[i].lemma_id, total_features.as_deref_mut());
            apply_in_window(sentence, i as isize, feature, window);
        }
        apply_outer_words_in_window(sentence, self.base.empty_feature(), window);
    }
}

/// Surface-lemma feature.
#[derive(Debug, Clone, Default)]
pub struct RawLemma {
    pub(super) base: ProcessorBase,
}

impl RawLemma {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let feature = self
                .base
                .lookup(&sentence.words[i].raw_lemma, total_features.as_deref_mut());
            apply_in_window(sentence, i as isize, feature, window);
        }
        apply_outer_words_in_window(sentence, self.base.empty_feature(), window);
    }
}

/// Morphological tag feature.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    pub(super) base: ProcessorBase,
}

impl Tag {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let feature = self
                .base
                .lookup(&sentence.words[i].tag, total_features.as_deref_mut());
            apply_in_window(sentence, i as isize, feature, window);
        }
        apply_outer_words_in_window(sentence, self.base.empty_feature(), window);
    }
}

/// Czech lemma semantic-class feature.
///
/// Every `_;` occurrence in a word's lemma comments is followed by a
/// one-character semantic class, which is interned and emitted in the
/// window.
#[derive(Debug, Clone, Default)]
pub struct CzechLemmaTerm {
    pub(super) base: ProcessorBase,
}

impl CzechLemmaTerm {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
        buffer: &mut String,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            buffer.clear();
            buffer.push_str(&sentence.words[i].lemma_comments);
            for (pos, _) in buffer.match_indices("_;") {
                let Some(class) = buffer[pos + 2..].chars().next() else {
                    continue;
                };
                let mut key = [0u8; 4];
                let feature = self
                    .base
                    .lookup(class.encode_utf8(&mut key), total_features.as_deref_mut());
                apply_in_window(sentence, i as isize, feature, window);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Word;

    fn run_form(sentence: &mut Sentence, window: u32) -> (Form, FeatureId) {
        let mut processor = Form::default();
        processor.base.parse(window);
        let mut total = 0;
        processor.process_sentence(sentence, Some(&mut total));
        (processor, total)
    }

    #[test]
    fn test_form_empty_sentence() {
        let mut sentence = Sentence::new(Vec::new());
        let (_, total) = run_form(&mut sentence, 2);
        assert_eq!(total, 0);
        assert!(sentence.features.is_empty());
    }

    #[test]
    fn test_form_interns_each_distinct_form_once() {
        let mut sentence = Sentence::new(vec![
            Word::from_form("a"),
            Word::from_form("b"),
            Word::from_form("a"),
        ]);
        let (processor, total) = run_form(&mut sentence, 0);
        // Window 0: two distinct forms, one id each.
        assert_eq!(total, 2);
        assert_eq!(sentence.features[0], sentence.features[2]);
        assert_ne!(sentence.features[0], sentence.features[1]);
        assert_eq!(processor.base.find("a"), Some(0));
        assert_eq!(processor.base.find("b"), Some(1));
    }

    #[test]
    fn test_form_emits_outer_words_at_edges() {
        let mut sentence = Sentence::new(vec![Word::from_form("solo")]);
        let (_, total) = run_form(&mut sentence, 1);
        assert_eq!(total, 3);
        // "solo" (center 1) plus both virtual neighbors of the empty key
        // (center 1, shifted by ±1).
        assert_eq!(sentence.features[0], vec![1, 2, 0]);
    }

    #[test]
    fn test_czech_lemma_term_scans_all_markers() {
        let mut word = Word::from_form("Praha");
        word.lemma_comments = "_;G_;K trailing_;".to_string();
        let mut sentence = Sentence::new(vec![word]);

        let mut processor = CzechLemmaTerm::default();
        processor.base.parse(0);
        let mut total = 0;
        let mut buffer = String::new();
        processor.process_sentence(&mut sentence, Some(&mut total), &mut buffer);

        // "G" and "K" interned; the final "_;" has no following character.
        assert_eq!(total, 2);
        assert_eq!(processor.base.find("G"), Some(0));
        assert_eq!(processor.base.find("K"), Some(1));
        assert_eq!(sentence.features[0], vec![0, 1]);
    }

    #[test]
    fn test_czech_lemma_term_without_markers_is_silent() {
        let mut word = Word::from_form("a");
        word.lemma_comments = "plain comment".to_string();
        let mut sentence = Sentence::new(vec![word]);

        let mut processor = CzechLemmaTerm::default();
        processor.base.parse(2);
        let mut total = 0;
        let mut buffer = String::new();
        processor.process_sentence(&mut sentence, Some(&mut total), &mut buffer);

        assert_eq!(total, 0);
        assert!(sentence.features[0].is_empty());
    }
}
