//! Features from the previous recognizer stage.

use super::window::apply_in_range;
use super::ProcessorBase;
use crate::sentence::{FeatureId, Sentence};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `value` in the key encoding: optional `-` sign, then hex nibbles
/// from least to most significant. Zero appends nothing.
fn append_encoded(buffer: &mut String, mut value: i32) {
    if value < 0 {
        buffer.push('-');
        value = value.wrapping_neg();
    }
    while value != 0 {
        buffer.push(HEX[(value & 0xF) as usize] as char);
        value >>= 4;
    }
}

/// Emits the `(bilou, entity)` outcome of the previous stage to the tokens
/// on the right.
///
/// The range is forward-only (`[1, w]`): the predictor runs left to right,
/// so its outcome at `i` may only influence later positions.
#[derive(Debug, Clone, Default)]
pub struct PreviousStage {
    pub(super) base: ProcessorBase,
}

impl PreviousStage {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
        buffer: &mut String,
    ) {
        let window = self.base.window();
        for i in 0..sentence.len() {
            let stage = sentence.previous_stage[i];
            let Some(bilou) = stage.bilou else {
                continue;
            };
            buffer.clear();
            append_encoded(buffer, bilou as i32);
            buffer.push(' ');
            append_encoded(buffer, stage.entity as i32);
            let feature = self.base.lookup(buffer, total_features.as_deref_mut());
            apply_in_range(sentence, i as isize, feature, 1, window as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::{Bilou, Word};

    #[test]
    fn test_encoding_is_sign_plus_low_nibble_first() {
        let mut buffer = String::new();
        append_encoded(&mut buffer, 3);
        assert_eq!(buffer, "3");

        buffer.clear();
        append_encoded(&mut buffer, 26);
        assert_eq!(buffer, "a1");

        buffer.clear();
        append_encoded(&mut buffer, -1);
        assert_eq!(buffer, "-1");

        buffer.clear();
        append_encoded(&mut buffer, 0);
        assert_eq!(buffer, "");
    }

    #[test]
    fn test_emits_forward_only() {
        let mut sentence =
            Sentence::new((0..5).map(|i| Word::from_form(format!("w{i}"))).collect());
        sentence.previous_stage[2].bilou = Some(Bilou::Begin);
        sentence.previous_stage[2].entity = 3;

        let mut processor = PreviousStage::default();
        processor.base.parse(2);
        let mut total = 0;
        let mut buffer = String::new();
        processor.process_sentence(&mut sentence, Some(&mut total), &mut buffer);

        assert_eq!(total, 5);
        let center = processor.base.find(" 3").unwrap();
        assert!(sentence.features[0].is_empty());
        assert!(sentence.features[1].is_empty());
        assert!(sentence.features[2].is_empty());
        assert_eq!(sentence.features[3], vec![center + 1]);
        assert_eq!(sentence.features[4], vec![center + 2]);
    }

    #[test]
    fn test_unknown_stage_emits_nothing() {
        let mut sentence = Sentence::new(vec![Word::from_form("a"), Word::from_form("b")]);
        let mut processor = PreviousStage::default();
        processor.base.parse(2);
        let mut total = 0;
        let mut buffer = String::new();
        processor.process_sentence(&mut sentence, Some(&mut total), &mut buffer);

        assert_eq!(total, 0);
        assert!(sentence.features.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_scratch_buffer_contents_are_ignored() {
        let mut sentence = Sentence::new(vec![Word::from_form("a"), Word::from_form("b")]);
        sentence.previous_stage[0].bilou = Some(Bilou::Unit);
        sentence.previous_stage[0].entity = 1;

        let mut processor = PreviousStage::default();
        processor.base.parse(1);
        let mut total = 0;
        let mut buffer = String::from("stale junk");
        processor.process_sentence(&mut sentence, Some(&mut total), &mut buffer);

        // Unit = 4, entity 1.
        assert!(processor.base.find("4 1").is_some());
    }
}
