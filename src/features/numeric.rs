//! Numeric value and clock-time heuristics.

use super::window::apply_in_window;
use super::ProcessorBase;
use crate::sentence::{FeatureId, Sentence};

/// Emits hour/minute/day/month/year features for all-digit tokens and a
/// time feature for `HH:MM`/`HH.MM` shaped tokens.
///
/// The six features are reserved under the single-character keys
/// `"H" "M" "t" "d" "m" "y"`.
#[derive(Debug, Clone, Default)]
pub struct NumericTimeValue {
    pub(super) base: ProcessorBase,
}

/// Leading ASCII digit run of `bytes` starting at `pos`.
///
/// Returns the value accumulated with wrapping arithmetic, whether at least
/// one digit was consumed, and the position after the run.
fn digit_run(bytes: &[u8], mut pos: usize) -> (u32, bool, usize) {
    let mut value: u32 = 0;
    let mut any = false;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        any = true;
        value = value.wrapping_mul(10).wrapping_add(u32::from(bytes[pos] - b'0'));
        pos += 1;
    }
    (value, any, pos)
}

impl NumericTimeValue {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        mut total_features: Option<&mut FeatureId>,
    ) {
        let window = self.base.window();
        let hour = self.base.lookup("H", total_features.as_deref_mut());
        let minute = self.base.lookup("M", total_features.as_deref_mut());
        let time = self.base.lookup("t", total_features.as_deref_mut());
        let day = self.base.lookup("d", total_features.as_deref_mut());
        let month = self.base.lookup("m", total_features.as_deref_mut());
        let year = self.base.lookup("y", total_features.as_deref_mut());

        for i in 0..sentence.len() {
            let bytes = sentence.words[i].form.clone().into_bytes();
            let bytes = bytes.as_slice();
            let (num, digit, pos) = digit_run(bytes, 0);

            if digit && pos == bytes.len() {
                // The whole token is a number.
                if num < 24 {
                    apply_in_window(sentence, i as isize, hour, window);
                }
                if num < 60 {
                    apply_in_window(sentence, i as isize, minute, window);
                }
                if (1..=31).contains(&num) {
                    apply_in_window(sentence, i as isize, day, window);
                }
                if (1..=12).contains(&num) {
                    apply_in_window(sentence, i as isize, month, window);
                }
                if (1000..=2200).contains(&num) {
                    apply_in_window(sentence, i as isize, year, window);
                }
            }
            if digit && num < 24 && pos < bytes.len() && (bytes[pos] == b'.' || bytes[pos] == b':') {
                // Maybe a clock time.
                let (minutes, digit, pos) = digit_run(bytes, pos + 1);
                if digit && pos == bytes.len() && minutes < 60 {
                    apply_in_window(sentence, i as isize, time, window);
                }
            }
        }
    }
}
