//! Shifted-window feature emission.
//!
//! One logical feature at sentence position `i` contributes `2w+1` distinct
//! feature ids to a `±w` window around it, shifted by relative offset. Every
//! real feature id handed to these functions is the center of a reserved
//! `2w+1` band, so the shifted ids never leave that band.

use crate::sentence::{FeatureId, Sentence, FEATURE_UNKNOWN};

/// Append `feature + (p - i)` to every position `p` of `[i+left, i+right]`
/// clipped to the sentence.
///
/// `i` may lie outside the sentence; only the clipped positions are touched.
/// A [`FEATURE_UNKNOWN`] feature emits nothing.
pub fn apply_in_range(sentence: &mut Sentence, i: isize, feature: FeatureId, left: i32, right: i32) {
    if feature == FEATURE_UNKNOWN {
        return;
    }
    let size = sentence.len() as isize;
    let from = (i + left as isize).max(0);
    let to = (i + right as isize).min(size - 1);
    for p in from..=to {
        let shifted = (feature as i64 + (p - i) as i64) as FeatureId;
        sentence.features[p as usize].push(shifted);
    }
}

/// [`apply_in_range`] over the full `[-window, window]` range.
pub fn apply_in_window(sentence: &mut Sentence, i: isize, feature: FeatureId, window: u32) {
    apply_in_range(sentence, i, feature, -(window as i32), window as i32);
}

/// Emit `feature` centered on the virtual positions hanging off both
/// sentence edges (`-1..=-w` and `size-1+1..=size-1+w`).
///
/// Clipping makes the virtual centers touch only real edge tokens.
pub fn apply_outer_words_in_window(sentence: &mut Sentence, feature: FeatureId, window: u32) {
    if feature == FEATURE_UNKNOWN {
        return;
    }
    let size = sentence.len() as isize;
    for d in 1..=window as isize {
        apply_in_window(sentence, -d, feature, window);
        apply_in_window(sentence, size - 1 + d, feature, window);
    }
}
