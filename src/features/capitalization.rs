//! Capitalization-class features of the form and of the raw lemma.
//!
//! Three reserved keys: `"f"` (uppercase first codepoint), `"a"` (uppercase
//! letters only), `"m"` (both cases present). A capitalized word such as
//! `"Prague"` therefore carries both `f` and `m`.

use super::window::apply_in_window;
use super::ProcessorBase;
use crate::sentence::{FeatureId, Sentence, Word};

fn process(
    base: &mut ProcessorBase,
    sentence: &mut Sentence,
    mut total_features: Option<&mut FeatureId>,
    field: fn(&Word) -> &str,
) {
    let window = base.window();
    let first_cap = base.lookup("f", total_features.as_deref_mut());
    let all_cap = base.lookup("a", total_features.as_deref_mut());
    let mixed_cap = base.lookup("m", total_features.as_deref_mut());

    for i in 0..sentence.len() {
        let mut was_upper = false;
        let mut was_lower = false;
        let mut first_upper = false;

        for (index, chr) in field(&sentence.words[i]).chars().enumerate() {
            was_upper = was_upper || chr.is_uppercase();
            was_lower = was_lower || chr.is_lowercase();
            if index == 0 && was_upper {
                first_upper = true;
            }
        }

        if first_upper {
            apply_in_window(sentence, i as isize, first_cap, window);
        }
        if was_upper && !was_lower {
            apply_in_window(sentence, i as isize, all_cap, window);
        }
        if was_upper && was_lower {
            apply_in_window(sentence, i as isize, mixed_cap, window);
        }
    }
}

/// Capitalization classes of the surface form.
#[derive(Debug, Clone, Default)]
pub struct FormCapitalization {
    pub(super) base: ProcessorBase,
}

impl FormCapitalization {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        total_features: Option<&mut FeatureId>,
    ) {
        process(&mut self.base, sentence, total_features, |word| &word.form);
    }
}

/// Capitalization classes of the surface lemma.
#[derive(Debug, Clone, Default)]
pub struct RawLemmaCapitalization {
    pub(super) base: ProcessorBase,
}

impl RawLemmaCapitalization {
    pub(super) fn process_sentence(
        &mut self,
        sentence: &mut Sentence,
        total_features: Option<&mut FeatureId>,
    ) {
        process(&mut self.base, sentence, total_features, |word| {
            &word.raw_lemma
        });
    }
}
