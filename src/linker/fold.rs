//! Case-folded view of a text with a byte map back to the original.
//!
//! Lowercasing can change byte lengths ('İ' becomes two chars, 'ẞ' shrinks
//! in UTF-8 width, ...), so offsets found in the folded text have to be
//! translated. Only offsets that fall on the start of some original
//! character's expansion (or the very end) translate; anything else is a
//! match that splits a character and is dropped.

use crate::catalog::fold_case;

pub struct FoldedText {
    folded: String,
    /// For each folded byte offset (plus one past the end): the original
    /// byte offset when it begins an original character's expansion
    origin: Vec<Option<usize>>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        // Fast path: ASCII folds byte for byte
        if text.is_ascii() {
            return Self {
                folded: text.to_ascii_lowercase(),
                origin: (0..=text.len()).map(Some).collect(),
            };
        }

        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len() + 1);

        for (offset, ch) in text.char_indices() {
            origin.push(Some(offset));
            folded.extend(ch.to_lowercase());
            origin.resize(folded.len(), None);
        }
        origin.push(Some(text.len()));

        debug_assert_eq!(folded, fold_case(text));
        Self { folded, origin }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Translate a folded `[start, end)` range to original byte offsets
    pub fn to_original(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let start = self.origin.get(start).copied().flatten()?;
        let end = self.origin.get(end).copied().flatten()?;
        Some((start, end))
    }
}
