//! Candidate scanner: finds the mentions that will become spans.
//!
//! 1. One Aho-Corasick pass over the folded text collects every hit of
//!    every term, overlapping hits included.
//! 2. Hits that are not whole terms ("king" in "kingdom") are dropped.
//! 3. Terms are visited longest first; each hit is accepted only if it
//!    shares no character with an already accepted span.
//!
//! Longer terms therefore claim their region before any shorter term can
//! fragment or nest inside it: "Misery of Goblins" wins over "Misery".

use std::cmp::Reverse;
use std::collections::BTreeMap;

use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

use crate::catalog::EntityRef;
use crate::linker::fold::FoldedText;
use crate::linker::TermIndex;

/// An accepted mention
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Byte offset into the original text (inclusive)
    pub start: usize,
    /// Byte offset into the original text (exclusive)
    pub end: usize,
    /// The matched text with its original casing
    pub original_text: String,
    /// The normalized term that produced the match
    pub term: String,
    /// Every entity registered under the term, in discovery order
    pub entities: Vec<EntityRef>,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Accepted ranges keyed by start; pairwise disjoint by construction
#[derive(Default)]
struct Claims {
    ranges: BTreeMap<usize, usize>,
}

impl Claims {
    /// Claim `[start, end)` unless it intersects an existing claim
    fn try_claim(&mut self, start: usize, end: usize) -> bool {
        // Claims are disjoint, so the last claim starting before `end` is
        // the only one that can reach into the new range
        if let Some((_, &claimed_end)) = self.ranges.range(..end).next_back() {
            if claimed_end > start {
                return false;
            }
        }
        self.ranges.insert(start, end);
        true
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_grapheme(g: &str) -> bool {
    g.chars().any(is_word_char)
}

fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(false)
}

/// True when the range starts and ends on grapheme boundaries and is not
/// glued to a word on either side. A trailing combining mark ("Cafe" +
/// U+0301) makes the range part of a longer word.
fn is_whole_term(text: &str, start: usize, end: usize) -> bool {
    if !is_grapheme_boundary(text, start) || !is_grapheme_boundary(text, end) {
        return false;
    }
    let before = text[..start].graphemes(true).next_back();
    let after = text[end..].graphemes(true).next();
    !before.is_some_and(is_word_grapheme) && !after.is_some_and(is_word_grapheme)
}

/// Scan `text` for the index's terms. Spans come back sorted by start.
pub fn scan(text: &str, index: &TermIndex) -> Vec<Span> {
    let automaton = match index.automaton() {
        Some(a) => a,
        None => return vec![],
    };

    if text.is_empty() {
        return vec![];
    }

    let folded = FoldedText::new(text);

    // Whole-term hits per term id
    let mut hits: Vec<Vec<(usize, usize)>> = vec![Vec::new(); index.term_count()];
    for mat in automaton.find_overlapping_iter(folded.as_str()) {
        let (start, end) = match folded.to_original(mat.start(), mat.end()) {
            Some(range) => range,
            None => continue,
        };
        if !is_whole_term(text, start, end) {
            continue;
        }
        if let Some(term_hits) = hits.get_mut(mat.pattern().as_usize()) {
            term_hits.push((start, end));
        }
    }

    // Longest first; the sort is stable so equal lengths keep registration order
    let mut order: Vec<usize> = (0..hits.len()).filter(|&i| !hits[i].is_empty()).collect();
    order.sort_by_key(|&i| Reverse(index.term_chars(i)));

    let mut claims = Claims::default();
    let mut spans: Vec<Span> = Vec::new();

    for term_id in order {
        let term_hits = &mut hits[term_id];
        term_hits.sort_unstable();

        for &(start, end) in term_hits.iter() {
            if !claims.try_claim(start, end) {
                continue;
            }
            spans.push(Span {
                start,
                end,
                original_text: text[start..end].to_string(),
                term: index.term(term_id).unwrap_or_default().to_string(),
                entities: index.entities_for(term_id).to_vec(),
            });
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalogs, Entity, EntityCategory};
    use crate::linker::LinkerConfig;

    fn lore(id: &str, name: &str) -> Entity {
        Entity::new(id, EntityCategory::Lore, name, &format!("/lore/{}", id))
    }

    fn scan_lore(entities: Vec<Entity>, text: &str) -> Vec<Span> {
        let catalogs = Catalogs::new(vec![], entities, vec![]);
        let index = TermIndex::build(&catalogs, &LinkerConfig::default());
        scan(text, &index)
    }

    fn texts(spans: &[Span]) -> Vec<&str> {
        spans.iter().map(|s| s.original_text.as_str()).collect()
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Longest term claims its region first
    // -------------------------------------------------------------------------
    #[test]
    fn test_longest_match_wins() {
        let spans = scan_lore(
            vec![lore("misery", "Misery"), lore("mog", "Misery of Goblins"), lore("goblins", "Goblins")],
            "a Misery of Goblins gathers",
        );

        assert_eq!(texts(&spans), vec!["Misery of Goblins"]);
        assert_eq!((spans[0].start, spans[0].end), (2, 19));
        assert_eq!(spans[0].entities[0].id, "mog");
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Shorter terms still match outside claimed regions
    // -------------------------------------------------------------------------
    #[test]
    fn test_shorter_term_outside_claim() {
        let spans = scan_lore(
            vec![lore("misery", "Misery"), lore("mog", "Misery of Goblins")],
            "Misery loves a Misery of Goblins. MISERY!",
        );

        assert_eq!(texts(&spans), vec!["Misery", "Misery of Goblins", "MISERY"]);
        assert_eq!(spans[0].term, "misery");
        assert_eq!(spans[2].term, "misery");
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Partial-word hits never qualify
    // -------------------------------------------------------------------------
    #[test]
    fn test_whole_term_only() {
        let spans = scan_lore(
            vec![lore("king", "King")],
            "The kingdom of the king_ has a King. Kings? king-maker",
        );

        assert_eq!(texts(&spans), vec!["King", "king"]);
        assert_eq!(spans[0].start, 31);
        assert_eq!(spans[1].start, 44);
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Partial overlaps between equal-rank terms
    // -------------------------------------------------------------------------
    #[test]
    fn test_crossing_terms_do_not_overlap() {
        // "goblin king" and "king arthur" cross on "king"
        let spans = scan_lore(
            vec![lore("gk", "Goblin King"), lore("ka", "King Arthur")],
            "the Goblin King Arthur legend",
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].original_text, "Goblin King");
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Strict substring of a claimed span stays unclaimed
    // -------------------------------------------------------------------------
    #[test]
    fn test_alias_inside_claimed_span() {
        let spans = scan_lore(
            vec![lore("gk", "Goblin King"), lore("king", "King")],
            "Goblin King",
        );
        assert_eq!(texts(&spans), vec!["Goblin King"]);
    }

    // -------------------------------------------------------------------------
    // Requirement 6: Case-insensitive, casing preserved, Unicode aware
    // -------------------------------------------------------------------------
    #[test]
    fn test_case_insensitive_unicode() {
        let spans = scan_lore(
            vec![lore("eclair", "Éclair Grove")],
            "Into the ÉCLAIR GROVE and the éclair grove.",
        );

        assert_eq!(texts(&spans), vec!["ÉCLAIR GROVE", "éclair grove"]);
        for span in &spans {
            assert_eq!(span.term, "éclair grove");
        }
    }

    #[test]
    fn test_unicode_word_boundary() {
        let spans = scan_lore(vec![lore("ice", "Ice")], "Iceé ice éice ice");
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.original_text == "ice"));
    }

    // -------------------------------------------------------------------------
    // Requirement 7: Self-overlapping occurrences of one term
    // -------------------------------------------------------------------------
    #[test]
    fn test_repeated_term_no_self_overlap() {
        let spans = scan_lore(vec![lore("ha", "ha ha")], "ha ha ha");
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (0, 5));
    }

    #[test]
    fn test_empty_text_and_empty_index() {
        assert!(scan_lore(vec![lore("ice", "Ice")], "").is_empty());
        assert!(scan_lore(vec![], "Ice everywhere").is_empty());
    }

    #[test]
    fn test_spans_sorted_and_disjoint() {
        let spans = scan_lore(
            vec![lore("a", "Ice"), lore("b", "Ice Fortress"), lore("c", "Fortress of Ice")],
            "Ice Fortress of Ice, the Fortress of Ice, Ice.",
        );

        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(!pair[0].overlaps(&pair[1]));
        }
        // "Fortress of Ice" is longest and claims both of its hits first, which
        // knocks out the crossing "Ice Fortress"
        assert_eq!(texts(&spans), vec!["Ice", "Fortress of Ice", "Fortress of Ice", "Ice"]);
    }

    #[test]
    fn test_whole_term_respects_graphemes() {
        let text = "Cafe\u{301} and Cafe";
        assert!(!is_whole_term(text, 0, 4));
        assert!(is_whole_term(text, 0, 6));
        assert!(is_whole_term(text, 11, 15));
        assert!(!is_whole_term("kingdom", 0, 4));
    }

    #[test]
    fn test_claims() {
        let mut claims = Claims::default();
        assert!(claims.try_claim(5, 10));
        assert!(!claims.try_claim(9, 12));
        assert!(!claims.try_claim(0, 6));
        assert!(!claims.try_claim(6, 8));
        assert!(claims.try_claim(10, 12));
        assert!(claims.try_claim(0, 5));
    }
}
