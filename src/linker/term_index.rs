//! TermIndex: every searchable term mapped to the entities that use it.
//!
//! Built from a `Catalogs` snapshot in discovery order (characters, lore,
//! episodes; within a catalog, record order; within a record, name before
//! aliases). That order is kept per term and is what ties are broken on
//! later. A single Aho-Corasick automaton over all terms does the text
//! search.

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::catalog::{normalize_term, Catalogs, EntityRef};
use crate::linker::LinkerConfig;

pub struct TermIndex {
    /// Normalized terms in registration order (the automaton's pattern ids)
    terms: Vec<String>,
    /// Length of each term in characters
    term_chars: Vec<usize>,
    /// Entities registered under each term, in discovery order
    entities: Vec<Vec<EntityRef>>,
    lookup: HashMap<String, usize>,
    automaton: Option<AhoCorasick>,
    entity_count: usize,
}

impl TermIndex {
    pub fn build(catalogs: &Catalogs, config: &LinkerConfig) -> Self {
        let mut index = Self {
            terms: Vec::new(),
            term_chars: Vec::new(),
            entities: Vec::new(),
            lookup: HashMap::new(),
            automaton: None,
            entity_count: 0,
        };

        for (entity_ref, entity) in catalogs.iter() {
            if !entity.is_linkable() {
                continue;
            }
            index.entity_count += 1;

            for term in entity.search_terms() {
                let chars = term.chars().count();
                if chars < config.min_term_chars {
                    continue;
                }
                index.register(term, chars, entity_ref.clone());
            }
        }

        index.automaton = index.build_automaton();
        index
    }

    fn register(&mut self, term: String, chars: usize, entity_ref: EntityRef) {
        match self.lookup.get(&term) {
            Some(&idx) => self.entities[idx].push(entity_ref),
            None => {
                let idx = self.terms.len();
                self.lookup.insert(term.clone(), idx);
                self.terms.push(term);
                self.term_chars.push(chars);
                self.entities.push(vec![entity_ref]);
            }
        }
    }

    fn build_automaton(&self) -> Option<AhoCorasick> {
        if self.terms.is_empty() {
            return None;
        }

        // Standard semantics: the scanner needs every overlapping hit and
        // applies its own longest-first selection. Text is pre-folded, so
        // the automaton itself stays case-sensitive.
        match AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&self.terms)
        {
            Ok(automaton) => Some(automaton),
            Err(_e) => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::error_1(&format!(
                    "[TermIndex] Failed to build automaton over {} terms: {}",
                    self.terms.len(),
                    _e
                ).into());
                None
            }
        }
    }

    pub(crate) fn automaton(&self) -> Option<&AhoCorasick> {
        self.automaton.as_ref()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of linkable entities that contributed terms
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    pub fn term_chars(&self, idx: usize) -> usize {
        self.term_chars.get(idx).copied().unwrap_or(0)
    }

    pub fn entities_for(&self, idx: usize) -> &[EntityRef] {
        self.entities.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find a term's id; the input is normalized first
    pub fn lookup(&self, raw: &str) -> Option<usize> {
        let term = normalize_term(raw)?;
        self.lookup.get(&term).copied()
    }
}

// =============================================================================
// Tests
// =============================================================================
