//! Conflict resolver: decides how one span is rendered.
//!
//! # Rules
//! 1. Resolve the span's entity refs against the snapshot; refs that no
//!    longer resolve are dropped.
//! 2. Deduplicate by target url, first discovery wins.
//! 3. One survivor: direct link.
//! 4. Several survivors: if exactly one is a character whose full name
//!    equals the matched text (case-insensitively), link to it.
//! 5. Otherwise: disambiguation over all survivors in discovery order.
//!
//! No survivors at all renders as plain text.

use std::collections::HashSet;

use crate::catalog::{fold_case, Catalogs, Entity, EntityCategory};
use crate::linker::{LinkerConfig, Span};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision<'c> {
    DirectLink(&'c Entity),
    Disambiguation,
    Plain,
}

impl Decision<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::DirectLink(_) => "direct-link",
            Decision::Disambiguation => "disambiguation",
            Decision::Plain => "plain",
        }
    }
}

/// The resolved outcome for one span
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict<'c> {
    /// Distinct-url candidates in discovery order
    pub candidates: Vec<&'c Entity>,
    pub decision: Decision<'c>,
}

pub fn resolve<'c>(span: &Span, catalogs: &'c Catalogs, config: &LinkerConfig) -> Conflict<'c> {
    let candidates = dedupe_by_url(span.entities.iter().filter_map(|r| catalogs.get(r)));

    let decision = match candidates.as_slice() {
        [] => Decision::Plain,
        [only] => Decision::DirectLink(*only),
        many => {
            let exact = if config.character_priority {
                exact_character(many, &span.original_text)
            } else {
                None
            };
            match exact {
                Some(character) => Decision::DirectLink(character),
                None if config.disambiguation => Decision::Disambiguation,
                None => Decision::Plain,
            }
        }
    };

    Conflict {
        candidates,
        decision,
    }
}

fn dedupe_by_url<'c>(entities: impl Iterator<Item = &'c Entity>) -> Vec<&'c Entity> {
    let mut seen: HashSet<&'c str> = HashSet::new();
    let mut unique = Vec::new();
    for entity in entities {
        if seen.insert(entity.target_url.trim()) {
            unique.push(entity);
        }
    }
    unique
}

/// The single character named exactly `matched`, if there is exactly one
fn exact_character<'c>(candidates: &[&'c Entity], matched: &str) -> Option<&'c Entity> {
    let matched = fold_case(matched.trim());
    let mut exact = candidates.iter().filter(|entity| {
        entity.category == EntityCategory::Character
            && fold_case(entity.display_name.trim()) == matched
    });

    match (exact.next(), exact.next()) {
        (Some(character), None) => Some(*character),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
