//! Annotation entry points.
//!
//! `annotate` is the whole pipeline in one call: index the catalogs, scan,
//! resolve, render. It never fails; any inconsistency degrades to leaving
//! the affected text as it was.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProvider, Catalogs};
use crate::linker::{render, resolve, scan, Conflict, LinkerConfig, Span, TermIndex};

// =============================================================================
// Types
// =============================================================================

/// Counters for one annotation call
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnnotationStats {
    pub terms_indexed: usize,
    pub entities_indexed: usize,
    pub spans: usize,
    pub links: usize,
    pub disambiguations: usize,
    pub self_links_suppressed: usize,
    pub plain: usize,
    pub total_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Annotation {
    pub html: String,
    pub stats: AnnotationStats,
}

// =============================================================================
// Free functions
// =============================================================================

/// Annotate `text` against `catalogs` with the default configuration
pub fn annotate(text: &str, catalogs: &Catalogs, current_page_url: Option<&str>) -> String {
    annotate_with(text, catalogs, current_page_url, &LinkerConfig::default())
}

pub fn annotate_with(
    text: &str,
    catalogs: &Catalogs,
    current_page_url: Option<&str>,
    config: &LinkerConfig,
) -> String {
    annotate_detailed(text, catalogs, current_page_url, config).html
}

pub fn annotate_detailed(
    text: &str,
    catalogs: &Catalogs,
    current_page_url: Option<&str>,
    config: &LinkerConfig,
) -> Annotation {
    if text.is_empty() {
        return Annotation::default();
    }
    let index = TermIndex::build(catalogs, config);
    annotate_indexed(text, &index, catalogs, current_page_url, config)
}

/// Annotate several fields of one page (summary, lyrics, ...) over a
/// single index build
pub fn annotate_many(
    texts: &[&str],
    catalogs: &Catalogs,
    current_page_url: Option<&str>,
    config: &LinkerConfig,
) -> Vec<String> {
    let index = TermIndex::build(catalogs, config);
    texts
        .iter()
        .map(|text| annotate_indexed(text, &index, catalogs, current_page_url, config).html)
        .collect()
}

/// Annotate against a prebuilt index. `index` must have been built from
/// `catalogs`; entries that no longer resolve render as plain text.
pub fn annotate_indexed(
    text: &str,
    index: &TermIndex,
    catalogs: &Catalogs,
    current_page_url: Option<&str>,
    config: &LinkerConfig,
) -> Annotation {
    let started = instant::Instant::now();

    let mut stats = AnnotationStats {
        terms_indexed: index.term_count(),
        entities_indexed: index.entity_count(),
        ..AnnotationStats::default()
    };

    if text.is_empty() {
        return Annotation {
            html: String::new(),
            stats,
        };
    }

    let resolved: Vec<(Span, Conflict<'_>)> = scan(text, index)
        .into_iter()
        .map(|span| {
            let conflict = resolve(&span, catalogs, config);
            (span, conflict)
        })
        .collect();

    let rendered = render(text, &resolved, current_page_url, config);

    stats.spans = resolved.len();
    stats.links = rendered.links;
    stats.disambiguations = rendered.disambiguations;
    stats.self_links_suppressed = rendered.self_links_suppressed;
    stats.plain = rendered.plain;
    stats.total_us = started.elapsed().as_micros() as u64;

    Annotation {
        html: rendered.html,
        stats,
    }
}

// =============================================================================
// Annotator
// =============================================================================

/// Annotation bound to a catalog provider.
///
/// Every call takes a fresh snapshot from the provider and works only on
/// that snapshot, so a refresh in the provider never affects a call in
/// flight. The annotator holds no other state and can be shared freely
/// between threads.
pub struct Annotator<P> {
    provider: P,
    config: LinkerConfig,
}

impl<P: CatalogProvider> Annotator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, LinkerConfig::default())
    }

    pub fn with_config(provider: P, config: LinkerConfig) -> Self {
        Self { provider, config }
    }

    pub fn annotate(&self, text: &str, current_page_url: Option<&str>) -> String {
        self.annotate_detailed(text, current_page_url).html
    }

    pub fn annotate_detailed(&self, text: &str, current_page_url: Option<&str>) -> Annotation {
        if text.is_empty() {
            return Annotation::default();
        }
        let catalogs = self.provider.snapshot();
        annotate_detailed(text, &catalogs, current_page_url, &self.config)
    }

    pub fn annotate_many(&self, texts: &[&str], current_page_url: Option<&str>) -> Vec<String> {
        let catalogs = self.provider.snapshot();
        annotate_many(texts, &catalogs, current_page_url, &self.config)
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

// =============================================================================
// Tests
// =============================================================================
