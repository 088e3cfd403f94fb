//! LoreLink: Entity Mention Annotation Engine
//!
//! A Rust/WASM implementation of the wiki's cross-linking pipeline: finds
//! mentions of catalog entities (characters, lore, episodes) in prose and
//! turns them into links or disambiguation markers.
//!
//! # Architecture
//!
//! ## Catalog Components
//! - `entity.rs` - Entity records and categories
//! - `provider.rs` - CatalogProvider: snapshot capability, StaticCatalog
//! - `cache.rs` - CachedCatalog: TTL snapshot cache with fallback data
//!
//! ## Linker Components
//! - `term_index.rs` - TermIndex: term -> entities, Aho-Corasick automaton
//! - `candidate.rs` - Candidate scanner: longest-first, non-overlapping spans
//! - `conflict.rs` - Conflict resolver: url dedup, character priority
//! - `render.rs` - Renderer: right-to-left markup assembly
//! - `annotate.rs` - `annotate()` pipeline and the provider-bound Annotator
//! - `cortex.rs` - LinkCortex: hydrate-once WASM surface
//!
//! # Usage (Rust)
//! ```
//! use lorelink::{annotate, Catalogs, Entity, EntityCategory};
//!
//! let catalogs = Catalogs::new(
//!     vec![Entity::new("lucky", EntityCategory::Character, "Lucky", "/character/lucky")],
//!     vec![],
//!     vec![],
//! );
//! let html = annotate("Lucky is here", &catalogs, None);
//! assert!(html.starts_with(r#"<a href="/character/lucky""#));
//! ```
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { LinkCortex } from 'lorelink';
//!
//! await init();
//!
//! const cortex = new LinkCortex({ disambiguation: true });
//! cortex.hydrateCatalogs({
//!   characters: [{ id: 'lucky', name: 'Lucky', url: '/character/lucky', keywords: [] }],
//!   lore: [],
//!   episodes: [],
//! });
//!
//! const html = cortex.annotate(episode.summary, '/episode/pilot');
//! ```

pub mod catalog;
pub mod linker;

// Public exports - Catalog
pub use catalog::*;

// Public exports - Linker
pub use linker::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("lorelink v{}", env!("CARGO_PKG_VERSION"))
}
