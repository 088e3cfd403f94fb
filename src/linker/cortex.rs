//! LinkCortex: the WASM-facing annotator.
//!
//! Hydrate once with the catalogs, then annotate as many texts as needed.
//! The term index is built at hydration time and reused until the next
//! hydration; it is always built from the snapshot stored alongside it.
//!
//! Nothing here throws into JS on bad input: unparseable texts, configs
//! or catalogs degrade to defaults or to the unchanged text.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::catalog::Catalogs;
use crate::linker::{annotate_indexed, Annotation, LinkerConfig, TermIndex};

#[wasm_bindgen]
pub struct LinkCortex {
    config: LinkerConfig,
    catalogs: Arc<Catalogs>,
    index: TermIndex,
}

impl Default for LinkCortex {
    fn default() -> Self {
        Self::with_config(LinkerConfig::default())
    }
}

#[wasm_bindgen]
impl LinkCortex {
    /// `config` is an optional LinkerConfig object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> LinkCortex {
        let config = if config.is_null() || config.is_undefined() {
            LinkerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).unwrap_or_else(|_e| {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::warn_1(&format!("[LinkCortex] Invalid config, using defaults: {}", _e).into());
                LinkerConfig::default()
            })
        };
        Self::with_config(config)
    }

    /// Load `{ characters, lore, episodes }` and rebuild the index
    #[wasm_bindgen(js_name = hydrateCatalogs)]
    pub fn js_hydrate_catalogs(&mut self, catalogs: JsValue) -> Result<(), JsValue> {
        let catalogs: Catalogs = serde_wasm_bindgen::from_value(catalogs)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse catalogs: {}", e)))?;
        self.hydrate(catalogs);
        Ok(())
    }

    #[wasm_bindgen(js_name = annotate)]
    pub fn js_annotate(&self, text: Option<String>, current_page_url: Option<String>) -> String {
        match text {
            Some(text) => self.annotate(&text, current_page_url.as_deref()),
            None => String::new(),
        }
    }

    /// Same as `annotate`, returning `{ html, stats }`
    #[wasm_bindgen(js_name = annotateDetailed)]
    pub fn js_annotate_detailed(&self, text: Option<String>, current_page_url: Option<String>) -> JsValue {
        let annotation = match text {
            Some(text) => self.annotate_detailed(&text, current_page_url.as_deref()),
            None => Annotation::default(),
        };
        match serde_wasm_bindgen::to_value(&annotation) {
            Ok(v) => v,
            Err(_e) => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::error_1(&format!("[LinkCortex] Serialization failed: {:?}", _e).into());
                JsValue::NULL
            }
        }
    }

    /// Annotate an array of texts; non-string entries come back as ""
    #[wasm_bindgen(js_name = annotateMany)]
    pub fn js_annotate_many(&self, texts: js_sys::Array, current_page_url: Option<String>) -> js_sys::Array {
        let current = current_page_url.as_deref();
        texts
            .iter()
            .map(|value| {
                let html = value
                    .as_string()
                    .map(|text| self.annotate(&text, current))
                    .unwrap_or_default();
                JsValue::from_str(&html)
            })
            .collect()
    }

    #[wasm_bindgen(js_name = termCount)]
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    #[wasm_bindgen(js_name = entityCount)]
    pub fn entity_count(&self) -> usize {
        self.index.entity_count()
    }

    /// Drop all catalog data
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.hydrate(Catalogs::default());
    }
}

impl LinkCortex {
    pub fn with_config(config: LinkerConfig) -> Self {
        let catalogs = Arc::new(Catalogs::default());
        let index = TermIndex::build(&catalogs, &config);
        Self {
            config,
            catalogs,
            index,
        }
    }

    pub fn hydrate(&mut self, catalogs: Catalogs) {
        self.hydrate_shared(Arc::new(catalogs));
    }

    /// Hydrate from a snapshot handed out by a `CatalogProvider`
    pub fn hydrate_shared(&mut self, catalogs: Arc<Catalogs>) {
        self.index = TermIndex::build(&catalogs, &self.config);
        self.catalogs = catalogs;
    }

    pub fn annotate(&self, text: &str, current_page_url: Option<&str>) -> String {
        self.annotate_detailed(text, current_page_url).html
    }

    pub fn annotate_detailed(&self, text: &str, current_page_url: Option<&str>) -> Annotation {
        annotate_indexed(text, &self.index, &self.catalogs, current_page_url, &self.config)
    }

    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }
}

/// One-shot annotation for callers that do not keep a `LinkCortex` around.
/// Undeserializable catalogs leave the text unchanged.
#[wasm_bindgen(js_name = annotateText)]
pub fn annotate_text(text: Option<String>, catalogs: JsValue, current_page_url: Option<String>) -> String {
    let text = match text {
        Some(text) => text,
        None => return String::new(),
    };

    let catalogs: Catalogs = match serde_wasm_bindgen::from_value(catalogs) {
        Ok(catalogs) => catalogs,
        Err(_e) => {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::error_1(&format!("[annotateText] Failed to parse catalogs: {}", _e).into());
            return text;
        }
    };

    crate::linker::annotate(&text, &catalogs, current_page_url.as_deref())
}

// =============================================================================
// Tests
// =============================================================================
