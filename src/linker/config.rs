//! Configuration for the linker

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkerConfig {
    /// An exact character-name mention links straight to the character
    /// even when other entities share the word. Default: true
    #[serde(default = "default_true")]
    pub character_priority: bool,
    /// Never link a page to itself. Default: true
    #[serde(default = "default_true")]
    pub suppress_self_links: bool,
    /// Emit disambiguation markers; when false ambiguous mentions stay
    /// plain text. Default: true
    #[serde(default = "default_true")]
    pub disambiguation: bool,
    /// Shortest term (in characters) that gets indexed. Default: 1
    #[serde(default = "default_min_term_chars")]
    pub min_term_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_min_term_chars() -> usize {
    1
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            character_priority: true,
            suppress_self_links: true,
            disambiguation: true,
            min_term_chars: default_min_term_chars(),
        }
    }
}

impl LinkerConfig {
    /// Preset for surfaces without the client-side chooser (previews, feeds)
    pub fn links_only() -> Self {
        Self {
            disambiguation: false,
            ..Self::default()
        }
    }
}
