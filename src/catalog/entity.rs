//! Catalog records: characters, lore items and episodes.
//!
//! Records arrive from the site's data layer in its legacy field names
//! (`name`, `url`, `keywords`, `type`, `image`); serde aliases accept both
//! those and the canonical names used here.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// EntityCategory
// =============================================================================

/// Which catalog an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Character,
    Lore,
    Episode,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 3] = [
        EntityCategory::Character,
        EntityCategory::Lore,
        EntityCategory::Episode,
    ];

    /// Lowercase label, also used as the markup style hook
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Character => "character",
            EntityCategory::Lore => "lore",
            EntityCategory::Episode => "episode",
        }
    }

    /// Accessible title for a direct link to an entity of this category
    pub fn link_title(&self, name: &str) -> String {
        match self {
            EntityCategory::Character => format!("View {}'s page", name),
            EntityCategory::Lore => format!("Learn about {}", name),
            EntityCategory::Episode => format!("Watch {}", name),
        }
    }

    /// Parse a category label ("character", "Characters", "episode", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "character" | "characters" => Some(EntityCategory::Character),
            "lore" => Some(EntityCategory::Lore),
            "episode" | "episodes" => Some(EntityCategory::Episode),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A single catalog record.
///
/// Missing or `null` fields deserialize to empty values so one incomplete
/// record never rejects the whole catalog; `is_linkable` filters it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Overwritten by the list the record is stored in
    #[serde(default = "unplaced_category", skip_deserializing)]
    pub category: EntityCategory,
    #[serde(default, alias = "name", deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, alias = "keywords", deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
    #[serde(default, alias = "url", deserialize_with = "null_as_default")]
    pub target_url: String,
    /// Free-text detail: "place", "Season 3, Episode 4", ...
    #[serde(default, alias = "type", deserialize_with = "null_as_default")]
    pub subtype_label: String,
    #[serde(default, alias = "image")]
    pub thumbnail: Option<String>,
}

fn unplaced_category() -> EntityCategory {
    EntityCategory::Lore
}

/// `null` reads as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Entity {
    pub fn new(id: &str, category: EntityCategory, display_name: &str, target_url: &str) -> Self {
        Self {
            id: id.to_string(),
            category,
            display_name: display_name.to_string(),
            aliases: Vec::new(),
            target_url: target_url.to_string(),
            subtype_label: String::new(),
            thumbnail: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtype(mut self, subtype_label: &str) -> Self {
        self.subtype_label = subtype_label.to_string();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: &str) -> Self {
        self.thumbnail = Some(thumbnail.to_string());
        self
    }

    /// Entities without a name or a url never enter the term index
    pub fn is_linkable(&self) -> bool {
        !self.display_name.trim().is_empty() && !self.target_url.trim().is_empty()
    }

    /// Normalized search terms: display name first, then aliases in order.
    /// Blank aliases are skipped; duplicates are left for the index to merge.
    pub fn search_terms(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.display_name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter_map(normalize_term)
    }
}

/// Trim and case-fold a term. Returns `None` for blank input.
pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(fold_case(trimmed))
    }
}

/// Per-character lowercase. Matches the folding applied to scanned text,
/// unlike `str::to_lowercase` which special-cases word-final sigma.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

// =============================================================================
// Tests
// =============================================================================
