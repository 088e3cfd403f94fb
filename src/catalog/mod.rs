//! Entity catalogs and the providers that hand out snapshots of them.
//!
//! The annotation engine only ever sees an immutable `Catalogs` snapshot.
//! Where that snapshot comes from (a fixed list, a TTL cache over a backing
//! store) is decided by a `CatalogProvider`.

pub mod cache;
pub mod entity;
pub mod provider;

pub use cache::*;
pub use entity::*;
pub use provider::*;

use serde::{Deserialize, Serialize};

// =============================================================================
// Errors
// =============================================================================

/// Failure while loading or parsing catalog data
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Backing store could not be reached
    Unavailable(String),
    /// Data was reachable but not in the expected shape
    Malformed(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Catalog unavailable: {}", msg),
            Self::Malformed(msg) => write!(f, "Malformed catalog: {}", msg),
            Self::Io(msg) => write!(f, "Catalog I/O error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

// =============================================================================
// EntityRef
// =============================================================================

/// Reference to an entity inside a `Catalogs` snapshot.
///
/// Carries the id so a reference into a different snapshot (entity removed
/// or reordered) resolves to nothing instead of to the wrong record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub category: EntityCategory,
    pub position: usize,
    pub id: String,
}

// =============================================================================
// Catalogs
// =============================================================================

#[derive(Deserialize, Default)]
struct RawCatalogs {
    #[serde(default, deserialize_with = "entity::null_as_default")]
    characters: Vec<Entity>,
    #[serde(default, deserialize_with = "entity::null_as_default")]
    lore: Vec<Entity>,
    #[serde(default, deserialize_with = "entity::null_as_default")]
    episodes: Vec<Entity>,
}

impl From<RawCatalogs> for Catalogs {
    fn from(raw: RawCatalogs) -> Self {
        Catalogs::new(raw.characters, raw.lore, raw.episodes)
    }
}

/// The three entity catalogs as one read-only snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCatalogs")]
pub struct Catalogs {
    pub characters: Vec<Entity>,
    pub lore: Vec<Entity>,
    pub episodes: Vec<Entity>,
}

impl Catalogs {
    /// Build a snapshot. The list an entity sits in decides its category.
    pub fn new(characters: Vec<Entity>, lore: Vec<Entity>, episodes: Vec<Entity>) -> Self {
        Self {
            characters: stamp(characters, EntityCategory::Character),
            lore: stamp(lore, EntityCategory::Lore),
            episodes: stamp(episodes, EntityCategory::Episode),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list(&self, category: EntityCategory) -> &[Entity] {
        match category {
            EntityCategory::Character => &self.characters,
            EntityCategory::Lore => &self.lore,
            EntityCategory::Episode => &self.episodes,
        }
    }

    /// Replace one category's list, restamping categories
    pub fn set_list(&mut self, category: EntityCategory, entities: Vec<Entity>) {
        let entities = stamp(entities, category);
        match category {
            EntityCategory::Character => self.characters = entities,
            EntityCategory::Lore => self.lore = entities,
            EntityCategory::Episode => self.episodes = entities,
        }
    }

    /// All entities in discovery order: characters, lore, episodes
    pub fn iter(&self) -> impl Iterator<Item = (EntityRef, &Entity)> + '_ {
        EntityCategory::ALL.into_iter().flat_map(move |category| {
            self.list(category)
                .iter()
                .enumerate()
                .map(move |(position, entity)| {
                    let entity_ref = EntityRef {
                        category,
                        position,
                        id: entity.id.clone(),
                    };
                    (entity_ref, entity)
                })
        })
    }

    pub fn get(&self, entity_ref: &EntityRef) -> Option<&Entity> {
        self.list(entity_ref.category)
            .get(entity_ref.position)
            .filter(|entity| entity.id == entity_ref.id)
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.lore.len() + self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stamp(mut entities: Vec<Entity>, category: EntityCategory) -> Vec<Entity> {
    for entity in &mut entities {
        entity.category = category;
    }
    entities
}

// =============================================================================
// Tests
// =============================================================================
