use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Creature type tag. Anything the API returns outside the known set is
/// kept verbatim as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    Unknown(String),
}

impl Category {
    #[cfg(test)]
    pub const KNOWN: [Category; 18] = [
        Category::Normal,
        Category::Fire,
        Category::Water,
        Category::Grass,
        Category::Electric,
        Category::Ice,
        Category::Fighting,
        Category::Poison,
        Category::Ground,
        Category::Flying,
        Category::Psychic,
        Category::Bug,
        Category::Rock,
        Category::Ghost,
        Category::Dragon,
        Category::Dark,
        Category::Steel,
        Category::Fairy,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "normal" => Category::Normal,
            "fire" => Category::Fire,
            "water" => Category::Water,
            "grass" => Category::Grass,
            "electric" => Category::Electric,
            "ice" => Category::Ice,
            "fighting" => Category::Fighting,
            "poison" => Category::Poison,
            "ground" => Category::Ground,
            "flying" => Category::Flying,
            "psychic" => Category::Psychic,
            "bug" => Category::Bug,
            "rock" => Category::Rock,
            "ghost" => Category::Ghost,
            "dragon" => Category::Dragon,
            "dark" => Category::Dark,
            "steel" => Category::Steel,
            "fairy" => Category::Fairy,
            other => Category::Unknown(other.to_string()),
        }
    }

    /// Wire name, as the API spells it.
    pub fn name(&self) -> &str {
        match self {
            Category::Normal => "normal",
            Category::Fire => "fire",
            Category::Water => "water",
            Category::Grass => "grass",
            Category::Electric => "electric",
            Category::Ice => "ice",
            Category::Fighting => "fighting",
            Category::Poison => "poison",
            Category::Ground => "ground",
            Category::Flying => "flying",
            Category::Psychic => "psychic",
            Category::Bug => "bug",
            Category::Rock => "rock",
            Category::Ghost => "ghost",
            Category::Dragon => "dragon",
            Category::Dark => "dark",
            Category::Steel => "steel",
            Category::Fairy => "fairy",
            Category::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unknown(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named image references (sprite name -> URL).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imagery(BTreeMap<String, String>);

impl Imagery {
    /// Collects every top-level string field of a `sprites` object.
    /// Nulls and nested objects (`other`, `versions`) are skipped.
    pub fn from_sprites(sprites: &serde_json::Value) -> Self {
        let images = sprites
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|url| (name.clone(), url.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self(images)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The image a viewer shows by default.
    pub fn primary(&self) -> Option<&str> {
        self.get("front_default")
    }
}

/// One catalog record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub categories: Vec<Category>,
    pub imagery: Imagery,
}

impl From<DetailResponse> for CatalogEntry {
    fn from(detail: DetailResponse) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            categories: detail
                .types
                .iter()
                .map(|slot| Category::from_name(&slot.kind.name))
                .collect(),
            imagery: Imagery::from_sprites(&detail.sprites),
        }
    }
}

// PokeAPI response types

/// `GET /pokemon/?offset=..&limit=..`
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub results: Vec<PageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// `GET /pokemon/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}
