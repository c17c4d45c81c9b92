use deunicode::deunicode;
use serde::{Deserialize, Serialize};

/// Domain representation of a tag recipes are categorised with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable, unique name of the tag.
    pub name: String,
    /// URL-safe identifier derived from the name when the tag was created.
    pub slug: String,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Human-readable name of the tag.
    pub name: String,
    /// Slug derived from `name`; never changes afterwards.
    pub slug: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name and its derived slug.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let slug = slugify(&name);
        Self { name, slug }
    }
}

/// Patch data applied when renaming an existing tag. The slug is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTag {
    /// Updated human-readable name of the tag.
    pub name: String,
}

/// Transliterate `name` to ASCII, lowercase it and join words with `-`.
pub fn slugify(name: &str) -> String {
    deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
