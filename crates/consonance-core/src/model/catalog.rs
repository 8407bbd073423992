use serde::{Deserialize, Serialize};

/// A catalog row as read from the raw source, before cleaning.
///
/// Either field may be absent (an empty CSV cell, a missing column value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCatalogRow {
    pub name: Option<String>,
    pub tags: Option<String>,
}

impl RawCatalogRow {
    #[must_use]
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tags: Some(tags.into()),
        }
    }

    /// Convert into a [`CatalogEntry`], trimming both fields.
    ///
    /// Returns `None` when either field is missing or blank.
    #[must_use]
    pub fn into_entry(self) -> Option<CatalogEntry> {
        let name = non_blank(self.name?)?;
        let tags = non_blank(self.tags?)?;
        Some(CatalogEntry { name, tags })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A known artist in the recommendation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Artist name; unique within a prepared catalog.
    pub name: String,

    /// Free-text tags, delimited by whitespace and/or commas.
    pub tags: String,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
        }
    }
}
