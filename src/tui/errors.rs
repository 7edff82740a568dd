use std::collections::BTreeSet;
use std::fmt;

/// Ids and tags shared by the places that report and clear errors
pub mod tags {
    pub const CATALOG_FETCH: &str = "catalog-fetch";
    pub const TEXTURE_NOT_FOUND: &str = "texture-not-found";
    pub const TEXTURE_FETCH: &str = "texture-fetch";
    pub const PACK_SAVE: &str = "pack-save";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Catalog,
    Pack,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Catalog => "catalog",
            Self::Pack => "pack",
        };
        f.write_str(name)
    }
}

/// A user-visible error entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub category: Option<ErrorCategory>,
    pub tags: BTreeSet<String>,
    pub id: Option<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: None,
            tags: BTreeSet::new(),
            id: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Errors currently shown to the user, oldest first
#[derive(Debug, Default)]
pub struct ErrorList {
    entries: Vec<ErrorReport>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `report`, replacing any entry with the same id
    pub fn report(&mut self, report: ErrorReport) {
        if let Some(id) = &report.id {
            self.entries
                .retain(|existing| existing.id.as_deref() != Some(id.as_str()));
        }
        crate::logger::logln(&format!("Error reported: {}", report.message));
        self.entries.push(report);
    }

    /// Drop every entry carrying `tag`
    pub fn remove_by_tag(&mut self, tag: &str) {
        self.entries.retain(|entry| !entry.tags.contains(tag));
    }

    /// Remove the newest entry
    pub fn dismiss_latest(&mut self) -> Option<ErrorReport> {
        self.entries.pop()
    }

    /// The error panel is shown exactly when there is something in it
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorReport> {
        self.entries.iter()
    }
}
