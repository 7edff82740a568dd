use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::{Fetch, FetchError, fetch_json};
use crate::config::CatalogSettings;

pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not resolve game version: {0}")]
    VersionManifest(#[source] FetchError),

    #[error("Could not list textures: {0}")]
    Listing(#[source] FetchError),

    #[error("File entry {0} has no download URL")]
    MissingDownloadUrl(String),
}

/// Kinds of entries returned by the GitHub contents API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One row of the directory listing, as sent by the API
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: EntryType,
    download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureFileEntry {
    pub name: String,
    pub download_url: String,
    pub kind: EntryType,
}

impl TextureFileEntry {
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
            kind: EntryType::File,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

/// A selectable option: `label` is shown, `value` identifies the entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// File name with its extension removed
#[must_use]
pub fn display_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

#[derive(Debug, Deserialize)]
struct VersionManifest {
    latest: LatestVersions,
}

#[derive(Debug, Deserialize)]
struct LatestVersions {
    release: String,
    snapshot: String,
}

/// Which branch of the asset mirror to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSpec {
    LatestRelease,
    LatestSnapshot,
    Named(String),
}

impl RefSpec {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "latest-release" | "latest" => Self::LatestRelease,
            "latest-snapshot" => Self::LatestSnapshot,
            other => Self::Named(other.to_string()),
        }
    }

    /// Turn aliases into a concrete game version via Mojang's manifest
    pub fn resolve(&self, fetcher: &dyn Fetch) -> Result<String, CatalogError> {
        let latest = || {
            fetch_json::<VersionManifest>(fetcher, VERSION_MANIFEST_URL)
                .map(|manifest| manifest.latest)
                .map_err(CatalogError::VersionManifest)
        };
        match self {
            Self::Named(name) => Ok(name.clone()),
            Self::LatestRelease => latest().map(|latest| latest.release),
            Self::LatestSnapshot => latest().map(|latest| latest.snapshot),
        }
    }
}

#[must_use]
pub fn listing_url(settings: &CatalogSettings, git_ref: &str) -> String {
    format!(
        "https://api.github.com/repos/{}/contents/{}?ref={}",
        settings.repository,
        settings.path.trim_matches('/'),
        git_ref
    )
}

/// The in-memory list of selectable textures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    git_ref: String,
    default_texture: String,
    entries: Vec<TextureFileEntry>,
}

impl Catalog {
    /// Build a catalog, keeping only file entries
    pub fn new(
        git_ref: impl Into<String>,
        default_texture: impl Into<String>,
        entries: impl IntoIterator<Item = TextureFileEntry>,
    ) -> Self {
        Self {
            git_ref: git_ref.into(),
            default_texture: default_texture.into(),
            entries: entries
                .into_iter()
                .filter(|entry| entry.kind == EntryType::File)
                .collect(),
        }
    }

    #[must_use]
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    #[must_use]
    pub fn entries(&self) -> &[TextureFileEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TextureFileEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    #[must_use]
    pub fn options(&self) -> Vec<SelectOption> {
        self.entries
            .iter()
            .map(|entry| SelectOption {
                label: entry.display_name().to_string(),
                value: entry.name.clone(),
            })
            .collect()
    }

    /// Index of the default texture, if the listing contains it
    #[must_use]
    pub fn default_selection(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name == self.default_texture)
    }
}

/// Resolve the configured ref, list the texture directory and keep the files
pub fn load_catalog(
    fetcher: &dyn Fetch,
    settings: &CatalogSettings,
) -> Result<Catalog, CatalogError> {
    let git_ref = RefSpec::parse(&settings.git_ref).resolve(fetcher)?;
    let url = listing_url(settings, &git_ref);

    let listing: Vec<ListingEntry> = fetch_json(fetcher, &url).map_err(CatalogError::Listing)?;

    let mut entries = Vec::new();
    for entry in listing {
        if entry.kind != EntryType::File {
            continue;
        }
        let download_url = entry
            .download_url
            .ok_or_else(|| CatalogError::MissingDownloadUrl(entry.name.clone()))?;
        entries.push(TextureFileEntry {
            name: entry.name,
            download_url,
            kind: entry.kind,
        });
    }

    crate::logger::logln(&format!(
        "Loaded {} textures from {} at {git_ref}",
        entries.len(),
        settings.repository
    ));

    Ok(Catalog::new(git_ref, settings.default_texture.clone(), entries))
}
