use std::path::PathBuf;
use std::sync::Arc;

use crate::config::OptionsBgConfig;
use crate::pack::{BuiltPack, PackError};
use crate::remote::kill_switch::{self, LaunchOptions};
use crate::remote::{Catalog, CatalogError, Fetch, HttpClient, TextureFileEntry, Verdict};

/// State that lives for exactly one launch of the application
pub struct Session {
    config: OptionsBgConfig,
    launch: LaunchOptions,
    fetcher: Arc<dyn Fetch>,
    catalog: Option<Catalog>,
}

impl Session {
    /// Create a session around an existing fetcher
    pub fn new(config: OptionsBgConfig, launch: LaunchOptions, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            config,
            launch,
            fetcher,
            catalog: None,
        }
    }

    /// Create a session that talks to the real network
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    /// (for example when no TLS backend is available).
    pub fn with_http(config: OptionsBgConfig, launch: LaunchOptions) -> Result<Self, String> {
        let client = HttpClient::new(&config.http.user_agent, config.http.timeout())
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self::new(config, launch, Arc::new(client)))
    }

    #[must_use]
    pub const fn config(&self) -> &OptionsBgConfig {
        &self.config
    }

    #[must_use]
    pub const fn launch(&self) -> LaunchOptions {
        self.launch
    }

    /// Shared handle to the fetcher, for work done off the UI thread
    #[must_use]
    pub fn fetcher(&self) -> Arc<dyn Fetch> {
        Arc::clone(&self.fetcher)
    }

    #[must_use]
    pub fn check_allowed(&self) -> Verdict {
        kill_switch::check_allowed(
            self.fetcher.as_ref(),
            &self.config.remote_control,
            self.launch,
        )
    }

    /// Fetch the catalog and keep it for later lookups
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched or does not match
    /// the expected schema. A previously loaded catalog is kept in that case.
    pub fn load_catalog(&mut self) -> Result<&Catalog, CatalogError> {
        let catalog =
            crate::remote::catalog::load_catalog(self.fetcher.as_ref(), &self.config.catalog)?;
        Ok(self.catalog.insert(catalog))
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Look a selected name up in the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`PackError::NotFound`] if no catalog is loaded or the name is
    /// not part of it.
    pub fn resolve(&self, name: &str) -> Result<&TextureFileEntry, PackError> {
        self.catalog
            .as_ref()
            .and_then(|catalog| catalog.find(name))
            .ok_or_else(|| PackError::NotFound(name.to_string()))
    }

    /// Resolve `name`, download it and build the archive
    ///
    /// # Errors
    ///
    /// Returns [`PackError::NotFound`] without touching the network when the
    /// name is unknown, or the underlying fetch/archive error.
    pub fn build_pack(&self, name: &str) -> Result<BuiltPack, PackError> {
        let entry = self.resolve(name)?;
        crate::pack::build_pack(self.fetcher.as_ref(), entry)
    }

    /// Write a built pack into the configured output directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_pack(&self, pack: &BuiltPack) -> Result<PathBuf, PackError> {
        crate::pack::save_pack(pack, &self.config.output.directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::FakeFetch;

    fn session_with(fetcher: FakeFetch) -> (Session, Arc<FakeFetch>) {
        let fetcher = Arc::new(fetcher);
        let session = Session::new(
            OptionsBgConfig::default(),
            LaunchOptions::default(),
            fetcher.clone(),
        );
        (session, fetcher)
    }

    #[test]
    fn test_unknown_texture_is_not_fetched() {
        let (mut session, fetcher) = session_with(FakeFetch::new());
        session.set_catalog(Catalog::new(
            "1.20.1",
            "stone.png",
            vec![TextureFileEntry::new("stone.png", "https://raw/stone.png")],
        ));

        let err = session.build_pack("dirt.png").unwrap_err();
        assert!(matches!(err, PackError::NotFound(name) if name == "dirt.png"));
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_build_without_catalog_is_not_found() {
        let (session, fetcher) = session_with(FakeFetch::new());
        assert!(matches!(
            session.build_pack("stone.png"),
            Err(PackError::NotFound(_))
        ));
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_build_known_texture() {
        let (mut session, fetcher) =
            session_with(FakeFetch::new().with("https://raw/stone.png", b"png".to_vec()));
        session.set_catalog(Catalog::new(
            "1.20.1",
            "stone.png",
            vec![TextureFileEntry::new("stone.png", "https://raw/stone.png")],
        ));

        let pack = session.build_pack("stone.png").unwrap();
        assert_eq!(pack.texture, "stone.png");
        assert_eq!(fetcher.requests(), vec!["https://raw/stone.png"]);
    }

    #[test]
    fn test_failed_load_keeps_previous_catalog() {
        let (mut session, _) = session_with(FakeFetch::new());
        let catalog = Catalog::new(
            "1.20.1",
            "stone.png",
            vec![TextureFileEntry::new("stone.png", "https://raw/stone.png")],
        );
        session.set_catalog(catalog.clone());

        assert!(session.load_catalog().is_err());
        assert_eq!(session.catalog(), Some(&catalog));
    }
}
