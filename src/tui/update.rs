use crate::pack::PackError;
use crate::remote::Verdict;
use crate::tui::errors::{ErrorCategory, ErrorReport, tags};
use crate::tui::message::{Command, FormNavigation, Message};
use crate::tui::model::{AppState, AppView};

impl AppState {
    // Handle load result messages
    fn handle_load_result_message(&mut self, msg: Message) {
        match msg {
            Message::RemoteControlChecked(verdict) => match verdict {
                Verdict::Allowed => {
                    self.continue_with(Command::LoadCatalog, "Loading textures…");
                }
                Verdict::Disabled(notice) => {
                    self.finish();
                    self.view = AppView::Disabled { notice };
                }
            },

            Message::CatalogLoaded(result) => {
                match result {
                    Ok(catalog) => {
                        self.form
                            .set_options(catalog.options(), catalog.default_selection());
                        self.status = Some(format!(
                            "{} textures from {}",
                            catalog.len(),
                            catalog.git_ref()
                        ));
                        self.session.set_catalog(catalog);
                        self.errors.remove_by_tag(tags::CATALOG_FETCH);
                        self.retry_available = false;
                    }
                    Err(e) => {
                        self.errors.report(
                            ErrorReport::new(format!("{e}. Press r to retry."))
                                .category(ErrorCategory::Catalog)
                                .tag(tags::CATALOG_FETCH)
                                .id(tags::CATALOG_FETCH),
                        );
                        self.retry_available = true;
                    }
                }
                self.finish();
            }

            Message::PackBuilt { texture, result } => {
                self.finish();
                match result {
                    Ok(path) => {
                        self.errors.remove_by_tag(tags::TEXTURE_FETCH);
                        self.errors.remove_by_tag(tags::PACK_SAVE);
                        self.status = Some(format!("Saved {}", path.display()));
                    }
                    Err(e) => self.report_pack_error(&texture, &e),
                }
            }

            _ => unreachable!("handle_load_result_message called with non-load-result message"),
        }
    }

    fn report_pack_error(&mut self, texture: &str, error: &PackError) {
        let (category, tag) = match error {
            PackError::NotFound(_) => (ErrorCategory::Pack, tags::TEXTURE_NOT_FOUND),
            PackError::Fetch(_) => (ErrorCategory::Network, tags::TEXTURE_FETCH),
            PackError::Metadata(_) | PackError::Archive(_) | PackError::Io(_) => {
                (ErrorCategory::Pack, tags::PACK_SAVE)
            }
        };
        self.errors.report(
            ErrorReport::new(format!("{texture}: {error}"))
                .category(category)
                .tag(tag)
                .id(tag),
        );
    }

    fn submit(&mut self) {
        let Some(name) = self.form.submit() else {
            return;
        };

        let entry = match self.session.resolve(&name) {
            Ok(entry) => entry.clone(),
            Err(e) => {
                self.report_pack_error(&name, &e);
                return;
            }
        };

        self.errors.remove_by_tag(tags::TEXTURE_NOT_FOUND);
        let placeholder = format!("Building pack from {}…", entry.display_name());
        self.start(Command::BuildPack { entry }, &placeholder);
    }

    // Update the application state based on a message
    pub fn update(&mut self, msg: Message) -> bool {
        if let AppView::Disabled { .. } = self.view {
            return !matches!(msg, Message::Quit);
        }

        match msg {
            Message::Quit => return false,

            Message::RemoteControlChecked(_)
            | Message::CatalogLoaded(_)
            | Message::PackBuilt { .. } => self.handle_load_result_message(msg),

            Message::Form(navigation) => match navigation {
                FormNavigation::SelectNext => self.form.select_next(),
                FormNavigation::SelectPrevious => self.form.select_previous(),
                FormNavigation::SelectFirst => self.form.select_first(),
                FormNavigation::SelectLast => self.form.select_last(),
            },

            Message::Submit => self.submit(),

            Message::RetryCatalog => {
                if self.retry_available && !self.is_busy() {
                    self.start(Command::LoadCatalog, "Retrying…");
                }
            }

            Message::DismissError => {
                self.errors.dismiss_latest();
            }

            Message::TimerTick => {}
        }

        true // Continue running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionsBgConfig;
    use crate::core::Session;
    use crate::remote::kill_switch::LaunchOptions;
    use crate::remote::testing::FakeFetch;
    use crate::remote::{
        Catalog, CatalogError, DisableReason, DisabledNotice, FetchError, SelectOption,
        TextureFileEntry,
    };
    use std::path::PathBuf;
    use std::sync::Arc;

    fn app() -> AppState {
        let session = Session::new(
            OptionsBgConfig::default(),
            LaunchOptions::default(),
            Arc::new(FakeFetch::new()),
        );
        AppState::new(session)
    }

    fn catalog() -> Catalog {
        Catalog::new(
            "1.20.1",
            "stone.png",
            vec![
                TextureFileEntry::new("dirt.png", "https://raw/dirt.png"),
                TextureFileEntry::new("stone.png", "https://raw/stone.png"),
            ],
        )
    }

    fn listing_failure() -> Message {
        Message::CatalogLoaded(Err(CatalogError::Listing(FetchError::Status {
            url: "https://api.github.com/repos/x/contents/y".to_string(),
            status: 502,
        })))
    }

    /// App that passed the remote check and has the catalog loaded
    fn ready_app() -> AppState {
        let mut app = app();
        app.update(Message::RemoteControlChecked(Verdict::Allowed));
        app.update(Message::CatalogLoaded(Ok(catalog())));
        app.effects.clear();
        app
    }

    #[test]
    fn test_remote_check_runs_first() {
        let app = app();
        assert_eq!(app.effects, vec![Command::CheckRemoteControl]);
        assert!(app.form.is_disabled());
    }

    #[test]
    fn test_allowed_verdict_loads_catalog() {
        let mut app = app();
        app.effects.clear();
        app.update(Message::RemoteControlChecked(Verdict::Allowed));
        assert_eq!(app.effects, vec![Command::LoadCatalog]);
        assert!(app.form.is_disabled());
        let later = std::time::Instant::now() + std::time::Duration::from_secs(3600);
        assert_eq!(app.form.visible_placeholder(later), Some("Loading textures…"));
    }

    #[test]
    fn test_disabled_verdict_replaces_view() {
        let mut app = app();
        app.effects.clear();
        let notice = DisabledNotice {
            reason: DisableReason::Remote,
            message: Some("maintenance".to_string()),
            updated_at: None,
            updated_by: None,
        };
        app.update(Message::RemoteControlChecked(Verdict::Disabled(notice.clone())));

        assert!(matches!(&app.view, AppView::Disabled { notice: n } if *n == notice));
        assert!(app.effects.is_empty());

        // Nothing but quitting is accepted any more
        assert!(app.update(Message::Submit));
        assert!(app.effects.is_empty());
        assert!(!app.update(Message::Quit));
    }

    #[test]
    fn test_catalog_populates_form_with_default() {
        let app = ready_app();
        assert!(!app.form.is_disabled());
        assert_eq!(app.form.options().len(), 2);
        assert_eq!(app.form.selected_value(), Some("stone.png"));
        assert!(app.session.catalog().is_some());
    }

    #[test]
    fn test_repeated_catalog_failures_show_one_error() {
        let mut app = app();
        app.update(Message::RemoteControlChecked(Verdict::Allowed));
        app.update(listing_failure());
        app.update(Message::RetryCatalog);
        app.update(listing_failure());

        assert_eq!(app.errors.len(), 1);
        assert!(app.retry_available);
        assert!(!app.form.is_disabled());
    }

    #[test]
    fn test_successful_retry_clears_error() {
        let mut app = app();
        app.update(Message::RemoteControlChecked(Verdict::Allowed));
        app.update(listing_failure());
        app.effects.clear();

        app.update(Message::RetryCatalog);
        assert_eq!(app.effects, vec![Command::LoadCatalog]);
        app.update(Message::CatalogLoaded(Ok(catalog())));

        assert!(!app.errors.is_visible());
        assert!(!app.retry_available);
    }

    #[test]
    fn test_retry_ignored_without_failure() {
        let mut app = ready_app();
        app.update(Message::RetryCatalog);
        assert!(app.effects.is_empty());
    }

    #[test]
    fn test_submit_queues_build_and_blocks_resubmission() {
        let mut app = ready_app();
        app.update(Message::Submit);
        assert_eq!(
            app.effects,
            vec![Command::BuildPack {
                entry: TextureFileEntry::new("stone.png", "https://raw/stone.png"),
            }]
        );

        app.update(Message::Submit);
        assert_eq!(app.effects.len(), 1);
    }

    #[test]
    fn test_submit_unknown_texture_reports_not_found() {
        let mut app = ready_app();
        app.form.set_options(
            vec![SelectOption {
                label: "gravel".to_string(),
                value: "gravel.png".to_string(),
            }],
            Some(0),
        );

        app.update(Message::Submit);
        assert!(app.effects.is_empty());
        assert!(!app.form.is_disabled());
        let error = app.errors.iter().next().unwrap();
        assert!(error.tags.contains(tags::TEXTURE_NOT_FOUND));
        assert_eq!(error.category, Some(ErrorCategory::Pack));
    }

    #[test]
    fn test_texture_fetch_failure_keeps_catalog() {
        let mut app = ready_app();
        app.update(Message::Submit);
        app.update(Message::PackBuilt {
            texture: "stone.png".to_string(),
            result: Err(PackError::Fetch(FetchError::Status {
                url: "https://raw/stone.png".to_string(),
                status: 404,
            })),
        });

        let error = app.errors.iter().next().unwrap();
        assert!(error.tags.contains(tags::TEXTURE_FETCH));
        assert_eq!(app.session.catalog(), Some(&catalog()));
        assert_eq!(app.form.options().len(), 2);
        assert_eq!(app.form.selected_value(), Some("stone.png"));
    }

    #[test]
    fn test_successful_build_clears_fetch_error() {
        let mut app = ready_app();
        app.update(Message::Submit);
        app.update(Message::PackBuilt {
            texture: "stone.png".to_string(),
            result: Err(PackError::Fetch(FetchError::Status {
                url: "https://raw/stone.png".to_string(),
                status: 404,
            })),
        });
        app.update(Message::Submit);
        app.update(Message::PackBuilt {
            texture: "stone.png".to_string(),
            result: Ok(PathBuf::from("Options Background stone.zip")),
        });

        assert!(!app.errors.is_visible());
        assert_eq!(
            app.status.as_deref(),
            Some("Saved Options Background stone.zip")
        );
    }

    #[test]
    fn test_dismiss_error() {
        let mut app = app();
        app.update(Message::RemoteControlChecked(Verdict::Allowed));
        app.update(listing_failure());
        app.update(Message::DismissError);
        assert!(!app.errors.is_visible());
    }
}
