use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::{Fetch, FetchError, fetch_json};
use crate::config::{Environment, FetchFailurePolicy, RemoteControlSettings};

#[derive(Debug, Error)]
pub enum RemoteControlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Gist has no revisions")]
    NoRevisions,

    #[error("Gist revision does not contain {0}")]
    MissingFile(String),

    #[error("Remote control document is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Options given at launch that influence the check
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions {
    /// Presence-only override forcing the disabled state
    pub manual_disable: bool,
}

/// One entry of `GET /gists/{id}/commits`
#[derive(Debug, Deserialize)]
struct GistCommit {
    url: String,
    committed_at: DateTime<Utc>,
    user: Option<GistUser>,
}

#[derive(Debug, Deserialize)]
struct GistUser {
    login: String,
}

/// A single gist revision; only the files matter here
#[derive(Debug, Deserialize)]
struct GistRevision {
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: String,
}

/// The operator-edited document itself
#[derive(Debug, Deserialize)]
struct RemoteControlDocument {
    run: bool,
    #[serde(rename = "downMsg", default)]
    down_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteControlConfig {
    pub run: bool,
    pub down_msg: Option<String>,
    pub commit_timestamp: DateTime<Utc>,
    pub commit_author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    /// The operator flipped `run` to false
    Remote,
    /// Disabled from the command line
    Manual,
    /// The document could not be read and the policy is fail-closed
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisabledNotice {
    pub reason: DisableReason,
    pub message: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl DisabledNotice {
    fn manual() -> Self {
        Self {
            reason: DisableReason::Manual,
            message: None,
            updated_at: None,
            updated_by: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Disabled(DisabledNotice),
}

impl Verdict {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[must_use]
pub fn commits_url(settings: &RemoteControlSettings) -> String {
    format!("https://api.github.com/gists/{}/commits", settings.gist_id)
}

/// Fetch the newest revision of the remote control document
pub fn fetch_remote_control(
    fetcher: &dyn Fetch,
    settings: &RemoteControlSettings,
) -> Result<RemoteControlConfig, RemoteControlError> {
    let commits: Vec<GistCommit> = fetch_json(fetcher, &commits_url(settings))?;
    let latest = commits.into_iter().next().ok_or(RemoteControlError::NoRevisions)?;

    let revision: GistRevision = fetch_json(fetcher, &latest.url)?;
    let file = revision
        .files
        .get(&settings.file_name)
        .ok_or_else(|| RemoteControlError::MissingFile(settings.file_name.clone()))?;

    let document: RemoteControlDocument =
        serde_json::from_str(&file.content).map_err(RemoteControlError::Malformed)?;

    Ok(RemoteControlConfig {
        run: document.run,
        down_msg: document.down_msg.filter(|msg| !msg.trim().is_empty()),
        commit_timestamp: latest.committed_at,
        commit_author: latest
            .user
            .map_or_else(|| "unknown".to_string(), |user| user.login),
    })
}

/// Decide whether the application may proceed.
///
/// The manual override wins over everything and never touches the network.
/// Outside production the check is skipped.
pub fn check_allowed(
    fetcher: &dyn Fetch,
    settings: &RemoteControlSettings,
    launch: LaunchOptions,
) -> Verdict {
    if launch.manual_disable {
        crate::logger::logln("Disabled by command line override");
        return Verdict::Disabled(DisabledNotice::manual());
    }

    if settings.environment == Environment::Development {
        crate::logger::logln("Development environment, skipping remote control");
        return Verdict::Allowed;
    }

    match fetch_remote_control(fetcher, settings) {
        Ok(remote) if remote.run => {
            crate::logger::logln("Remote control OK");
            Verdict::Allowed
        }
        Ok(remote) => Verdict::Disabled(DisabledNotice {
            reason: DisableReason::Remote,
            message: remote.down_msg,
            updated_at: Some(remote.commit_timestamp),
            updated_by: Some(remote.commit_author),
        }),
        Err(e) => {
            crate::logger::logln(&format!("Remote control unavailable: {e}"));
            match settings.on_fetch_error {
                FetchFailurePolicy::Allow => Verdict::Allowed,
                FetchFailurePolicy::Deny => Verdict::Disabled(DisabledNotice {
                    reason: DisableReason::Unreachable,
                    message: Some(e.to_string()),
                    updated_at: None,
                    updated_by: None,
                }),
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::gist_serving;
    use super::*;
    use crate::remote::testing::FakeFetch;

    fn settings() -> RemoteControlSettings {
        RemoteControlSettings {
            gist_id: "abc".to_string(),
            ..RemoteControlSettings::default()
        }
    }

    #[test]
    fn test_run_true_is_allowed() {
        let fetcher = gist_serving(&settings(), r#"{"run": true}"#);
        let verdict = check_allowed(&fetcher, &settings(), LaunchOptions::default());
        assert_eq!(verdict, Verdict::Allowed);
    }

    #[test]
    fn test_run_false_carries_message_and_metadata() {
        let fetcher = gist_serving(&settings(), r#"{"run": false, "downMsg": "x"}"#);
        let Verdict::Disabled(notice) =
            check_allowed(&fetcher, &settings(), LaunchOptions::default())
        else {
            panic!("expected disabled verdict");
        };
        assert_eq!(notice.reason, DisableReason::Remote);
        assert_eq!(notice.message.as_deref(), Some("x"));
        assert_eq!(notice.updated_by.as_deref(), Some("operator"));
        assert_eq!(
            notice.updated_at.unwrap().to_rfc3339(),
            "2023-06-01T12:30:00+00:00"
        );
    }

    #[test]
    fn test_run_false_without_message() {
        let fetcher = gist_serving(&settings(), r#"{"run": false}"#);
        let Verdict::Disabled(notice) =
            check_allowed(&fetcher, &settings(), LaunchOptions::default())
        else {
            panic!("expected disabled verdict");
        };
        assert_eq!(notice.message, None);
    }

    #[test]
    fn test_blank_message_is_dropped() {
        let fetcher = gist_serving(&settings(), r#"{"run": false, "downMsg": "  "}"#);
        let remote = fetch_remote_control(&fetcher, &settings()).unwrap();
        assert_eq!(remote.down_msg, None);
    }

    #[test]
    fn test_manual_override_skips_network() {
        let fetcher = gist_serving(&settings(), r#"{"run": true}"#);
        let launch = LaunchOptions {
            manual_disable: true,
        };
        let verdict = check_allowed(&fetcher, &settings(), launch);
        assert_eq!(verdict, Verdict::Disabled(DisabledNotice::manual()));
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_development_skips_check() {
        let settings = RemoteControlSettings {
            environment: Environment::Development,
            ..settings()
        };
        let fetcher = gist_serving(&settings, r#"{"run": false}"#);
        let verdict = check_allowed(&fetcher, &settings, LaunchOptions::default());
        assert!(verdict.is_allowed());
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_development_still_honours_override() {
        let settings = RemoteControlSettings {
            environment: Environment::Development,
            ..settings()
        };
        let launch = LaunchOptions {
            manual_disable: true,
        };
        let verdict = check_allowed(&FakeFetch::new(), &settings, launch);
        assert!(!verdict.is_allowed());
    }

    #[test]
    fn test_fetch_failure_fails_open() {
        let fetcher = FakeFetch::new().failing(&commits_url(&settings()), 500);
        let verdict = check_allowed(&fetcher, &settings(), LaunchOptions::default());
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_malformed_document_fails_open() {
        let fetcher = gist_serving(&settings(), "not json");
        let verdict = check_allowed(&fetcher, &settings(), LaunchOptions::default());
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_deny_policy_disables_on_failure() {
        let settings = RemoteControlSettings {
            on_fetch_error: FetchFailurePolicy::Deny,
            ..settings()
        };
        let fetcher = FakeFetch::new().failing(&commits_url(&settings), 500);
        let Verdict::Disabled(notice) =
            check_allowed(&fetcher, &settings, LaunchOptions::default())
        else {
            panic!("expected disabled verdict");
        };
        assert_eq!(notice.reason, DisableReason::Unreachable);
    }

    #[test]
    fn test_missing_file_is_typed_error() {
        let other = RemoteControlSettings {
            file_name: "other.json".to_string(),
            ..settings()
        };
        let fetcher = gist_serving(&other, r#"{"run": true}"#);
        let err = fetch_remote_control(&fetcher, &settings()).unwrap_err();
        assert!(matches!(err, RemoteControlError::MissingFile(name) if name == "remoteControl.json"));
    }

    #[test]
    fn test_empty_commit_list() {
        let fetcher = FakeFetch::new().with(&commits_url(&settings()), "[]");
        let err = fetch_remote_control(&fetcher, &settings()).unwrap_err();
        assert!(matches!(err, RemoteControlError::NoRevisions));
    }
}
