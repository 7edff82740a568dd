use std::fmt;

// Generated by build.rs
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub struct VersionInfo {
    pub version: &'static str,
    pub commit_hash: Option<&'static str>,
    pub commit_hash_short: Option<&'static str>,
    pub is_dirty: bool,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionInfo {
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: built_info::PKG_VERSION,
            commit_hash: built_info::GIT_COMMIT_HASH,
            commit_hash_short: built_info::GIT_COMMIT_HASH_SHORT,
            is_dirty: built_info::GIT_DIRTY.unwrap_or(false),
            target: built_info::TARGET,
            profile: built_info::PROFILE,
            rustc_version: built_info::RUSTC_VERSION,
        }
    }

    #[must_use]
    pub fn is_development_build(&self) -> bool {
        self.is_dirty || self.profile == "debug"
    }

    #[must_use]
    pub fn short_version(&self) -> String {
        if !self.is_development_build() {
            return format!("v{}", self.version);
        }
        match (self.commit_hash_short, self.is_dirty) {
            (Some(hash), true) => format!("v{}-dev+dirty.{hash}", self.version),
            (Some(hash), false) => format!("v{}-dev+{hash}", self.version),
            (None, true) => format!("v{}-dev+dirty", self.version),
            (None, false) => format!("v{}-dev", self.version),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "options-bg-gen\n\nVersion: {}", self.short_version())?;

        if self.is_development_build() {
            if let Some(commit_hash) = self.commit_hash {
                writeln!(f, "Commit hash: {commit_hash}")?;
            }
            if self.is_dirty {
                writeln!(f, "Working directory: dirty")?;
            }
            writeln!(f, "Profile: {}", self.profile)?;
            writeln!(f, "Target: {}", self.target)?;
            writeln!(f, "Rust: {}", self.rustc_version)?;
        }

        Ok(())
    }
}

#[must_use]
pub fn get_version_info() -> VersionInfo {
    VersionInfo::new()
}
