use chrono::Utc;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Start appending log lines to the default log file. Logging stays a no-op
/// if the file cannot be opened.
pub fn init_log() {
    if let Some(path) = default_log_path() {
        init_log_at(path);
    }
}

pub fn init_log_at(path: PathBuf) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        if let Ok(mut guard) = LOGGER.lock() {
            *guard = Some(file);
        }
    }
}

#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "options-bg-gen")
        .map(|proj_dirs| proj_dirs.data_local_dir().join("options-bg-gen.log"))
}

pub fn logln(msg: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(file, "{} {msg}", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));
        }
    }
}
