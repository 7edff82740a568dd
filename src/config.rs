use config::{Config, ConfigError, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration structure for options-bg-gen
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OptionsBgConfig {
    pub remote_control: RemoteControlSettings,
    pub catalog: CatalogSettings,
    pub http: HttpSettings,
    pub output: OutputSettings,
    pub tui: TuiConfig,
}

/// Where the application runs. The kill-switch is only consulted in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Development,
}

/// What to do when the remote control document cannot be fetched or parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteControlSettings {
    /// Gist holding the remote control document
    pub gist_id: String,
    /// File inside the gist
    pub file_name: String,
    pub environment: Environment,
    /// Fail-open by default
    pub on_fetch_error: FetchFailurePolicy,
}

impl Default for RemoteControlSettings {
    fn default() -> Self {
        Self {
            gist_id: "bbd7afbc74eb582c1a9d78b031b24f94".to_string(),
            file_name: "remoteControl.json".to_string(),
            environment: Environment::Production,
            on_fetch_error: FetchFailurePolicy::Allow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// GitHub `owner/name` of the asset mirror
    pub repository: String,
    /// Directory listed inside the repository
    pub path: String,
    /// Branch or tag, or one of `latest-release` / `latest-snapshot`
    pub git_ref: String,
    /// Entry selected when the catalog is first shown
    pub default_texture: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            repository: "InventivetalentDev/minecraft-assets".to_string(),
            path: "assets/minecraft/textures/block".to_string(),
            git_ref: "1.20.1".to_string(),
            default_texture: "stone.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Upper bound for a single request, in seconds (default: 20)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: format!("options-bg-gen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory generated packs are written to (default: current directory)
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// TUI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Grace period before the busy placeholder is shown, in milliseconds (default: 250)
    pub disable_delay_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            disable_delay_ms: 250,
        }
    }
}

impl TuiConfig {
    #[must_use]
    pub const fn disable_delay(&self) -> Duration {
        Duration::from_millis(self.disable_delay_ms)
    }
}

impl OptionsBgConfig {
    /// Load configuration from various sources in order of priority:
    /// 1. Command line arguments (handled elsewhere)
    /// 2. Environment variables
    /// 3. User config file (~/.config/options-bg-gen/config.toml)
    /// 4. System config file (/etc/options-bg-gen/config.toml)
    /// 5. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder();

        config_builder = config_builder.add_source(Config::try_from(&Self::default())?);

        if let Some(system_config_path) = Self::get_system_config_path()
            && system_config_path.exists()
        {
            config_builder =
                config_builder.add_source(File::from(system_config_path).required(false));
        }

        if let Some(user_config_path) = Self::get_user_config_path()
            && user_config_path.exists()
        {
            config_builder =
                config_builder.add_source(File::from(user_config_path).required(false));
        }

        config_builder = config_builder.add_source(Self::environment_source());

        let config = config_builder.build()?;
        config.try_deserialize()
    }

    /// Field names contain underscores, so nesting uses a double underscore:
    /// `OPTIONS_BG_CATALOG__GIT_REF=1.20.4`. Values stay strings until
    /// deserialized so refs like `1.20` are not read as floats.
    fn environment_source() -> config::Environment {
        config::Environment::with_prefix("OPTIONS_BG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(false)
    }

    /// Get the path to the user configuration file
    /// Returns: ~/.config/options-bg-gen/config.toml (on Linux)
    ///          %APPDATA%/options-bg-gen/config.toml (on Windows)
    #[must_use]
    pub fn get_user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "options-bg-gen")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the path to the system configuration file
    #[must_use]
    pub fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/options-bg-gen/config.toml"))
        }

        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA").ok().map(|program_data| {
                PathBuf::from(program_data)
                    .join("options-bg-gen")
                    .join("config.toml")
            })
        }

        #[cfg(not(any(unix, windows)))]
        {
            None
        }
    }

    /// Create a default configuration file at the user config location
    pub fn create_default_config_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
        if let Some(config_path) = Self::get_user_config_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml_content = toml::to_string_pretty(&Self::default())?;
            std::fs::write(&config_path, toml_content)?;
            Ok(config_path)
        } else {
            Err("Could not determine user config directory".into())
        }
    }

    /// Print information about config file locations
    pub fn print_config_info() {
        println!("Options Background Generator Configuration");
        println!("==========================================");

        if let Some(user_path) = Self::get_user_config_path() {
            println!("User config file: {}", user_path.display());
            if user_path.exists() {
                println!("  Status: ✓ Found");
            } else {
                println!("  Status: ✗ Not found (will use defaults)");
            }
        }

        if let Some(system_path) = Self::get_system_config_path() {
            println!("System config file: {}", system_path.display());
            if system_path.exists() {
                println!("  Status: ✓ Found");
            } else {
                println!("  Status: ✗ Not found");
            }
        }

        println!("\nEnvironment variables:");
        println!("  OPTIONS_BG_REMOTE_CONTROL__ENVIRONMENT");
        println!("  OPTIONS_BG_REMOTE_CONTROL__ON_FETCH_ERROR");
        println!("  OPTIONS_BG_CATALOG__GIT_REF");
        println!("  OPTIONS_BG_HTTP__TIMEOUT_SECS");
        println!("  OPTIONS_BG_OUTPUT__DIRECTORY");
        println!("  OPTIONS_BG_TUI__DISABLE_DELAY_MS");
    }
}
