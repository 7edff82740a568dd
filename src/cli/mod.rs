use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Environment, OptionsBgConfig};
use crate::core::Session;
use crate::remote::Verdict;
use crate::remote::kill_switch::LaunchOptions;
use formatters::CliFormatter;

pub mod formatters;

#[derive(Parser)]
#[command(name = "options-bg-gen")]
#[command(about = "Build resource packs that swap the options menu background", long_about = None)]
pub struct Cli {
    /// Force the disabled state without asking the remote control
    #[arg(long, global = true)]
    pub disabled: bool,

    /// Treat this run as development: the remote control is not consulted
    #[arg(long, global = true)]
    pub dev: bool,

    /// Branch or tag of the asset mirror (`latest-release`, `latest-snapshot`, `1.20.1`, ...)
    #[arg(long = "ref", global = true)]
    pub git_ref: Option<String>,

    /// Directory packs are written to
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Show version information
    #[arg(long = "version", short = 'v', action = clap::ArgAction::SetTrue)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the TUI interface
    Tui {},

    /// List the textures that can be used
    List {},

    /// Build a pack from a texture without the TUI
    Build {
        /// Texture file name, e.g. `stone.png`
        texture: String,
    },

    /// Show whether the generator is currently enabled
    Status {},

    /// Show configuration file locations
    Config {
        /// Write the default configuration to the user config file
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    /// Layer command line flags over the loaded configuration
    fn apply_overrides(&self, config: &mut OptionsBgConfig) {
        if self.dev {
            config.remote_control.environment = Environment::Development;
        }
        if let Some(git_ref) = &self.git_ref {
            config.catalog.git_ref.clone_from(git_ref);
        }
        if let Some(output) = &self.output {
            config.output.directory.clone_from(output);
        }
    }

    const fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            manual_disable: self.disabled,
        }
    }
}

fn session_for(cli: &Cli) -> Result<Session, String> {
    let mut config =
        OptionsBgConfig::load().map_err(|e| format!("Failed to load configuration: {e}"))?;
    cli.apply_overrides(&mut config);
    Session::with_http(config, cli.launch_options())
}

/// Run the kill-switch check and turn a disabled verdict into an error
fn ensure_allowed(session: &Session) -> Result<(), String> {
    match session.check_allowed() {
        Verdict::Allowed => Ok(()),
        Verdict::Disabled(notice) => Err(CliFormatter::format_notice(&notice)),
    }
}

/// Run the CLI application
///
/// # Errors
///
/// This function will return an error if:
/// - The generator is disabled remotely or from the command line
/// - Configuration cannot be loaded
/// - The texture list or texture cannot be downloaded
/// - The pack cannot be written
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    // Handle version flag first
    if cli.version {
        print!("{}", crate::version::get_version_info());
        return Ok(());
    }

    crate::logger::init_log();

    match &cli.command {
        Some(Commands::Tui {}) => crate::tui::run_tui(session_for(&cli)?),
        Some(Commands::List {}) => {
            let mut session = session_for(&cli)?;
            ensure_allowed(&session)?;
            let catalog = session
                .load_catalog()
                .map_err(|e| format!("Error loading textures: {e}"))?;
            print!("{}", CliFormatter::format_catalog(catalog));
            Ok(())
        }
        Some(Commands::Build { texture }) => {
            let mut session = session_for(&cli)?;
            ensure_allowed(&session)?;
            session
                .load_catalog()
                .map_err(|e| format!("Error loading textures: {e}"))?;
            let pack = session
                .build_pack(texture)
                .map_err(|e| format!("Error building pack: {e}"))?;
            let path = session
                .save_pack(&pack)
                .map_err(|e| format!("Error saving pack: {e}"))?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Some(Commands::Status {}) => {
            let session = session_for(&cli)?;
            match session.check_allowed() {
                Verdict::Allowed => println!("The options background generator is enabled."),
                Verdict::Disabled(notice) => {
                    println!("{}", CliFormatter::format_notice(&notice));
                }
            }
            Ok(())
        }
        Some(Commands::Config { init }) => {
            if *init {
                let path = OptionsBgConfig::create_default_config_file()
                    .map_err(|e| format!("Failed to write config file: {e}"))?;
                println!("Wrote {}", path.display());
            } else {
                OptionsBgConfig::print_config_info();
            }
            Ok(())
        }
        None => {
            let mut cmd = Cli::command();
            cmd.print_help().map_err(|e| e.to_string())?;
            Ok(())
        }
    }
}
