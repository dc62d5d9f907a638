use clap::Parser;
use std::path::PathBuf;

/// With no flags, shows the menu and runs the chosen flow.
#[derive(Parser)]
#[command(
    name = "git-push-helper",
    version,
    about = "Interactive helper for common git upload, replace and fork workflows"
)]
pub struct Cli {
    /// Print the final summary as JSON (git output goes to stderr)
    #[arg(long)]
    pub json: bool,

    /// Print each git command and working-directory change
    #[arg(long)]
    pub debug: bool,

    /// Show the git commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the config file path and exit
    #[arg(long)]
    pub show_config_path: bool,

    /// Write a config file with every default spelled out, then exit
    #[arg(long)]
    pub write_config: bool,

    /// Overwrite an existing config file
    #[arg(long, requires = "write_config")]
    pub force: bool,
}
