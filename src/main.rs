mod browser;
mod cli;
mod commands;
mod config;
mod git;
mod interrupt;
mod paths;
mod prompt;
mod session;
mod testutil;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

use browser::SystemBrowser;
use git::{DryRunGit, GitRunner, SystemGit};
use prompt::{interruption_of, StdinPrompter};
use session::{Session, SessionOptions};

fn main() {
    let cli = Cli::parse();
    interrupt::install();

    if let Err(e) = run(cli) {
        std::process::exit(report_error(&e));
    }
}

fn report_error(e: &anyhow::Error) -> i32 {
    if let Some(interruption) = interruption_of(e) {
        eprintln!("\n❌ {}", interruption);
        return interruption.exit_code();
    }

    eprintln!("❌ {}", e);
    for cause in e.chain().skip(1) {
        eprintln!("{}", cause);
    }
    1
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    if cli.show_config_path {
        println!("{}", config_path.display());
        return Ok(());
    }
    if cli.write_config {
        config::write_config_atomic(&config_path, &config::default_config_file(), cli.force)?;
        println!("Config written to {}", config_path.display());
        return Ok(());
    }

    if cli.debug {
        eprintln!("[debug] config: {}", config_path.display());
    }
    let config = config::load_config_or_default(&config_path)?;
    if cli.debug {
        eprintln!("[debug] projects dir: {}", config.projects_dir.display());
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let system_git = SystemGit::new(cli.debug);
    let git: &dyn GitRunner = if cli.dry_run { &DryRunGit } else { &system_git };
    let mut prompter = StdinPrompter::new();
    let browser = SystemBrowser::new(config.browser_command.clone());
    let mut session = Session::new(
        git,
        &mut prompter,
        &browser,
        cwd,
        SessionOptions {
            dry_run: cli.dry_run,
            debug: cli.debug,
            json: cli.json,
        },
    );

    let flow = commands::choose_flow(&mut session)?;
    let result = commands::run_flow(flow, &mut session, &config)?;
    output(&result, cli.json, commands::format_flow_human)
}

fn output<T: serde::Serialize>(result: &T, json: bool, human_fn: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let text = human_fn(result);
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}
