use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ResolvedConfig;
use crate::paths::{project_dir, ForkUrl};
use crate::session::{Session, GIT_FAILED};

#[derive(Debug, Serialize)]
pub struct ForkPrResult {
    pub fork: ForkUrl,
    pub clone_dir: PathBuf,
    pub pr_url: String,
    pub browser_opened: bool,
    pub dry_run: bool,
}

pub fn cmd_fork_pr(session: &mut Session, config: &ResolvedConfig) -> Result<ForkPrResult> {
    let url = session.ask("Paste the FORKED repo URL (your fork, not the original): ")?;
    let fork = ForkUrl::parse(&url)?;
    let clone_dir = project_dir(&config.projects_dir, &fork.repo);
    let clone_dir_arg = clone_dir.to_string_lossy().into_owned();

    session.say("📥 Cloning the forked repo...");
    session.run(
        &["clone", &fork.url, &clone_dir_arg],
        "Error cloning the fork.",
    )?;
    session.say(&format!("✅ Repo cloned to: {}", clone_dir.display()));

    session.say("\n🛠️ You can now modify files manually in that folder.");
    session.ask("Press Enter when you're done making changes to continue...")?;

    session.change_dir(&clone_dir);
    session.run(&["add", "."], GIT_FAILED)?;
    let message = session.ask("Enter commit message for your changes: ")?;
    session.run(&["commit", "-m", &message], GIT_FAILED)?;
    session.run(
        &["push", &config.remote, &config.branch],
        "Error pushing to GitHub.",
    )?;

    session.say("🌐 Opening GitHub to create a pull request...");
    let pr_url = fork.compare_url(&config.forge_url, &config.branch);
    session.say(&pr_url);
    let browser_opened = session.open_url(&pr_url);

    Ok(ForkPrResult {
        fork,
        clone_dir,
        pr_url,
        browser_opened,
        dry_run: session.dry_run(),
    })
}

pub fn format_fork_pr_human(result: &ForkPrResult) -> String {
    let mut lines = Vec::new();
    if result.dry_run {
        lines.push("Dry run: nothing was pushed.".to_string());
    } else if result.browser_opened {
        lines.push("✅ All done! Finish creating the pull request in your browser.".to_string());
    } else {
        lines.push("✅ Pushed. Open this URL to create the pull request:".to_string());
    }
    lines.push(format!("Pull request: {}", result.pr_url));
    lines.push(format!("Clone: {}", result.clone_dir.display()));
    lines.join("\n")
}
