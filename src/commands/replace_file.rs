use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ResolvedConfig;
use crate::paths::{expand_tilde, has_git_dir};
use crate::session::{Session, GIT_FAILED};

#[derive(Debug, Serialize)]
pub struct ReplaceFileResult {
    pub source: PathBuf,
    pub repo: PathBuf,
    pub target: String,
    /// Whether a file already existed at the target before the copy.
    pub replaced: bool,
    pub remote: String,
    pub branch: String,
    pub dry_run: bool,
}

fn validate_target(target: &str) -> Result<()> {
    if target.is_empty() {
        bail!("target path must not be empty");
    }
    if Path::new(target).is_absolute() {
        bail!(
            "target path must be relative to the repository: {}\n  hint: e.g. src/hi.py",
            target
        );
    }
    Ok(())
}

/// Copying a file onto itself truncates it before anything is read.
fn same_file(a: &Path, b: &Path) -> Result<bool> {
    let a = a
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", a.display()))?;
    let b = b
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", b.display()))?;
    Ok(a == b)
}

pub fn cmd_replace_file(
    session: &mut Session,
    config: &ResolvedConfig,
) -> Result<ReplaceFileResult> {
    let source = expand_tilde(&session.ask("Full path of the file to upload/replace: ")?);
    let repo = expand_tilde(&session.ask("Path to your local Git repo: ")?);
    let target = session.ask("Target file path in the repo (e.g., src/hi.py): ")?;
    let message = session.ask("Commit message? ")?;

    if !source.is_file() {
        bail!("Source file not found: {}", source.display());
    }
    if !has_git_dir(&repo) {
        bail!("Invalid Git repo: {}", repo.display());
    }
    validate_target(&target)?;

    let dest = repo.join(&target);
    let replaced = dest.exists();
    if replaced && same_file(&source, &dest)? {
        bail!(
            "{} and {} are the same file\n  hint: the file is already in the repo; commit it there instead",
            source.display(),
            dest.display()
        );
    }

    if session.dry_run() {
        eprintln!(
            "[dry-run] copy {} -> {}",
            source.display(),
            dest.display()
        );
    } else {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::copy(&source, &dest).with_context(|| {
            format!("failed to copy {} to {}", source.display(), dest.display())
        })?;
    }

    session.change_dir(&repo);
    session.run(&["add", &target], GIT_FAILED)?;
    session.run(&["commit", "-m", &message], GIT_FAILED)?;
    session.run(
        &["pull", &config.remote, &config.branch, "--rebase"],
        "Error pulling from remote.",
    )?;
    session.run(
        &["push", &config.remote, &config.branch],
        "Error pushing to GitHub.",
    )?;

    Ok(ReplaceFileResult {
        source,
        repo,
        target,
        replaced,
        remote: config.remote.clone(),
        branch: config.branch.clone(),
        dry_run: session.dry_run(),
    })
}

pub fn format_replace_file_human(result: &ReplaceFileResult) -> String {
    let mut lines = Vec::new();
    if result.dry_run {
        lines.push("Dry run: nothing was pushed.".to_string());
    } else {
        lines.push("✅ File successfully pushed.".to_string());
    }
    let verb = if result.replaced { "Replaced" } else { "Added" };
    lines.push(format!(
        "{} {} in {}",
        verb,
        result.target,
        result.repo.display()
    ));
    lines.push(format!("Branch: {}/{}", result.remote, result.branch));
    lines.join("\n")
}
