use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs a single git command in `dir` and returns its trimmed stdout.
/// A non-zero exit is an error carrying the captured stderr.
pub trait GitRunner {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String>;
}

pub struct SystemGit {
    debug: bool,
}

impl SystemGit {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        if self.debug {
            eprintln!("[debug] git {} (in {})", args.join(" "), dir.display());
        }

        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run git {:?} in {}", args, dir.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "git {} failed in {} (exit code: {})\nstderr: {}",
                args.join(" "),
                dir.display(),
                output
                    .status
                    .code()
                    .map_or("signal".to_string(), |c| c.to_string()),
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("git output was not valid UTF-8")?;
        Ok(stdout.trim_end().to_string())
    }
}

/// Prints what would run and reports success with empty output.
pub struct DryRunGit;

impl GitRunner for DryRunGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        eprintln!("[dry-run] git {} (in {})", args.join(" "), dir.display());
        Ok(String::new())
    }
}
