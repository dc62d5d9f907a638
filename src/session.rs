use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::browser::Browser;
use crate::git::GitRunner;
use crate::prompt::Prompter;

pub const GIT_FAILED: &str = "Git command failed!";

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub dry_run: bool,
    pub debug: bool,
    /// Echoed git output goes to stderr so stdout stays valid JSON.
    pub json: bool,
}

/// Everything a flow touches: the working directory it runs git in, the
/// runner, the source of answers and the browser launcher.
pub struct Session<'a> {
    git: &'a dyn GitRunner,
    prompter: &'a mut dyn Prompter,
    browser: &'a dyn Browser,
    cwd: PathBuf,
    options: SessionOptions,
}

impl<'a> Session<'a> {
    pub fn new(
        git: &'a dyn GitRunner,
        prompter: &'a mut dyn Prompter,
        browser: &'a dyn Browser,
        cwd: PathBuf,
        options: SessionOptions,
    ) -> Self {
        Self {
            git,
            prompter,
            browser,
            cwd,
            options,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Later steps in the flow run here; there is no way back.
    pub fn change_dir(&mut self, dir: &Path) {
        if self.options.debug {
            eprintln!("[debug] working directory: {}", dir.display());
        }
        self.cwd = dir.to_path_buf();
    }

    /// Runs one step, echoing its output. Failure carries `label` as context.
    pub fn run(&mut self, args: &[&str], label: &str) -> Result<String> {
        let output = self
            .git
            .run(&self.cwd, args)
            .with_context(|| label.to_string())?;
        if !output.is_empty() {
            self.say(&output);
        }
        Ok(output)
    }

    /// Like `run`, but the output is for the flow to inspect, not the user.
    pub fn query(&mut self, args: &[&str]) -> Result<String> {
        self.git
            .run(&self.cwd, args)
            .with_context(|| GIT_FAILED.to_string())
    }

    pub fn ask(&mut self, question: &str) -> Result<String> {
        self.prompter.ask(question)
    }

    pub fn say(&self, message: &str) {
        if self.options.json {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }

    /// Returns whether the browser was launched. Failure only warns.
    pub fn open_url(&self, url: &str) -> bool {
        if self.options.dry_run {
            eprintln!("[dry-run] open {}", url);
            return false;
        }
        match self.browser.open(url) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("warning: {:#}\n  open this URL manually: {}", e, url);
                false
            }
        }
    }
}
