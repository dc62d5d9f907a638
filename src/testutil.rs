#![cfg(test)]

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use crate::browser::Browser;
use crate::config::ResolvedConfig;
use crate::git::GitRunner;
use crate::prompt::{Interruption, Prompter};

pub struct TestEnv {
    dir: TempDir,
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Commits made through `SystemGit` need an identity in the repo itself.
fn set_identity(repo: &Path) {
    run_git(repo, &["config", "user.name", "Test"]);
    run_git(repo, &["config", "user.email", "test@test.com"]);
    run_git(repo, &["config", "commit.gpgsign", "false"]);
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        std::fs::create_dir_all(dir.path().join("remotes")).unwrap();
        std::fs::create_dir_all(dir.path().join("work")).unwrap();
        Self { dir }
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.dir.path().join("projects")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A repo on branch `main` with one empty commit.
    pub fn create_repo(&self, name: &str) -> PathBuf {
        let repo_path = self.dir.path().join("work").join(name);
        std::fs::create_dir_all(&repo_path).unwrap();

        run_git(&repo_path, &["init"]);
        run_git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        set_identity(&repo_path);
        run_git(&repo_path, &["commit", "--allow-empty", "-m", "initial"]);

        repo_path
    }

    /// A bare remote seeded from a fresh repo, at `remotes/<name>.git`.
    pub fn create_remote(&self, name: &str) -> PathBuf {
        let seed = self.create_repo(&format!("{}-seed", name));
        let remote = self.dir.path().join("remotes").join(format!("{}.git", name));
        run_git(
            self.dir.path(),
            &[
                "clone",
                "--bare",
                seed.to_str().unwrap(),
                remote.to_str().unwrap(),
            ],
        );
        remote
    }

    /// Clones `remote` into `dest` and gives the clone an identity.
    pub fn clone_to(&self, remote: &Path, dest: &Path) -> PathBuf {
        run_git(
            self.dir.path(),
            &["clone", remote.to_str().unwrap(), dest.to_str().unwrap()],
        );
        set_identity(dest);
        dest.to_path_buf()
    }

    pub fn config(&self) -> ResolvedConfig {
        test_config(&self.projects_dir())
    }
}

pub fn test_config(projects_dir: &Path) -> ResolvedConfig {
    ResolvedConfig {
        projects_dir: projects_dir.to_path_buf(),
        branch: "main".to_string(),
        remote: "origin".to_string(),
        forge_url: "https://github.com".to_string(),
        browser_command: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GitCall {
    pub dir: PathBuf,
    pub args: Vec<String>,
}

/// Records every call. Succeeds with canned output unless told to fail on
/// a subcommand.
#[derive(Default)]
pub struct ScriptedGit {
    calls: RefCell<Vec<GitCall>>,
    outputs: HashMap<String, String>,
    fail_on: Option<String>,
    fail_on_call: Option<Vec<String>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, subcommand: &str, output: &str) -> Self {
        self.outputs
            .insert(subcommand.to_string(), output.to_string());
        self
    }

    pub fn fail_on(mut self, subcommand: &str) -> Self {
        self.fail_on = Some(subcommand.to_string());
        self
    }

    /// Fails only the call with exactly these arguments.
    pub fn fail_on_call(mut self, args: &[&str]) -> Self {
        self.fail_on_call = Some(args.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.args.first().cloned().unwrap_or_default())
            .collect()
    }

    pub fn arg_lists(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|c| c.args.clone()).collect()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        self.calls.borrow_mut().push(GitCall {
            dir: dir.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        let subcommand = args.first().copied().unwrap_or_default();
        let exact = self
            .fail_on_call
            .as_ref()
            .is_some_and(|expected| expected.iter().map(String::as_str).eq(args.iter().copied()));
        if exact || self.fail_on.as_deref() == Some(subcommand) {
            bail!(
                "git {} failed in {} (exit code: 1)\nstderr: scripted failure",
                args.join(" "),
                dir.display()
            );
        }
        Ok(self.outputs.get(subcommand).cloned().unwrap_or_default())
    }
}

/// Answers questions from a fixed script; running out means the user hit ^C.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => Err(Interruption::Interrupted.into()),
        }
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    opened: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingBrowser {
    pub fn failing() -> Self {
        Self {
            opened: RefCell::default(),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) -> Result<()> {
        if self.fail {
            bail!("failed to launch browser for {}", url);
        }
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}
