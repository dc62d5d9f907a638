use anyhow::{bail, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ResolvedConfig;
use crate::interrupt;
use crate::paths::{has_git_dir, project_dir};
use crate::prompt::cancel_cleanly;
use crate::session::{Session, GIT_FAILED};

#[derive(Debug, Serialize)]
pub struct UploadDirResult {
    pub folder: PathBuf,
    pub initialized: bool,
    /// URL registered under the remote name, when none existed yet.
    pub remote_added: Option<String>,
    pub remote: String,
    pub branch: String,
    pub dry_run: bool,
}

fn has_remote(listing: &str, remote: &str) -> bool {
    listing.lines().any(|line| line.trim() == remote)
}

pub fn cmd_upload_dir(session: &mut Session, config: &ResolvedConfig) -> Result<UploadDirResult> {
    let (name, message) = {
        let _scope = interrupt::clean_cancel();
        let name = session
            .ask(&format!(
                "📂 Project folder name (in {})? ",
                config.projects_dir.display()
            ))
            .map_err(cancel_cleanly)?;
        let message = session.ask("Commit message? ").map_err(cancel_cleanly)?;
        (name, message)
    };

    if name.is_empty() {
        bail!("folder name must not be empty");
    }
    let folder = project_dir(&config.projects_dir, &name);
    if !folder.is_dir() {
        bail!("Folder not found: {}.", folder.display());
    }

    session.change_dir(&folder);

    let initialized = !has_git_dir(&folder);
    if initialized {
        session.say("📁 Initializing Git repository...");
        session.run(&["init"], GIT_FAILED)?;
    }

    session.run(&["add", "."], GIT_FAILED)?;
    session.run(&["commit", "-m", &message], GIT_FAILED)?;
    session.run(&["branch", "-M", &config.branch], GIT_FAILED)?;

    // A failed listing counts as no remotes; the URL prompt follows.
    let remotes = session.query(&["remote"]).unwrap_or_default();
    let remote_added = if has_remote(&remotes, &config.remote) {
        None
    } else {
        let url = session.ask("Paste the GitHub repo URL: ")?;
        if url.is_empty() {
            bail!("repo URL must not be empty");
        }
        session.run(&["remote", "add", &config.remote, &url], GIT_FAILED)?;
        Some(url)
    };

    session.run(
        &["pull", &config.remote, &config.branch, "--rebase"],
        "Error pulling from remote.",
    )?;
    session.run(
        &["push", "-u", &config.remote, &config.branch],
        "Error pushing to GitHub.",
    )?;

    Ok(UploadDirResult {
        folder,
        initialized,
        remote_added,
        remote: config.remote.clone(),
        branch: config.branch.clone(),
        dry_run: session.dry_run(),
    })
}

pub fn format_upload_dir_human(result: &UploadDirResult) -> String {
    let mut lines = Vec::new();
    if result.dry_run {
        lines.push("Dry run: nothing was pushed.".to_string());
    } else {
        lines.push("✅ Successfully pushed to GitHub.".to_string());
    }
    lines.push(format!("Folder: {}", result.folder.display()));
    if result.initialized {
        lines.push("Initialized a new repository.".to_string());
    }
    if let Some(url) = &result.remote_added {
        lines.push(format!("Added remote {}: {}", result.remote, url));
    }
    lines.push(format!("Branch: {}/{}", result.remote, result.branch));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{interruption_of, Interruption};
    use crate::session::SessionOptions;
    use crate::testutil::{
        git_output, test_config, RecordingBrowser, ScriptedGit, ScriptedPrompter, TestEnv,
    };
    use crate::git::SystemGit;
    use serial_test::serial;
    use std::path::Path;

    fn run_flow(
        git: &dyn crate::git::GitRunner,
        prompts: &mut ScriptedPrompter,
        config: &ResolvedConfig,
    ) -> Result<UploadDirResult> {
        let browser = RecordingBrowser::default();
        let mut session = Session::new(
            git,
            prompts,
            &browser,
            PathBuf::from("/"),
            SessionOptions::default(),
        );
        cmd_upload_dir(&mut session, config)
    }

    #[test]
    #[serial]
    fn missing_folder_fails_before_any_git_command() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ScriptedGit::new();
        let mut prompts = ScriptedPrompter::new(&["nope", "first commit"]);

        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("Folder not found"), "{}", err);
        assert!(git.calls().is_empty());
    }

    #[test]
    #[serial]
    fn empty_folder_name_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ScriptedGit::new();
        let mut prompts = ScriptedPrompter::new(&["", "first commit"]);

        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{}", err);
        assert!(git.calls().is_empty());
    }

    #[test]
    #[serial]
    fn new_folder_without_remote_runs_full_sequence() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("site");
        std::fs::create_dir(&folder).unwrap();

        let git = ScriptedGit::new();
        let mut prompts = ScriptedPrompter::new(&[
            "site",
            "first commit",
            "https://github.com/me/site.git",
        ]);

        let result = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap();

        assert_eq!(
            git.arg_lists(),
            vec![
                vec!["init"],
                vec!["add", "."],
                vec!["commit", "-m", "first commit"],
                vec!["branch", "-M", "main"],
                vec!["remote"],
                vec!["remote", "add", "origin", "https://github.com/me/site.git"],
                vec!["pull", "origin", "main", "--rebase"],
                vec!["push", "-u", "origin", "main"],
            ]
        );
        assert!(git.calls().iter().all(|c| c.dir == folder));
        assert_eq!(prompts.asked.len(), 3);
        assert_eq!(prompts.asked[2], "Paste the GitHub repo URL: ");
        assert!(result.initialized);
        assert_eq!(
            result.remote_added.as_deref(),
            Some("https://github.com/me/site.git")
        );
    }

    #[test]
    #[serial]
    fn existing_repo_with_origin_skips_init_and_url_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new().respond("remote", "upstream\norigin");
        let mut prompts = ScriptedPrompter::new(&["site", "update"]);

        let result = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap();

        assert_eq!(
            git.subcommands(),
            vec!["add", "commit", "branch", "remote", "pull", "push"]
        );
        assert_eq!(prompts.asked.len(), 2);
        assert!(!result.initialized);
        assert!(result.remote_added.is_none());
    }

    #[test]
    #[serial]
    fn remote_name_must_match_a_whole_line() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new().respond("remote", "origin-mirror");
        let mut prompts =
            ScriptedPrompter::new(&["site", "update", "https://github.com/me/site.git"]);

        let result = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap();
        assert!(result.remote_added.is_some());
    }

    #[test]
    #[serial]
    fn failed_remote_listing_prompts_for_url() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new().fail_on_call(&["remote"]);
        let mut prompts =
            ScriptedPrompter::new(&["site", "update", "https://github.com/me/site.git"]);

        let result = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap();
        assert_eq!(
            result.remote_added.as_deref(),
            Some("https://github.com/me/site.git")
        );
        assert_eq!(
            git.subcommands(),
            vec!["add", "commit", "branch", "remote", "remote", "pull", "push"]
        );
    }

    #[test]
    #[serial]
    fn commit_failure_stops_the_flow() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new().fail_on("commit");
        let mut prompts = ScriptedPrompter::new(&["site", "nothing new"]);

        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert_eq!(err.to_string(), GIT_FAILED);
        assert_eq!(git.subcommands(), vec!["add", "commit"]);
    }

    #[test]
    #[serial]
    fn pull_failure_never_pushes() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new()
            .respond("remote", "origin")
            .fail_on("pull");
        let mut prompts = ScriptedPrompter::new(&["site", "update"]);

        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert_eq!(err.to_string(), "Error pulling from remote.");
        assert!(!git.subcommands().contains(&"push".to_string()));
    }

    #[test]
    #[serial]
    fn interruption_during_first_prompts_is_a_clean_cancel() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ScriptedGit::new();

        let mut prompts = ScriptedPrompter::new(&[]);
        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert_eq!(interruption_of(&err), Some(Interruption::Cancelled));

        let mut prompts = ScriptedPrompter::new(&["site"]);
        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert_eq!(interruption_of(&err), Some(Interruption::Cancelled));

        assert_eq!(crate::interrupt::interrupt_exit_code(), 1);
    }

    #[test]
    #[serial]
    fn interruption_at_url_prompt_is_not_clean() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("site").join(".git")).unwrap();

        let git = ScriptedGit::new();
        let mut prompts = ScriptedPrompter::new(&["site", "update"]);

        let err = run_flow(&git, &mut prompts, &test_config(tmp.path())).unwrap_err();
        assert_eq!(interruption_of(&err), Some(Interruption::Interrupted));
        assert_eq!(git.subcommands().last().map(String::as_str), Some("remote"));
    }

    #[test]
    #[serial]
    fn pushes_existing_clone_with_real_git() {
        let env = TestEnv::new();
        let remote = env.create_remote("site");
        let folder = env.clone_to(&remote, &env.projects_dir().join("site"));
        std::fs::write(folder.join("index.html"), "<h1>hi</h1>\n").unwrap();

        let git = SystemGit::new(false);
        let mut prompts = ScriptedPrompter::new(&["site", "add index"]);

        let result = run_flow(&git, &mut prompts, &env.config()).unwrap();
        assert!(!result.initialized);
        assert!(result.remote_added.is_none());

        let log = git_output(&remote, &["log", "--format=%s", "-1", "main"]);
        assert_eq!(log, "add index");
        assert!(Path::new(&folder).join(".git").is_dir());
    }

    #[test]
    fn format_human_lists_what_happened() {
        let result = UploadDirResult {
            folder: PathBuf::from("/home/me/Desktop/site"),
            initialized: true,
            remote_added: Some("https://github.com/me/site.git".to_string()),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            dry_run: false,
        };
        insta::assert_snapshot!(format_upload_dir_human(&result), @r"
✅ Successfully pushed to GitHub.
Folder: /home/me/Desktop/site
Initialized a new repository.
Added remote origin: https://github.com/me/site.git
Branch: origin/main
");
    }
}
