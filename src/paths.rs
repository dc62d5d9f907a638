use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const GIT_DIR: &str = ".git";

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}

pub fn project_dir(projects_dir: &Path, name: &str) -> PathBuf {
    projects_dir.join(name)
}

/// The presence of a `.git` directory is the only marker of a repository.
pub fn has_git_dir(dir: &Path) -> bool {
    dir.join(GIT_DIR).is_dir()
}

/// Owner and repository name derived from a fork's clone URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkUrl {
    pub url: String,
    pub owner: String,
    pub repo: String,
}

impl ForkUrl {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let trimmed = url.trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("fork URL must not be empty");
        }

        // https://host/owner/repo.git, or scp-like git@host:owner/repo.git
        let path = match trimmed.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map_or("", |(_, p)| p),
            None => trimmed.split_once(':').map_or(trimmed, |(_, p)| p),
        };

        let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
        let last = segments.next().unwrap_or("");
        let repo = last.strip_suffix(".git").unwrap_or(last);
        if repo.is_empty() {
            bail!(
                "could not determine repository name from {:?}\n  hint: paste a URL like https://github.com/you/project.git",
                url
            );
        }
        let owner = match segments.next() {
            Some(owner) => owner,
            None => bail!(
                "could not determine repository owner from {:?}\n  hint: paste a URL like https://github.com/you/project.git",
                url
            ),
        };

        Ok(Self {
            url: url.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn compare_url(&self, forge_url: &str, branch: &str) -> String {
        format!(
            "{}/{}/{}/compare/{}...{}?expand=1",
            forge_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            branch,
            branch
        )
    }
}
