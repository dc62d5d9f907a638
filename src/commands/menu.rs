use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::session::Session;

use super::fork_pr::{cmd_fork_pr, format_fork_pr_human, ForkPrResult};
use super::replace_file::{cmd_replace_file, format_replace_file_human, ReplaceFileResult};
use super::upload_dir::{cmd_upload_dir, format_upload_dir_human, UploadDirResult};

pub const MENU: &str = "What would you like to do?
1. Upload a NEW DIRECTORY to GitHub
2. Upload or REPLACE an INDIVIDUAL FILE in an existing repo
3. Forked REPO: Clone, Modify, and Submit Pull Request";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    UploadDir,
    ReplaceFile,
    ForkPr,
}

impl Flow {
    pub fn from_choice(choice: &str) -> Option<Flow> {
        match choice.trim() {
            "1" => Some(Flow::UploadDir),
            "2" => Some(Flow::ReplaceFile),
            "3" => Some(Flow::ForkPr),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum FlowResult {
    UploadDir(UploadDirResult),
    ReplaceFile(ReplaceFileResult),
    ForkPr(ForkPrResult),
}

pub fn choose_flow(session: &mut Session) -> Result<Flow> {
    session.say(MENU);
    let choice = session.ask("Choose 1, 2, or 3: ")?;
    match Flow::from_choice(&choice) {
        Some(flow) => Ok(flow),
        None => bail!("Invalid choice. Please enter 1, 2, or 3."),
    }
}

pub fn run_flow(flow: Flow, session: &mut Session, config: &ResolvedConfig) -> Result<FlowResult> {
    let result = match flow {
        Flow::UploadDir => FlowResult::UploadDir(cmd_upload_dir(session, config)?),
        Flow::ReplaceFile => FlowResult::ReplaceFile(cmd_replace_file(session, config)?),
        Flow::ForkPr => FlowResult::ForkPr(cmd_fork_pr(session, config)?),
    };
    Ok(result)
}

pub fn format_flow_human(result: &FlowResult) -> String {
    match result {
        FlowResult::UploadDir(r) => format_upload_dir_human(r),
        FlowResult::ReplaceFile(r) => format_replace_file_human(r),
        FlowResult::ForkPr(r) => format_fork_pr_human(r),
    }
}
