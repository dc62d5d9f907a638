use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

pub trait Browser {
    /// Fire-and-forget: returns once the launcher has been spawned.
    fn open(&self, url: &str) -> Result<()>;
}

pub struct SystemBrowser {
    command: Option<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    fn launcher(&self) -> Result<Command> {
        match &self.command {
            Some(configured) => {
                let mut parts = configured.split_whitespace();
                let Some(program) = parts.next() else {
                    bail!("browser command is empty");
                };
                let mut cmd = Command::new(program);
                cmd.args(parts);
                Ok(cmd)
            }
            None => Ok(platform_launcher()),
        }
    }
}

fn platform_launcher() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    }
}

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut cmd = self.launcher()?;
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch browser for {}", url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_command_splits_arguments() {
        let browser = SystemBrowser::new(Some("firefox --new-tab".to_string()));
        let cmd = browser.launcher().unwrap();
        assert_eq!(cmd.get_program(), "firefox");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["--new-tab"]);
    }

    #[test]
    fn missing_launcher_is_an_error() {
        let browser = SystemBrowser::new(Some("definitely-not-a-browser-xyz".to_string()));
        let err = browser.open("https://example.com").unwrap_err();
        assert!(err.to_string().contains("failed to launch browser"), "{}", err);
    }
}
