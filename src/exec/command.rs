// src/exec/command.rs

//! Shell command execution.

use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::info;

/// Exit code reported when a process ended without one (e.g. killed by a
/// signal).
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run `cmd` through the platform shell in `cwd` and wait for it.
///
/// Stdio is inherited, so the command's output goes straight to the
/// terminal.
pub fn run_shell(cmd: &str, cwd: &Path) -> Result<ExitStatus> {
    info!(cmd = %cmd, "running");
    let status = shell_command(cmd)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("spawning `{cmd}`"))?;
    Ok(status)
}

pub fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(FALLBACK_EXIT_CODE)
}
