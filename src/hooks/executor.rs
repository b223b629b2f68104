use crate::error::{BumpError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Executes hook commands through the shell
pub struct HookExecutor;

impl HookExecutor {
    /// Execute one hook command with the given context
    ///
    /// The command runs through `sh -c` in `cwd` after placeholder
    /// substitution, with the context's environment variables set. Any
    /// non-zero exit code is treated as a failure.
    ///
    /// # Returns
    /// * `Ok(())` if the command exits with code 0
    /// * `Err` if the shell cannot be spawned or the command fails
    pub fn execute(command: &str, context: &HookContext, cwd: &Path) -> Result<()> {
        let expanded = context.expand(command);
        debug!(hook = context.hook_type.name(), command = %expanded, "running hook");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&expanded)
            .current_dir(cwd)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| BumpError::hook(format!("Failed to execute '{}': {}", expanded, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(BumpError::hook(format!(
                "'{}' failed with exit code {}\nStdout: {}\nStderr: {}",
                expanded,
                output.status.code().unwrap_or(-1),
                stdout.trim_end(),
                stderr.trim_end()
            )));
        }

        Ok(())
    }

    /// Run commands in order, stopping at the first failure
    pub fn run_all(commands: &[String], context: &HookContext, cwd: &Path) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }

        info!(
            hook = context.hook_type.name(),
            count = commands.len(),
            "running hooks"
        );
        for command in commands {
            Self::execute(command, context, cwd)?;
        }
        Ok(())
    }
}
