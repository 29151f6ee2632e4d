use crate::error::{BumpError, Result};
use crate::hooks::HookContext;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs a project's lifecycle scripts
pub trait ScriptRunner {
    /// Human-readable command for plans and dry runs, e.g. `npm run version`
    fn describe(&self, script: &str) -> String;

    /// Run `script`; a non-zero exit is a [`BumpError::HookFailure`]
    fn run(&self, script: &str, context: &HookContext) -> Result<()>;
}

/// Executes scripts through a package manager (`<program> run <script>`)
pub struct NpmScriptRunner {
    program: String,
    project_dir: PathBuf,
}

impl NpmScriptRunner {
    pub fn new(program: impl Into<String>, project_dir: &Path) -> Self {
        NpmScriptRunner {
            program: program.into(),
            project_dir: project_dir.to_path_buf(),
        }
    }
}

impl ScriptRunner for NpmScriptRunner {
    fn describe(&self, script: &str) -> String {
        format!("{} run {}", self.program, script)
    }

    fn run(&self, script: &str, context: &HookContext) -> Result<()> {
        tracing::debug!(program = %self.program, script, "running lifecycle script");

        // Script output goes straight to the terminal while it runs
        let status = Command::new(&self.program)
            .args(["run", script])
            .current_dir(&self.project_dir)
            .envs(context.to_env_vars())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                BumpError::hook(
                    script,
                    format!("Failed to execute '{}': {}", self.describe(script), e),
                )
            })?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(BumpError::hook(script, reason));
        }

        Ok(())
    }
}
