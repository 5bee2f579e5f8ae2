//! Running a child command with its output routed through stream rules.

use crate::config::CaptureConfig;
use crate::console;
use crate::rule::TestRule;
use crate::stream_rule::StreamRule;
use anyhow::{Context, Result, anyhow};
use std::cell::Cell;
use std::process::{Command, Stdio};
use tracing::info;

/// What happened to a command run through [`CommandRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The child's exit code (1 when it was terminated by a signal).
    pub exit_code: i32,

    /// Bytes of standard output captured in the general log.
    pub stdout_logged: usize,

    /// Bytes of standard error captured in the general log.
    pub stderr_logged: usize,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs commands with this thread's standard output and error intercepted.
///
/// A failing command counts as a failed body, so with `mute_for_successful_tests` its output is
/// only shown when it exits with a non-zero code.
pub struct CommandRunner {
    config: CaptureConfig,
}

impl CommandRunner {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, program: &str, args: &[String]) -> Result<RunOutcome> {
        let out_rule = StreamRule::stdout()?;
        let err_rule = StreamRule::stderr()?;
        out_rule.configure(&self.config);
        err_rule.configure(&self.config);

        let exit_code = Cell::new(None);
        let result = out_rule.apply(|| {
            err_rule.apply(|| -> Result<()> {
                let output = Command::new(program)
                    .args(args)
                    .stdin(Stdio::null())
                    .output()
                    .with_context(|| format!("Failed to run \"{program}\""))?;

                console::out().write_bytes(&output.stdout)?;
                console::err().write_bytes(&output.stderr)?;
                console::out().flush()?;
                console::err().flush()?;

                let code = output.status.code().unwrap_or(1);
                exit_code.set(Some(code));
                if code == 0 {
                    Ok(())
                } else {
                    Err(anyhow!("\"{program}\" exited with code {code}"))
                }
            })
        });

        // Without an exit code the command never ran; its error is the one to report.
        let Some(exit_code) = exit_code.get() else {
            result?;
            return Err(anyhow!("\"{program}\" did not report an exit code"));
        };
        let outcome = RunOutcome {
            exit_code,
            stdout_logged: out_rule.log().len(),
            stderr_logged: err_rule.log().len(),
        };

        if self.config.enable_log {
            info!(
                "Logged {} bytes of standard output and {} bytes of standard error",
                outcome.stdout_logged, outcome.stderr_logged
            );
        }
        if !outcome.success() {
            info!("\"{}\" exited with code {}", program, outcome.exit_code);
        }

        Ok(outcome)
    }
}
