//! Telling running applications to pick up rewritten configuration.
//!
//! Each application declares a [`ReloadKind`] in the registry. A reload is
//! one external command: a signal sent with `pkill` or the application's own
//! reload subcommand. Reloading is best-effort; the outcome is reported but
//! never changes whether the theme counts as applied.

use crate::apps::AppId;
use crate::common::errors::ThemeError;
use crate::utils::process::run_with_timeout;
use serde::Serialize;
use std::time::Duration;

/// Default deadline for a reload command.
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// `pkill` exits with 1 when no process matched.
const PKILL_NO_MATCH: i32 = 1;

/// How an application is asked to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Deliver `signal` to every process named `process`.
    Signal {
        signal: &'static str,
        process: &'static str,
    },
    /// Run the application's reload command.
    CliReload {
        program: &'static str,
        args: &'static [&'static str],
    },
    /// Changes apply the next time the application starts.
    None,
}

/// Result of a reload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ReloadOutcome {
    Reloaded,
    NotRunning,
    NotNeeded,
    Skipped,
    Failed(String),
}

/// Reload capability used by the orchestrator.
pub trait Reloader {
    fn reload(&self, app: AppId, kind: ReloadKind) -> ReloadOutcome;
}

/// Runs the declared reload command with a timeout.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    timeout: Duration,
}

impl CommandReloader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CommandReloader {
    fn default() -> Self {
        Self::new(DEFAULT_RELOAD_TIMEOUT)
    }
}

impl Reloader for CommandReloader {
    fn reload(&self, app: AppId, kind: ReloadKind) -> ReloadOutcome {
        let (program, args): (&str, Vec<&str>) = match kind {
            ReloadKind::None => return ReloadOutcome::NotNeeded,
            ReloadKind::Signal { signal, process } => {
                ("pkill", vec![signal_flag(signal), "-x", process])
            }
            ReloadKind::CliReload { program, args } => (program, args.to_vec()),
        };

        match run_with_timeout(program, &args, None, self.timeout) {
            Ok(output) if output.status.success() => {
                log::info!("Reloaded {app}");
                ReloadOutcome::Reloaded
            }
            Ok(output)
                if matches!(kind, ReloadKind::Signal { .. })
                    && output.code() == Some(PKILL_NO_MATCH) =>
            {
                log::info!("{app} is not running, nothing to reload");
                ReloadOutcome::NotRunning
            }
            Ok(output) => {
                let reason = format!(
                    "`{program}` exited with {}: {}",
                    output.status,
                    output.stderr.trim()
                );
                log::warn!("Failed to reload {app}: {reason}");
                ReloadOutcome::Failed(reason)
            }
            Err(e) => {
                let error = ThemeError::ExternalToolFailure {
                    tool: program.to_string(),
                    reason: e.to_string(),
                };
                log::warn!("Failed to reload {app}: {error}");
                ReloadOutcome::Failed(error.to_string())
            }
        }
    }
}

fn signal_flag(signal: &str) -> &'static str {
    match signal {
        "SIGUSR1" => "-USR1",
        "SIGUSR2" => "-USR2",
        "SIGHUP" => "-HUP",
        _ => "-TERM",
    }
}

/// Reloader that never runs anything, used when reloading is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReloader;

impl Reloader for NoopReloader {
    fn reload(&self, app: AppId, _kind: ReloadKind) -> ReloadOutcome {
        log::debug!("Reload disabled, not reloading {app}");
        ReloadOutcome::Skipped
    }
}
