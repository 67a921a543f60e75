//! Running external commands with a deadline.

use crate::common::errors::ProcessError;
use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// Run `program` with `args`, optionally feeding `input` on stdin.
///
/// The child is killed when `timeout` elapses. A non-zero exit status is
/// returned as a normal [`CommandOutput`]; callers decide what it means.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    input: Option<&str>,
    timeout: Duration,
) -> Result<CommandOutput, ProcessError> {
    let command_line = describe(program, args);
    log::debug!("Running `{command_line}` with timeout {timeout:?}");

    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    if let (Some(mut stdin), Some(text)) = (child.stdin.take(), input) {
        stdin.write_all(text.as_bytes())?;
    }

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            child.kill()?;
            let _ = child.wait();
            return Err(ProcessError::Timeout(command_line, timeout));
        }
    };

    let stdout = String::from_utf8(stdout.join().unwrap_or_default())?;
    let stderr = String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned();

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

/// Like [`run_with_timeout`] but treats a non-zero exit as an error.
pub fn run_checked(
    program: &str,
    args: &[&str],
    input: Option<&str>,
    timeout: Duration,
) -> Result<String, ProcessError> {
    let output = run_with_timeout(program, args, input, timeout)?;
    if !output.status.success() {
        return Err(ProcessError::CommandFailed(
            describe(program, args),
            output.status,
        ));
    }
    Ok(output.stdout)
}
