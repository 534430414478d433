use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{Error, Result};
use super::command::{CommandSpec, CommandOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Anything able to execute a [`CommandSpec`]
pub trait CommandRunner {
    /// Run the command to completion.
    ///
    /// Errors with `ToolMissing` when the executable cannot be found,
    /// `Timeout` when the bound is exceeded (the child is killed), and
    /// `ToolFailed` on a non-zero exit when `spec.check` is set.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        if spec.program.is_empty() {
            return Err(Error::EmptyCommand);
        }
        debug!("Running `{}` (timeout: {:?})", spec, spec.timeout);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::null());
        if spec.stream_output {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ToolMissing { tool: spec.program.clone() },
            _ => Error::IoError(e),
        })?;

        let start = Instant::now();
        let timed_out = || Error::Timeout {
            command: spec.to_string(),
            timeout: spec.timeout.unwrap_or_default(),
        };

        // Drain pipes on their own threads so a chatty child can't fill the
        // pipe buffer and stall while we poll.
        let (tx, rx) = mpsc::channel();
        let mut pending = 0;
        if let Some(pipe) = child.stdout.take() {
            drain(Stream::Stdout, pipe, tx.clone());
            pending += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            drain(Stream::Stderr, pipe, tx.clone());
            pending += 1;
        }
        drop(tx);

        let status = match spec.timeout {
            Some(timeout) => match wait_with_timeout(&mut child, timeout)? {
                Some(status) => status,
                None => {
                    warn!("`{}` killed after {}s", spec, timeout.as_secs());
                    return Err(timed_out());
                }
            },
            None => child.wait()?,
        };

        // A background grandchild can hold the pipes open after the child
        // exits; the remaining budget bounds the wait for them too.
        let deadline = spec.timeout.map(|timeout| start + timeout);
        let Some((stdout, stderr)) = collect(&rx, pending, deadline) else {
            warn!("`{}` left its output open past {:?}", spec, spec.timeout);
            return Err(timed_out());
        };

        let output = CommandOutput {
            stdout,
            stderr,
            exit_code: status.code().unwrap_or(-1),
        };
        debug!("`{}` exited with {}", spec, output.exit_code);

        if spec.check && !output.success() {
            return Err(Error::ToolFailed {
                command: spec.to_string(),
                code: output.exit_code,
                stderr: output.stderr,
                stdout: output.stdout,
            });
        }

        Ok(output)
    }
}

/// Poll until the child exits or the timeout elapses.
///
/// Returns `None` after killing and reaping a child that overran.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(stream: Stream, mut pipe: R, tx: Sender<(Stream, String)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}

/// Gather `pending` drained pipes; `None` if the deadline passes first.
fn collect(
    rx: &Receiver<(Stream, String)>,
    pending: usize,
    deadline: Option<Instant>,
) -> Option<(String, String)> {
    let mut stdout = String::new();
    let mut stderr = String::new();
    for _ in 0..pending {
        let received = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(message) => Some(message),
                    Err(RecvTimeoutError::Timeout) => return None,
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => rx.recv().ok(),
        };
        match received {
            Some((Stream::Stdout, text)) => stdout = text,
            Some((Stream::Stderr, text)) => stderr = text,
            None => break,
        }
    }
    Some((stdout, stderr))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh", ["-c", script])
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let output = SystemRunner.run(&sh("echo out; echo err >&2")).unwrap();
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, 0);
        assert!(output.success());
    }

    #[test]
    fn test_nonzero_exit_unchecked_is_returned() {
        let output = SystemRunner.run(&sh("exit 3")).unwrap();
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[test]
    fn test_nonzero_exit_checked_is_error() {
        let err = SystemRunner.run(&sh("echo boom >&2; exit 2").checked()).unwrap_err();
        match err {
            Error::ToolFailed { code, stderr, .. } => {
                assert_eq!(code, 2);
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_tool_missing() {
        let spec = CommandSpec::new("definitely-not-a-real-binary-7f3a", ["--version"]);
        match SystemRunner.run(&spec) {
            Err(Error::ToolMissing { tool }) => assert_eq!(tool, "definitely-not-a-real-binary-7f3a"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let spec = sh("sleep 5").with_timeout(Duration::from_millis(200));
        let start = Instant::now();
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_background_grandchild_holding_pipes_times_out() {
        let spec = sh("sleep 6 & echo hi").with_timeout(Duration::from_secs(1));
        let start = Instant::now();
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_large_output_does_not_stall() {
        let spec = sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done")
            .with_timeout(Duration::from_secs(30));
        let output = SystemRunner.run(&spec).unwrap();
        assert_eq!(output.stdout.lines().count(), 20000);
    }
}
