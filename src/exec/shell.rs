//! The real shell executor.

use std::io::Read;
use std::process::{ChildStderr, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::CapturedOutput;
use crate::error::{Result, SherpaError};

use super::{CommandExecutor, ExecRequest};

/// Executes commands through `sh -c`, capturing both streams and
/// enforcing the caller-supplied timeout. A timeout kills the child and
/// is reported as captured output with a synthetic stderr line, so the
/// handler matcher treats it like any other failure.
#[derive(Debug, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

// Streams are drained on threads so a chatty child never fills the pipe
// and deadlocks against our wait loop.
fn drain<R: Read + Send + 'static>(stream: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut stream = stream;
        let mut buf = String::new();
        let _ = stream.read_to_string(&mut buf);
        buf
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, request: &ExecRequest) -> Result<CapturedOutput> {
        debug!(command = %request.command, "executing");
        let start = Instant::now();

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&request.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| SherpaError::CommandFailed {
                command: request.command.clone(),
                code: None,
            })?;

        let stdout_reader = child.stdout.take().map(|s: ChildStdout| drain(s));
        let stderr_reader = child.stderr.take().map(|s: ChildStderr| drain(s));
        let deadline = request.timeout.map(Duration::from_secs);

        loop {
            match child.try_wait()? {
                Some(status) => {
                    let stdout = join(stdout_reader);
                    let stderr = join(stderr_reader);
                    debug!(code = ?status.code(), elapsed = ?start.elapsed(), "command finished");
                    return Ok(CapturedOutput {
                        exit_code: status.code(),
                        stdout,
                        stderr,
                        timed_out: false,
                    });
                }
                None => {
                    if let Some(limit) = deadline {
                        if start.elapsed() >= limit {
                            let _ = child.kill();
                            let _ = child.wait();
                            let seconds = limit.as_secs();
                            let stdout = join(stdout_reader);
                            let mut stderr = join(stderr_reader);
                            if !stderr.is_empty() && !stderr.ends_with('\n') {
                                stderr.push('\n');
                            }
                            stderr.push_str(&format!("command timed out after {}s", seconds));
                            debug!(seconds, "command timed out");
                            return Ok(CapturedOutput {
                                exit_code: None,
                                stdout,
                                stderr,
                                timed_out: true,
                            });
                        }
                    }
                    thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }
}
