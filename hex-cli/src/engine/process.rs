//! Engine running as a child process

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use super::{parse_response, parse_score, EngineClient, EngineError};

/// How long to wait for a `Score` line that lags behind a move reply
pub const SCORE_WAIT: Duration = Duration::from_millis(250);

/// Talks to an engine binary over its stdin/stdout.
///
/// Stderr is forwarded line by line over a channel from a background
/// thread. Stdout and stderr are separate pipes, so a response can arrive
/// before the stderr lines the engine wrote ahead of it; after a move
/// request the client keeps reading stderr for up to [`SCORE_WAIT`] until
/// a score shows up.
pub struct ProcessClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr_rx: Receiver<String>,
    diagnostics: Vec<String>,
}

impl ProcessClient {
    pub fn spawn(path: &Path, args: &[String]) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: path.display().to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;
        let stderr = child.stderr.take().ok_or(EngineError::Closed)?;

        let (tx, stderr_rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stderr).lines() {
                let Ok(line) = line else { break };
                tracing::trace!("engine stderr: {}", line);
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        tracing::debug!("engine started: {}", path.display());

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr_rx,
            diagnostics: Vec::new(),
        })
    }

    /// Lines of the next response, up to the blank line that ends it
    fn read_response(&mut self) -> Result<Vec<String>, EngineError> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(EngineError::Closed);
            }
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            tracing::trace!("engine stdout: {}", line);

            if line.trim().is_empty() {
                if lines.is_empty() {
                    continue;
                }
                return Ok(lines);
            }
            lines.push(line.to_string());
        }
    }

    /// Gather stderr written for the command just answered. Move requests
    /// wait a bounded time for their score line.
    fn collect_diagnostics(&mut self, wait_for_score: bool) {
        self.diagnostics.extend(self.stderr_rx.try_iter());
        if !wait_for_score {
            return;
        }

        let mut found = self.diagnostics.iter().any(|l| parse_score(l).is_some());
        let deadline = Instant::now() + SCORE_WAIT;
        while !found {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.stderr_rx.recv_timeout(remaining) {
                Ok(line) => {
                    found = parse_score(&line).is_some();
                    self.diagnostics.push(line);
                }
                // Timed out, or the engine closed stderr
                Err(_) => break,
            }
        }
    }
}

impl EngineClient for ProcessClient {
    fn send(&mut self, command: &str) -> Result<String, EngineError> {
        // Lines still queued belong to earlier commands
        self.diagnostics.clear();
        for _ in self.stderr_rx.try_iter() {}

        tracing::trace!("engine command: {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;

        let lines = self.read_response()?;
        let result = parse_response(command, &lines);
        self.collect_diagnostics(result.is_ok() && command.starts_with("reg_genmove"));
        result
    }

    fn diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Drop for ProcessClient {
    fn drop(&mut self) {
        // Already gone after `quit`; errors here carry no information
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
