//! Status feed: the line-oriented text source shown on the right of the bar.
//!
//! Lines come either from standard input or from the stdout of a command run
//! through `sh -c`. Each line is a sequence of plain text runs and `{...}`
//! directives; `{#RRGGBB}` switches the colour of the text that follows.

use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::process::{Child, Command, Stdio};

use thiserror::Error;

use crate::colors::Rgb;
use crate::constants::MAX_STATUS_LINE;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to start status command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("status command `{0}` has no stdout")]
    MissingStdout(String),
    #[error("failed to read status line: {0}")]
    Read(#[from] io::Error),
}

/// A run of status text and the colour it is drawn in. `None` means the
/// palette's default colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSegment {
    pub color: Option<Rgb>,
    pub text: String,
}

/// Split a status line into coloured segments. Parsing stops at the first
/// newline or at a `{` that is never closed.
pub fn parse_status(line: &str) -> Vec<StatusSegment> {
    let line = line.split('\n').next().unwrap_or_default();
    let mut segments = Vec::new();
    let mut color = None;
    let mut rest = line;
    while !rest.is_empty() {
        match rest.find('{') {
            Some(0) => {
                let Some(end) = rest.find('}') else {
                    break;
                };
                let directive = &rest[1..end];
                if directive.starts_with('#') {
                    match Rgb::parse_hex(directive) {
                        Some(rgb) => color = Some(rgb),
                        None => tracing::debug!(directive, "ignoring malformed colour"),
                    }
                }
                rest = &rest[end + 1..];
            }
            Some(start) => {
                segments.push(StatusSegment {
                    color,
                    text: rest[..start].to_string(),
                });
                rest = &rest[start..];
            }
            None => {
                segments.push(StatusSegment {
                    color,
                    text: rest.to_string(),
                });
                break;
            }
        }
    }
    segments
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// character.
pub fn clamp_to_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

enum Source {
    Stdin,
    Command { command: String, child: Child },
    Reader,
}

/// Bytes pulled per readiness notification.
const READ_CHUNK: usize = 1024;

/// Line source for the status area. Reads are driven by the event loop: one
/// `read` per readiness notification, so a line that arrives in pieces never
/// blocks the manager. Incomplete lines wait in `pending` for the rest.
pub struct StatusFeed {
    reader: Box<dyn Read>,
    fd: RawFd,
    source: Source,
    pending: Vec<u8>,
    closed: bool,
}

impl StatusFeed {
    pub fn from_stdin() -> Self {
        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();
        Self::with_source(Box::new(stdin), fd, Source::Stdin)
    }

    /// Run `command` through `sh -c` and read its stdout.
    pub fn from_command(command: &str) -> Result<Self, StatusError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| StatusError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StatusError::MissingStdout(command.to_string()))?;
        let fd = stdout.as_raw_fd();
        tracing::info!(command, pid = child.id(), "status command started");
        Ok(Self::with_source(
            Box::new(stdout),
            fd,
            Source::Command {
                command: command.to_string(),
                child,
            },
        ))
    }

    /// Feed backed by any readable descriptor, such as a pipe.
    pub fn from_reader<R: Read + AsRawFd + 'static>(reader: R) -> Self {
        let fd = reader.as_raw_fd();
        Self::with_source(Box::new(reader), fd, Source::Reader)
    }

    fn with_source(reader: Box<dyn Read>, fd: RawFd, source: Source) -> Self {
        Self {
            reader,
            fd,
            source,
            pending: Vec::with_capacity(MAX_STATUS_LINE),
            closed: false,
        }
    }

    pub fn raw_fd(&self) -> RawFd {
        self.fd
    }

    /// End of input was reached. Nothing more will be read.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Issue a single read and return every line it completed, oldest
    /// first. Call only once the descriptor is readable. At end of input a
    /// trailing unterminated line is returned as well and the feed closes.
    pub fn read_available(&mut self) -> Result<Vec<String>, StatusError> {
        if self.closed {
            return Ok(Vec::new());
        }
        let mut chunk = [0u8; READ_CHUNK];
        let n = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };

        let mut lines = Vec::new();
        if n == 0 {
            self.closed = true;
            if !self.pending.is_empty() {
                lines.push(self.finish_line());
            }
            return Ok(lines);
        }
        for &byte in &chunk[..n] {
            if byte == b'\n' {
                lines.push(self.finish_line());
            } else if self.pending.len() < MAX_STATUS_LINE - 1 {
                self.pending.push(byte);
            }
        }
        Ok(lines)
    }

    /// Bytes past the line bound were already dropped on the way in.
    fn finish_line(&mut self) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let text = String::from_utf8_lossy(&bytes);
        clamp_to_char_boundary(&text, MAX_STATUS_LINE - 1).to_string()
    }

    pub fn describe(&self) -> &str {
        match &self.source {
            Source::Stdin => "stdin",
            Source::Command { command, .. } => command,
            Source::Reader => "reader",
        }
    }
}

impl Drop for StatusFeed {
    fn drop(&mut self) {
        if let Source::Command { command, child } = &mut self.source {
            tracing::debug!(command = command.as_str(), "stopping status command");
            let _ = child.kill();
        }
    }
}
