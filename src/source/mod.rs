mod device;
mod file;

pub(crate) use device::DeviceSource;
pub(crate) use file::FileSource;

use std::path::PathBuf;

/// Identifies a message across polls so the monitor can skip it next time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MessageKey {
    /// Zero-based line index in a monitored file.
    Line(usize),
    /// `_id` column of the device's SMS inbox.
    Row(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawMessage {
    pub(crate) key: Option<MessageKey>,
    pub(crate) body: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SourceError {
    #[error("could not run `{program}`, is it installed and on PATH?")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Command {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("unexpected query output: {0}")]
    Malformed(String),
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can be polled for the messages currently available.
pub(crate) trait MessageSource {
    /// Short label for log lines.
    fn describe(&self) -> String;

    fn fetch(&mut self) -> Result<Vec<RawMessage>, SourceError>;
}
