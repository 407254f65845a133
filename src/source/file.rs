use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{MessageKey, MessageSource, RawMessage, SourceError};

/// Plain text file, one message per line, appended to by some other
/// program (an SMS forwarding app, a shell redirect, ...).
pub(crate) struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    /// Re-reads the whole file and returns every newline-terminated line. A
    /// file that does not exist yet yields nothing; the producer may simply
    /// not have written it.
    fn fetch(&mut self) -> Result<Vec<RawMessage>, SourceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let text: &str = &text;
        // A last line without its newline may still be mid-write; leave it
        // for the next poll
        let complete = text.rfind('\n').map_or("", |end| &text[..=end]);
        Ok(complete
            .lines()
            .enumerate()
            .map(|(i, line)| (i, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| RawMessage {
                key: Some(MessageKey::Line(i)),
                body: line.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
