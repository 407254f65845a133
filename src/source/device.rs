use std::process::Command;

use super::{MessageKey, MessageSource, RawMessage, SourceError};

const INBOX_URI: &str = "content://sms/inbox";
const PROJECTION: &str = "_id,address,body,date";
const UNREAD_ONLY: &str = "read=0";

/// Unread SMS pulled from an Android phone through `adb shell content query`.
pub(crate) struct DeviceSource {
    program: String,
    serial: Option<String>,
}

impl DeviceSource {
    pub(crate) fn new(program: impl Into<String>, serial: Option<String>) -> Self {
        Self {
            program: program.into(),
            serial,
        }
    }

    fn query_args(&self) -> Vec<&str> {
        let mut args = Vec::new();
        if let Some(serial) = &self.serial {
            args.extend(["-s", serial.as_str()]);
        }
        args.extend([
            "shell",
            "content",
            "query",
            "--uri",
            INBOX_URI,
            "--projection",
            PROJECTION,
            "--where",
            UNREAD_ONLY,
        ]);
        args
    }
}

impl MessageSource for DeviceSource {
    fn describe(&self) -> String {
        match &self.serial {
            Some(serial) => format!("device {serial} via {}", self.program),
            None => format!("device via {}", self.program),
        }
    }

    fn fetch(&mut self) -> Result<Vec<RawMessage>, SourceError> {
        let output = Command::new(&self.program)
            .args(self.query_args())
            .output()
            .map_err(|source| SourceError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Command {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_query_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Split `content query` output into messages.
///
/// Each row starts with `Row: <n> ` followed by `column=value` pairs in
/// projection order. A body may contain newlines, so lines that do not start
/// a new row belong to the previous one.
fn parse_query_output(stdout: &str) -> Result<Vec<RawMessage>, SourceError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("no result found.") {
        return Ok(Vec::new());
    }

    let mut rows: Vec<String> = Vec::new();
    for line in trimmed.lines() {
        if line.starts_with("Row:") {
            rows.push(line.to_string());
        } else if let Some(last) = rows.last_mut() {
            last.push('\n');
            last.push_str(line);
        }
    }

    if rows.is_empty() {
        let preview: String = trimmed.chars().take(80).collect();
        return Err(SourceError::Malformed(preview));
    }

    Ok(rows
        .iter()
        .filter_map(|row| parse_row(row))
        .collect())
}

fn parse_row(row: &str) -> Option<RawMessage> {
    let start = row.find("body=")? + "body=".len();
    let rest = &row[start..];
    let body = match rest.rfind(", date=") {
        Some(end) => &rest[..end],
        None => rest,
    }
    .trim();

    if body.is_empty() {
        return None;
    }

    Some(RawMessage {
        key: row_id(row).map(MessageKey::Row),
        body: body.to_string(),
    })
}

fn row_id(row: &str) -> Option<u64> {
    let start = row.find("_id=")? + "_id=".len();
    let digits: String = row[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
