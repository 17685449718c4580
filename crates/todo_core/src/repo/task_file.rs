//! Flat-file task storage and its line codec.
//!
//! # Responsibility
//! - Encode and decode the `id|description|done|created|deadline|priority`
//!   line format.
//! - Provide the `TaskStorage` seam with file-backed and in-memory
//!   implementations.
//!
//! # Invariants
//! - Encoded descriptions never contain an unescaped `|` or line break.
//! - File writes replace the target atomically (temp file + rename).
//! - A missing backing file reads as `None`, not as an error.
//! - Invalid UTF-8 is decoded lossily instead of failing the read.
//! - Fields past the sixth are ignored on decode.

use crate::model::date::{format_date, parse_date, TaskDate};
use crate::model::task::{Priority, Task, TaskId};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

const FIELD_DELIMITER: char = '|';
const ESCAPE: char = '\\';
const FIELD_COUNT: usize = 6;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure for the backing store.
#[derive(Debug)]
pub enum StorageError {
    Io { path: PathBuf, source: io::Error },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "task file `{}` is not accessible: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Reason a persisted line could not be turned into a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingFields { found: usize },
    InvalidId(String),
    InvalidCompletedFlag(String),
    InvalidPriority(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { found } => {
                write!(f, "expected {FIELD_COUNT} fields, found {found}")
            }
            Self::InvalidId(value) => write!(f, "invalid task id `{value}`"),
            Self::InvalidCompletedFlag(value) => {
                write!(f, "invalid completed flag `{value}`; expected 0|1")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority index `{value}`; expected 0|1|2")
            }
        }
    }
}

impl Error for RecordError {}

/// A task decoded from one persisted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    pub task: Task,
    /// `true` when the created field was unreadable and `fallback_created` was used.
    pub created_defaulted: bool,
}

/// Backing storage for the full serialized task collection.
pub trait TaskStorage {
    /// Returns the stored text, or `None` when nothing has been stored yet.
    fn read(&self) -> StorageResult<Option<String>>;
    /// Replaces the stored text in full.
    fn write(&mut self, contents: &str) -> StorageResult<()>;
}

/// File-backed storage that rewrites the whole file on each write.
#[derive(Debug, Clone)]
pub struct FileTaskStorage {
    path: PathBuf,
}

impl FileTaskStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskStorage for FileTaskStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        // Legacy files may use a non-UTF-8 code page; keep every line readable.
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) => {
                warn!(
                    "event=storage_read module=repo status=lossy valid_up_to={}",
                    err.utf8_error().valid_up_to()
                );
                Ok(Some(String::from_utf8_lossy(err.as_bytes()).into_owned()))
            }
        }
    }

    fn write(&mut self, contents: &str) -> StorageResult<()> {
        // The temp file must share a filesystem with the target for rename to be atomic.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir).map_err(|err| self.io_error(err))?;
        temp.write_all(contents.as_bytes())
            .map_err(|err| self.io_error(err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| self.io_error(err))?;
        temp.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

/// In-memory storage that records how many writes it received.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStorage {
    contents: Option<String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryTaskStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds storage as if a file with `contents` already existed.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Makes subsequent writes fail with a permission error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl TaskStorage for MemoryTaskStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Io {
                path: PathBuf::from(":memory:"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }
        self.contents = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Serializes tasks into the persisted text, one line per task.
pub fn encode_tasks(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&encode_line(task));
        out.push('\n');
    }
    out
}

/// Serializes one task without the trailing newline.
pub fn encode_line(task: &Task) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        task.id,
        escape_field(&task.description),
        u8::from(task.completed),
        task.created,
        format_date(task.deadline),
        task.priority.index()
    )
}

/// Parses one persisted line.
///
/// `fallback_created` is used when the created field is not a valid date.
/// Unreadable deadlines become `None`.
pub fn decode_line(line: &str, fallback_created: TaskDate) -> Result<DecodedLine, RecordError> {
    let fields = split_fields(line);
    if fields.len() < FIELD_COUNT {
        return Err(RecordError::MissingFields {
            found: fields.len(),
        });
    }

    let id = parse_id(&fields[0])?;
    let completed = match fields[2].trim() {
        "0" => false,
        "1" => true,
        other => return Err(RecordError::InvalidCompletedFlag(other.to_string())),
    };
    let priority = fields[5]
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(Priority::from_index)
        .ok_or_else(|| RecordError::InvalidPriority(fields[5].clone()))?;

    let parsed_created = parse_date(&fields[3]);
    let task = Task {
        id,
        description: fields[1].clone(),
        completed,
        created: parsed_created.unwrap_or(fallback_created),
        deadline: parse_date(&fields[4]),
        priority,
    };

    Ok(DecodedLine {
        task,
        created_defaulted: parsed_created.is_none(),
    })
}

fn parse_id(value: &str) -> Result<TaskId, RecordError> {
    match value.trim().parse::<TaskId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RecordError::InvalidId(value.to_string())),
    }
}

fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            FIELD_DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Splits on unescaped delimiters and resolves escapes in every field.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => current.push(other),
                None => current.push(ESCAPE),
            },
            FIELD_DELIMITER => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::{decode_line, encode_line, split_fields, RecordError};
    use crate::model::date::TaskDate;
    use crate::model::task::{Priority, Task};

    fn fallback() -> TaskDate {
        TaskDate::new(14, 10, 2026)
    }

    #[test]
    fn decode_reads_the_documented_layout() {
        let decoded = decode_line("4|Pay rent|1|03.01.2025|-|2", fallback()).unwrap();
        assert_eq!(decoded.task.id, 4);
        assert_eq!(decoded.task.description, "Pay rent");
        assert!(decoded.task.completed);
        assert_eq!(decoded.task.created, TaskDate::new(3, 1, 2025));
        assert_eq!(decoded.task.deadline, None);
        assert_eq!(decoded.task.priority, Priority::High);
        assert!(!decoded.created_defaulted);
    }

    #[test]
    fn encode_escapes_delimiter_and_line_breaks() {
        let mut task = Task::new(
            2,
            "a|b\\c\nd",
            TaskDate::new(1, 2, 2024),
            Some(TaskDate::new(5, 6, 2024)),
            Priority::Medium,
        );
        task.completed = true;

        let line = encode_line(&task);
        assert_eq!(line, "2|a\\|b\\\\c\\nd|1|01.02.2024|05.06.2024|1");
        assert!(!line.contains('\n'));

        let decoded = decode_line(&line, fallback()).unwrap();
        assert_eq!(decoded.task, task);
    }

    #[test]
    fn decode_ignores_trailing_fields() {
        let decoded = decode_line("1|x|0|01.01.2024|-|0|future|field", fallback()).unwrap();
        assert_eq!(decoded.task.description, "x");
    }

    #[test]
    fn decode_defaults_unreadable_dates() {
        let decoded = decode_line("1|x|0|-|soon|0", fallback()).unwrap();
        assert_eq!(decoded.task.created, fallback());
        assert!(decoded.created_defaulted);
        assert_eq!(decoded.task.deadline, None);
    }

    #[test]
    fn decode_rejects_malformed_records() {
        assert_eq!(
            decode_line("1|x|0", fallback()).unwrap_err(),
            RecordError::MissingFields { found: 3 }
        );
        assert!(matches!(
            decode_line("abc|x|0|-|-|0", fallback()).unwrap_err(),
            RecordError::InvalidId(_)
        ));
        assert!(matches!(
            decode_line("0|x|0|-|-|0", fallback()).unwrap_err(),
            RecordError::InvalidId(_)
        ));
        assert!(matches!(
            decode_line("1|x|yes|-|-|0", fallback()).unwrap_err(),
            RecordError::InvalidCompletedFlag(_)
        ));
        assert!(matches!(
            decode_line("1|x|0|-|-|3", fallback()).unwrap_err(),
            RecordError::InvalidPriority(_)
        ));
    }

    #[test]
    fn split_keeps_trailing_backslash_literal() {
        assert_eq!(split_fields("a\\"), vec!["a\\".to_string()]);
        assert_eq!(split_fields("|"), vec![String::new(), String::new()]);
    }
}
