// Record files: the plain records that go into and come out of a run.
//
// A record is a JSON object. Only the text field is interpreted; every
// other field passes through untouched. Files ending in `.jsonl` or
// `.ndjson` hold one object per line; anything else is a JSON array.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// One input or output row.
pub type Record = Map<String, Value>;

/// Field added to each surviving record with its 1-based topic id.
pub const TOPIC_FIELD: &str = "Topic";

/// On-disk layout of a record file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A single JSON array of objects
    JsonArray,
    /// One JSON object per line
    JsonLines,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                RecordFormat::JsonLines
            }
            _ => RecordFormat::JsonArray,
        }
    }
}

/// The text of a record, if the field exists and holds a string.
///
/// Missing fields, nulls, numbers, and other non-string values all read as
/// absent text.
pub fn record_text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Load records from a file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let reader = BufReader::new(file);

    match RecordFormat::from_path(path) {
        RecordFormat::JsonLines => read_json_lines(reader)
            .with_context(|| format!("Failed to read records from {}", path.display())),
        RecordFormat::JsonArray => read_json_array(reader)
            .with_context(|| format!("Failed to read records from {}", path.display())),
    }
}

/// Parse newline-delimited JSON objects. Blank lines are skipped.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("Line {}: invalid JSON", i + 1))?;
        records.push(into_record(value, || format!("Line {}", i + 1))?);
    }
    Ok(records)
}

/// Parse a JSON array of objects.
pub fn read_json_array<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_reader(reader).context("Invalid JSON")?;
    let Value::Array(items) = value else {
        anyhow::bail!("Expected a JSON array of records at the top level");
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| into_record(item, || format!("Record {}", i + 1)))
        .collect()
}

fn into_record(value: Value, position: impl FnOnce() -> String) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!(
            "{}: expected a JSON object, found {}",
            position(),
            value_kind(&other)
        ),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An output file written to a sibling temporary path, not yet visible at
/// its destination.
///
/// `commit` renames it into place. Dropping it uncommitted removes the
/// temporary file, so a failed run leaves nothing behind.
#[derive(Debug)]
pub struct StagedFile {
    staging: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(dest: &Path) -> Self {
        let mut name = dest
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "output".into());
        name.push(".partial");
        Self {
            staging: dest.with_file_name(name),
            dest: dest.to_path_buf(),
            committed: false,
        }
    }

    /// Where the content currently lives.
    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    /// Move the staged content to its destination.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.staging, &self.dest).with_context(|| {
            format!(
                "Failed to move {} into place at {}",
                self.staging.display(),
                self.dest.display()
            )
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staging);
        }
    }
}

/// Serialize records to a staging file next to `path`, in the format
/// implied by its extension.
pub fn stage_records(path: &Path, records: &[Record]) -> Result<StagedFile> {
    let staged = StagedFile::new(path);
    let file = fs::File::create(&staged.staging)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match RecordFormat::from_path(path) {
        RecordFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
        }
        RecordFormat::JsonArray => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(staged)
}

/// Write arbitrary content to a staging file next to `path`.
pub fn stage_contents(path: &Path, contents: &[u8]) -> Result<StagedFile> {
    let staged = StagedFile::new(path);
    fs::write(&staged.staging, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(staged)
}

/// Write records to a file, in the format implied by its extension.
///
/// The destination only appears once the whole file has been written.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    stage_records(path, records)?.commit()
}
