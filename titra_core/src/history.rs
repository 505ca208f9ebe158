//! Calculation history.
//!
//! Records are appended to a JSONL (JSON Lines) file with file locking so
//! that several processes can share one history safely. Record ids are
//! creation timestamps in milliseconds, bumped when needed so they strictly
//! increase within a store.

use crate::{Error, Result, TitrationInput, TitrationRecord, TitrationResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Storage for past calculations
pub trait HistoryStore {
    /// Record a calculation and return the stored record
    fn append(&mut self, input: TitrationInput, result: TitrationResult)
        -> Result<TitrationRecord>;

    /// All records, newest first
    fn records(&self) -> Result<Vec<TitrationRecord>>;

    /// Remove all records, returning how many were removed
    fn clear(&mut self) -> Result<usize>;
}

/// Current time in Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Pick the id for a new record
///
/// Uses the current time unless that would not exceed the last id.
pub fn next_record_id(now_ms: i64, last_id: Option<i64>) -> i64 {
    match last_id {
        Some(last) if now_ms <= last => last + 1,
        _ => now_ms,
    }
}

/// In-memory history, for tests and embedding
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    records: Vec<TitrationRecord>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(
        &mut self,
        input: TitrationInput,
        result: TitrationResult,
    ) -> Result<TitrationRecord> {
        let last = self.records.iter().map(|r| r.id).max();
        let record = TitrationRecord {
            id: next_record_id(now_millis(), last),
            input,
            result,
        };
        self.records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> Result<Vec<TitrationRecord>> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    fn clear(&mut self) -> Result<usize> {
        let count = self.records.len();
        self.records.clear();
        Ok(count)
    }
}

/// JSONL-based history with file locking
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    /// Create a history backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn lock_exclusive(&self, file: &File) -> Result<()> {
        file.lock_exclusive()
            .map_err(|e| Error::History(format!("Failed to lock {:?}: {}", self.path, e)))
    }
}

impl HistoryStore for JsonlHistory {
    fn append(
        &mut self,
        input: TitrationInput,
        result: TitrationResult,
    ) -> Result<TitrationRecord> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // Hold the lock across reading the last id and writing the new line
        self.lock_exclusive(&file)?;

        let mut existing = Vec::new();
        (&file).read_to_end(&mut existing)?;
        let last_id = parse_records(existing.as_slice())?
            .iter()
            .map(|r| r.id)
            .max();

        let record = TitrationRecord {
            id: next_record_id(now_millis(), last_id),
            input,
            result,
        };

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&record)?;
        // An interrupted write can leave the last line without its newline
        if existing.last().is_some_and(|b| *b != b'\n') {
            tracing::warn!("History {:?} ends in a partial line, starting a new one", self.path);
            writer.write_all(b"\n")?;
        }
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended record {} to {:?}", record.id, self.path);
        Ok(record)
    }

    fn records(&self) -> Result<Vec<TitrationRecord>> {
        read_records(&self.path)
    }

    fn clear(&mut self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }

        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        self.lock_exclusive(&file)?;

        let count = parse_records(BufReader::new(&file))?.len();
        file.set_len(0)?;
        file.sync_all()?;
        file.unlock()?;

        tracing::info!("Cleared {} records from {:?}", count, self.path);
        Ok(count)
    }
}

/// Read all records from a history file, newest first
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<TitrationRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;
    let mut records = parse_records(BufReader::new(&file))?;
    file.unlock()?;

    records.sort_by(|a, b| b.id.cmp(&a.id));
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

fn parse_records<R: BufRead>(reader: R) -> Result<Vec<TitrationRecord>> {
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<TitrationRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse history record at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(records)
}
