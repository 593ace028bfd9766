//! JSONL hand history: one [`HandRecord`] per line.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cards::Card;
use crate::errors::GameError;
use crate::game::Street;
use crate::player::PlayerAction;

/// One action, tagged with who took it and on which street.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat index of the acting player
    pub player_id: usize,
    pub street: Street,
    pub action: PlayerAction,
}

/// Complete record of a hand: actions in order, the board, and the result.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Table seed; with the hand number in `meta` it reproduces the deal
    pub seed: Option<u64>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub result: Option<String>,
    /// RFC3339, filled in on write when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<usize>,
    /// e.g. "Flush, Ace high" or "split pot, Pair of Nines"
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends hand records to a JSONL file and hands out sequential ids.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    /// Starts a fresh log at `path`, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = Self::prepare(path.as_ref())?;
        Ok(Self::with_file(File::create(file)?))
    }

    /// Opens `path` for appending so earlier sessions are kept.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = Self::prepare(path.as_ref())?;
        let f = OpenOptions::new().create(true).append(true).open(file)?;
        Ok(Self::with_file(f))
    }

    /// Logger that numbers hands for `date` but writes nothing.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    fn prepare(path: &Path) -> std::io::Result<&Path> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        Ok(path)
    }

    fn with_file(f: File) -> Self {
        Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

/// Reads every record from a JSONL hand log. Blank lines are skipped; a line
/// that does not parse fails the whole read.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<HandRecord>, GameError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            warn!(line = i + 1, error = %e, "unreadable hand record");
            GameError::InvalidState(format!("hand log line {}: {}", i + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}
