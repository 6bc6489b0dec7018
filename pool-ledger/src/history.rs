use std::{
    fs::OpenOptions,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::HistoryError, roster::ParticipantId};

/// One winning draw. Records reference the participant by id; the roster owns
/// the entity. The probability is the winner's share of the pre-draw
/// distribution, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub participant_id: ParticipantId,
    pub total_participants: usize,
    pub probability_at_selection: f64,
    pub selected_at: DateTime<Utc>,
}

/// Append-only draw history backed by a json-lines file. Records are never
/// updated or deleted.
pub struct SelectionLog {
    path: PathBuf,
    records: Vec<SelectionRecord>,
}

impl SelectionLog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                records: Vec::new(),
            });
        }

        let file = OpenOptions::new().read(true).open(&path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(Self { path, records })
    }

    /// Single non-overwritable insert: the record goes to disk before it is
    /// visible in memory.
    pub fn append(&mut self, record: SelectionRecord) -> Result<(), HistoryError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_vec(&record)?;
        file.write_all(&line)?;
        file.write_all(b"\n")?;
        file.flush()?;
        self.records.push(record);
        Ok(())
    }

    /// Records with `selected_at >= since`, most recent first.
    pub fn recent_since(&self, since: DateTime<Utc>) -> Vec<SelectionRecord> {
        let mut recent: Vec<SelectionRecord> = self
            .records
            .iter()
            .filter(|r| r.selected_at >= since)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.selected_at.cmp(&a.selected_at));
        recent
    }

    pub fn count_for(&self, id: ParticipantId) -> usize {
        self.records
            .iter()
            .filter(|r| r.participant_id == id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    fn record(id: ParticipantId, selected_at: DateTime<Utc>) -> SelectionRecord {
        SelectionRecord {
            participant_id: id,
            total_participants: 3,
            probability_at_selection: 1.0 / 3.0,
            selected_at,
        }
    }

    #[test]
    fn append_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.jsonl");
        let now = Utc::now();

        let mut log = SelectionLog::load(&path).unwrap();
        log.append(record(0, now)).unwrap();
        log.append(record(1, now + Duration::seconds(1))).unwrap();
        assert_eq!(log.len(), 2);

        let reloaded = SelectionLog::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.count_for(0), 1);
        assert_eq!(reloaded.count_for(1), 1);
    }

    #[test]
    fn recent_since_filters_and_orders_descending() {
        let dir = tempdir().unwrap();
        let now = Utc::now();

        let mut log = SelectionLog::load(dir.path().join("s.jsonl")).unwrap();
        log.append(record(0, now - Duration::days(10))).unwrap();
        log.append(record(1, now - Duration::days(2))).unwrap();
        log.append(record(2, now - Duration::hours(1))).unwrap();

        let recent = log.recent_since(now - Duration::days(7));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].participant_id, 2);
        assert_eq!(recent[1].participant_id, 1);
    }
}
