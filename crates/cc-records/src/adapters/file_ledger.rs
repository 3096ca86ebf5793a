//! JSON-file backed ledger used by the admin CLI.
//!
//! The file holds one JSON object mapping raw keys to hex-encoded values.
//! Changes stay in memory until [`FileLedger::flush`].

use crate::adapters::{InMemoryLedger, InvocationStub};
use crate::domain::{IdentityId, LedgerError, OrgId, RecordKey, RecordKind};
use crate::ports::LedgerStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ledger persisted as a JSON file.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    inner: InMemoryLedger,
}

impl FileLedger {
    /// Load the ledger at `path`. A missing file yields an empty ledger.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => decode(&bytes)?,
            Err(e) if e.kind() == IoErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(LedgerError::ReadFailed(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened file ledger");
        Ok(Self {
            path,
            inner: InMemoryLedger::with_entries(entries),
        })
    }

    /// Write every entry back to disk, replacing the file atomically.
    pub fn flush(&self) -> Result<(), LedgerError> {
        let encoded: BTreeMap<RecordKey, String> = self
            .inner
            .snapshot()
            .into_iter()
            .map(|(key, value)| (key, hex::encode(value)))
            .collect();
        let bytes = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        let write_err =
            |e: std::io::Error| LedgerError::WriteFailed(format!("{}: {e}", self.path.display()));
        fs::write(&tmp, bytes).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        debug!(path = %self.path.display(), entries = encoded.len(), "Flushed file ledger");
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Bind this ledger to a caller for one invocation.
    pub fn stub(
        &self,
        identity: impl Into<String>,
        org: impl Into<String>,
    ) -> InvocationStub<'_, Self> {
        InvocationStub::new(self, IdentityId::new(identity), OrgId::new(org))
    }
}

fn decode(bytes: &[u8]) -> Result<BTreeMap<RecordKey, Vec<u8>>, LedgerError> {
    let raw: BTreeMap<RecordKey, String> =
        serde_json::from_slice(bytes).map_err(|e| LedgerError::ReadFailed(e.to_string()))?;
    raw.into_iter()
        .map(|(key, value)| {
            hex::decode(&value)
                .map(|bytes| (key.clone(), bytes))
                .map_err(|e| LedgerError::ReadFailed(format!("value at {key}: {e}")))
        })
        .collect()
}

impl LedgerStore for FileLedger {
    fn get(&self, key: &RecordKey) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get(key)
    }

    fn put(&self, key: &RecordKey, value: Vec<u8>) -> Result<(), LedgerError> {
        self.inner.put(key, value)
    }

    fn scan_prefix(&self, kind: RecordKind) -> Result<Vec<(RecordKey, Vec<u8>)>, LedgerError> {
        self.inner.scan_prefix(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{grade_key, student_key};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let ledger = FileLedger::open(dir.path().join("ledger.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_flush_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let ledger = FileLedger::open(&path).unwrap();
        ledger.put(&student_key("MIT", 1), b"{\"a\":1}".to_vec()).unwrap();
        ledger.put(&grade_key("MIT", 1, "6.006", 2024, 1), vec![0, 255]).unwrap();
        ledger.flush().unwrap();

        let reopened = FileLedger::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(
            reopened.get(&grade_key("MIT", 1, "6.006", 2024, 1)).unwrap(),
            Some(vec![0, 255])
        );
        assert!(!dir.path().join("ledger.tmp").exists());
    }

    #[test]
    fn test_garbage_file_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            FileLedger::open(&path),
            Err(LedgerError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_unflushed_writes_are_not_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = FileLedger::open(&path).unwrap();
        ledger.put(&student_key("MIT", 1), vec![1]).unwrap();
        drop(ledger);
        assert!(FileLedger::open(&path).unwrap().is_empty());
    }
}
