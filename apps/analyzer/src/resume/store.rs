//! Fixed-path storage for the single active resume and its SWOT report.
//!
//! Layout:
//!   <upload_dir>/resume.<pdf|txt|docx>   the most recent upload, nothing else
//!   <report_dir>/resume_review.json      the most recent SWOT report
//!
//! Single-file writes go through a temp file + rename so readers never observe a
//! partial file. The `RwLock` serialises every write to these paths (uploads,
//! task output files, report patches) against lookups and report reads.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::resume::ResumeKind;

pub const RESUME_STEM: &str = "resume";
pub const REPORT_FILE: &str = "resume_review.json";

/// A resume found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    pub path: PathBuf,
    pub kind: ResumeKind,
}

#[derive(Debug, Clone)]
pub struct ResumeStore {
    upload_dir: PathBuf,
    report_dir: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl ResumeStore {
    /// Creates the store, ensuring both directories exist.
    pub async fn open(upload_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let report_dir = report_dir.into();
        for dir in [&upload_dir, &report_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        info!(
            "Resume store ready (uploads: {}, reports: {})",
            upload_dir.display(),
            report_dir.display()
        );
        Ok(Self {
            upload_dir,
            report_dir,
            lock: Arc::new(RwLock::new(())),
        })
    }

    pub fn resume_path(&self, kind: ResumeKind) -> PathBuf {
        self.upload_dir
            .join(format!("{RESUME_STEM}.{}", kind.extension()))
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_FILE)
    }

    /// Stores `bytes` as the active resume, replacing whatever was there before
    /// regardless of its extension.
    pub async fn save(&self, kind: ResumeKind, bytes: Vec<u8>) -> Result<StoredResume> {
        let _guard = self.lock.write().await;

        let path = self.resume_path(kind);
        write_atomic(&path, bytes).await?;

        for other in ResumeKind::PROBE_ORDER.into_iter().filter(|k| *k != kind) {
            let stale = self.resume_path(other);
            match tokio::fs::remove_file(&stale).await {
                Ok(()) => debug!("Removed stale resume {}", stale.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to remove {}", stale.display()))
                }
            }
        }

        info!("Stored resume at {}", path.display());
        Ok(StoredResume { path, kind })
    }

    /// Finds the active resume by probing pdf, txt, docx in that order.
    pub async fn locate(&self) -> Option<StoredResume> {
        let _guard = self.lock.read().await;
        for kind in ResumeKind::PROBE_ORDER {
            let path = self.resume_path(kind);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(StoredResume { path, kind });
            }
        }
        None
    }

    /// Loads the persisted SWOT report. `Ok(None)` when no analysis has run yet.
    pub async fn load_report(&self) -> Result<Option<Value>> {
        let _guard = self.lock.read().await;
        self.read_report().await
    }

    /// Writes a task output file while holding the write lock.
    pub async fn write_output(&self, path: &Path, bytes: Vec<u8>) -> Result<()> {
        let _guard = self.lock.write().await;
        write_atomic(path, bytes).await
    }

    /// Applies `patch` to the report's top-level object, but only while the
    /// report on disk still equals `expected`. Returns whether it was rewritten.
    pub async fn patch_report(
        &self,
        expected: &Value,
        patch: impl FnOnce(&mut Map<String, Value>),
    ) -> Result<bool> {
        let _guard = self.lock.write().await;
        let Some(Value::Object(mut fields)) = self.read_report().await? else {
            return Ok(false);
        };
        if !matches!(expected, Value::Object(e) if *e == fields) {
            return Ok(false);
        }
        patch(&mut fields);
        let bytes = serde_json::to_vec_pretty(&Value::Object(fields))
            .context("Failed to serialize report")?;
        write_atomic(&self.report_path(), bytes).await?;
        Ok(true)
    }

    /// Caller holds the lock.
    async fn read_report(&self) -> Result<Option<Value>> {
        let path = self.report_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        let report = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        Ok(Some(report))
    }
}

/// Writes `bytes` to `path` through a sibling temp file and an atomic rename.
async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .context("File write task aborted")?
    .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store_in(dir: &Path) -> ResumeStore {
        ResumeStore::open(dir.join("uploads"), dir.join("resume-report"))
            .await
            .unwrap()
    }

    async fn seed_report(store: &ResumeStore, report: &Value) {
        store
            .write_output(&store.report_path(), serde_json::to_vec(report).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("resume-report").is_dir());
        assert_eq!(
            store.report_path(),
            dir.path().join("resume-report").join("resume_review.json")
        );
    }

    #[tokio::test]
    async fn test_save_stores_exact_bytes_under_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        let stored = store
            .save(ResumeKind::Txt, b"Name John Doe.".to_vec())
            .await
            .unwrap();
        assert_eq!(stored.path, dir.path().join("uploads").join("resume.txt"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"Name John Doe.");
    }

    #[tokio::test]
    async fn test_second_upload_same_kind_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        store.save(ResumeKind::Txt, b"first".to_vec()).await.unwrap();
        store.save(ResumeKind::Txt, b"second".to_vec()).await.unwrap();

        let found = store.locate().await.unwrap();
        assert_eq!(std::fs::read(found.path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_upload_of_other_kind_replaces_previous_resume() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        store.save(ResumeKind::Pdf, b"%PDF-1.4".to_vec()).await.unwrap();
        store.save(ResumeKind::Txt, b"plain".to_vec()).await.unwrap();

        let found = store.locate().await.unwrap();
        assert_eq!(found.kind, ResumeKind::Txt);
        assert!(!store.resume_path(ResumeKind::Pdf).exists());
    }

    #[tokio::test]
    async fn test_locate_follows_probe_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        // Files dropped in by hand, bypassing save()
        std::fs::write(store.resume_path(ResumeKind::Docx), b"d").unwrap();
        std::fs::write(store.resume_path(ResumeKind::Txt), b"t").unwrap();

        assert_eq!(store.locate().await.unwrap().kind, ResumeKind::Txt);
    }

    #[tokio::test]
    async fn test_locate_without_resume_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        assert!(store.locate().await.is_none());
    }

    #[tokio::test]
    async fn test_report_absent_then_present() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        assert!(store.load_report().await.unwrap().is_none());

        let report = json!({"candidate": "John Doe", "strengths": ["Python"]});
        seed_report(&store, &report).await;
        assert_eq!(store.load_report().await.unwrap(), Some(report));
    }

    #[tokio::test]
    async fn test_write_output_lands_at_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        let target = dir.path().join("out").join("task.json");

        store.write_output(&target, b"{}".to_vec()).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_patch_report_applies_when_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        let report = json!({"strengths": ["Python"]});
        seed_report(&store, &report).await;

        let patched = store
            .patch_report(&report, |fields| {
                fields.insert("candidate".into(), json!("John Doe"));
            })
            .await
            .unwrap();
        assert!(patched);
        assert_eq!(
            store.load_report().await.unwrap(),
            Some(json!({"strengths": ["Python"], "candidate": "John Doe"}))
        );
    }

    #[tokio::test]
    async fn test_patch_report_skips_newer_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        let older = json!({"strengths": ["Python"]});
        let newer = json!({"candidate": "Jane Roe", "strengths": ["Go"]});
        seed_report(&store, &newer).await;

        let patched = store
            .patch_report(&older, |fields| {
                fields.insert("candidate".into(), json!("User"));
            })
            .await
            .unwrap();
        assert!(!patched);
        assert_eq!(store.load_report().await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn test_patch_report_without_report_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        let patched = store.patch_report(&json!({}), |_| {}).await.unwrap();
        assert!(!patched);
        assert!(!store.report_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_report_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;
        std::fs::write(store.report_path(), "{not json").unwrap();
        assert!(store.load_report().await.is_err());
    }
}
