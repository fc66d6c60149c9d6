//! Storage layer for inquiry-desk.
//!
//! This module provides the record store: a single JSON document holding every
//! inquiry, rewritten in full on each mutation. Mutations are serialized so
//! concurrent requests cannot lose each other's updates.

pub mod document;
pub mod stats;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::inquiry::{next_id, Inquiry, InquiryStatus, NewInquiry};

pub use document::InquiryDocument;
pub use stats::InquiryStats;

/// Operations the request handlers need from a record store.
#[async_trait]
pub trait InquiryRepository: Send + Sync + std::fmt::Debug {
    /// All inquiries, newest first.
    async fn list(&self) -> Result<Vec<Inquiry>>;

    /// Store a validated submission and return the created record.
    async fn create(&self, submission: NewInquiry) -> Result<Inquiry>;

    /// Overwrite the status of an inquiry and stamp `updatedAt`.
    ///
    /// Fails with [`Error::InquiryNotFound`] if the id is unknown.
    async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<Inquiry>;

    /// Remove an inquiry.
    ///
    /// Fails with [`Error::InquiryNotFound`] if the id is unknown.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Aggregate counts over the whole collection.
    async fn stats(&self) -> Result<InquiryStats>;
}

/// Record store backed by one pretty-printed JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the document.
    path: PathBuf,
    /// Held for the whole read-modify-write of every mutation.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// document if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the initial document cannot be
    /// created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };

        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|source| Error::StoreRead {
                path: store.path.clone(),
                source,
            })?;
        if exists {
            debug!("Using existing record store at {}", store.path.display());
        } else {
            store.persist(&[]).await?;
            info!("Created empty record store at {}", store.path.display());
        }

        Ok(store)
    }

    /// Get the path to the store document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every inquiry, treating any failure as an empty collection.
    ///
    /// The failure is logged but not surfaced, so a corrupt or unreadable file
    /// looks like "no data" to the caller.
    pub async fn read(&self) -> Vec<Inquiry> {
        match self.load().await {
            Ok(inquiries) => inquiries,
            Err(err) => {
                warn!("Treating record store as empty: {err}");
                Vec::new()
            }
        }
    }

    /// Load every inquiry, surfacing read and parse failures.
    ///
    /// A missing file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Vec<Inquiry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::StoreRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document = InquiryDocument::from_slice(&bytes).map_err(|source| Error::StoreParse {
            path: self.path.clone(),
            source,
        })?;
        Ok(document.inquiries)
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub async fn write(&self, inquiries: &[Inquiry]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist(inquiries).await
    }

    /// Store a validated submission as if it arrived at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing document cannot be loaded or the
    /// updated one cannot be written.
    pub async fn create_at(&self, submission: NewInquiry, now: DateTime<Utc>) -> Result<Inquiry> {
        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.load().await?;

        let inquiry = Inquiry::new(next_id(&inquiries, now), submission, now);
        inquiries.push(inquiry.clone());
        self.persist(&inquiries).await?;

        info!(id = %inquiry.id, "Created inquiry");
        Ok(inquiry)
    }

    /// Write the document to a sibling temp file, then rename it into place.
    async fn persist(&self, inquiries: &[Inquiry]) -> Result<()> {
        let bytes = InquiryDocument::new(inquiries.to_vec()).to_pretty_vec()?;
        let tmp_path = self.tmp_path();

        let write_err = |source| Error::StoreWrite {
            path: self.path.clone(),
            source,
        };
        tokio::fs::write(&tmp_path, &bytes).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        debug!(
            "Wrote {} inquiries to {}",
            inquiries.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl InquiryRepository for JsonFileStore {
    async fn list(&self) -> Result<Vec<Inquiry>> {
        let mut inquiries = self.read().await;
        sort_newest_first(&mut inquiries);
        Ok(inquiries)
    }

    async fn create(&self, submission: NewInquiry) -> Result<Inquiry> {
        self.create_at(submission, Utc::now()).await
    }

    async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<Inquiry> {
        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.load().await?;

        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::inquiry_not_found(id))?;
        inquiry.set_status(status, Utc::now());
        let updated = inquiry.clone();

        self.persist(&inquiries).await?;
        info!(id, status = %updated.status, "Updated inquiry status");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut inquiries = self.load().await?;

        let before = inquiries.len();
        inquiries.retain(|i| i.id != id);
        if inquiries.len() == before {
            return Err(Error::inquiry_not_found(id));
        }

        self.persist(&inquiries).await?;
        info!(id, "Deleted inquiry");
        Ok(())
    }

    async fn stats(&self) -> Result<InquiryStats> {
        Ok(InquiryStats::from_inquiries(&self.read().await))
    }
}

/// Sort by `timestamp` descending, breaking ties by id descending.
pub fn sort_newest_first(inquiries: &mut [Inquiry]) {
    inquiries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| compare_ids(&b.id, &a.id))
    });
}

/// Ids are decimal strings; compare numerically when both parse.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn create_test_store() -> (TempDir, JsonFileStore) {
        crate::logging::init_test_logging();
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = JsonFileStore::open(dir.path().join("data").join("inquiries.json"))
            .await
            .expect("failed to open store");
        (dir, store)
    }

    fn submission(name: &str, certification: &str) -> NewInquiry {
        NewInquiry {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            certification: certification.to_string(),
            message: "Hello".to_string(),
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let (_dir, store) = create_test_store().await;

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "inquiries": [] }));
    }

    #[tokio::test]
    async fn test_open_keeps_existing_document() {
        let (dir, store) = create_test_store().await;
        store
            .create_at(submission("Ada", "ISO 9001"), at(1_000))
            .await
            .unwrap();

        let reopened = JsonFileStore::open(dir.path().join("data").join("inquiries.json"))
            .await
            .unwrap();
        assert_eq!(reopened.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_swallows_corrupt_document() {
        let (_dir, store) = create_test_store().await;
        tokio::fs::write(store.path(), b"{ not json").await.unwrap();

        assert!(store.read().await.is_empty());
        assert!(matches!(store.load().await, Err(Error::StoreParse { .. })));
    }

    #[tokio::test]
    async fn test_mutation_refuses_to_overwrite_corrupt_document() {
        let (_dir, store) = create_test_store().await;
        tokio::fs::write(store.path(), b"{ not json").await.unwrap();

        let result = store.create(submission("Ada", "ISO 9001")).await;
        assert!(matches!(result, Err(Error::StoreParse { .. })));

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[tokio::test]
    async fn test_mixed_status_document_stays_readable() {
        let (_dir, store) = create_test_store().await;
        let document = r#"{
  "inquiries": [
    {
      "id": "1000",
      "name": "Old",
      "email": "old@example.com",
      "certification": "ISO 9001",
      "message": "Hi",
      "timestamp": "2024-01-15T10:00:00.000Z",
      "status": "pending"
    },
    {
      "id": "2000",
      "name": "New",
      "email": "new@example.com",
      "certification": "ISO 9001",
      "message": "Hi",
      "timestamp": "2024-01-15T11:00:00.000Z",
      "status": "new"
    }
  ]
}"#;
        tokio::fs::write(store.path(), document).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_inquiries, 2);
        assert_eq!(stats.new_inquiries, 1);

        store.create(submission("Ada", "SOC 2")).await.unwrap();
        store
            .update_status("2000", InquiryStatus::Active)
            .await
            .unwrap();

        let stored = store.load().await.unwrap();
        assert_eq!(stored.len(), 3);
        let old = stored.iter().find(|i| i.id == "1000").unwrap();
        assert_eq!(old.status, InquiryStatus::Other("pending".to_string()));
    }

    #[tokio::test]
    async fn test_create_assigns_millisecond_id() {
        let (_dir, store) = create_test_store().await;

        let inquiry = store
            .create_at(submission("Ada", "ISO 9001"), at(1_700_000_000_000))
            .await
            .unwrap();
        assert_eq!(inquiry.id, "1700000000000");
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert!(inquiry.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_same_millisecond_gets_distinct_ids() {
        let (_dir, store) = create_test_store().await;

        let a = store
            .create_at(submission("Ada", "ISO 9001"), at(5_000))
            .await
            .unwrap();
        let b = store
            .create_at(submission("Bob", "ISO 9001"), at(5_000))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(b.id, "5001");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = create_test_store().await;
        let t1 = at(1_000);
        let t2 = t1 + Duration::seconds(1);
        let t3 = t2 + Duration::seconds(1);

        store.create_at(submission("Two", "A"), t2).await.unwrap();
        store.create_at(submission("Three", "A"), t3).await.unwrap();
        store.create_at(submission("One", "A"), t1).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Three", "Two", "One"]);
    }

    #[tokio::test]
    async fn test_update_status() {
        let (_dir, store) = create_test_store().await;
        let created = store.create(submission("Ada", "ISO 9001")).await.unwrap();

        let updated = store
            .update_status(&created.id, InquiryStatus::Active)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, InquiryStatus::Active);
        assert!(updated.updated_at.is_some());

        let stored = store.read().await;
        assert_eq!(stored[0].status, InquiryStatus::Active);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id() {
        let (_dir, store) = create_test_store().await;
        let err = store
            .update_status("missing", InquiryStatus::Completed)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = create_test_store().await;
        let created = store.create(submission("Ada", "ISO 9001")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete(&created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stats() {
        let (_dir, store) = create_test_store().await;
        let statuses = [
            InquiryStatus::New,
            InquiryStatus::Active,
            InquiryStatus::Active,
            InquiryStatus::Completed,
        ];
        for (n, status) in statuses.into_iter().enumerate() {
            let created = store
                .create_at(submission("Client", "ISO 9001"), at(1_000 + n as i64))
                .await
                .unwrap();
            if status != InquiryStatus::New {
                store.update_status(&created.id, status).await.unwrap();
            }
        }

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_inquiries, 4);
        assert_eq!(stats.new_inquiries, 1);
        assert_eq!(stats.active_clients, 2);
        assert_eq!(stats.completed_clients, 1);
        assert_eq!(stats.certification_breakdown["ISO 9001"], 4);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, store) = create_test_store().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..16)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(submission(&format!("Client{n}"), "ISO 9001"))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let inquiries = store.list().await.unwrap();
        assert_eq!(inquiries.len(), 16);
        let ids: std::collections::HashSet<_> = inquiries.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_write_replaces_collection() {
        let (_dir, store) = create_test_store().await;
        let created = store.create(submission("Ada", "ISO 9001")).await.unwrap();

        store.write(&[]).await.unwrap();
        assert!(store.read().await.is_empty());

        store.write(&[created.clone()]).await.unwrap();
        assert_eq!(store.read().await, vec![created]);
    }

    #[test]
    fn test_compare_ids_numeric() {
        assert_eq!(compare_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_ids("10", "10"), Ordering::Equal);
        assert_eq!(compare_ids("b", "a"), Ordering::Greater);
    }
}
