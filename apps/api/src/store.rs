//! Application state store: the single source of truth for the user profile and the
//! tracked-application collection.
//!
//! Lifecycle: `Uninitialized → Loading → Ready`. Only a Ready store accepts reads and
//! mutations. Every accepted mutation is applied in memory first, then the affected blob
//! is re-serialized and written through the [`StoragePort`]. A failed write is logged and
//! never rolls back memory: the in-memory state stays authoritative.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::application::{ApplicationPatch, ApplicationStatus, TrackedApplication};
use crate::models::job::JobPosting;
use crate::models::profile::{ProfilePatch, UserProfile};
use crate::storage::{StoragePort, APPLICATIONS_KEY, PROFILE_KEY};

/// Store handle shared by all request handlers.
pub type SharedStore = Arc<Mutex<ApplicationStore>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Application store is not ready (state: {0})")]
    NotReady(&'static str),
}

/// In-memory state held once the store is Ready.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreData {
    pub profile: UserProfile,
    /// Most-recently-added first.
    pub applications: Vec<TrackedApplication>,
}

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Loading,
    Ready(StoreData),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Ready(_) => "ready",
        }
    }
}

pub struct ApplicationStore {
    storage: Arc<dyn StoragePort>,
    phase: Phase,
}

impl ApplicationStore {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage,
            phase: Phase::Uninitialized,
        }
    }

    /// Constructs and initializes a store in one step.
    pub async fn load(storage: Arc<dyn StoragePort>) -> Self {
        let mut store = Self::new(storage);
        store.initialize().await;
        store
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    /// Loads both blobs and moves the store to Ready.
    ///
    /// Missing or corrupt blobs fall back to their defaults; nothing is surfaced to the
    /// caller. Calling this on a Ready store does nothing.
    pub async fn initialize(&mut self) {
        if self.is_ready() {
            return;
        }
        self.phase = Phase::Loading;

        let profile: UserProfile = self.read_blob(PROFILE_KEY).await.unwrap_or_default();
        let applications: Vec<TrackedApplication> =
            self.read_blob(APPLICATIONS_KEY).await.unwrap_or_default();

        info!(
            "Application store ready: {} tracked application(s), backend={}",
            applications.len(),
            self.storage.backend_name()
        );
        self.phase = Phase::Ready(StoreData {
            profile,
            applications,
        });
    }

    // ────────────────────────────────────────────────────────────────────────
    // Reads
    // ────────────────────────────────────────────────────────────────────────

    pub fn profile(&self) -> Result<&UserProfile, StoreError> {
        Ok(&self.data()?.profile)
    }

    pub fn applications(&self) -> Result<&[TrackedApplication], StoreError> {
        Ok(&self.data()?.applications)
    }

    pub fn application(&self, id: Uuid) -> Result<Option<&TrackedApplication>, StoreError> {
        Ok(self.data()?.applications.iter().find(|a| a.id == id))
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Result<StoreData, StoreError> {
        self.data().cloned()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutations
    // ────────────────────────────────────────────────────────────────────────

    /// Shallow-merges `patch` onto the profile and persists it. No validation here.
    pub async fn update_user_profile(
        &mut self,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StoreError> {
        let data = self.data_mut()?;
        data.profile.apply(patch);
        let profile = data.profile.clone();

        self.write_blob(PROFILE_KEY, &profile).await;
        Ok(profile)
    }

    /// Starts tracking `job`, replacing any record with the same URL.
    ///
    /// The new record goes to the front of the collection.
    pub async fn add_tracked_application(
        &mut self,
        job: JobPosting,
        status: ApplicationStatus,
    ) -> Result<TrackedApplication, StoreError> {
        let data = self.data_mut()?;
        let record = TrackedApplication::new(job, status, Utc::now());

        let before = data.applications.len();
        data.applications.retain(|a| !a.job.same_job(&record.job));
        if data.applications.len() < before {
            debug!("Replacing tracked application for {}", record.job.url);
        }
        data.applications.insert(0, record.clone());

        self.persist_applications().await;
        Ok(record)
    }

    /// Merges `patch` onto the record with `id`, keeping its position.
    ///
    /// An unknown id leaves the collection unchanged and returns `Ok(None)`. The blob is
    /// rewritten either way, as with removal.
    pub async fn update_tracked_application(
        &mut self,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<TrackedApplication>, StoreError> {
        let data = self.data_mut()?;
        let updated = match data.applications.iter_mut().find(|a| a.id == id) {
            Some(record) => {
                record.apply(patch, Utc::now());
                Some(record.clone())
            }
            None => {
                debug!("update_tracked_application: no record {id}, ignoring");
                None
            }
        };

        self.persist_applications().await;
        Ok(updated)
    }

    /// Removes the record with `id` if present. Returns whether anything was removed.
    pub async fn remove_tracked_application(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let data = self.data_mut()?;
        let before = data.applications.len();
        data.applications.retain(|a| a.id != id);
        let removed = data.applications.len() < before;

        self.persist_applications().await;
        Ok(removed)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Internals
    // ────────────────────────────────────────────────────────────────────────

    fn data(&self) -> Result<&StoreData, StoreError> {
        match &self.phase {
            Phase::Ready(data) => Ok(data),
            other => Err(StoreError::NotReady(other.name())),
        }
    }

    fn data_mut(&mut self) -> Result<&mut StoreData, StoreError> {
        match &mut self.phase {
            Phase::Ready(data) => Ok(data),
            other => Err(StoreError::NotReady(other.name())),
        }
    }

    async fn persist_applications(&self) {
        if let Phase::Ready(data) = &self.phase {
            self.write_blob(APPLICATIONS_KEY, &data.applications).await;
        }
    }

    /// Reads and parses a blob. Absent, unreadable, and corrupt blobs all yield `None`.
    async fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted '{key}', using default");
                return None;
            }
            Err(e) => {
                warn!("Failed to read '{key}' from storage, using default: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Persisted '{key}' is not valid, using default: {e}");
                None
            }
        }
    }

    /// Best-effort write. Failures are logged; in-memory state is not rolled back.
    async fn write_blob<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to serialize '{key}': {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(key, &serialized).await {
            error!("Failed to persist '{key}': {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn job(url: &str, title: &str) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            url: url.to_string(),
            description: "...".to_string(),
            relevance_score: 0.9,
        }
    }

    async fn ready_store() -> (ApplicationStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ApplicationStore::load(storage.clone()).await;
        (store, storage)
    }

    /// Storage whose writes always fail; reads see nothing.
    struct BrokenStorage;

    #[async_trait]
    impl StoragePort for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_uninitialized_store_rejects_operations() {
        let mut store = ApplicationStore::new(Arc::new(MemoryStorage::new()));
        assert!(!store.is_ready());
        assert_eq!(
            store.applications().unwrap_err(),
            StoreError::NotReady("uninitialized")
        );
        let result = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_initialize_empty_storage_uses_defaults() {
        let (store, _) = ready_store().await;
        assert!(store.is_ready());
        assert_eq!(store.profile().unwrap(), &UserProfile::default());
        assert!(store.applications().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_corrupt_blobs_fall_back_independently() {
        let profile = r#"{"name": "Ada", "email": "ada@example.com"}"#;
        let storage = MemoryStorage::new()
            .with_entry(PROFILE_KEY, profile)
            .with_entry(APPLICATIONS_KEY, "{not json");
        let store = ApplicationStore::load(Arc::new(storage)).await;

        assert_eq!(store.profile().unwrap().name, "Ada");
        assert!(store.applications().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_survives_unreadable_storage() {
        let store = ApplicationStore::load(Arc::new(BrokenStorage)).await;
        assert!(store.is_ready());
        assert!(store.applications().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_twice_keeps_state() {
        let (mut store, _) = ready_store().await;
        store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store.initialize().await;
        assert_eq!(store.applications().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_prepends_most_recent_first() {
        let (mut store, _) = ready_store().await;
        store
            .add_tracked_application(job("https://x/1", "First"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store
            .add_tracked_application(job("https://x/2", "Second"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();

        let titles: Vec<_> = store
            .applications()
            .unwrap()
            .iter()
            .map(|a| a.job.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_add_same_url_replaces_existing_record() {
        let (mut store, _) = ready_store().await;
        let first = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store
            .add_tracked_application(job("https://x/2", "Other"), ApplicationStatus::Draft)
            .await
            .unwrap();
        let second = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Applied)
            .await
            .unwrap();

        let apps = store.applications().unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, second.id);
        assert_ne!(first.id, second.id);
        assert_eq!(apps[0].status, ApplicationStatus::Applied);
        assert!(apps[0].applied_date.is_some());
        assert!(store.application(first.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_many_keeps_one_record_per_url() {
        let (mut store, _) = ready_store().await;
        let statuses = [
            ApplicationStatus::Bookmarked,
            ApplicationStatus::Applied,
            ApplicationStatus::Draft,
            ApplicationStatus::Offer,
        ];
        for (i, status) in statuses.iter().cycle().take(20).enumerate() {
            let url = format!("https://x/{}", i % 3);
            store
                .add_tracked_application(job(&url, &format!("Job {i}")), *status)
                .await
                .unwrap();
        }

        let apps = store.applications().unwrap();
        assert_eq!(apps.len(), 3);
        // Last add was i=19 → url 1, title "Job 19", status statuses[19 % 4] = Offer.
        assert_eq!(apps[0].job.url, "https://x/1");
        assert_eq!(apps[0].job.title, "Job 19");
        assert_eq!(apps[0].status, ApplicationStatus::Offer);
    }

    #[tokio::test]
    async fn test_add_applied_stamps_call_time() {
        let (mut store, _) = ready_store().await;
        let before = Utc::now();
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Applied)
            .await
            .unwrap();
        let after = Utc::now();

        let applied = record.applied_date.expect("applied date");
        assert!(before <= applied && applied <= after);
    }

    #[tokio::test]
    async fn test_add_bookmarked_has_no_applied_date() {
        let (mut store, _) = ready_store().await;
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        assert!(record.applied_date.is_none());
    }

    #[tokio::test]
    async fn test_add_clamps_relevance_score() {
        let (mut store, _) = ready_store().await;
        let mut posting = job("https://x/1", "Engineer");
        posting.relevance_score = 3.5;
        let record = store
            .add_tracked_application(posting, ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        assert_eq!(record.job.relevance_score, 1.0);
    }

    #[tokio::test]
    async fn test_update_to_applied_stamps_only_when_undated() {
        let (mut store, _) = ready_store().await;
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();

        let updated = store
            .update_tracked_application(record.id, ApplicationPatch::status(ApplicationStatus::Applied))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.applied_date.is_some());

        let dated = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let patch = ApplicationPatch {
            applied_date: Some(Some(dated)),
            ..Default::default()
        };
        store.update_tracked_application(record.id, patch).await.unwrap();
        let again = store
            .update_tracked_application(record.id, ApplicationPatch::status(ApplicationStatus::Applied))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.applied_date, Some(dated));
    }

    #[tokio::test]
    async fn test_update_preserves_position() {
        let (mut store, _) = ready_store().await;
        let oldest = store
            .add_tracked_application(job("https://x/1", "Oldest"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store
            .add_tracked_application(job("https://x/2", "Newest"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();

        let patch = ApplicationPatch {
            notes: Some(Some("recruiter replied".to_string())),
            ..Default::default()
        };
        store.update_tracked_application(oldest.id, patch).await.unwrap();

        let apps = store.applications().unwrap();
        assert_eq!(apps[1].id, oldest.id);
        assert_eq!(apps[1].notes.as_deref(), Some("recruiter replied"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let (mut store, _) = ready_store().await;
        store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        let before = store.snapshot().unwrap();

        let result = store
            .update_tracked_application(Uuid::new_v4(), ApplicationPatch::status(ApplicationStatus::Offer))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_id_mutations_both_rewrite_blob() {
        let (mut store, storage) = ready_store().await;
        assert!(storage.get(APPLICATIONS_KEY).await.unwrap().is_none());

        store
            .update_tracked_application(Uuid::new_v4(), ApplicationPatch::status(ApplicationStatus::Offer))
            .await
            .unwrap();
        assert_eq!(storage.get(APPLICATIONS_KEY).await.unwrap().as_deref(), Some("[]"));

        let other = Arc::new(MemoryStorage::new());
        let mut store = ApplicationStore::load(other.clone()).await;
        assert!(!store.remove_tracked_application(Uuid::new_v4()).await.unwrap());
        assert_eq!(other.get(APPLICATIONS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (mut store, _) = ready_store().await;
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();

        assert!(store.remove_tracked_application(record.id).await.unwrap());
        assert!(store.application(record.id).unwrap().is_none());
        assert!(!store.remove_tracked_application(record.id).await.unwrap());
        assert!(store.applications().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_update_merges_and_persists() {
        let (mut store, storage) = ready_store().await;
        store
            .update_user_profile(ProfilePatch {
                name: Some("Ada".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let merged = store
            .update_user_profile(ProfilePatch {
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(merged.name, "Ada");
        assert_eq!(merged.email, "ada@example.com");

        let raw = storage.get(PROFILE_KEY).await.unwrap().unwrap();
        let persisted: UserProfile = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, merged);
    }

    #[tokio::test]
    async fn test_every_mutation_writes_applications_blob() {
        let (mut store, storage) = ready_store().await;
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();

        let persisted = |raw: Option<String>| -> Vec<TrackedApplication> {
            serde_json::from_str(&raw.unwrap()).unwrap()
        };
        assert_eq!(persisted(storage.get(APPLICATIONS_KEY).await.unwrap()).len(), 1);

        store
            .update_tracked_application(record.id, ApplicationPatch::status(ApplicationStatus::Viewed))
            .await
            .unwrap();
        let apps = persisted(storage.get(APPLICATIONS_KEY).await.unwrap());
        assert_eq!(apps[0].status, ApplicationStatus::Viewed);

        store.remove_tracked_application(record.id).await.unwrap();
        assert!(persisted(storage.get(APPLICATIONS_KEY).await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_writes_do_not_roll_back_memory() {
        let mut store = ApplicationStore::load(Arc::new(BrokenStorage)).await;
        let record = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        assert_eq!(store.applications().unwrap()[0].id, record.id);
    }

    #[tokio::test]
    async fn test_reload_round_trips_collection() {
        let (mut store, storage) = ready_store().await;
        let first = store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Applied)
            .await
            .unwrap();
        store
            .add_tracked_application(job("https://x/2", "Designer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store
            .update_tracked_application(
                first.id,
                ApplicationPatch {
                    notes: Some(Some("phone screen Tuesday".to_string())),
                    tailored_resume: Some(Some("Tailored resume".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update_user_profile(ProfilePatch {
                name: Some("Ada".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let reloaded = ApplicationStore::load(storage).await;
        assert_eq!(reloaded.snapshot().unwrap(), store.snapshot().unwrap());
    }

    #[tokio::test]
    async fn test_bookmark_then_apply_same_url_scenario() {
        let (mut store, _) = ready_store().await;
        store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Bookmarked)
            .await
            .unwrap();
        store
            .add_tracked_application(job("https://x/1", "Engineer"), ApplicationStatus::Applied)
            .await
            .unwrap();

        let apps = store.applications().unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].status, ApplicationStatus::Applied);
        assert!(apps[0].applied_date.is_some());
    }
}
