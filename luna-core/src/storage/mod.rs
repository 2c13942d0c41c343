//! Persisted state layout: atomic (write-temp, fsync, rename) filesystem
//! storage for the core's durable state (design §6.4).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::types::{CFIAState, ExistentialState};
use crate::types::Lesson;

/// Durable state the orchestrator must read at startup and write atomically
/// at the end of every request (design §4.6 step 10, §6.4).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load `ExistentialState`, or a fresh default if no file exists yet.
    async fn load_existential_state(&self) -> Result<ExistentialState>;
    /// Persist `ExistentialState` atomically.
    async fn save_existential_state(&self, state: &ExistentialState) -> Result<()>;

    /// Load `CFIAState`, or a fresh default if no file exists yet.
    async fn load_cfia_state(&self) -> Result<CFIAState>;
    /// Persist `CFIAState` atomically.
    async fn save_cfia_state(&self, state: &CFIAState) -> Result<()>;

    /// Load every lesson currently stored in `shard_id`, or empty if absent.
    async fn load_lessons(&self, shard_id: &str) -> Result<Vec<Lesson>>;
    /// Overwrite `shard_id`'s lesson array atomically.
    async fn save_lessons(&self, shard_id: &str, lessons: &[Lesson]) -> Result<()>;
    /// Delete a shard file (after a successful split).
    async fn delete_shard(&self, shard_id: &str) -> Result<()>;

    /// Append one NDJSON line to the shadow-score ledger (optional; errors
    /// here are logged, never fatal to the request).
    async fn append_shadow_score(&self, line: &str) -> Result<()>;
}

/// Filesystem-backed [`StateStore`] rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    data_dir: PathBuf,
}

impl FileStateStore {
    /// Root all state files under `data_dir` (created on first write if missing).
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn lessons_path(&self, shard_id: &str) -> PathBuf {
        self.data_dir.join("lessons").join(format!("{shard_id}.json"))
    }

    async fn read_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
        match fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(Error::StateIOError { path: path.display().to_string(), source }),
        }
    }

    /// Serialize `value` to `path` via write-temp-then-rename: the write
    /// either lands in full or not at all, never a partial file.
    async fn write_json_atomic<T: serde::Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .await
            .map_err(|source| Error::StateIOError { path: parent.display().to_string(), source })?;

        let tmp_path = path.with_extension("tmp");
        let body = serde_json::to_vec_pretty(value)?;

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|source| Error::StateIOError { path: tmp_path.display().to_string(), source })?;
        file.write_all(&body)
            .await
            .map_err(|source| Error::StateIOError { path: tmp_path.display().to_string(), source })?;
        file.sync_all()
            .await
            .map_err(|source| Error::StateIOError { path: tmp_path.display().to_string(), source })?;
        drop(file);

        fs::rename(&tmp_path, path)
            .await
            .map_err(|source| Error::StateIOError { path: path.display().to_string(), source })?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load_existential_state(&self) -> Result<ExistentialState> {
        Self::read_json(&self.path("existential_state.json")).await
    }

    async fn save_existential_state(&self, state: &ExistentialState) -> Result<()> {
        Self::write_json_atomic(&self.path("existential_state.json"), state).await
    }

    async fn load_cfia_state(&self) -> Result<CFIAState> {
        Self::read_json(&self.path("cfia_state.json")).await
    }

    async fn save_cfia_state(&self, state: &CFIAState) -> Result<()> {
        Self::write_json_atomic(&self.path("cfia_state.json"), state).await
    }

    async fn load_lessons(&self, shard_id: &str) -> Result<Vec<Lesson>> {
        Self::read_json(&self.lessons_path(shard_id)).await
    }

    async fn save_lessons(&self, shard_id: &str, lessons: &[Lesson]) -> Result<()> {
        Self::write_json_atomic(&self.lessons_path(shard_id), &lessons.to_vec()).await
    }

    async fn delete_shard(&self, shard_id: &str) -> Result<()> {
        let path = self.lessons_path(shard_id);
        match fs::remove_file(&path).await {
            Ok(()) | Err(_) if !path.exists() => Ok(()),
            Err(source) => Err(Error::StateIOError { path: path.display().to_string(), source }),
        }
    }

    async fn append_shadow_score(&self, line: &str) -> Result<()> {
        let path = self.path("shadow_score.ndjson");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::StateIOError { path: parent.display().to_string(), source })?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| Error::StateIOError { path: path.display().to_string(), source })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| Error::StateIOError { path: path.display().to_string(), source })?;
        file.write_all(b"\n")
            .await
            .map_err(|source| Error::StateIOError { path: path.display().to_string(), source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_state_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());
        let state = store.load_existential_state().await.unwrap();
        assert_eq!(state, ExistentialState::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());
        let mut state = ExistentialState::default();
        state.age = 3;
        store.save_existential_state(&state).await.unwrap();
        let loaded = store.load_existential_state().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());
        store.save_cfia_state(&CFIAState::default()).await.unwrap();
        assert!(!dir.path().join("cfia_state.tmp").exists());
        assert!(dir.path().join("cfia_state.json").exists());
    }

    #[tokio::test]
    async fn shard_round_trips_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());
        let lesson = Lesson {
            original_prompt: "hi".to_string(),
            suboptimal_response: "hello".to_string(),
            gold_standard: "hello there".to_string(),
            utility_score: 0.5,
            karma_delta: 1.0,
            timestamp: 0,
            context_tags: vec!["greeting".to_string()],
            lingua_calc_depth: 0,
            lingua_calc_gain: 0.0,
        };
        store.save_lessons("file_1", &[lesson.clone()]).await.unwrap();
        let loaded = store.load_lessons("file_1").await.unwrap();
        assert_eq!(loaded, vec![lesson]);
        store.delete_shard("file_1").await.unwrap();
        assert!(store.load_lessons("file_1").await.unwrap().is_empty());
    }
}
