//! Profile persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{Profile, ProfileFields};
use crate::error::{CouncilError, CouncilResult};

/// Storage seam for profiles.
///
/// Absence is a normal answer from `get`/`exists`, never an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a new locked profile for `user_id` and return it.
    async fn create(&self, user_id: &str, fields: ProfileFields) -> CouncilResult<Profile>;

    /// Load the profile for `user_id`, if one was created.
    async fn get(&self, user_id: &str) -> CouncilResult<Option<Profile>>;

    /// Whether a profile exists for `user_id`.
    async fn exists(&self, user_id: &str) -> CouncilResult<bool>;

    /// Prompt preamble for `user_id`; empty when no profile exists.
    async fn context(&self, user_id: &str) -> CouncilResult<String> {
        Ok(self
            .get(user_id)
            .await?
            .map(|profile| profile.context())
            .unwrap_or_default())
    }
}

/// One pretty-printed JSON file per user under `data_dir`.
///
/// No locking: two concurrent creates for the same id race and the last
/// write wins.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    data_dir: PathBuf,
}

impl FileProfileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing `user_id`; ids that could escape `data_dir` are refused.
    fn profile_path(&self, user_id: &str) -> CouncilResult<PathBuf> {
        let unsafe_id = user_id.is_empty()
            || user_id == "."
            || user_id == ".."
            || user_id.contains(['/', '\\', '\0']);
        if unsafe_id {
            return Err(CouncilError::BadRequest(format!(
                "Invalid user id for profile storage: {:?}",
                user_id
            )));
        }

        Ok(self.data_dir.join(format!("{}.json", user_id)))
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn create(&self, user_id: &str, fields: ProfileFields) -> CouncilResult<Profile> {
        let path = self.profile_path(user_id)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let profile = Profile::new(user_id, fields);
        let contents = serde_json::to_vec_pretty(&profile)?;
        tokio::fs::write(&path, contents).await?;

        tracing::info!(user_id = %user_id, "Profile created");
        Ok(profile)
    }

    async fn get(&self, user_id: &str) -> CouncilResult<Option<Profile>> {
        let path = self.profile_path(user_id)?;
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&contents)?))
    }

    async fn exists(&self, user_id: &str) -> CouncilResult<bool> {
        let path = self.profile_path(user_id)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}
