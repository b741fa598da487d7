//! Artifact service
//!
//! Versioned binary/text artifacts attached to a session. Filenames starting
//! with `user:` are shared across all sessions of the same user.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{MathSolverError, Part, Result};

const USER_NAMESPACE: &str = "user:";

/// Location of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactScope {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl ArtifactScope {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    fn key(&self, filename: &str) -> ArtifactKey {
        let session_id = if filename.starts_with(USER_NAMESPACE) {
            None
        } else {
            Some(self.session_id.clone())
        };
        ArtifactKey {
            app_name: self.app_name.clone(),
            user_id: self.user_id.clone(),
            session_id,
            filename: filename.to_string(),
        }
    }

    /// Whether a stored artifact is visible from this scope
    fn sees(&self, key: &ArtifactKey) -> bool {
        key.app_name == self.app_name
            && key.user_id == self.user_id
            && key
                .session_id
                .as_ref()
                .map_or(true, |id| *id == self.session_id)
    }
}

/// Storage key; `session_id` is `None` for the user namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ArtifactKey {
    app_name: String,
    user_id: String,
    session_id: Option<String>,
    filename: String,
}

/// Capability for storing artifacts
#[async_trait]
pub trait ArtifactService: Send + Sync {
    /// Store a new version and return its number (starting at 0)
    async fn save_artifact(&self, scope: &ArtifactScope, filename: &str, artifact: Part)
        -> Result<u32>;

    /// Load a version, or the latest when `version` is `None`
    async fn load_artifact(
        &self,
        scope: &ArtifactScope,
        filename: &str,
        version: Option<u32>,
    ) -> Result<Option<Part>>;

    /// Filenames visible from the scope, sorted
    async fn list_artifact_keys(&self, scope: &ArtifactScope) -> Result<Vec<String>>;

    /// Remove every version of an artifact
    async fn delete_artifact(&self, scope: &ArtifactScope, filename: &str) -> Result<()>;

    /// Version numbers of an artifact
    async fn list_versions(&self, scope: &ArtifactScope, filename: &str) -> Result<Vec<u32>>;
}

/// Artifact service backed by a process-local map
#[derive(Debug, Default)]
pub struct InMemoryArtifactService {
    artifacts: RwLock<HashMap<ArtifactKey, Vec<Part>>>,
}

impl InMemoryArtifactService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactService for InMemoryArtifactService {
    async fn save_artifact(
        &self,
        scope: &ArtifactScope,
        filename: &str,
        artifact: Part,
    ) -> Result<u32> {
        let mut artifacts = self.artifacts.write().await;
        let versions = artifacts.entry(scope.key(filename)).or_default();
        versions.push(artifact);
        Ok((versions.len() - 1) as u32)
    }

    async fn load_artifact(
        &self,
        scope: &ArtifactScope,
        filename: &str,
        version: Option<u32>,
    ) -> Result<Option<Part>> {
        let artifacts = self.artifacts.read().await;
        let Some(versions) = artifacts.get(&scope.key(filename)) else {
            return Ok(None);
        };

        match version {
            None => Ok(versions.last().cloned()),
            Some(v) => versions.get(v as usize).cloned().map(Some).ok_or_else(|| {
                MathSolverError::ArtifactNotFound(format!("{} version {}", filename, v))
            }),
        }
    }

    async fn list_artifact_keys(&self, scope: &ArtifactScope) -> Result<Vec<String>> {
        let artifacts = self.artifacts.read().await;
        let mut keys: Vec<String> = artifacts
            .keys()
            .filter(|key| scope.sees(key))
            .map(|key| key.filename.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete_artifact(&self, scope: &ArtifactScope, filename: &str) -> Result<()> {
        self.artifacts.write().await.remove(&scope.key(filename));
        Ok(())
    }

    async fn list_versions(&self, scope: &ArtifactScope, filename: &str) -> Result<Vec<u32>> {
        let artifacts = self.artifacts.read().await;
        Ok(artifacts
            .get(&scope.key(filename))
            .map(|versions| (0..versions.len() as u32).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(session_id: &str) -> ArtifactScope {
        ArtifactScope::new("app", "user", session_id)
    }

    #[tokio::test]
    async fn test_versions_increment() {
        let service = InMemoryArtifactService::new();
        let s = scope("s1");
        assert_eq!(service.save_artifact(&s, "work.txt", Part::from_text("a")).await.unwrap(), 0);
        assert_eq!(service.save_artifact(&s, "work.txt", Part::from_text("b")).await.unwrap(), 1);

        let latest = service.load_artifact(&s, "work.txt", None).await.unwrap().unwrap();
        assert_eq!(latest.text.as_deref(), Some("b"));
        let first = service.load_artifact(&s, "work.txt", Some(0)).await.unwrap().unwrap();
        assert_eq!(first.text.as_deref(), Some("a"));
        assert_eq!(service.list_versions(&s, "work.txt").await.unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_missing_version_is_error() {
        let service = InMemoryArtifactService::new();
        let s = scope("s1");
        service.save_artifact(&s, "work.txt", Part::from_text("a")).await.unwrap();
        let err = service.load_artifact(&s, "work.txt", Some(3)).await.unwrap_err();
        assert!(matches!(err, MathSolverError::ArtifactNotFound(_)));
        assert!(service.load_artifact(&s, "other.txt", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_namespace_is_shared_across_sessions() {
        let service = InMemoryArtifactService::new();
        service
            .save_artifact(&scope("s1"), "user:notes", Part::from_text("x = 3"))
            .await
            .unwrap();
        service
            .save_artifact(&scope("s1"), "scratch", Part::from_text("tmp"))
            .await
            .unwrap();

        let keys = service.list_artifact_keys(&scope("s2")).await.unwrap();
        assert_eq!(keys, vec!["user:notes".to_string()]);

        let keys = service.list_artifact_keys(&scope("s1")).await.unwrap();
        assert_eq!(keys, vec!["scratch".to_string(), "user:notes".to_string()]);
    }

    #[tokio::test]
    async fn test_session_named_user_stays_private() {
        let service = InMemoryArtifactService::new();
        service
            .save_artifact(&scope("user"), "scratch", Part::from_text("tmp"))
            .await
            .unwrap();
        service
            .save_artifact(&scope("a/b"), "c", Part::from_text("nested"))
            .await
            .unwrap();

        assert!(service.list_artifact_keys(&scope("s2")).await.unwrap().is_empty());
        assert!(service.list_artifact_keys(&scope("a")).await.unwrap().is_empty());
        assert!(service
            .load_artifact(&scope("a"), "b/c", None)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            service.list_artifact_keys(&scope("user")).await.unwrap(),
            vec!["scratch".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_removes_all_versions() {
        let service = InMemoryArtifactService::new();
        let s = scope("s1");
        service.save_artifact(&s, "work.txt", Part::from_text("a")).await.unwrap();
        service.delete_artifact(&s, "work.txt").await.unwrap();
        assert!(service.list_versions(&s, "work.txt").await.unwrap().is_empty());
        assert!(service.list_artifact_keys(&s).await.unwrap().is_empty());
    }
}
