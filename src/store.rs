use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::user::{engagement_score, PrivacyLevel, UserProfile};
use crate::ConnectionRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Community {
    profiles: Vec<UserProfile>,
    connections: Vec<ConnectionRequest>,
}

/// JSON-file document store for member profiles and connection requests.
pub struct CommunityStore {
    path: PathBuf,
    data: RwLock<Community>,
}

impl CommunityStore {
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let data = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| format!("failed to read community data: {}", err))?;
            if contents.trim().is_empty() {
                Community::default()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|err| format!("failed to parse community data: {}", err))?
            }
        } else {
            Community::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list_profiles(&self) -> Vec<UserProfile> {
        let guard = self.data.read().await;
        guard.profiles.clone()
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, String> {
        let guard = self.data.read().await;
        guard
            .profiles
            .iter()
            .find(|profile| profile.user_id == user_id)
            .cloned()
            .ok_or_else(|| format!("user profile not found: {}", user_id))
    }

    /// Candidate peers for `user_id`, in store order.
    ///
    /// Skips the requester, anyone in `exclude`, and private profiles.
    pub async fn candidates_for(
        &self,
        user_id: &str,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Vec<UserProfile> {
        let guard = self.data.read().await;
        guard
            .profiles
            .iter()
            .filter(|profile| profile.user_id != user_id)
            .filter(|profile| !exclude.contains(&profile.user_id))
            .filter(|profile| profile.preferences.privacy_level != PrivacyLevel::Private)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Connection requests sent by `user_id`.
    pub async fn connections_from(&self, user_id: &str) -> Vec<ConnectionRequest> {
        let guard = self.data.read().await;
        guard
            .connections
            .iter()
            .filter(|request| request.from_user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn upsert_profile(&self, profile: UserProfile) -> Result<UserProfile, String> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        let position = next
            .profiles
            .iter()
            .position(|existing| existing.user_id == profile.user_id);
        match position {
            Some(idx) => next.profiles[idx] = profile.clone(),
            None => next.profiles.push(profile.clone()),
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(profile)
    }

    pub async fn record_connection(&self, request: ConnectionRequest) -> Result<(), String> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        next.connections.push(request);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    pub async fn replace_all(
        &self,
        profiles: Vec<UserProfile>,
        connections: Vec<ConnectionRequest>,
    ) -> Result<(), String> {
        let mut guard = self.data.write().await;
        let next = Community {
            profiles,
            connections,
        };
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    /// Recomputes every member's engagement score as of `now`.
    pub async fn refresh_activity(&self, now: i64) -> Result<usize, String> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        for profile in next.profiles.iter_mut() {
            profile.activity.engagement_score = engagement_score(&profile.recent_entries, now);
            if let Some(latest) = profile.recent_entries.iter().map(|e| e.created_at).max() {
                profile.activity.last_active = profile.activity.last_active.max(latest);
            }
        }
        let count = next.profiles.len();
        self.persist(&next).await?;
        *guard = next;
        Ok(count)
    }

    /// Writes `data` to disk; callers swap it into memory only on success.
    async fn persist(&self, data: &Community) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(data)
            .map_err(|err| format!("failed to serialize community data: {}", err))?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|err| format!("failed to write community data: {}", err))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| format!("failed to finalize community data: {}", err))?;
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| format!("failed to create data dir: {}", err))
}
