//! In-memory user profiles for personalization.
//!
//! Nothing is persisted; profiles live as long as the session.

use crate::error::SanadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub preferences: BTreeMap<String, String>,
    pub accessibility_needs: BTreeMap<String, String>,
    pub learning_progress: BTreeMap<String, String>,
}

/// Partial update; present keys overwrite, absent keys are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
    #[serde(default)]
    pub accessibility_needs: BTreeMap<String, String>,
    #[serde(default)]
    pub learning_progress: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, UserProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty profile, replacing any existing one for `user_id`
    pub fn create(&mut self, user_id: &str) -> &UserProfile {
        debug!("Creating profile for {}", user_id);
        self.profiles.insert(user_id.to_string(), UserProfile::default());
        &self.profiles[user_id]
    }

    pub fn update(&mut self, user_id: &str, update: ProfileUpdate) -> Result<&UserProfile, SanadError> {
        let profile = self
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| SanadError::ProfileNotFound(user_id.to_string()))?;

        profile.preferences.extend(update.preferences);
        profile.accessibility_needs.extend(update.accessibility_needs);
        profile.learning_progress.extend(update.learning_progress);
        Ok(&*profile)
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
