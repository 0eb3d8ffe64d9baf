//! Profile writer
//!
//! Applies a [`PartialProfileUpdate`] to the store and invalidates cached
//! reads of the profile.
//!
//! The nested records are replaced whole: a nested record present in the
//! update is written as given, an absent one is written as its full
//! default. To change a single nested key, read the normalized profile,
//! modify the nested record and send all of it back.

use crate::cache::{CacheKey, CacheLayer};
use crate::config::CacheConfig;
use crate::error::UpdateError;
use crate::models::{PartialProfileUpdate, RawRecord};
use crate::store::ProfileStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Write side of the profile layer
#[derive(Clone)]
pub struct ProfileWriter {
    store: Arc<dyn ProfileStore>,
    cache: Arc<dyn CacheLayer>,
    table: String,
    cache_keys: CacheConfig,
}

impl ProfileWriter {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: Arc<dyn CacheLayer>,
        table: impl Into<String>,
        cache_keys: CacheConfig,
    ) -> Self {
        Self {
            store,
            cache,
            table: table.into(),
            cache_keys,
        }
    }

    /// Persist a partial update
    ///
    /// # Returns
    /// * `Ok(())` - Stored; cached reads invalidated (failures only logged)
    /// * `Err(UpdateError::MissingIdentifier)` - No id; store not contacted
    /// * `Err(UpdateError::StoreRejected)` - Store refused the write, not retried
    pub async fn update_profile(&self, partial: PartialProfileUpdate) -> Result<(), UpdateError> {
        let (id, patch) = build_patch(partial)?;

        debug!("Updating profile {} in '{}' ({} columns)", id, self.table, patch.len());

        self.store
            .update(&self.table, &id, &patch)
            .await
            .map_err(|source| UpdateError::StoreRejected {
                id: id.clone(),
                source,
            })?;

        self.invalidate(&self.cache_keys.key_for_profile(&id)).await;
        if let Some(collection) = self.cache_keys.key_for_collection() {
            self.invalidate(&collection).await;
        }

        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) {
        if let Err(e) = self.cache.invalidate(key).await {
            warn!("Failed to invalidate cache key {}, reads may be stale: {}", key, e);
        }
    }
}

/// Split a partial update into its identifier and the column patch
///
/// Scalars appear only when present; the three nested records always do.
pub fn build_patch(partial: PartialProfileUpdate) -> Result<(String, RawRecord), UpdateError> {
    let PartialProfileUpdate {
        id,
        username,
        full_name,
        email,
        bio,
        first_name,
        last_name,
        location,
        website,
        social_links,
        comment_preferences,
        theme_colors,
    } = partial;

    let id = match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(UpdateError::MissingIdentifier),
    };

    let mut patch = RawRecord::new();
    let scalars = [
        ("username", username),
        ("full_name", full_name),
        ("email", email),
        ("bio", bio),
        ("first_name", first_name),
        ("last_name", last_name),
        ("location", location),
        ("website", website),
    ];
    for (column, value) in scalars {
        if let Some(value) = value {
            patch.insert(column.to_string(), Value::String(value));
        }
    }

    let links = social_links.unwrap_or_default();
    patch.insert(
        "social_links".to_string(),
        json!({
            "instagram": links.instagram,
            "youtube": links.youtube,
            "linkedin": links.linkedin,
        }),
    );

    let prefs = comment_preferences.unwrap_or_default();
    patch.insert(
        "comment_preferences".to_string(),
        json!({
            "email_notifications": prefs.email_notifications,
            "push_notifications": prefs.push_notifications,
            "disable_comments": prefs.disable_comments,
        }),
    );

    let colors = theme_colors.unwrap_or_default();
    patch.insert(
        "theme_colors".to_string(),
        json!({
            "primary": colors.primary,
            "secondary": colors.secondary,
            "accent": colors.accent,
        }),
    );

    Ok((id, patch))
}
