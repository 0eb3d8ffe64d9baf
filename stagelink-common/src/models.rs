//! Profile models

use serde::{Deserialize, Serialize};

/// Untyped row as returned by a store: column name to JSON value
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";
pub const DEFAULT_SECONDARY_COLOR: &str = "#FFFFFF";
pub const DEFAULT_ACCENT_COLOR: &str = "#333333";

/// Links to a musician's profiles on other platforms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinksRecord {
    pub instagram: String,
    pub youtube: String,
    pub linkedin: String,
}

/// Per-profile comment and notification preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPreferencesRecord {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub disable_comments: bool,
}

/// Profile page color theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColorsRecord {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ThemeColorsRecord {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary: DEFAULT_SECONDARY_COLOR.to_string(),
            accent: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

/// Fully-populated profile as handed to consumers
///
/// Produced by [`crate::ProfileReader`]. The six string scalars and the
/// three nested records are always present; only `username` and
/// `full_name` may be `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: String,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub website: String,
    pub social_links: SocialLinksRecord,
    pub comment_preferences: CommentPreferencesRecord,
    pub theme_colors: ThemeColorsRecord,
    /// ISO-8601 timestamp
    pub created_at: String,
    /// ISO-8601 timestamp
    pub updated_at: String,
}

/// Partial profile update supplied by the presentation layer
///
/// Absent fields are left untouched in storage, except the three nested
/// records: an absent nested record is written as its full default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialProfileUpdate {
    pub id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<SocialLinksRecord>,
    pub comment_preferences: Option<CommentPreferencesRecord>,
    pub theme_colors: Option<ThemeColorsRecord>,
}

impl PartialProfileUpdate {
    /// Start an update for the given profile
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}
