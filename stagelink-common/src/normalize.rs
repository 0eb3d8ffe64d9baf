//! Normalization of loosely-typed stored profile data
//!
//! The nested JSON columns (`social_links`, `comment_preferences`,
//! `theme_colors`) may hold anything: `null`, a string, an object written
//! by an older schema. Normalizers turn them into closed, fully-defaulted
//! records:
//!
//! - Non-object input is an [`InvalidShapeError`]; the caller decides
//!   whether to propagate it or fall back to defaults
//! - Each recognized key is type-checked on its own; missing or mistyped
//!   keys take their default
//! - Unrecognized keys are dropped
//!
//! Normalizing an already-normalized value returns it unchanged.

use crate::error::InvalidShapeError;
use crate::models::{
    CommentPreferencesRecord, ProfileRecord, RawRecord, SocialLinksRecord, ThemeColorsRecord,
    DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR,
};
use serde_json::{Map, Value};
use tracing::debug;

/// A nested record that can be rebuilt from an untyped JSON value
pub trait NormalizedField: Default + Sized {
    /// Column name, used in error reports
    const FIELD: &'static str;

    /// Build the record from a JSON object, defaulting key by key
    fn from_object(obj: &Map<String, Value>) -> Self;

    /// Validate `raw` and produce a complete record
    fn normalize(raw: &Value) -> Result<Self, InvalidShapeError> {
        match raw {
            Value::Object(obj) => Ok(Self::from_object(obj)),
            other => Err(InvalidShapeError {
                field: Self::FIELD,
                found: json_kind(other),
            }),
        }
    }
}

impl NormalizedField for SocialLinksRecord {
    const FIELD: &'static str = "social_links";

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            instagram: string_or(obj, "instagram", ""),
            youtube: string_or(obj, "youtube", ""),
            linkedin: string_or(obj, "linkedin", ""),
        }
    }
}

impl NormalizedField for CommentPreferencesRecord {
    const FIELD: &'static str = "comment_preferences";

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            email_notifications: bool_or(obj, "email_notifications", false),
            push_notifications: bool_or(obj, "push_notifications", false),
            disable_comments: bool_or(obj, "disable_comments", false),
        }
    }
}

impl NormalizedField for ThemeColorsRecord {
    const FIELD: &'static str = "theme_colors";

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            primary: string_or(obj, "primary", DEFAULT_PRIMARY_COLOR),
            secondary: string_or(obj, "secondary", DEFAULT_SECONDARY_COLOR),
            accent: string_or(obj, "accent", DEFAULT_ACCENT_COLOR),
        }
    }
}

/// Normalize a possibly-absent column, substituting full defaults on a
/// shape error
pub fn normalize_or_default<T: NormalizedField>(raw: Option<&Value>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };

    match T::normalize(raw) {
        Ok(record) => record,
        Err(e) => {
            debug!("{}; using defaults", e);
            T::default()
        }
    }
}

impl ProfileRecord {
    /// Build a fully-populated profile from a raw store row
    ///
    /// `id` is used when the row carries no string `id` of its own. `now`
    /// fills `created_at`/`updated_at` only when the row has no value.
    pub fn from_raw(id: &str, raw: &RawRecord, now: &str) -> Self {
        Self {
            id: raw
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(id)
                .to_string(),
            username: optional_string(raw, "username"),
            full_name: optional_string(raw, "full_name"),
            email: string_or(raw, "email", ""),
            bio: string_or(raw, "bio", ""),
            first_name: string_or(raw, "first_name", ""),
            last_name: string_or(raw, "last_name", ""),
            location: string_or(raw, "location", ""),
            website: string_or(raw, "website", ""),
            social_links: normalize_or_default(raw.get("social_links")),
            comment_preferences: normalize_or_default(raw.get("comment_preferences")),
            theme_colors: normalize_or_default(raw.get("theme_colors")),
            created_at: string_or(raw, "created_at", now),
            updated_at: string_or(raw, "updated_at", now),
        }
    }
}

fn string_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn bool_or(obj: &Map<String, Value>, key: &str, default: bool) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
