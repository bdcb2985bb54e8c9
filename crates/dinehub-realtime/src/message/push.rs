//! Defensive normalization of live push payloads.
//!
//! The live server is not trusted to send complete records. Every field is
//! read on its own and falls back to a default, so one bad field never costs
//! the whole notification.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use dinehub_core::AppResult;
use dinehub_core::error::AppError;
use dinehub_core::types::id::{BranchId, NotificationId, UserId};
use dinehub_entity::notification::{NotificationCategory, NotificationRecord};

/// Hands out negative ids for pushes that arrived without one.
#[derive(Debug)]
pub struct LocalIdSequence {
    next: AtomicI64,
}

impl LocalIdSequence {
    /// Create a sequence starting at -1.
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(-1),
        }
    }

    /// The next unused local id.
    pub fn next_id(&self) -> NotificationId {
        NotificationId(self.next.fetch_sub(1, Ordering::SeqCst))
    }
}

impl Default for LocalIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a push payload into a record.
///
/// Only a payload that is not a JSON object is rejected.
pub fn normalize_push(payload: &Value, local_ids: &LocalIdSequence) -> AppResult<NotificationRecord> {
    let Some(fields) = payload.as_object() else {
        return Err(AppError::malformed_push(format!(
            "Expected an object payload, got {}",
            kind_of(payload)
        )));
    };

    let id = integer(fields, &["id"])
        .map(NotificationId)
        .unwrap_or_else(|| local_ids.next_id());

    Ok(NotificationRecord {
        id,
        user_id: integer(fields, &["userId", "user_id"]).map(UserId),
        branch_id: integer(fields, &["branchId", "branch_id"]).map(BranchId),
        title: text(fields, &["title"]).unwrap_or_default(),
        message: text(fields, &["message"]).unwrap_or_default(),
        category: text(fields, &["type", "category"])
            .map(NotificationCategory::from)
            .unwrap_or_default(),
        link: text(fields, &["link"]).filter(|link| !link.is_empty()),
        read: first(fields, &["read", "isRead", "is_read"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: first(fields, &["createdAt", "created_at"])
            .and_then(timestamp)
            .unwrap_or_else(Utc::now),
    })
}

fn first<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn integer(fields: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    match first(fields, keys)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first(fields, keys)?.as_str().map(str::to_string)
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
