//! Brief domain model.
//!
//! # Responsibility
//! - Define the canonical creative-brief record shared by both storage
//!   backends and the list controller.
//! - Build records from loosely-typed input, filling defaults.
//!
//! # Invariants
//! - `id` is assigned by a backend, never chosen by the caller.
//! - `created_at` is set once at construction and never rewritten.
//! - Construction never fails and never performs I/O; validity is a query,
//!   not a precondition.

use chrono::{SecondsFormat, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Opaque backend-assigned identifier.
///
/// Remote backends may hand out numeric ids; they are kept in their decimal
/// string form so both backends share one id type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BriefId(String);

impl BriefId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for BriefId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for BriefId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BriefId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for BriefId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BriefId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BriefIdVisitor;

        impl Visitor<'_> for BriefIdVisitor {
            type Value = BriefId;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or integer brief id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(BriefId::new(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(BriefId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(BriefId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(BriefId(value.to_string()))
            }
        }

        deserializer.deserialize_any(BriefIdVisitor)
    }
}

/// Workflow state of a brief.
///
/// The UI offers the three known states; anything else read from storage is
/// preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BriefStatus {
    #[default]
    Idea,
    InProgress,
    Completed,
    Other(String),
}

const STATUS_IDEA: &str = "idea";
const STATUS_IN_PROGRESS: &str = "in-progress";
const STATUS_COMPLETED: &str = "completed";

impl BriefStatus {
    /// The statuses a form may offer, in display order.
    pub fn known() -> [BriefStatus; 3] {
        [Self::Idea, Self::InProgress, Self::Completed]
    }

    /// Wire value, e.g. `in-progress`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idea => STATUS_IDEA,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Other(value) => value.as_str(),
        }
    }

    /// Parses a wire value. Never fails; unknown values become `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            STATUS_IDEA => Self::Idea,
            STATUS_IN_PROGRESS => Self::InProgress,
            STATUS_COMPLETED => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for BriefStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for BriefStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BriefStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Loosely-typed input mapping a brief is built from.
///
/// Every field is optional; `null` is treated the same as an absent field.
/// This is also the payload shape sent to the remote backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BriefId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BriefStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BriefInput {
    /// Starts an input with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns a copy without the `id` field.
    ///
    /// Used for payloads where the id travels in the request path.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    /// Fills every absent field of `self` from `fallback`.
    pub fn fill_from(self, fallback: BriefInput) -> Self {
        Self {
            id: self.id.or(fallback.id),
            title: self.title.or(fallback.title),
            description: self.description.or(fallback.description),
            colors: self.colors.or(fallback.colors),
            references: self.references.or(fallback.references),
            tags: self.tags.or(fallback.tags),
            status: self.status.or(fallback.status),
            created_at: self.created_at.or(fallback.created_at),
        }
    }
}

/// Canonical creative-brief record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub id: BriefId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: BriefStatus,
    #[serde(default = "now_timestamp")]
    pub created_at: String,
}

impl Brief {
    /// Builds a brief from input, filling defaults for absent fields.
    ///
    /// # Invariants
    /// - The caller-provided `id` wins over any `id` carried by `input`.
    /// - `created_at` defaults to the current UTC time.
    pub fn build(id: BriefId, input: BriefInput) -> Self {
        Self {
            id,
            title: input.title.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            colors: input.colors.unwrap_or_default(),
            references: input.references.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            created_at: input.created_at.unwrap_or_else(now_timestamp),
        }
    }

    /// Returns whether the title has content after trimming.
    ///
    /// Advisory only: storage accepts invalid briefs.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Projects this brief into a fully-populated input, e.g. to prefill an
    /// editor.
    pub fn to_input(&self) -> BriefInput {
        BriefInput {
            id: Some(self.id.clone()),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            colors: Some(self.colors.clone()),
            references: Some(self.references.clone()),
            tags: Some(self.tags.clone()),
            status: Some(self.status.clone()),
            created_at: Some(self.created_at.clone()),
        }
    }
}

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{Brief, BriefId, BriefInput, BriefStatus};

    #[test]
    fn status_parse_keeps_unknown_values() {
        assert_eq!(BriefStatus::parse("in-progress"), BriefStatus::InProgress);
        assert_eq!(
            BriefStatus::parse("archived"),
            BriefStatus::Other("archived".to_string())
        );
        assert_eq!(BriefStatus::parse("archived").as_str(), "archived");
    }

    #[test]
    fn build_prefers_explicit_id_over_input_id() {
        let mut input = BriefInput::titled("Poster");
        input.id = Some(BriefId::from("from-input"));
        let brief = Brief::build(BriefId::from("assigned"), input);
        assert_eq!(brief.id.as_str(), "assigned");
    }

    #[test]
    fn created_at_is_iso_utc() {
        let brief = Brief::build(BriefId::from("1"), BriefInput::default());
        assert!(brief.created_at.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&brief.created_at).is_ok());
    }
}
