use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::ResourceId;

/// Kind of learning artifact in a chapter checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Test,
    Pdf,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Test => "test",
            ResourceKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One learning artifact. Only the completion pair ever changes, and only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResource {
    id: ResourceId,
    #[serde(rename = "type")]
    kind: ResourceKind,
    title: String,
    url: String,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    duration_minutes: Option<u32>,
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl TopicResource {
    #[must_use]
    pub fn new(
        id: ResourceId,
        kind: ResourceKind,
        title: impl Into<String>,
        url: impl Into<String>,
        duration_minutes: Option<u32>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            url: url.into(),
            duration_minutes,
            completed: false,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Marks the resource completed at `now`.
    ///
    /// Returns `false` without touching `completed_at` if it was already completed.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn video() -> TopicResource {
        TopicResource::new(
            ResourceId::new("video-Algebra-0"),
            ResourceKind::Video,
            "Algebra - Introduction & Concepts",
            "/resources/videos/Quant/Algebra/0",
            Some(12),
        )
    }

    #[test]
    fn completion_is_recorded_once() {
        let mut resource = video();
        let first = fixed_now();
        assert!(resource.mark_completed(first));
        assert!(!resource.mark_completed(first + Duration::hours(1)));
        assert_eq!(resource.completed_at(), Some(first));
    }

    #[test]
    fn serializes_with_browser_field_names() {
        let json = serde_json::to_value(video()).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["duration"], 12);
        assert_eq!(json["completed"], false);
        assert!(json.get("completedAt").is_none());
    }
}
