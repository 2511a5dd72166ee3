use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ChapterId, ResourceId};
use crate::model::resource::TopicResource;

/// Videos in every chapter checklist.
pub const VIDEOS_PER_CHAPTER: usize = 5;
/// Practice tests in every chapter checklist.
pub const TESTS_PER_CHAPTER: usize = 20;
/// Documents in every chapter checklist.
pub const PDFS_PER_CHAPTER: usize = 10;
/// Size of the fixed checklist; the denominator of `completion_percentage`.
pub const RESOURCES_PER_CHAPTER: usize = VIDEOS_PER_CHAPTER + TESTS_PER_CHAPTER + PDFS_PER_CHAPTER;

/// `round(100 * completed / total)` with halves rounded up, capped at 100.
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed.saturating_mul(200).saturating_add(total)) / total.saturating_mul(2);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

//
// ─── RESOURCES ─────────────────────────────────────────────────────────────────
//

/// Checklist grouped by kind, in the order the UI lists them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChapterResources {
    pub videos: Vec<TopicResource>,
    pub tests: Vec<TopicResource>,
    pub pdfs: Vec<TopicResource>,
}

impl ChapterResources {
    /// All resources: videos, then tests, then pdfs.
    pub fn iter(&self) -> impl Iterator<Item = &TopicResource> {
        self.videos.iter().chain(&self.tests).chain(&self.pdfs)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut TopicResource> {
        self.videos
            .iter_mut()
            .chain(&mut self.tests)
            .chain(&mut self.pdfs)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.len() + self.tests.len() + self.pdfs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.iter().filter(|r| r.is_completed()).count()
    }

    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&TopicResource> {
        self.iter().find(|r| r.id() == id)
    }

    fn get_mut(&mut self, id: &ResourceId) -> Option<&mut TopicResource> {
        self.iter_mut().find(|r| r.id() == id)
    }
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// What a resource completion did to its chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUpdate {
    NotFound,
    AlreadyCompleted,
    Completed { chapter_completed: bool },
}

/// One subject + topic unit of study for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    id: ChapterId,
    subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_icon: Option<String>,
    topic_id: String,
    topic_name: String,
    resources: ChapterResources,
    completion_percentage: u8,
    unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl Chapter {
    #[must_use]
    pub fn new(
        id: ChapterId,
        subject: impl Into<String>,
        subject_icon: Option<String>,
        topic_id: impl Into<String>,
        topic_name: impl Into<String>,
        resources: ChapterResources,
        unlocked: bool,
    ) -> Self {
        let mut chapter = Self {
            id,
            subject: subject.into(),
            subject_icon,
            topic_id: topic_id.into(),
            topic_name: topic_name.into(),
            resources,
            completion_percentage: 0,
            unlocked,
            started_at: None,
            completed_at: None,
        };
        chapter.completion_percentage = chapter.computed_percentage();
        chapter
    }

    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn subject_icon(&self) -> Option<&str> {
        self.subject_icon.as_deref()
    }

    #[must_use]
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    #[must_use]
    pub fn resources(&self) -> &ChapterResources {
        &self.resources
    }

    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        self.completion_percentage
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_percentage == 100
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub(crate) fn unlock(&mut self) {
        self.unlocked = true;
    }

    /// Completes one resource and refreshes the derived fields.
    ///
    /// `started_at` is stamped on the first completed resource and
    /// `completed_at` when the percentage first reaches 100.
    pub fn complete_resource(&mut self, resource_id: &ResourceId, now: DateTime<Utc>) -> ResourceUpdate {
        let Some(resource) = self.resources.get_mut(resource_id) else {
            return ResourceUpdate::NotFound;
        };
        if !resource.mark_completed(now) {
            return ResourceUpdate::AlreadyCompleted;
        }

        let was_complete = self.completed_at.is_some();
        self.refresh(now);
        ResourceUpdate::Completed {
            chapter_completed: !was_complete && self.completed_at.is_some(),
        }
    }

    fn computed_percentage(&self) -> u8 {
        completion_percentage(self.resources.completed_count(), RESOURCES_PER_CHAPTER)
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        self.completion_percentage = self.computed_percentage();
        if self.started_at.is_none() && self.resources.completed_count() > 0 {
            self.started_at = Some(now);
        }
        if self.completed_at.is_none() && self.completion_percentage == 100 {
            self.completed_at = Some(now);
        }
    }
}
