pub mod catalog;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PlanError;
use crate::model::{
    Chapter, ChapterId, ChapterResources, DailyPlan, PDFS_PER_CHAPTER, ResourceId, ResourceKind,
    SelectedTopic, TESTS_PER_CHAPTER, TopicResource, VIDEOS_PER_CHAPTER, validate_selection,
};
use crate::time::add_calendar_days;

/// Turns a weak-topic selection into day-by-day plans.
///
/// Day `d` holds one chapter for every subject that still has a topic at
/// index `d`, so the journey lasts as many days as the longest topic list.
/// Only the first day starts unlocked.
///
/// Video durations are the only random field; seed the generator for
/// reproducible output.
#[derive(Debug, Clone)]
pub struct PlanGenerator<R = StdRng> {
    rng: R,
}

impl PlanGenerator<StdRng> {
    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PlanGenerator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Builds the plans for `topics`, dating day `d` at `start + d` days.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if the selection is empty or any subject is malformed.
    pub fn generate(
        &mut self,
        topics: &[SelectedTopic],
        start: DateTime<Utc>,
    ) -> Result<Vec<DailyPlan>, PlanError> {
        validate_selection(topics)?;
        let max_topics = topics.iter().map(SelectedTopic::len).max().unwrap_or(0);

        let mut plans = Vec::with_capacity(max_topics);
        for day_index in 0..max_topics {
            let unlocked = day_index == 0;
            let mut chapters = Vec::with_capacity(topics.len());
            for (subject_index, subject) in topics.iter().enumerate() {
                let Some((topic_id, topic_name)) = subject.topic(day_index) else {
                    continue;
                };
                let resources = self.chapter_resources(&subject.subject, topic_name);
                chapters.push(Chapter::new(
                    ChapterId::for_slot(subject_index, day_index),
                    subject.subject.clone(),
                    subject.subject_icon.clone(),
                    topic_id,
                    topic_name,
                    resources,
                    unlocked,
                ));
            }

            if chapters.is_empty() {
                continue;
            }
            plans.push(DailyPlan::new(
                day_index + 1,
                add_calendar_days(start, day_index),
                chapters,
                unlocked,
            ));
        }

        Ok(plans)
    }

    fn chapter_resources(&mut self, subject: &str, topic: &str) -> ChapterResources {
        let videos = (0..VIDEOS_PER_CHAPTER)
            .map(|i| {
                TopicResource::new(
                    ResourceId::new(format!("video-{topic}-{i}")),
                    ResourceKind::Video,
                    format!("{topic} - {}", catalog::video_title(i)),
                    catalog::video_url(subject, topic, i),
                    Some(self.rng.random_range(catalog::VIDEO_MINUTES)),
                )
            })
            .collect();

        let tests = (0..TESTS_PER_CHAPTER)
            .map(|i| {
                TopicResource::new(
                    ResourceId::new(format!("test-{topic}-{i}")),
                    ResourceKind::Test,
                    format!("{topic} - {}", catalog::test_title(i)),
                    catalog::test_url(subject, topic, i),
                    None,
                )
            })
            .collect();

        let pdfs = (0..PDFS_PER_CHAPTER)
            .map(|i| {
                TopicResource::new(
                    ResourceId::new(format!("pdf-{topic}-{i}")),
                    ResourceKind::Pdf,
                    format!("{topic} - {}", catalog::pdf_title(i)),
                    catalog::pdf_url(subject, topic, i),
                    None,
                )
            })
            .collect();

        ChapterResources {
            videos,
            tests,
            pdfs,
        }
    }
}
