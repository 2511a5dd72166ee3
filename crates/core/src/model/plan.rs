use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::chapter::Chapter;
use crate::model::ids::ChapterId;

/// One day of the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    day_number: usize,
    date: DateTime<Utc>,
    chapters: Vec<Chapter>,
    all_completed: bool,
    unlocked: bool,
}

impl DailyPlan {
    #[must_use]
    pub fn new(day_number: usize, date: DateTime<Utc>, chapters: Vec<Chapter>, unlocked: bool) -> Self {
        let mut plan = Self {
            day_number,
            date,
            chapters,
            all_completed: false,
            unlocked,
        };
        plan.all_completed = plan.chapters_all_complete();
        plan
    }

    /// 1-based position of the day in the journey.
    #[must_use]
    pub fn day_number(&self) -> usize {
        self.day_number
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn chapter(&self, id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id() == id)
    }

    pub(crate) fn chapter_mut(&mut self, id: &ChapterId) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn is_all_completed(&self) -> bool {
        self.all_completed
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Mean chapter completion for the day, rounded half up.
    #[must_use]
    pub fn average_percentage(&self) -> u8 {
        if self.chapters.is_empty() {
            return 0;
        }
        let sum: usize = self
            .chapters
            .iter()
            .map(|c| usize::from(c.completion_percentage()))
            .sum();
        crate::model::chapter::completion_percentage(sum, self.chapters.len() * 100)
    }

    /// Unlocks the day and every chapter in it.
    pub(crate) fn unlock(&mut self) {
        self.unlocked = true;
        for chapter in &mut self.chapters {
            chapter.unlock();
        }
    }

    /// Recomputes `all_completed`; returns `true` only on the false → true flip.
    pub(crate) fn refresh_completion(&mut self) -> bool {
        if self.all_completed {
            return false;
        }
        self.all_completed = self.chapters_all_complete();
        self.all_completed
    }

    fn chapters_all_complete(&self) -> bool {
        !self.chapters.is_empty() && self.chapters.iter().all(Chapter::is_complete)
    }
}
