use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::model::chapter::ResourceUpdate;
use crate::model::ids::{ChapterId, ResourceId};
use crate::model::plan::DailyPlan;
use crate::model::topic::SelectedTopic;
use crate::planner::PlanGenerator;

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

/// Screen the journey is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyStep {
    #[default]
    Welcome,
    Introduction,
    TopicSelection,
    ActiveJourney,
    JourneyComplete,
}

impl JourneyStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JourneyStep::Welcome => "welcome",
            JourneyStep::Introduction => "introduction",
            JourneyStep::TopicSelection => "topic-selection",
            JourneyStep::ActiveJourney => "active-journey",
            JourneyStep::JourneyComplete => "journey-complete",
        }
    }
}

impl std::fmt::Display for JourneyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of [`JourneyState::complete_resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Day, chapter or resource does not exist; nothing changed.
    Ignored,
    /// The resource was already completed; nothing changed.
    AlreadyCompleted,
    Recorded {
        chapter_completed: bool,
        day_completed: bool,
    },
}

impl CompletionOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, CompletionOutcome::Recorded { .. })
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// The single persisted journey document.
///
/// Every command is a synchronous, total transition over this value. Derived
/// fields (`selected_subjects`, chapter percentages, day completion) are
/// recomputed inside the command that changes their inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JourneyState {
    current_step: JourneyStep,
    has_seen_introduction: bool,
    selected_exam: String,
    selected_subjects: Vec<String>,
    selected_topics: Vec<SelectedTopic>,
    current_day_index: usize,
    daily_plans: Vec<DailyPlan>,
    start_date: Option<DateTime<Utc>>,
    completed_days: Vec<usize>,
}

impl Default for JourneyState {
    fn default() -> Self {
        Self::initial()
    }
}

impl JourneyState {
    /// Value used on first launch and after a reset.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            current_step: JourneyStep::Welcome,
            has_seen_introduction: false,
            selected_exam: String::new(),
            selected_subjects: Vec::new(),
            selected_topics: Vec::new(),
            current_day_index: 0,
            daily_plans: Vec::new(),
            start_date: None,
            completed_days: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_step(&self) -> JourneyStep {
        self.current_step
    }

    #[must_use]
    pub fn has_seen_introduction(&self) -> bool {
        self.has_seen_introduction
    }

    #[must_use]
    pub fn selected_exam(&self) -> &str {
        &self.selected_exam
    }

    #[must_use]
    pub fn selected_subjects(&self) -> &[String] {
        &self.selected_subjects
    }

    #[must_use]
    pub fn selected_topics(&self) -> &[SelectedTopic] {
        &self.selected_topics
    }

    #[must_use]
    pub fn current_day_index(&self) -> usize {
        self.current_day_index
    }

    #[must_use]
    pub fn daily_plans(&self) -> &[DailyPlan] {
        &self.daily_plans
    }

    #[must_use]
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Indices of days whose chapters were all completed, in completion order.
    #[must_use]
    pub fn completed_days(&self) -> &[usize] {
        &self.completed_days
    }

    /// True when a plan exists and the journey screen is active.
    #[must_use]
    pub fn has_active_journey(&self) -> bool {
        self.current_step == JourneyStep::ActiveJourney && !self.daily_plans.is_empty()
    }

    #[must_use]
    pub fn current_day(&self) -> Option<&DailyPlan> {
        self.daily_plans.get(self.current_day_index)
    }

    /// True when every generated day reports all chapters complete.
    #[must_use]
    pub fn all_days_completed(&self) -> bool {
        !self.daily_plans.is_empty() && self.daily_plans.iter().all(DailyPlan::is_all_completed)
    }

    // ─── Commands ──────────────────────────────────────────────────────────────

    /// Leaves the welcome screen; the introduction is shown only once.
    pub fn start_journey(&mut self) {
        self.current_step = if self.has_seen_introduction {
            JourneyStep::TopicSelection
        } else {
            JourneyStep::Introduction
        };
    }

    pub fn complete_introduction(&mut self) {
        self.has_seen_introduction = true;
        self.current_step = JourneyStep::TopicSelection;
    }

    /// Same transition as [`Self::complete_introduction`].
    pub fn skip_introduction(&mut self) {
        self.complete_introduction();
    }

    /// Stores the selection, generates the plan and enters the active journey.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` for a blank exam or an invalid selection; the state
    /// is left untouched.
    pub fn select_topics_and_generate_plan<R: Rng>(
        &mut self,
        exam: &str,
        topics: Vec<SelectedTopic>,
        generator: &mut PlanGenerator<R>,
        now: DateTime<Utc>,
    ) -> Result<(), PlanError> {
        let exam = exam.trim();
        if exam.is_empty() {
            return Err(PlanError::MissingExam);
        }
        let plans = generator.generate(&topics, now)?;

        self.selected_exam = exam.to_string();
        self.set_topics(topics, plans);
        self.start_date = Some(now);
        self.current_step = JourneyStep::ActiveJourney;
        Ok(())
    }

    /// Marks one resource complete and propagates the derived state.
    ///
    /// When the call completes the last chapter of day `day_index`, the next
    /// day and its chapters are unlocked, the day is recorded in
    /// `completed_days` and the day pointer moves to `min(day_index + 1, last)`.
    pub fn complete_resource(
        &mut self,
        day_index: usize,
        chapter_id: &ChapterId,
        resource_id: &ResourceId,
        now: DateTime<Utc>,
    ) -> CompletionOutcome {
        let Some(day) = self.daily_plans.get_mut(day_index) else {
            return CompletionOutcome::Ignored;
        };
        let Some(chapter) = day.chapter_mut(chapter_id) else {
            return CompletionOutcome::Ignored;
        };

        let chapter_completed = match chapter.complete_resource(resource_id, now) {
            ResourceUpdate::NotFound => return CompletionOutcome::Ignored,
            ResourceUpdate::AlreadyCompleted => return CompletionOutcome::AlreadyCompleted,
            ResourceUpdate::Completed { chapter_completed } => chapter_completed,
        };

        let day_completed = day.refresh_completion();
        if day_completed {
            self.on_day_completed(day_index);
        }

        CompletionOutcome::Recorded {
            chapter_completed,
            day_completed,
        }
    }

    /// Callers check [`Self::all_days_completed`] first.
    pub fn complete_journey(&mut self) {
        self.current_step = JourneyStep::JourneyComplete;
    }

    pub fn reset_journey(&mut self) {
        *self = Self::initial();
    }

    /// Regenerates the plan for a new selection.
    ///
    /// The step, exam, start date and `completed_days` are kept; day dates are
    /// anchored to the original start date when there is one.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` for an invalid selection; the state is left untouched.
    pub fn update_topics_and_regenerate_plan<R: Rng>(
        &mut self,
        topics: Vec<SelectedTopic>,
        generator: &mut PlanGenerator<R>,
        now: DateTime<Utc>,
    ) -> Result<(), PlanError> {
        let anchor = self.start_date.unwrap_or(now);
        let plans = generator.generate(&topics, anchor)?;
        self.set_topics(topics, plans);
        Ok(())
    }

    fn set_topics(&mut self, topics: Vec<SelectedTopic>, plans: Vec<DailyPlan>) {
        self.selected_subjects = topics.iter().map(|t| t.subject.clone()).collect();
        self.selected_topics = topics;
        self.daily_plans = plans;
        self.current_day_index = 0;
    }

    fn on_day_completed(&mut self, day_index: usize) {
        if let Some(next) = self.daily_plans.get_mut(day_index + 1) {
            next.unlock();
        }
        if !self.completed_days.contains(&day_index) {
            self.completed_days.push(day_index);
        }
        let last = self.daily_plans.len().saturating_sub(1);
        self.current_day_index = (day_index + 1).min(last);
    }
}
