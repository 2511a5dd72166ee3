//! Read-only summaries of a journey for dashboards.

use serde::Serialize;

use crate::model::{DailyPlan, JourneyState, completion_percentage};

/// Chapter completion for one subject across the whole journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub subject: String,
    pub chapters_completed: usize,
    pub chapters_total: usize,
}

/// Snapshot of one day for a plan overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    pub day_number: usize,
    pub average_percentage: u8,
    pub unlocked: bool,
    pub all_completed: bool,
    pub is_current: bool,
}

/// Whole-journey progress.
///
/// Completed days are counted from the plans themselves, so indices left in
/// `completed_days` by an earlier plan never inflate the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyProgress {
    pub total_days: usize,
    pub completed_days: usize,
    pub completion_rate: u8,
    pub resources_completed: usize,
    pub resources_total: usize,
    pub resources_rate: u8,
    pub subjects: Vec<SubjectProgress>,
    pub days: Vec<DayProgress>,
}

impl JourneyProgress {
    #[must_use]
    pub fn from_state(state: &JourneyState) -> Self {
        let plans = state.daily_plans();
        let total_days = plans.len();
        let completed_days = plans.iter().filter(|d| d.is_all_completed()).count();

        let mut resources_completed = 0;
        let mut resources_total = 0;
        let mut subjects: Vec<SubjectProgress> = Vec::new();
        for chapter in plans.iter().flat_map(DailyPlan::chapters) {
            resources_completed += chapter.resources().completed_count();
            resources_total += chapter.resources().len();

            let entry = match subjects.iter().position(|s| s.subject == chapter.subject()) {
                Some(idx) => &mut subjects[idx],
                None => {
                    subjects.push(SubjectProgress {
                        subject: chapter.subject().to_string(),
                        chapters_completed: 0,
                        chapters_total: 0,
                    });
                    let last = subjects.len() - 1;
                    &mut subjects[last]
                }
            };
            entry.chapters_total += 1;
            if chapter.is_complete() {
                entry.chapters_completed += 1;
            }
        }

        let days = plans
            .iter()
            .enumerate()
            .map(|(idx, day)| DayProgress {
                day_number: day.day_number(),
                average_percentage: day.average_percentage(),
                unlocked: day.is_unlocked(),
                all_completed: day.is_all_completed(),
                is_current: idx == state.current_day_index(),
            })
            .collect();

        Self {
            total_days,
            completed_days,
            completion_rate: completion_percentage(completed_days, total_days),
            resources_completed,
            resources_total,
            resources_rate: completion_percentage(resources_completed, resources_total),
            subjects,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChapterId, SelectedTopic};
    use crate::planner::PlanGenerator;
    use crate::time::fixed_now;

    fn state() -> JourneyState {
        let topics = vec![
            SelectedTopic::new("Quant")
                .with_topic("qa", "A")
                .with_topic("qb", "B"),
            SelectedTopic::new("Reasoning").with_topic("rx", "X"),
        ];
        let mut state = JourneyState::initial();
        state
            .select_topics_and_generate_plan("IBPS PO", topics, &mut PlanGenerator::seeded(8), fixed_now())
            .unwrap();
        state
    }

    #[test]
    fn empty_journey_reports_zero() {
        let progress = JourneyProgress::from_state(&JourneyState::initial());
        assert_eq!(progress.total_days, 0);
        assert_eq!(progress.completion_rate, 0);
        assert_eq!(progress.resources_rate, 0);
        assert!(progress.subjects.is_empty());
    }

    #[test]
    fn counts_resources_and_subject_chapters() {
        let mut state = state();
        let chapter = ChapterId::for_slot(1, 0);
        let ids: Vec<_> = state.daily_plans()[0]
            .chapter(&chapter)
            .unwrap()
            .resources()
            .iter()
            .map(|r| r.id().clone())
            .collect();
        for id in &ids {
            state.complete_resource(0, &chapter, id, fixed_now());
        }

        let progress = JourneyProgress::from_state(&state);
        assert_eq!(progress.total_days, 2);
        assert_eq!(progress.completed_days, 0);
        assert_eq!(progress.resources_total, 105);
        assert_eq!(progress.resources_completed, 35);
        assert_eq!(progress.resources_rate, 33);
        assert_eq!(
            progress.subjects,
            vec![
                SubjectProgress {
                    subject: "Quant".into(),
                    chapters_completed: 0,
                    chapters_total: 2,
                },
                SubjectProgress {
                    subject: "Reasoning".into(),
                    chapters_completed: 1,
                    chapters_total: 1,
                },
            ]
        );
        assert_eq!(progress.days[0].average_percentage, 50);
        assert!(progress.days[0].is_current);
        assert!(!progress.days[1].unlocked);
    }
}
