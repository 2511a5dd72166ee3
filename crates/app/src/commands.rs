use hero_core::model::{CompletionOutcome, JourneyState, ResourceId};
use services::JourneyService;

use crate::args::Command;
use crate::error::AppError;
use crate::render;

fn document(state: &JourneyState, json: bool) -> Result<String, AppError> {
    if json {
        Ok(serde_json::to_string_pretty(state)?)
    } else {
        Ok(render::status(state))
    }
}

/// Runs one subcommand against the journey and returns what to print.
///
/// Days are 1-based on the command line.
pub async fn execute(
    journey: &JourneyService,
    command: Command,
    json: bool,
) -> Result<String, AppError> {
    match command {
        Command::Status => document(&journey.snapshot().await, json),
        Command::Start => document(&journey.start_journey().await?, json),
        Command::Intro { skip: false } => document(&journey.complete_introduction().await?, json),
        Command::Intro { skip: true } => document(&journey.skip_introduction().await?, json),
        Command::Select { exam, topics } => {
            let selection = topics.into_selection()?;
            let state = journey
                .select_topics_and_generate_plan(&exam, selection)
                .await?;
            document(&state, json)
        }
        Command::Edit { topics } => {
            let selection = topics.into_selection()?;
            let state = journey.update_topics_and_regenerate_plan(selection).await?;
            document(&state, json)
        }
        Command::Complete {
            day,
            chapter,
            resource,
        } => {
            let outcome = journey
                .complete_resource(day - 1, &chapter, &resource)
                .await?;
            if json {
                return document(&journey.snapshot().await, true);
            }
            Ok(render::outcome(outcome).to_string())
        }
        Command::CompleteChapter { day, chapter } => {
            let state = journey.snapshot().await;
            let ids: Vec<ResourceId> = state
                .daily_plans()
                .get(day - 1)
                .and_then(|plan| plan.chapter(&chapter))
                .map(|c| c.resources().iter().map(|r| r.id().clone()).collect())
                .unwrap_or_default();

            let mut last = CompletionOutcome::Ignored;
            let mut newly_completed = 0;
            for id in &ids {
                let outcome = journey.complete_resource(day - 1, &chapter, id).await?;
                if outcome.changed() {
                    newly_completed += 1;
                    last = outcome;
                } else if last == CompletionOutcome::Ignored {
                    last = outcome;
                }
            }
            if json {
                return document(&journey.snapshot().await, true);
            }
            if ids.is_empty() {
                return Ok(render::outcome(CompletionOutcome::Ignored).to_string());
            }
            Ok(format!(
                "{newly_completed} resource(s) marked; {}",
                render::outcome(last)
            ))
        }
        Command::Show { day } => {
            let state = journey.snapshot().await;
            let plan = match day {
                Some(day) => Some(
                    state
                        .daily_plans()
                        .get(day - 1)
                        .ok_or(AppError::UnknownDay { day })?,
                ),
                None => state.current_day(),
            };
            let Some(plan) = plan else {
                return Ok("no plan yet; run `hero select` first".to_string());
            };
            if json {
                return Ok(serde_json::to_string_pretty(plan)?);
            }
            Ok(render::day_detail(plan))
        }
        Command::Progress => {
            let progress = journey.progress().await;
            if json {
                return Ok(serde_json::to_string_pretty(&progress)?);
            }
            Ok(render::progress(&progress))
        }
        Command::Finish { force } => {
            let state = journey.snapshot().await;
            if !force && !state.all_days_completed() {
                if state.daily_plans().is_empty() {
                    return Err(AppError::NoPlan);
                }
                let remaining = state
                    .daily_plans()
                    .iter()
                    .filter(|d| !d.is_all_completed())
                    .count();
                return Err(AppError::JourneyIncomplete { remaining });
            }
            document(&journey.complete_journey().await?, json)
        }
        Command::Reset => document(&journey.reset_journey().await?, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{TopicArgs, parse_topic};
    use hero_core::model::{ChapterId, JourneyStep};
    use hero_core::time::fixed_clock;
    use services::AppServices;

    fn topics(raw: &[&str]) -> TopicArgs {
        TopicArgs {
            topics: raw.iter().map(|t| parse_topic(t).unwrap()).collect(),
            icons: Vec::new(),
        }
    }

    async fn active() -> AppServices {
        let services = AppServices::in_memory(fixed_clock(), Some(3)).await.unwrap();
        let journey = services.journey();
        execute(&journey, Command::Start, false).await.unwrap();
        execute(&journey, Command::Intro { skip: true }, false).await.unwrap();
        let select = Command::Select {
            exam: "SSC CGL".into(),
            topics: topics(&["Quant:qa:A", "Quant:qb:B", "Reasoning:rx:X"]),
        };
        execute(&journey, select, false).await.unwrap();
        services
    }

    #[tokio::test]
    async fn walks_the_journey_through_the_cli() {
        let services = active().await;
        let journey = services.journey();
        assert_eq!(
            journey.snapshot().await.current_step(),
            JourneyStep::ActiveJourney
        );

        let out = execute(
            &journey,
            Command::Complete {
                day: 1,
                chapter: ChapterId::for_slot(0, 0),
                resource: ResourceId::new("video-A-0"),
            },
            false,
        )
        .await
        .unwrap();
        assert_eq!(out, "completed");

        let out = execute(
            &journey,
            Command::CompleteChapter {
                day: 1,
                chapter: ChapterId::for_slot(0, 0),
            },
            false,
        )
        .await
        .unwrap();
        assert_eq!(out, "34 resource(s) marked; completed; chapter finished");

        let out = execute(
            &journey,
            Command::CompleteChapter {
                day: 1,
                chapter: ChapterId::for_slot(1, 0),
            },
            false,
        )
        .await
        .unwrap();
        assert!(out.ends_with("day finished and the next day is unlocked"));
        assert_eq!(journey.snapshot().await.current_day_index(), 1);

        let err = execute(&journey, Command::Finish { force: false }, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::JourneyIncomplete { remaining: 1 }));

        execute(&journey, Command::Finish { force: true }, false)
            .await
            .unwrap();
        assert_eq!(
            journey.snapshot().await.current_step(),
            JourneyStep::JourneyComplete
        );
    }

    #[tokio::test]
    async fn unknown_targets_are_reported_softly() {
        let services = active().await;
        let journey = services.journey();
        let out = execute(
            &journey,
            Command::CompleteChapter {
                day: 7,
                chapter: ChapterId::for_slot(0, 0),
            },
            false,
        )
        .await
        .unwrap();
        assert_eq!(out, "no such day, chapter or resource; nothing changed");

        let err = execute(&journey, Command::Show { day: Some(9) }, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownDay { day: 9 }));
    }

    #[tokio::test]
    async fn json_output_is_the_journey_document() {
        let services = active().await;
        let journey = services.journey();
        let out = execute(&journey, Command::Status, true).await.unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["currentStep"], "active-journey");
        assert_eq!(doc["selectedExam"], "SSC CGL");
        assert_eq!(doc["dailyPlans"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn finishing_without_a_plan_is_rejected() {
        let services = AppServices::in_memory(fixed_clock(), None).await.unwrap();
        let err = execute(&services.journey(), Command::Finish { force: false }, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoPlan));
    }
}
