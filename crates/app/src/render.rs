//! Plain-text views of the journey for the terminal.

use hero_core::model::{Chapter, CompletionOutcome, DailyPlan, JourneyState, JourneyStep};
use hero_core::progress::JourneyProgress;

fn check(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn lock(unlocked: bool) -> &'static str {
    if unlocked { "" } else { " (locked)" }
}

fn hint(step: JourneyStep) -> &'static str {
    match step {
        JourneyStep::Welcome => "run `hero start` to begin",
        JourneyStep::Introduction => "run `hero intro` (or `hero intro --skip`)",
        JourneyStep::TopicSelection => "run `hero select --exam EXAM --topic SUBJECT:ID:NAME ...`",
        JourneyStep::ActiveJourney => "run `hero show` for today's resources",
        JourneyStep::JourneyComplete => "journey complete; `hero reset` starts over",
    }
}

pub fn status(state: &JourneyState) -> String {
    let mut lines = vec![format!("step: {}", state.current_step())];
    if !state.selected_exam().is_empty() {
        lines.push(format!("exam: {}", state.selected_exam()));
    }
    if !state.selected_subjects().is_empty() {
        lines.push(format!("subjects: {}", state.selected_subjects().join(", ")));
    }

    let total = state.daily_plans().len();
    if total > 0 {
        let done = state.daily_plans().iter().filter(|d| d.is_all_completed()).count();
        lines.push(format!(
            "day {} of {total} ({done} finished)",
            state.current_day_index() + 1
        ));
    }
    let active = state.current_step() == JourneyStep::ActiveJourney;
    if let Some(day) = state.current_day().filter(|_| active) {
        lines.push(String::new());
        lines.extend(day_summary(day));
    }
    if active && state.all_days_completed() {
        lines.push(String::new());
        lines.push("every day is finished; run `hero finish`".to_string());
    }
    lines.push(String::new());
    lines.push(hint(state.current_step()).to_string());
    lines.join("\n")
}

fn chapter_line(chapter: &Chapter) -> String {
    let icon = chapter
        .subject_icon()
        .map(|icon| format!("{icon} "))
        .unwrap_or_default();
    format!(
        "  {} {} {icon}{} / {} {}% ({}/{}){}",
        check(chapter.is_complete()),
        chapter.id(),
        chapter.subject(),
        chapter.topic_name(),
        chapter.completion_percentage(),
        chapter.resources().completed_count(),
        chapter.resources().len(),
        lock(chapter.is_unlocked()),
    )
}

fn day_header(day: &DailyPlan) -> String {
    format!(
        "Day {} ({}) {}%{}",
        day.day_number(),
        day.date().format("%Y-%m-%d"),
        day.average_percentage(),
        lock(day.is_unlocked()),
    )
}

fn day_summary(day: &DailyPlan) -> Vec<String> {
    let mut lines = vec![day_header(day)];
    lines.extend(day.chapters().iter().map(chapter_line));
    lines
}

/// One day with every resource listed.
pub fn day_detail(day: &DailyPlan) -> String {
    let mut lines = vec![day_header(day)];
    for chapter in day.chapters() {
        lines.push(chapter_line(chapter));
        for resource in chapter.resources().iter() {
            let minutes = resource
                .duration_minutes()
                .map(|m| format!(" {m} min"))
                .unwrap_or_default();
            lines.push(format!(
                "      {} {:<5} {}  {}{minutes}",
                check(resource.is_completed()),
                resource.kind().as_str(),
                resource.id(),
                resource.title(),
            ));
        }
    }
    lines.join("\n")
}

pub fn progress(progress: &JourneyProgress) -> String {
    let mut lines = vec![
        format!(
            "days: {}/{} ({}%)",
            progress.completed_days, progress.total_days, progress.completion_rate
        ),
        format!(
            "resources: {}/{} ({}%)",
            progress.resources_completed, progress.resources_total, progress.resources_rate
        ),
    ];
    if !progress.subjects.is_empty() {
        lines.push(String::new());
        lines.extend(progress.subjects.iter().map(|s| {
            format!(
                "{}: {}/{} chapters",
                s.subject, s.chapters_completed, s.chapters_total
            )
        }));
    }
    if !progress.days.is_empty() {
        lines.push(String::new());
        lines.extend(progress.days.iter().map(|d| {
            let marker = if d.is_current { " <- today" } else { "" };
            format!(
                "{} day {} {}%{}{marker}",
                check(d.all_completed),
                d.day_number,
                d.average_percentage,
                lock(d.unlocked),
            )
        }));
    }
    lines.join("\n")
}

pub fn outcome(outcome: CompletionOutcome) -> &'static str {
    match outcome {
        CompletionOutcome::Ignored => "no such day, chapter or resource; nothing changed",
        CompletionOutcome::AlreadyCompleted => "already completed",
        CompletionOutcome::Recorded {
            day_completed: true,
            ..
        } => "completed; day finished and the next day is unlocked",
        CompletionOutcome::Recorded {
            chapter_completed: true,
            ..
        } => "completed; chapter finished",
        CompletionOutcome::Recorded { .. } => "completed",
    }
}
