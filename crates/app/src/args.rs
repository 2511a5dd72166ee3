//! Command-line surface of the `hero` binary.

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use hero_core::model::{ChapterId, ResourceId, SelectedTopic};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("expected SUBJECT:ID:NAME, got {raw:?}")]
    InvalidTopic { raw: String },
    #[error("expected SUBJECT=ICON, got {raw:?}")]
    InvalidIcon { raw: String },
    #[error("--icon names subject {subject:?}, which has no --topic")]
    UnknownIconSubject { subject: String },
    #[error("days are numbered from 1, got {raw:?}")]
    InvalidDay { raw: String },
}

#[derive(Debug, Parser)]
#[command(name = "hero", version)]
#[command(about = "Zero to Hero: a day-by-day study plan for your weak topics")]
pub struct Cli {
    /// SQLite database url or path (overrides HERO_DB_URL)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Seed for reproducible plans (overrides HERO_SEED)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print the journey document as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the current step and today's plan (default)
    Status,
    /// Leave the welcome screen
    Start,
    /// Finish the introduction
    Intro {
        /// Skip it instead
        #[arg(long)]
        skip: bool,
    },
    /// Choose an exam and weak topics, then generate the plan
    Select {
        #[arg(long)]
        exam: String,
        #[command(flatten)]
        topics: TopicArgs,
    },
    /// Replace the topics and regenerate the plan, keeping history
    Edit {
        #[command(flatten)]
        topics: TopicArgs,
    },
    /// Mark one resource complete
    Complete {
        #[arg(long, value_parser = parse_day)]
        day: usize,
        #[arg(long)]
        chapter: ChapterId,
        #[arg(long)]
        resource: ResourceId,
    },
    /// Mark every resource of a chapter complete
    CompleteChapter {
        #[arg(long, value_parser = parse_day)]
        day: usize,
        #[arg(long)]
        chapter: ChapterId,
    },
    /// Show one day in detail (the current day by default)
    Show {
        #[arg(long, value_parser = parse_day)]
        day: Option<usize>,
    },
    /// Journey, subject and day progress
    Progress,
    /// Complete the journey
    Finish {
        /// Finish even if some days are not done
        #[arg(long)]
        force: bool,
    },
    /// Discard the journey and start over
    Reset,
}

#[derive(Debug, Clone, Args)]
pub struct TopicArgs {
    /// Weak topic; repeat for more. Subjects keep first-appearance order.
    #[arg(long = "topic", value_name = "SUBJECT:ID:NAME", required = true, value_parser = parse_topic)]
    pub topics: Vec<TopicArg>,

    /// Icon shown next to a subject
    #[arg(long = "icon", value_name = "SUBJECT=ICON", value_parser = parse_icon)]
    pub icons: Vec<IconArg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArg {
    pub subject: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconArg {
    pub subject: String,
    pub icon: String,
}

impl TopicArgs {
    /// Groups the flat topic list into one selection per subject.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError::UnknownIconSubject` if an icon names a subject
    /// without topics.
    pub fn into_selection(self) -> Result<Vec<SelectedTopic>, ArgsError> {
        let mut selection: Vec<SelectedTopic> = Vec::new();
        for topic in self.topics {
            let index = match selection.iter().position(|s| s.subject == topic.subject) {
                Some(index) => index,
                None => {
                    selection.push(SelectedTopic::new(topic.subject));
                    selection.len() - 1
                }
            };
            let entry = &mut selection[index];
            entry.topic_ids.push(topic.id);
            entry.topic_names.push(topic.name);
        }

        for icon in self.icons {
            let Some(entry) = selection.iter_mut().find(|s| s.subject == icon.subject) else {
                return Err(ArgsError::UnknownIconSubject {
                    subject: icon.subject,
                });
            };
            entry.subject_icon = Some(icon.icon);
        }
        Ok(selection)
    }
}

pub fn parse_day(raw: &str) -> Result<usize, ArgsError> {
    match raw.trim().parse::<usize>() {
        Ok(day) if day >= 1 => Ok(day),
        _ => Err(ArgsError::InvalidDay {
            raw: raw.to_string(),
        }),
    }
}

pub fn parse_topic(raw: &str) -> Result<TopicArg, ArgsError> {
    let invalid = || ArgsError::InvalidTopic {
        raw: raw.to_string(),
    };
    let mut parts = raw.splitn(3, ':').map(str::trim);
    let (Some(subject), Some(id), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if subject.is_empty() || id.is_empty() || name.is_empty() {
        return Err(invalid());
    }
    Ok(TopicArg {
        subject: subject.to_string(),
        id: id.to_string(),
        name: name.to_string(),
    })
}

pub fn parse_icon(raw: &str) -> Result<IconArg, ArgsError> {
    let Some((subject, icon)) = raw.split_once('=') else {
        return Err(ArgsError::InvalidIcon {
            raw: raw.to_string(),
        });
    };
    let (subject, icon) = (subject.trim(), icon.trim());
    if subject.is_empty() || icon.is_empty() {
        return Err(ArgsError::InvalidIcon {
            raw: raw.to_string(),
        });
    }
    Ok(IconArg {
        subject: subject.to_string(),
        icon: icon.to_string(),
    })
}
