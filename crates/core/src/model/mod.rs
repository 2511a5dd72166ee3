mod chapter;
mod ids;
mod journey;
mod plan;
mod resource;
mod topic;

pub use ids::{ChapterId, ParseIdError, ResourceId};

pub use chapter::{
    Chapter, ChapterResources, PDFS_PER_CHAPTER, RESOURCES_PER_CHAPTER, ResourceUpdate,
    TESTS_PER_CHAPTER, VIDEOS_PER_CHAPTER, completion_percentage,
};
pub use journey::{CompletionOutcome, JourneyState, JourneyStep};
pub use plan::DailyPlan;
pub use resource::{ResourceKind, TopicResource};
pub use topic::{SelectedTopic, validate_selection};
