use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use hero_core::model::{ChapterId, CompletionOutcome, JourneyStep, ResourceId, SelectedTopic};
use hero_core::time::fixed_now;
use hero_core::{PlanError, PlanGenerator};
use services::{Clock, JOURNEY_STATE_KEY, JourneyService, JourneyServiceError};
use storage::repository::{InMemoryStore, KeyValueStore, Storage, StorageError};

fn topics() -> Vec<SelectedTopic> {
    vec![
        SelectedTopic::new("Quant")
            .with_icon("Q")
            .with_topic("qa", "Percentages")
            .with_topic("qb", "Ratios"),
        SelectedTopic::new("Reasoning").with_topic("rx", "Syllogisms"),
    ]
}

async fn service_over(store: Arc<dyn KeyValueStore>) -> JourneyService {
    JourneyService::load_with_generator(Clock::fixed(fixed_now()), store, PlanGenerator::seeded(7))
        .await
        .expect("load journey")
}

async fn active_service(store: Arc<dyn KeyValueStore>) -> JourneyService {
    let service = service_over(store).await;
    service.start_journey().await.expect("start");
    service.skip_introduction().await.expect("skip intro");
    service
        .select_topics_and_generate_plan("IBPS PO", topics())
        .await
        .expect("generate plan");
    service
}

/// Completes every resource of one chapter and returns the last outcome.
async fn finish_chapter(
    service: &JourneyService,
    day_index: usize,
    chapter_id: &ChapterId,
) -> CompletionOutcome {
    let state = service.snapshot().await;
    let chapter = state.daily_plans()[day_index]
        .chapter(chapter_id)
        .expect("chapter exists");
    let ids: Vec<ResourceId> = chapter.resources().iter().map(|r| r.id().clone()).collect();

    let mut last = CompletionOutcome::Ignored;
    for id in ids {
        last = service
            .complete_resource(day_index, chapter_id, &id)
            .await
            .expect("complete resource");
    }
    last
}

#[tokio::test]
async fn full_journey_from_welcome_to_completion() {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let service = service_over(Arc::clone(&store)).await;

    let state = service.start_journey().await.expect("start");
    assert_eq!(state.current_step(), JourneyStep::Introduction);
    let state = service.complete_introduction().await.expect("intro");
    assert_eq!(state.current_step(), JourneyStep::TopicSelection);

    let state = service
        .select_topics_and_generate_plan("IBPS PO", topics())
        .await
        .expect("generate plan");
    assert_eq!(state.current_step(), JourneyStep::ActiveJourney);
    assert_eq!(state.daily_plans().len(), 2);
    assert_eq!(state.daily_plans()[0].chapters().len(), 2);
    assert!(!state.daily_plans()[1].is_unlocked());

    let quant = ChapterId::for_slot(0, 0);
    let reasoning = ChapterId::for_slot(1, 0);
    let outcome = finish_chapter(&service, 0, &quant).await;
    assert_eq!(
        outcome,
        CompletionOutcome::Recorded {
            chapter_completed: true,
            day_completed: false,
        }
    );
    let outcome = finish_chapter(&service, 0, &reasoning).await;
    assert_eq!(
        outcome,
        CompletionOutcome::Recorded {
            chapter_completed: true,
            day_completed: true,
        }
    );

    let state = service.snapshot().await;
    assert_eq!(state.current_day_index(), 1);
    assert_eq!(state.completed_days(), &[0]);
    assert!(state.daily_plans()[1].is_unlocked());

    finish_chapter(&service, 1, &ChapterId::for_slot(0, 1)).await;
    let state = service.snapshot().await;
    assert!(state.all_days_completed());
    assert_eq!(state.current_day_index(), 1);
    assert_eq!(state.completed_days(), &[0, 1]);

    let progress = service.progress().await;
    assert_eq!(progress.total_days, 2);
    assert_eq!(progress.completed_days, 2);
    assert_eq!(progress.completion_rate, 100);

    let state = service.complete_journey().await.expect("finish");
    assert_eq!(state.current_step(), JourneyStep::JourneyComplete);

    let reloaded = service_over(store).await;
    assert_eq!(reloaded.snapshot().await, state);
}

#[tokio::test]
async fn repeated_and_unknown_completions_do_not_write() {
    let memory = InMemoryStore::new();
    let store: Arc<dyn KeyValueStore> = Arc::new(memory.clone());
    let service = active_service(store).await;

    let chapter = ChapterId::for_slot(0, 0);
    let resource = ResourceId::new("video-Percentages-0");
    let first = service
        .complete_resource(0, &chapter, &resource)
        .await
        .expect("first completion");
    assert!(first.changed());

    let persisted = memory.get_raw(JOURNEY_STATE_KEY).expect("raw read");
    let again = service
        .complete_resource(0, &chapter, &resource)
        .await
        .expect("second completion");
    assert_eq!(again, CompletionOutcome::AlreadyCompleted);

    let missing = service
        .complete_resource(9, &chapter, &resource)
        .await
        .expect("unknown day");
    assert_eq!(missing, CompletionOutcome::Ignored);
    assert_eq!(memory.get_raw(JOURNEY_STATE_KEY).expect("raw read"), persisted);
}

#[tokio::test]
async fn invalid_selection_leaves_state_untouched() {
    let service = service_over(Arc::new(InMemoryStore::new())).await;
    service.start_journey().await.expect("start");
    service.skip_introduction().await.expect("skip");
    let before = service.snapshot().await;

    let err = service
        .select_topics_and_generate_plan("   ", topics())
        .await
        .unwrap_err();
    assert!(matches!(err, JourneyServiceError::Plan(PlanError::MissingExam)));

    let err = service
        .select_topics_and_generate_plan("SSC CGL", Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JourneyServiceError::Plan(PlanError::NoSubjects)));
    assert_eq!(service.snapshot().await, before);
}

#[tokio::test]
async fn regenerating_keeps_history_and_resets_progress() {
    let service = active_service(Arc::new(InMemoryStore::new())).await;
    finish_chapter(&service, 0, &ChapterId::for_slot(0, 0)).await;
    finish_chapter(&service, 0, &ChapterId::for_slot(1, 0)).await;
    let before = service.snapshot().await;

    let state = service
        .update_topics_and_regenerate_plan(vec![
            SelectedTopic::new("English").with_topic("en", "Cloze"),
        ])
        .await
        .expect("regenerate");
    assert_eq!(state.current_step(), JourneyStep::ActiveJourney);
    assert_eq!(state.selected_exam(), "IBPS PO");
    assert_eq!(state.selected_subjects(), &["English".to_string()]);
    assert_eq!(state.start_date(), before.start_date());
    assert_eq!(state.completed_days(), before.completed_days());
    assert_eq!(state.current_day_index(), 0);
    assert_eq!(state.daily_plans().len(), 1);
    assert_eq!(state.daily_plans()[0].average_percentage(), 0);
}

#[tokio::test]
async fn reset_clears_the_persisted_journey() {
    let memory = InMemoryStore::new();
    let store: Arc<dyn KeyValueStore> = Arc::new(memory.clone());
    let service = active_service(Arc::clone(&store)).await;

    let state = service.reset_journey().await.expect("reset");
    assert_eq!(state.current_step(), JourneyStep::Welcome);
    assert!(!state.has_seen_introduction());
    assert!(state.daily_plans().is_empty());

    let reloaded = service_over(store).await;
    assert_eq!(reloaded.snapshot().await, state);
}

#[tokio::test]
async fn undecodable_documents_fall_back_to_initial_state() {
    let memory = InMemoryStore::new();
    memory
        .put_raw(JOURNEY_STATE_KEY, "{not json")
        .expect("seed raw");
    let service = service_over(Arc::new(memory.clone())).await;
    assert_eq!(service.snapshot().await.current_step(), JourneyStep::Welcome);

    memory
        .put_raw(JOURNEY_STATE_KEY, r#"{"currentStep": 42}"#)
        .expect("seed raw");
    let service = service_over(Arc::new(memory)).await;
    assert_eq!(service.snapshot().await.current_step(), JourneyStep::Welcome);
}

#[tokio::test]
async fn partial_documents_fill_missing_fields() {
    let memory = InMemoryStore::new();
    memory
        .put_raw(
            JOURNEY_STATE_KEY,
            r#"{"currentStep": "topic-selection", "hasSeenIntroduction": true, "extra": 1}"#,
        )
        .expect("seed raw");
    let state = service_over(Arc::new(memory)).await.snapshot().await;
    assert_eq!(state.current_step(), JourneyStep::TopicSelection);
    assert!(state.has_seen_introduction());
    assert!(state.daily_plans().is_empty());
    assert!(state.completed_days().is_empty());
}

/// Store whose writes fail while `failing` is set.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk unavailable".into()));
        }
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn failed_writes_keep_state_and_flush_retries() {
    let flaky = Arc::new(FlakyStore::default());
    let service = service_over(Arc::clone(&flaky) as Arc<dyn KeyValueStore>).await;

    flaky.failing.store(true, Ordering::SeqCst);
    let err = service.start_journey().await.unwrap_err();
    assert!(matches!(err, JourneyServiceError::Storage(_)));
    assert!(service.is_dirty().await);
    assert_eq!(service.snapshot().await.current_step(), JourneyStep::Introduction);
    assert_eq!(flaky.inner.read(JOURNEY_STATE_KEY).await.unwrap(), None);

    assert!(service.flush().await.is_err());

    flaky.failing.store(false, Ordering::SeqCst);
    service.flush().await.expect("flush");
    assert!(!service.is_dirty().await);

    let reloaded = service_over(flaky).await;
    assert_eq!(reloaded.snapshot().await.current_step(), JourneyStep::Introduction);
}

#[tokio::test]
async fn unchanged_commands_write_while_dirty() {
    let flaky = Arc::new(FlakyStore::default());
    let service = active_service(Arc::clone(&flaky) as Arc<dyn KeyValueStore>).await;
    let chapter = ChapterId::for_slot(0, 0);
    let resource = ResourceId::new("pdf-Percentages-0");

    flaky.failing.store(true, Ordering::SeqCst);
    assert!(service.complete_resource(0, &chapter, &resource).await.is_err());
    assert!(service.is_dirty().await);

    flaky.failing.store(false, Ordering::SeqCst);
    let outcome = service
        .complete_resource(0, &chapter, &resource)
        .await
        .expect("retry");
    assert_eq!(outcome, CompletionOutcome::AlreadyCompleted);
    assert!(!service.is_dirty().await);

    let reloaded = service_over(flaky).await.snapshot().await;
    let stored = reloaded.daily_plans()[0]
        .chapter(&chapter)
        .and_then(|c| c.resources().get(&resource))
        .expect("resource");
    assert!(stored.is_completed());
}

#[tokio::test]
async fn sqlite_backed_journey_survives_reload() {
    let storage = Storage::sqlite("sqlite:file:memdb_journey_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let service = active_service(Arc::clone(&storage.kv)).await;
    finish_chapter(&service, 0, &ChapterId::for_slot(1, 0)).await;
    let state = service.snapshot().await;

    let reloaded = service_over(Arc::clone(&storage.kv)).await;
    assert_eq!(reloaded.snapshot().await, state);
    let progress = reloaded.progress().await;
    assert_eq!(progress.resources_completed, 35);
    assert_eq!(progress.resources_total, 105);
    assert_eq!(progress.resources_rate, 33);
}
