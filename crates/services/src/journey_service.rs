use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use hero_core::PlanGenerator;
use hero_core::PlanError;
use hero_core::model::{ChapterId, CompletionOutcome, JourneyState, ResourceId, SelectedTopic};
use hero_core::progress::JourneyProgress;
use storage::repository::{KeyValueStore, StorageError};

use crate::Clock;
use crate::error::JourneyServiceError;

/// Key the journey document lives under.
pub const JOURNEY_STATE_KEY: &str = "zero_to_hero_journey_v2";

struct Inner {
    state: JourneyState,
    generator: PlanGenerator,
    dirty: bool,
}

/// Owns the journey document and persists it after every command.
///
/// The in-memory document is the source of truth. If a write fails the new
/// state is kept, the service is marked dirty, and the next command (or
/// [`JourneyService::flush`]) writes it again.
pub struct JourneyService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    inner: Mutex<Inner>,
}

impl JourneyService {
    /// Load the persisted journey, falling back to the initial value when the
    /// document is missing or cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the store cannot be read.
    pub async fn load(
        clock: Clock,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, JourneyServiceError> {
        Self::load_with_generator(clock, store, PlanGenerator::from_os_rng()).await
    }

    /// Like [`JourneyService::load`], with an explicit plan generator.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the store cannot be read.
    pub async fn load_with_generator(
        clock: Clock,
        store: Arc<dyn KeyValueStore>,
        generator: PlanGenerator,
    ) -> Result<Self, JourneyServiceError> {
        let state = read_state(store.as_ref()).await?;
        debug!(step = %state.current_step(), days = state.daily_plans().len(), "journey loaded");
        Ok(Self {
            clock,
            store,
            inner: Mutex::new(Inner {
                state,
                generator,
                dirty: false,
            }),
        })
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> JourneyState {
        self.inner.lock().await.state.clone()
    }

    pub async fn progress(&self) -> JourneyProgress {
        JourneyProgress::from_state(&self.inner.lock().await.state)
    }

    /// True while the last write has not reached the store.
    pub async fn is_dirty(&self) -> bool {
        self.inner.lock().await.dirty
    }

    /// Retry writing the document if an earlier write failed.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the write fails again.
    pub async fn flush(&self) -> Result<(), JourneyServiceError> {
        let mut inner = self.inner.lock().await;
        if !inner.dirty {
            return Ok(());
        }
        self.persist(&mut inner).await
    }

    // ─── Commands ──────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn start_journey(&self) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("start_journey", |state, _, _| {
            state.start_journey();
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn complete_introduction(&self) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("complete_introduction", |state, _, _| {
            state.complete_introduction();
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn skip_introduction(&self) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("skip_introduction", |state, _, _| {
            state.skip_introduction();
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// Generate a plan for the selection and enter the active journey.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Plan` for invalid input (nothing is
    /// written), or `JourneyServiceError::Storage` if the write fails.
    pub async fn select_topics_and_generate_plan(
        &self,
        exam: &str,
        topics: Vec<SelectedTopic>,
    ) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("select_topics_and_generate_plan", |state, generator, now| {
            state.select_topics_and_generate_plan(exam, topics, generator, now)?;
            info!(exam, days = state.daily_plans().len(), "journey plan generated");
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// Mark a resource complete. Unknown targets and repeated completions are
    /// reported through the outcome and do not write.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn complete_resource(
        &self,
        day_index: usize,
        chapter_id: &ChapterId,
        resource_id: &ResourceId,
    ) -> Result<CompletionOutcome, JourneyServiceError> {
        self.dispatch("complete_resource", |state, _, now| {
            let outcome = state.complete_resource(day_index, chapter_id, resource_id, now);
            match outcome {
                CompletionOutcome::Ignored => {
                    debug!(day_index, %chapter_id, %resource_id, "completion target not found");
                }
                CompletionOutcome::Recorded {
                    day_completed: true,
                    ..
                } => {
                    info!(day_index, current_day = state.current_day_index(), "day completed");
                }
                _ => {}
            }
            Ok((outcome, outcome.changed()))
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn complete_journey(&self) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("complete_journey", |state, _, _| {
            state.complete_journey();
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// # Errors
    ///
    /// Returns `JourneyServiceError::Storage` if the document cannot be written.
    pub async fn reset_journey(&self) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("reset_journey", |state, _, _| {
            state.reset_journey();
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// Regenerate the plan for a new selection, keeping journey history.
    ///
    /// # Errors
    ///
    /// Returns `JourneyServiceError::Plan` for invalid input (nothing is
    /// written), or `JourneyServiceError::Storage` if the write fails.
    pub async fn update_topics_and_regenerate_plan(
        &self,
        topics: Vec<SelectedTopic>,
    ) -> Result<JourneyState, JourneyServiceError> {
        self.dispatch("update_topics_and_regenerate_plan", |state, generator, now| {
            state.update_topics_and_regenerate_plan(topics, generator, now)?;
            info!(days = state.daily_plans().len(), "journey plan regenerated");
            Ok(((), true))
        })
        .await?;
        Ok(self.snapshot().await)
    }

    /// Runs one read-modify-write under the lock. `apply` reports whether it
    /// changed the document; unchanged documents are only written while dirty.
    async fn dispatch<T, F>(&self, command: &'static str, apply: F) -> Result<T, JourneyServiceError>
    where
        F: FnOnce(&mut JourneyState, &mut PlanGenerator, DateTime<Utc>) -> Result<(T, bool), PlanError>,
    {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let Inner {
            state, generator, ..
        } = &mut *inner;
        let (value, changed) = apply(state, generator, now).inspect_err(|err| {
            debug!(command, %err, "journey command rejected");
        })?;
        debug!(command, changed, step = %inner.state.current_step(), "journey command applied");

        if changed || inner.dirty {
            self.persist(&mut inner).await?;
        }
        Ok(value)
    }

    async fn persist(&self, inner: &mut Inner) -> Result<(), JourneyServiceError> {
        let result = match serde_json::to_value(&inner.state) {
            Ok(doc) => self.store.write(JOURNEY_STATE_KEY, &doc).await,
            Err(err) => Err(StorageError::Serialization(err.to_string())),
        };
        match result {
            Ok(()) => {
                inner.dirty = false;
                Ok(())
            }
            Err(err) => {
                inner.dirty = true;
                warn!(%err, "journey write failed; keeping in-memory state");
                Err(err.into())
            }
        }
    }
}

async fn read_state(store: &dyn KeyValueStore) -> Result<JourneyState, StorageError> {
    let doc = match store.read(JOURNEY_STATE_KEY).await {
        Ok(doc) => doc,
        Err(StorageError::Serialization(err)) => {
            warn!(%err, "stored journey is not JSON; starting fresh");
            return Ok(JourneyState::initial());
        }
        Err(err) => return Err(err),
    };

    let Some(doc) = doc else {
        return Ok(JourneyState::initial());
    };
    match serde_json::from_value(doc) {
        Ok(state) => Ok(state),
        Err(err) => {
            warn!(%err, "stored journey could not be decoded; starting fresh");
            Ok(JourneyState::initial())
        }
    }
}
