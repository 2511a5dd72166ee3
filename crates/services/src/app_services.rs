use std::sync::Arc;

use hero_core::PlanGenerator;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::journey_service::JourneyService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    journey: Arc<JourneyService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// `seed` makes plan generation reproducible.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the initial load fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, seed).await
    }

    /// Build services over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the initial load fails.
    pub async fn in_memory(clock: Clock, seed: Option<u64>) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), clock, seed).await
    }

    async fn from_storage(
        storage: Storage,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let generator = seed.map_or_else(PlanGenerator::from_os_rng, PlanGenerator::seeded);
        let journey =
            JourneyService::load_with_generator(clock, Arc::clone(&storage.kv), generator).await?;
        Ok(Self {
            journey: Arc::new(journey),
        })
    }

    #[must_use]
    pub fn journey(&self) -> Arc<JourneyService> {
        Arc::clone(&self.journey)
    }
}
