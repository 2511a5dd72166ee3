#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod journey_service;

pub use hero_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, JourneyServiceError};
pub use journey_service::{JOURNEY_STATE_KEY, JourneyService};
