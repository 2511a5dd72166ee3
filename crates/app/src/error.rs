use thiserror::Error;

use services::{AppServicesError, JourneyServiceError};

use crate::args::ArgsError;
use crate::config::ConfigError;

/// Everything the binary can fail with. Printed once by `main`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error(transparent)]
    Services(#[from] AppServicesError),
    #[error(transparent)]
    Journey(#[from] JourneyServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("day {day} does not exist in the current plan")]
    UnknownDay { day: usize },
    #[error("no plan has been generated yet")]
    NoPlan,
    #[error("{remaining} day(s) are not finished yet; pass --force to finish anyway")]
    JourneyIncomplete { remaining: usize },
}
