#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod planner;
pub mod progress;
pub mod time;

pub use error::PlanError;
pub use planner::PlanGenerator;
pub use progress::JourneyProgress;
pub use time::Clock;
