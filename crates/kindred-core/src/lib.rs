pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod progress;
pub mod staging;
pub mod storage;

pub use config::{AppConfig, ExclusionPolicy};
pub use engine::{HashResult, Pipeline, PresenceResult, SimilarityResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
