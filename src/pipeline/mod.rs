pub mod guard;
pub mod orchestrator;
pub mod run;

pub use guard::{bearer_token, TriggerGuard};
pub use orchestrator::{ChannelCheck, Orchestrator};
pub use run::{RunOutcome, RunResult, Trigger};

use thiserror::Error;

use crate::core::ConfigError;

/// The only failures a trigger caller ever sees. Source and delivery
/// failures are absorbed inside the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Telegram configuration missing: {0}")]
    Config(#[from] ConfigError),
    #[error("Unauthorized")]
    Unauthorized,
}
