use crate::game::{EngineError, InvalidAction, OutcomeReason};

/// Errors surfaced by the environment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
    /// The engine ended the episode for a reason with no reward attached
    #[error("engine ended the episode with unrecognized outcome `{0}`")]
    UnrecognizedOutcome(OutcomeReason),
    #[error("seeded reset requested but the engine does not support seeding")]
    SeedingUnsupported,
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}
