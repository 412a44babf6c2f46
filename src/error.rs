// Error taxonomy for the sequencer core

use crate::engine::EngineError;

/// Errors surfaced by sequence loading, editing, configuration and the engine seam
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("Invalid sequence: {found} valid bases found, at least 3 required")]
    InvalidSequence { found: usize },

    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Sequence provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Tone engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, SequencerError>;
