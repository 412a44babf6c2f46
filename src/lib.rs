// Genome Sequencer - Library exports for the CLI, tests and benchmarks

pub mod config;
pub mod engine;
pub mod error;
pub mod messaging;
pub mod sequence;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use config::SequencerConfig;
pub use engine::{OfflineEngine, ToneEngine};
pub use error::{Result, SequencerError};
pub use messaging::{Command, Notification, TrackUpdate};
pub use sequence::{Base, SequenceBuffer, SequenceProvider};
pub use sequencer::{
    LoadOutcome, LoadSource, NoteValue, PlaybackCursor, Pitch, Session, Tempo, TickTime,
    ToneMapper, TrackController, TrackId, TransportScheduler, TransportState,
};
