// ToneEngine trait definition - The audio capability the sequencer consumes

use crate::sequencer::timeline::{NoteValue, TickTime};
use crate::sequencer::tone_map::Pitch;
use thiserror::Error;

/// Errors reported by a tone engine
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("Engine failed to start: {0}")]
    StartFailed(String),

    #[error("Engine has been disposed")]
    Disposed,

    #[error("Unknown repeat handle: {0:?}")]
    UnknownHandle(RepeatHandle),
}

/// Identifies a repeating clock registered with [`ToneEngine::schedule_repeat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatHandle(pub u64);

/// Capability surface of an audio backend.
///
/// Triggers carry the nominal tick time so implementations can place them
/// sample-accurately regardless of when the call itself is made. Trigger
/// calls must not block.
///
/// The repeating clock is pull-based: after [`schedule_repeat`](Self::schedule_repeat)
/// the host calls [`due_ticks`](Self::due_ticks) and runs its tick handler once
/// per returned timestamp, in order.
pub trait ToneEngine {
    /// Start the audio context. Called once before the first repeat.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Play simultaneous pitches at `at`
    fn trigger_chord(&mut self, pitches: &[Pitch], duration: NoteValue, at: TickTime);

    /// Play a single bass pitch at `at`
    fn trigger_bass(&mut self, pitch: Pitch, duration: NoteValue, at: TickTime);

    /// Register a repeating clock with the given subdivision. The first tick
    /// lands now, or one subdivision after `after` if that is later.
    fn schedule_repeat(
        &mut self,
        subdivision: NoteValue,
        after: Option<TickTime>,
    ) -> Result<RepeatHandle, EngineError>;

    /// Tick timestamps of `handle` that fall at or before `until`, not yet returned
    fn due_ticks(&mut self, handle: RepeatHandle, until: f64) -> Result<Vec<TickTime>, EngineError>;

    /// Change tempo, ramping linearly over `ramp_seconds` (0 = immediate)
    fn set_tempo(&mut self, bpm: f64, ramp_seconds: f64);

    /// Stop a repeating clock. Unknown handles are ignored.
    fn cancel(&mut self, handle: RepeatHandle);

    /// Current engine time in seconds
    fn current_time(&self) -> f64;

    /// Release audio resources
    fn dispose(&mut self);
}
