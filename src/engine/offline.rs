// Offline engine - Deterministic tone engine that records triggers instead of sounding them
// Time only moves when the host advances it, which makes sessions reproducible

use super::clock::TransportClock;
use super::trait_def::{EngineError, RepeatHandle, ToneEngine};
use crate::sequencer::timeline::{NoteValue, TickTime};
use crate::sequencer::tone_map::Pitch;

/// What the engine was asked to play
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum EngineEventKind {
    Chord(Vec<Pitch>),
    Bass(Pitch),
}

/// A recorded trigger with its scheduled time
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EngineEvent {
    pub kind: EngineEventKind,
    pub duration: NoteValue,
    pub at: TickTime,
}

/// Recording engine driven by [`advance`](OfflineEngine::advance)
#[derive(Debug)]
pub struct OfflineEngine {
    clock: TransportClock,
    now: f64,
    started: bool,
    disposals: u32,
    events: Vec<EngineEvent>,
}

impl OfflineEngine {
    pub fn new(bpm: f64) -> Self {
        Self {
            clock: TransportClock::new(bpm),
            now: 0.0,
            started: false,
            disposals: 0,
            events: Vec::new(),
        }
    }

    /// Move engine time forward
    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds.max(0.0);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_disposed(&self) -> bool {
        self.disposals > 0
    }

    /// Number of times `dispose` was called
    pub fn disposals(&self) -> u32 {
        self.disposals
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take recorded events, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clock(&self) -> &TransportClock {
        &self.clock
    }
}

impl Default for OfflineEngine {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl ToneEngine for OfflineEngine {
    fn start(&mut self) -> Result<(), EngineError> {
        if self.is_disposed() {
            return Err(EngineError::Disposed);
        }
        self.started = true;
        Ok(())
    }

    fn trigger_chord(&mut self, pitches: &[Pitch], duration: NoteValue, at: TickTime) {
        self.events.push(EngineEvent {
            kind: EngineEventKind::Chord(pitches.to_vec()),
            duration,
            at,
        });
    }

    fn trigger_bass(&mut self, pitch: Pitch, duration: NoteValue, at: TickTime) {
        self.events.push(EngineEvent {
            kind: EngineEventKind::Bass(pitch),
            duration,
            at,
        });
    }

    fn schedule_repeat(
        &mut self,
        subdivision: NoteValue,
        after: Option<TickTime>,
    ) -> Result<RepeatHandle, EngineError> {
        if self.is_disposed() {
            return Err(EngineError::Disposed);
        }
        Ok(self.clock.schedule_repeat(self.now, subdivision, after))
    }

    fn due_ticks(&mut self, handle: RepeatHandle, until: f64) -> Result<Vec<TickTime>, EngineError> {
        self.clock
            .due_ticks(handle, until)
            .ok_or(EngineError::UnknownHandle(handle))
    }

    fn set_tempo(&mut self, bpm: f64, ramp_seconds: f64) {
        self.clock.set_tempo(self.now, bpm, ramp_seconds);
    }

    fn cancel(&mut self, handle: RepeatHandle) {
        self.clock.cancel(handle);
    }

    fn current_time(&self) -> f64 {
        self.now
    }

    fn dispose(&mut self) {
        self.disposals += 1;
        self.started = false;
    }
}
