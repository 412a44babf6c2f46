// Transport scheduler - Drives both tracks from one repeating engine clock
// Holds no cursor state: cursors are borrowed from the track controllers for each tick

use super::timeline::{NoteValue, TickTime};
use super::tone_map::ToneMapper;
use super::track::{TrackController, TrackId};
use crate::engine::{EngineError, RepeatHandle, ToneEngine};
use crate::messaging::{TrackUpdate, UpdateProducer};
use ringbuf::traits::Producer;

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum TransportState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl TransportState {
    pub fn is_running(&self) -> bool {
        matches!(self, TransportState::Running)
    }
}

/// What a single tick produced, mostly for logging and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub chords: Vec<TrackId>,
    pub accents: Vec<TrackId>,
    pub skipped: Vec<TrackId>,
    pub dropped_updates: usize,
}

/// Single shared clock for both tracks
#[derive(Debug, Clone)]
pub struct TransportScheduler {
    state: TransportState,
    repeat: Option<RepeatHandle>,
    engine_started: bool,
    subdivision: NoteValue,
    chord_duration: NoteValue,
    bass_duration: NoteValue,
    ticks_dispatched: u64,
    last_tick: Option<TickTime>,
}

impl TransportScheduler {
    /// One tick per quarter note
    pub const SUBDIVISION: NoteValue = NoteValue::Quarter;

    pub fn new(chord_duration: NoteValue, bass_duration: NoteValue) -> Self {
        Self {
            state: TransportState::Stopped,
            repeat: None,
            engine_started: false,
            subdivision: Self::SUBDIVISION,
            chord_duration,
            bass_duration,
            ticks_dispatched: 0,
            last_tick: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn repeat(&self) -> Option<RepeatHandle> {
        self.repeat
    }

    pub fn ticks_dispatched(&self) -> u64 {
        self.ticks_dispatched
    }

    /// Nominal time of the most recent tick, kept across pause and resume
    pub fn last_tick(&self) -> Option<TickTime> {
        self.last_tick
    }

    /// Bring the state machine in line with track activity.
    ///
    /// Stopped -> Running starts the engine (once) and schedules the repeat,
    /// Running -> Paused cancels it, Paused -> Running schedules a fresh one
    /// that starts no earlier than one subdivision after the last tick, so
    /// ticks already handed to the engine are never overtaken.
    pub fn sync<E: ToneEngine + ?Sized>(
        &mut self,
        any_active: bool,
        engine: &mut E,
    ) -> Result<TransportState, EngineError> {
        let next = match (self.state, any_active) {
            (TransportState::Stopped, true) | (TransportState::Paused, true) => {
                if !self.engine_started {
                    engine.start()?;
                    self.engine_started = true;
                }
                self.repeat = Some(engine.schedule_repeat(self.subdivision, self.last_tick)?);
                TransportState::Running
            }
            (TransportState::Running, false) => {
                if let Some(handle) = self.repeat.take() {
                    engine.cancel(handle);
                }
                TransportState::Paused
            }
            (state, _) => state,
        };

        if next != self.state {
            log::info!("transport {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        Ok(self.state)
    }

    /// Cancel the repeat and return to Stopped
    pub fn stop<E: ToneEngine + ?Sized>(&mut self, engine: &mut E) {
        if let Some(handle) = self.repeat.take() {
            engine.cancel(handle);
        }
        if self.state != TransportState::Stopped {
            log::info!("transport {:?} -> Stopped", self.state);
        }
        self.state = TransportState::Stopped;
    }

    /// Run one tick at its nominal time `at`.
    ///
    /// For each active track, track one first: trigger the codon's chord,
    /// trigger the bass on accent beats, publish the position, then advance.
    /// Track two's accent is suppressed while track one is active. Faults
    /// (no full codon) skip the trigger and never abort the tick.
    pub fn tick<E: ToneEngine + ?Sized>(
        &mut self,
        at: TickTime,
        tracks: &mut [TrackController; 2],
        engine: &mut E,
        updates: &mut UpdateProducer,
    ) -> TickReport {
        let mut report = TickReport::default();
        if !self.state.is_running() {
            return report;
        }

        let lead_active = tracks[TrackId::One.index()].is_active();

        for track in tracks.iter_mut() {
            if !track.is_active() {
                continue;
            }
            let id = track.id();
            let error = track.error().map(str::to_string);
            let (buffer, cursor) = track.playback_mut();
            let position = cursor.position();

            match cursor.codon_at(buffer) {
                Some(codon) => {
                    let pitches = ToneMapper::pitches_for(&codon);
                    engine.trigger_chord(&pitches, self.chord_duration, at);
                    report.chords.push(id);

                    let accent_allowed = id == TrackId::One || !lead_active;
                    if accent_allowed && ToneMapper::is_accent_beat(position) {
                        engine.trigger_bass(ToneMapper::BASS_PITCH, self.bass_duration, at);
                        report.accents.push(id);
                    }

                    log::debug!(target: "sequencer::tick", "{} {} @ {} -> {}", at, id, position, codon);
                }
                None => {
                    log::debug!(target: "sequencer::tick", "{} {} @ {}: no codon, skipped", at, id, position);
                    report.skipped.push(id);
                }
            }

            let update = TrackUpdate {
                track: id,
                position,
                active: true,
                gc_content: buffer.gc_content(),
                error,
                at,
            };
            cursor.advance(buffer.len());

            if updates.try_push(update).is_err() {
                report.dropped_updates += 1;
            }
        }

        if report.dropped_updates > 0 {
            log::warn!("update channel full, dropped {} position updates", report.dropped_updates);
        }

        self.ticks_dispatched += 1;
        self.last_tick = Some(at);
        report
    }
}

impl Default for TransportScheduler {
    fn default() -> Self {
        Self::new(NoteValue::Eighth, NoteValue::Half)
    }
}
