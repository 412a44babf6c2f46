//! Engine lifecycle as seen through a session: start failures and release on drop

use genome_sequencer::engine::{EngineError, OfflineEngine, RepeatHandle};
use genome_sequencer::messaging::channels::drain;
use genome_sequencer::messaging::{NotificationCategory, NotificationLevel};
use genome_sequencer::sequence::OfflineProvider;
use genome_sequencer::sequencer::{NoteValue, TickTime};
use genome_sequencer::{
    Command, LoadSource, Pitch, SequencerConfig, SequencerError, Session, ToneEngine, TrackId,
    TransportState,
};
use ringbuf::traits::Producer;
use std::cell::Cell;
use std::rc::Rc;

/// Offline engine whose dispose count outlives the session that owns it
struct CountingEngine {
    inner: OfflineEngine,
    disposals: Rc<Cell<u32>>,
    start_failure: Option<String>,
}

impl CountingEngine {
    fn new(disposals: Rc<Cell<u32>>) -> Self {
        Self {
            inner: OfflineEngine::default(),
            disposals,
            start_failure: None,
        }
    }

    fn failing_start(disposals: Rc<Cell<u32>>, reason: &str) -> Self {
        Self {
            start_failure: Some(reason.to_string()),
            ..Self::new(disposals)
        }
    }
}

impl ToneEngine for CountingEngine {
    fn start(&mut self) -> Result<(), EngineError> {
        match &self.start_failure {
            Some(reason) => Err(EngineError::StartFailed(reason.clone())),
            None => self.inner.start(),
        }
    }

    fn trigger_chord(&mut self, pitches: &[Pitch], duration: NoteValue, at: TickTime) {
        self.inner.trigger_chord(pitches, duration, at);
    }

    fn trigger_bass(&mut self, pitch: Pitch, duration: NoteValue, at: TickTime) {
        self.inner.trigger_bass(pitch, duration, at);
    }

    fn schedule_repeat(
        &mut self,
        subdivision: NoteValue,
        after: Option<TickTime>,
    ) -> Result<RepeatHandle, EngineError> {
        self.inner.schedule_repeat(subdivision, after)
    }

    fn due_ticks(&mut self, handle: RepeatHandle, until: f64) -> Result<Vec<TickTime>, EngineError> {
        self.inner.due_ticks(handle, until)
    }

    fn set_tempo(&mut self, bpm: f64, ramp_seconds: f64) {
        self.inner.set_tempo(bpm, ramp_seconds);
    }

    fn cancel(&mut self, handle: RepeatHandle) {
        self.inner.cancel(handle);
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn dispose(&mut self) {
        self.disposals.set(self.disposals.get() + 1);
        self.inner.dispose();
    }
}

fn raw(bases: &str) -> LoadSource {
    LoadSource::Raw {
        label: "seq".to_string(),
        bases: bases.to_string(),
    }
}

#[test]
fn test_dropping_running_session_disposes_engine_once() {
    let disposals = Rc::new(Cell::new(0));
    {
        let (mut session, _ui) = Session::new(
            SequencerConfig::default(),
            CountingEngine::new(disposals.clone()),
            Box::new(OfflineProvider),
        )
        .unwrap();
        session.load(TrackId::One, raw("ATGCGTAAACCC")).unwrap();
        session.play(TrackId::One).unwrap();
        assert_eq!(session.pump().unwrap(), 1);
        assert_eq!(session.transport_state(), TransportState::Running);
        assert_eq!(disposals.get(), 0);
    }
    assert_eq!(disposals.get(), 1);
}

#[test]
fn test_drop_after_teardown_does_not_dispose_again() {
    let disposals = Rc::new(Cell::new(0));
    let (mut session, _ui) = Session::new(
        SequencerConfig::default(),
        CountingEngine::new(disposals.clone()),
        Box::new(OfflineProvider),
    )
    .unwrap();
    session.load(TrackId::One, raw("ATGCGT")).unwrap();
    session.play(TrackId::One).unwrap();

    session.teardown();
    assert_eq!(disposals.get(), 1);
    drop(session);
    assert_eq!(disposals.get(), 1);
}

#[test]
fn test_engine_start_failure_reaches_ui() {
    let disposals = Rc::new(Cell::new(0));
    let (mut session, mut ui) = Session::new(
        SequencerConfig::default(),
        CountingEngine::failing_start(disposals, "no audio device"),
        Box::new(OfflineProvider),
    )
    .unwrap();
    session.load(TrackId::One, raw("ATGCGT")).unwrap();
    drain(&mut ui.notifications);

    ui.commands.try_push(Command::Play(TrackId::One)).unwrap();
    assert_eq!(session.pump().unwrap(), 0);
    assert_eq!(session.transport_state(), TransportState::Stopped);

    let notifications = drain(&mut ui.notifications);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].category, NotificationCategory::Engine);
    assert!(notifications[0].message.contains("no audio device"));

    // Called directly, the same failure comes back as an error
    assert!(matches!(
        session.play(TrackId::One),
        Err(SequencerError::Engine(EngineError::StartFailed(_)))
    ));
}
