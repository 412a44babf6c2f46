//! End-to-end playback through a session on the offline engine

use genome_sequencer::engine::{EngineEventKind, OfflineEngine};
use genome_sequencer::messaging::channels::drain;
use genome_sequencer::sequence::{OfflineProvider, StaticProvider, registry};
use genome_sequencer::{
    Command, LoadOutcome, LoadSource, Pitch, SequencerConfig, Session, TrackId, TransportState,
};
use ringbuf::traits::Producer;

fn raw(bases: &str) -> LoadSource {
    LoadSource::Raw {
        label: "seq".to_string(),
        bases: bases.to_string(),
    }
}

fn offline_session() -> (Session<OfflineEngine>, genome_sequencer::sequencer::UiChannels) {
    let config = SequencerConfig {
        lookahead_seconds: 0.0,
        ..SequencerConfig::default()
    };
    Session::new(config, OfflineEngine::new(120.0), Box::new(OfflineProvider)).unwrap()
}

/// Advance engine time in small steps, pumping after each
fn run_for(session: &mut Session<OfflineEngine>, seconds: f64) {
    let steps = (seconds / 0.01).round() as usize;
    for _ in 0..steps {
        session.pump().unwrap();
        session.engine_mut().advance(0.01);
    }
    session.pump().unwrap();
}

#[test]
fn test_first_tick_plays_atg_at_tick_time() {
    let (mut session, mut ui) = offline_session();
    session.load(TrackId::One, raw("ATGCGTAAACCCGGG")).unwrap();
    session.play(TrackId::One).unwrap();

    assert_eq!(session.pump().unwrap(), 1);

    let events = session.engine().events();
    assert_eq!(
        events[0].kind,
        EngineEventKind::Chord(vec![Pitch::C4, Pitch::BB4, Pitch::G4])
    );
    assert_eq!(events[0].at.seconds(), 0.0);
    assert_eq!(session.track(TrackId::One).cursor().position(), 3);

    let updates = drain(&mut ui.updates);
    let tick_update = updates.last().unwrap();
    assert_eq!(tick_update.position, 0);
    assert_eq!(tick_update.at.seconds(), 0.0);
}

#[test]
fn test_ticks_are_spaced_by_tempo_without_jitter() {
    let (mut session, _ui) = offline_session();
    session.load(TrackId::One, raw(&"ACGT".repeat(30))).unwrap();
    session.play(TrackId::One).unwrap();

    // Uneven host steps must not affect tick timestamps
    for step in [0.013, 0.3, 0.07, 0.41, 0.2, 0.011, 0.5, 0.6] {
        session.engine_mut().advance(step);
        session.pump().unwrap();
    }

    let times: Vec<f64> = session
        .engine()
        .events()
        .iter()
        .filter(|event| matches!(event.kind, EngineEventKind::Chord(_)))
        .map(|event| event.at.seconds())
        .collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_two_tracks_only_lead_fires_bass() {
    let (mut session, _ui) = offline_session();
    session.load(TrackId::One, raw(&"ATG".repeat(20))).unwrap();
    session.load(TrackId::Two, raw(&"CCC".repeat(20))).unwrap();
    session.play(TrackId::One).unwrap();
    session.play(TrackId::Two).unwrap();

    run_for(&mut session, 3.9); // 8 ticks at 120 BPM

    let events = session.engine().events();
    let chords = events
        .iter()
        .filter(|e| matches!(e.kind, EngineEventKind::Chord(_)))
        .count();
    let basses: Vec<f64> = events
        .iter()
        .filter(|e| matches!(e.kind, EngineEventKind::Bass(_)))
        .map(|e| e.at.seconds())
        .collect();

    assert_eq!(chords, 16);
    // Codons 0 and 4 of track one only
    assert_eq!(basses, vec![0.0, 2.0]);

    // Track two's chord follows track one's within the same tick
    assert_eq!(
        events[0].kind,
        EngineEventKind::Chord(vec![Pitch::C4, Pitch::BB4, Pitch::G4])
    );
    assert_eq!(events[1].kind, EngineEventKind::Bass(Pitch::C2));
    assert_eq!(events[2].kind, EngineEventKind::Chord(vec![Pitch::EB4; 3]));
}

#[test]
fn test_track_two_alone_fires_bass() {
    let (mut session, _ui) = offline_session();
    session.load(TrackId::Two, raw(&"GGG".repeat(10))).unwrap();
    session.play(TrackId::Two).unwrap();
    session.pump().unwrap();

    let events = session.engine().events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EngineEventKind::Bass(Pitch::C2));
}

#[test]
fn test_pause_stops_reading_and_resume_continues() {
    let (mut session, mut ui) = offline_session();
    session.load(TrackId::One, raw(&"ACG".repeat(10))).unwrap();
    session.play(TrackId::One).unwrap();
    run_for(&mut session, 1.2); // ticks at 0, 0.5, 1.0
    assert_eq!(session.track(TrackId::One).cursor().position(), 9);

    ui.commands.try_push(Command::Pause(TrackId::One)).unwrap();
    session.pump().unwrap();
    assert_eq!(session.transport_state(), TransportState::Paused);

    let before = session.engine().events().len();
    run_for(&mut session, 2.0);
    assert_eq!(session.engine().events().len(), before);

    ui.commands.try_push(Command::Play(TrackId::One)).unwrap();
    session.pump().unwrap();
    assert_eq!(session.transport_state(), TransportState::Running);
    // Resumes from where it stopped, first tick right away
    assert_eq!(session.track(TrackId::One).cursor().position(), 12);
}

#[test]
fn test_tempo_change_is_ramped_while_running() {
    let (mut session, _ui) = offline_session();
    session.load(TrackId::One, raw(&"ACG".repeat(50))).unwrap();
    session.play(TrackId::One).unwrap();
    run_for(&mut session, 1.0); // ticks at 0, 0.5, 1.0

    session.set_tempo(240);
    assert_eq!(session.context().tempo.bpm(), 240);
    run_for(&mut session, 2.0);

    let times: Vec<f64> = session
        .engine()
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EngineEventKind::Chord(_)))
        .map(|e| e.at.seconds())
        .collect();

    let gaps: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    // Gaps shrink from 0.5s towards 0.25s, never below the target period
    assert!(gaps.iter().all(|&gap| gap >= 0.25 - 1e-9 && gap <= 0.5 + 1e-9));
    assert!(gaps[2] < 0.5);
    assert!((gaps.last().unwrap() - 0.25).abs() < 1e-9);
}

#[test]
fn test_provider_failure_plays_synthetic_sequence() {
    let (mut session, mut ui) = offline_session();
    let outcome = session
        .load(TrackId::One, LoadSource::Gene { id: "ENSG00000157764".to_string() })
        .unwrap();
    assert!(matches!(outcome, LoadOutcome::Fallback { .. }));
    assert_eq!(
        session.track(TrackId::One).buffer().bases(),
        registry::synthetic_sequence()
    );
    assert_eq!(drain(&mut ui.notifications).len(), 1);

    session.play(TrackId::One).unwrap();
    assert_eq!(session.pump().unwrap(), 1);
}

#[test]
fn test_mutation_while_playing_is_heard_next_loop() {
    let provider = StaticProvider::new().with_sequence("ENSG00000254647", "AAACCCGGG");
    let config = SequencerConfig {
        lookahead_seconds: 0.0,
        mutation_enabled: true,
        ..SequencerConfig::default()
    };
    let (mut session, _ui) =
        Session::new(config, OfflineEngine::new(120.0), Box::new(provider)).unwrap();
    session
        .load(TrackId::One, LoadSource::Gene { id: "ENSG00000254647".to_string() })
        .unwrap();
    session.play(TrackId::One).unwrap();
    session.pump().unwrap();

    session.mutate(TrackId::One, 0).unwrap();
    session.engine_mut().drain_events();
    run_for(&mut session, 1.0); // ticks at 0.5 (CCC), 1.0 (GGG)
    session.engine_mut().advance(0.5);
    session.pump().unwrap(); // tick at 1.5 wraps to the mutated codon

    let last_chord = session
        .engine()
        .events()
        .iter()
        .rev()
        .find_map(|e| match &e.kind {
            EngineEventKind::Chord(pitches) => Some(pitches.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_chord, vec![Pitch::EB4, Pitch::C4, Pitch::C4]);
}

#[test]
fn test_teardown_releases_engine_once() {
    let (mut session, _ui) = offline_session();
    session.load(TrackId::One, raw("ATGATG")).unwrap();
    session.play(TrackId::One).unwrap();
    session.teardown();
    session.teardown();
    assert_eq!(session.engine().disposals(), 1);
    assert!(session.scheduler().repeat().is_none());
}
