// Session - Shared context wiring both tracks, the scheduler and the tone engine
// UI commands arrive over a ring buffer and are applied on tick boundaries

use super::scheduler::{TransportScheduler, TransportState};
use super::timeline::{Tempo, TickTime};
use super::track::{LoadOutcome, LoadSource, TrackController, TrackId};
use crate::config::SequencerConfig;
use crate::engine::ToneEngine;
use crate::error::{Result, SequencerError};
use crate::messaging::channels::{
    CommandConsumer, CommandProducer, NotificationConsumer, NotificationProducer, UpdateConsumer,
    UpdateProducer, create_command_channel, create_notification_channel, create_update_channel,
};
use crate::messaging::{Command, Notification, NotificationCategory};
use crate::sequence::registry::SequenceProvider;
use crate::sequence::{Base, compare};
use ringbuf::traits::{Consumer, Producer};
use std::collections::VecDeque;

/// Values shared by both tracks. Each field has a single writer: the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionContext {
    pub tempo: Tempo,
    pub mutation_enabled: bool,
    pub compare_enabled: bool,
}

/// UI-side ends of the session channels
pub struct UiChannels {
    pub commands: CommandProducer,
    pub updates: UpdateConsumer,
    pub notifications: NotificationConsumer,
}

/// Two-track sonification session over a tone engine
pub struct Session<E: ToneEngine> {
    config: SequencerConfig,
    context: SessionContext,
    tracks: [TrackController; 2],
    scheduler: TransportScheduler,
    engine: E,
    provider: Box<dyn SequenceProvider>,
    commands: CommandConsumer,
    updates: UpdateProducer,
    notifications: NotificationProducer,
    pending: VecDeque<TickTime>,
    torn_down: bool,
}

impl<E: ToneEngine> Session<E> {
    /// Build a session and the channel ends the UI keeps
    pub fn new(
        config: SequencerConfig,
        mut engine: E,
        provider: Box<dyn SequenceProvider>,
    ) -> Result<(Self, UiChannels)> {
        let config = config.validated()?;
        let (command_tx, command_rx) = create_command_channel(config.command_capacity);
        let (update_tx, update_rx) = create_update_channel(config.update_capacity);
        let (notification_tx, notification_rx) =
            create_notification_channel(config.notification_capacity);

        let context = SessionContext {
            tempo: config.tempo(),
            mutation_enabled: config.mutation_enabled,
            compare_enabled: config.compare_enabled,
        };
        engine.set_tempo(context.tempo.bpm() as f64, 0.0);

        let session = Self {
            scheduler: TransportScheduler::new(config.chord_duration, config.bass_duration),
            config,
            context,
            tracks: [TrackController::new(TrackId::One), TrackController::new(TrackId::Two)],
            engine,
            provider,
            commands: command_rx,
            updates: update_tx,
            notifications: notification_tx,
            pending: VecDeque::new(),
            torn_down: false,
        };
        let channels = UiChannels {
            commands: command_tx,
            updates: update_rx,
            notifications: notification_rx,
        };
        Ok((session, channels))
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn track(&self, id: TrackId) -> &TrackController {
        &self.tracks[id.index()]
    }

    pub fn transport_state(&self) -> TransportState {
        self.scheduler.state()
    }

    pub fn scheduler(&self) -> &TransportScheduler {
        &self.scheduler
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Apply one UI command immediately
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Play(id) => self.play(id),
            Command::Pause(id) => self.pause(id),
            Command::TogglePlay(id) => self.toggle_play(id),
            Command::SetTempo(bpm) => {
                self.set_tempo(bpm);
                Ok(())
            }
            Command::Mutate(id, index) => self.mutate(id, index).map(|_| ()),
            Command::Load(id, source) => self.load(id, source).map(|_| ()),
            Command::SetMutationMode(enabled) => {
                self.context.mutation_enabled = enabled;
                Ok(())
            }
            Command::SetCompareMode(enabled) => {
                self.context.compare_enabled = enabled;
                Ok(())
            }
        }
    }

    pub fn play(&mut self, id: TrackId) -> Result<()> {
        if !self.tracks[id.index()].play() {
            self.notify(Notification::warning(
                NotificationCategory::Transport,
                format!("{} has no sequence to play", id),
            ));
        }
        self.sync_transport()
    }

    /// Stops reading the track from the next tick; triggered audio rings out
    pub fn pause(&mut self, id: TrackId) -> Result<()> {
        self.tracks[id.index()].pause();
        self.sync_transport()
    }

    pub fn toggle_play(&mut self, id: TrackId) -> Result<()> {
        if self.tracks[id.index()].is_active() {
            self.pause(id)
        } else {
            self.play(id)
        }
    }

    /// Clamp to [60, 240] and apply to the shared tempo, ramped while running
    pub fn set_tempo(&mut self, bpm: u32) -> Tempo {
        let tempo = Tempo::new(bpm);
        let ramp = if self.scheduler.state().is_running() {
            self.config.tempo_ramp_seconds
        } else {
            0.0
        };
        self.engine.set_tempo(tempo.bpm() as f64, ramp);
        self.context.tempo = tempo;
        log::info!("tempo {} (ramp {}s)", tempo, ramp);
        tempo
    }

    /// Cycle the base at `index` when mutation mode is on
    pub fn mutate(&mut self, id: TrackId, index: usize) -> Result<Option<Base>> {
        let enabled = self.context.mutation_enabled;
        let mutated = self.tracks[id.index()].mutate(index, enabled)?;
        if mutated.is_some() {
            self.publish_snapshot(id);
        }
        Ok(mutated)
    }

    /// Replace a track's sequence. Provider failures install the synthetic
    /// sequence and raise an advisory instead of failing.
    pub fn load(&mut self, id: TrackId, source: LoadSource) -> Result<LoadOutcome> {
        let result = self.tracks[id.index()].load_from(source, self.provider.as_mut());

        match &result {
            Ok(LoadOutcome::Fallback { advisory, .. }) => {
                self.notify(Notification::warning(
                    NotificationCategory::Provider,
                    format!("{}: {}", id, advisory),
                ));
            }
            Ok(LoadOutcome::Loaded { .. }) => {}
            Err(err) => {
                self.notify(Notification::error(
                    NotificationCategory::Sequence,
                    format!("{}: {}", id, err),
                ));
            }
        }

        self.publish_snapshot(id);
        result
    }

    pub fn export_fasta(&self, id: TrackId) -> String {
        self.tracks[id.index()].export_fasta()
    }

    /// Positions of `id` that differ from the other track, empty unless compare mode is on
    pub fn differences(&self, id: TrackId) -> Vec<usize> {
        if !self.context.compare_enabled {
            return Vec::new();
        }
        compare::diff_positions(
            self.tracks[id.index()].buffer(),
            self.tracks[id.other().index()].buffer(),
        )
    }

    /// Match percentage between the two tracks, `None` unless compare mode is on
    pub fn identity(&self) -> Option<f64> {
        if !self.context.compare_enabled {
            return None;
        }
        Some(compare::identity_percent(
            self.tracks[TrackId::One.index()].buffer(),
            self.tracks[TrackId::Two.index()].buffer(),
        ))
    }

    /// Apply queued commands, then dispatch every tick due within the lookahead window.
    /// Returns the number of ticks dispatched.
    pub fn pump(&mut self) -> Result<usize> {
        self.pump_at_most(usize::MAX)
    }

    /// Like [`pump`](Self::pump) but dispatches at most `limit` ticks.
    /// Due ticks beyond the limit are held for the next call.
    pub fn pump_at_most(&mut self, limit: usize) -> Result<usize> {
        if self.torn_down {
            return Ok(0);
        }

        while let Some(command) = self.commands.try_pop() {
            // Loads raise their own notification
            let reported = matches!(command, Command::Load(..));
            if let Err(err) = self.apply(command) {
                log::warn!("command failed: {}", err);
                if !reported {
                    let category = match &err {
                        SequencerError::Engine(_) => NotificationCategory::Engine,
                        _ => NotificationCategory::Sequence,
                    };
                    self.notify(Notification::error(category, err.to_string()));
                }
            }
        }

        let Some(handle) = self.scheduler.repeat() else {
            return Ok(0);
        };

        let until = self.engine.current_time() + self.config.lookahead_seconds;
        self.pending.extend(self.engine.due_ticks(handle, until)?);

        let count = self.pending.len().min(limit);
        let ticks: Vec<TickTime> = self.pending.drain(..count).collect();
        for at in ticks {
            self.scheduler
                .tick(at, &mut self.tracks, &mut self.engine, &mut self.updates);
        }
        Ok(count)
    }

    /// Cancel the clock and release the engine. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for track in self.tracks.iter_mut() {
            track.pause();
        }
        self.scheduler.stop(&mut self.engine);
        self.pending.clear();
        self.engine.dispose();
        self.torn_down = true;
        log::info!("session torn down");
    }

    fn sync_transport(&mut self) -> Result<()> {
        let any_active = self.tracks.iter().any(TrackController::is_active);
        let state = self.scheduler.sync(any_active, &mut self.engine)?;
        if !state.is_running() {
            // Held ticks belong to the cancelled repeat
            self.pending.clear();
        }
        Ok(())
    }

    fn publish_snapshot(&mut self, id: TrackId) {
        let at = TickTime::from_seconds(self.engine.current_time());
        let update = self.tracks[id.index()].snapshot(at);
        if self.updates.try_push(update).is_err() {
            log::warn!("update channel full, dropped snapshot for {}", id);
        }
    }

    fn notify(&mut self, notification: Notification) {
        if self.notifications.try_push(notification).is_err() {
            log::warn!("notification channel full");
        }
    }
}

impl<E: ToneEngine> Drop for Session<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
