// Track controller - Sole owner and writer of one track's buffer and cursor

use super::cursor::PlaybackCursor;
use super::timeline::TickTime;
use crate::error::{Result, SequencerError};
use crate::messaging::TrackUpdate;
use crate::sequence::registry::{self, SequenceProvider};
use crate::sequence::{Base, MIN_BASES, SequenceBuffer, fasta};
use std::fmt;

/// One of the two playback tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum TrackId {
    One,
    Two,
}

impl TrackId {
    /// Both tracks in dispatch order
    pub const ALL: [TrackId; 2] = [TrackId::One, TrackId::Two];

    pub fn index(&self) -> usize {
        match self {
            TrackId::One => 0,
            TrackId::Two => 1,
        }
    }

    pub fn other(&self) -> TrackId {
        match self {
            TrackId::One => TrackId::Two,
            TrackId::Two => TrackId::One,
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.index() + 1)
    }
}

/// Where a track's sequence comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LoadSource {
    /// Fetch from the sequence provider by gene id
    Gene { id: String },
    /// Uploaded file contents (FASTA or plain text)
    File { name: String, contents: String },
    /// Raw bases with an explicit label
    Raw { label: String, bases: String },
}

/// How a load completed
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { label: String, len: usize },
    /// Provider failed; the synthetic sequence was installed instead
    Fallback { label: String, advisory: String },
}

/// Owns one [`SequenceBuffer`] and its [`PlaybackCursor`]
#[derive(Debug, Clone)]
pub struct TrackController {
    id: TrackId,
    label: String,
    buffer: SequenceBuffer,
    cursor: PlaybackCursor,
    error: Option<String>,
}

impl TrackController {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            label: String::new(),
            buffer: SequenceBuffer::default(),
            cursor: PlaybackCursor::new(),
            error: None,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buffer(&self) -> &SequenceBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Advisory or rejection message from the last load, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.cursor.is_active()
    }

    /// Read/advance access for the scheduler during a tick
    pub(crate) fn playback_mut(&mut self) -> (&SequenceBuffer, &mut PlaybackCursor) {
        (&self.buffer, &mut self.cursor)
    }

    /// Activate playback. A track without a playable codon stays inactive.
    pub fn play(&mut self) -> bool {
        if self.buffer.len() < MIN_BASES {
            log::warn!("{}: nothing to play", self.id);
            return false;
        }
        self.cursor.set_active(true);
        true
    }

    pub fn pause(&mut self) {
        self.cursor.set_active(false);
    }

    /// Returns whether the track is active afterwards
    pub fn toggle_play(&mut self) -> bool {
        if self.is_active() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Replace the buffer from `source`.
    ///
    /// Provider failures never surface as errors: the synthetic sequence is
    /// installed and an advisory is kept for the UI. File and raw input with
    /// fewer than 3 valid bases is rejected and the current buffer is kept.
    pub fn load_from(
        &mut self,
        source: LoadSource,
        provider: &mut dyn SequenceProvider,
    ) -> Result<LoadOutcome> {
        match source {
            LoadSource::Gene { id } => Ok(self.load_gene(&id, provider)),
            LoadSource::File { name, contents } => {
                let bases = fasta::extract_bases(&contents);
                self.load_text(fasta::label_for_file(&name), &bases)
            }
            LoadSource::Raw { label, bases } => self.load_text(label, &bases),
        }
    }

    fn load_gene(&mut self, gene_id: &str, provider: &mut dyn SequenceProvider) -> LoadOutcome {
        let label = registry::lookup(gene_id)
            .map(|gene| gene.name.to_string())
            .unwrap_or_else(|| gene_id.to_string());

        let fetched = provider
            .fetch_sequence(gene_id)
            .and_then(|raw| SequenceBuffer::load(&raw));

        match fetched {
            Ok(buffer) => {
                let len = buffer.len();
                self.install(label.clone(), buffer);
                log::info!("{}: loaded {} ({} bases)", self.id, label, len);
                LoadOutcome::Loaded { label, len }
            }
            Err(err) => {
                let advisory = format!("{}: using synthetic sequence", provider_reason(&err));
                log::warn!("{}: {} for {}", self.id, advisory, gene_id);

                let buffer = SequenceBuffer::load(&registry::synthetic_sequence())
                    .unwrap_or_default();
                self.install(label.clone(), buffer);
                self.error = Some(advisory.clone());
                LoadOutcome::Fallback { label, advisory }
            }
        }
    }

    fn load_text(&mut self, label: String, raw: &str) -> Result<LoadOutcome> {
        match SequenceBuffer::load(raw) {
            Ok(buffer) => {
                let len = buffer.len();
                self.install(label.clone(), buffer);
                log::info!("{}: loaded {} ({} bases)", self.id, label, len);
                Ok(LoadOutcome::Loaded { label, len })
            }
            Err(err) => {
                log::warn!("{}: rejected load of {}: {}", self.id, label, err);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn install(&mut self, label: String, buffer: SequenceBuffer) {
        self.label = label;
        self.buffer = buffer;
        self.cursor.reset();
        self.error = None;
    }

    /// Cycle the base at `index` (A -> C -> G -> T -> A).
    /// Returns None without touching the buffer when mutation mode is off.
    pub fn mutate(&mut self, index: usize, mutation_enabled: bool) -> Result<Option<Base>> {
        if !mutation_enabled {
            return Ok(None);
        }
        let base = self.buffer.cycle_base_at(index)?;
        log::debug!("{}: base {} -> {}", self.id, index, base);
        Ok(Some(base))
    }

    /// FASTA record of the current buffer
    pub fn export_fasta(&self) -> String {
        fasta::to_fasta(&self.label, &self.buffer)
    }

    /// UI snapshot tied to `at`
    pub fn snapshot(&self, at: TickTime) -> TrackUpdate {
        TrackUpdate {
            track: self.id,
            position: self.cursor.position(),
            active: self.cursor.is_active(),
            gc_content: self.buffer.gc_content(),
            error: self.error.clone(),
            at,
        }
    }
}

fn provider_reason(err: &SequencerError) -> &'static str {
    match err {
        SequencerError::InvalidSequence { .. } => "Provider returned no usable bases",
        _ => "Provider unavailable",
    }
}
