// Track updates - Sequencer -> UI state publication

use crate::sequencer::timeline::TickTime;
use crate::sequencer::track::TrackId;

/// Snapshot of one track for the UI layer
///
/// `at` is the nominal tick time the position belongs to; a UI that renders
/// late can still line the highlight up with the audio.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrackUpdate {
    pub track: TrackId,
    pub position: usize,
    pub active: bool,
    pub gc_content: f64,
    pub error: Option<String>,
    pub at: TickTime,
}
