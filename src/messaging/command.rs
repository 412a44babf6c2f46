// Command types - UI -> sequencer communication
// Drained at the start of each pump, so they land on a tick boundary

use crate::sequencer::track::{LoadSource, TrackId};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(TrackId),
    Pause(TrackId),
    TogglePlay(TrackId),
    SetTempo(u32),
    Mutate(TrackId, usize),
    Load(TrackId, LoadSource),
    SetMutationMode(bool),
    SetCompareMode(bool),
}
