// Playback cursor - Codon-aligned read head over a sequence buffer

use crate::sequence::{Codon, SequenceBuffer};

/// Per-track read head
///
/// `position` is always a multiple of 3. Trailing bases that cannot form a
/// full codon are never played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    position: usize,
    active: bool,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Step one codon forward, wrapping to 0 once `position + 3 >= len - 2`
    pub fn advance(&mut self, buffer_len: usize) -> usize {
        let next = self.position + 3;
        // next >= len - 2, kept in unsigned arithmetic
        self.position = if next + 2 >= buffer_len { 0 } else { next };
        self.position
    }

    /// Codon under the cursor, None when the buffer cannot supply three bases
    pub fn codon_at(&self, buffer: &SequenceBuffer) -> Option<Codon> {
        buffer.codon_at(self.position)
    }
}
