// Tone mapper - Codon to chord, codon index to bass accent
// Pure functions over a fixed base -> pitch table

use crate::sequence::Codon;
use std::fmt;

/// Equal-tempered pitch identified by its MIDI note number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Pitch(u8);

impl Pitch {
    const NAMES: [&'static str; 12] = [
        "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
    ];

    pub const C2: Pitch = Pitch(36);
    pub const C3: Pitch = Pitch(48);
    pub const C4: Pitch = Pitch(60);
    pub const EB4: Pitch = Pitch(63);
    pub const G4: Pitch = Pitch(67);
    pub const BB4: Pitch = Pitch(70);

    pub fn from_midi(note: u8) -> Self {
        Self(note.min(127))
    }

    pub fn midi(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let octave = (self.0 / 12) as i32 - 1;
        write!(f, "{}{}", Self::NAMES[(self.0 % 12) as usize], octave)
    }
}

/// Maps codons to chords and codon positions to bass accents
pub struct ToneMapper;

impl ToneMapper {
    /// Pitch for a symbol without a table entry
    pub const FALLBACK_PITCH: Pitch = Pitch::C3;

    /// Pitch of the bass accent
    pub const BASS_PITCH: Pitch = Pitch::C2;

    /// Codons between accents
    pub const ACCENT_PERIOD: usize = 4;

    /// Pitch of a single base symbol
    pub fn pitch_for(symbol: u8) -> Pitch {
        match symbol.to_ascii_uppercase() {
            b'A' => Pitch::C4,
            b'C' => Pitch::EB4,
            b'G' => Pitch::G4,
            b'T' => Pitch::BB4,
            _ => Self::FALLBACK_PITCH,
        }
    }

    /// Chord for a codon, one pitch per base in codon order: ATG gives
    /// [C4, Bb4, G4], not a sorted voicing. The pitches sound together.
    pub fn pitches_for(codon: &Codon) -> [Pitch; 3] {
        codon.symbols().map(Self::pitch_for)
    }

    /// Every fourth codon carries a bass accent
    pub fn is_accent_beat(position: usize) -> bool {
        (position / 3) % Self::ACCENT_PERIOD == 0
    }
}
