// Codon - Three consecutive bases, the unit of playback and translation

use std::fmt;

/// Three uppercase symbols read from a codon-aligned offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([u8; 3]);

impl Codon {
    /// Build from exactly three ASCII letters (normalised to uppercase).
    /// Letters outside A/C/G/T are kept so the tone mapper can fall back on them.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let symbols: [u8; 3] = bytes.try_into().ok()?;
        if !symbols.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(Self(symbols.map(|b| b.to_ascii_uppercase())))
    }

    pub fn symbols(&self) -> [u8; 3] {
        self.0
    }

    pub fn as_str(&self) -> &str {
        // from_bytes only admits ASCII letters
        std::str::from_utf8(&self.0).unwrap_or("")
    }

    /// One-letter amino acid code (`*` for stop), None for non-ACGT codons
    pub fn amino_acid(&self) -> Option<char> {
        translate(self.as_str())
    }
}

impl std::str::FromStr for Codon {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codon::from_bytes(s.as_bytes()).ok_or(())
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Standard genetic code
pub fn translate(codon: &str) -> Option<char> {
    let amino_acid = match codon {
        "TTT" | "TTC" => 'F',
        "TTA" | "TTG" | "CTT" | "CTC" | "CTA" | "CTG" => 'L',
        "ATT" | "ATC" | "ATA" => 'I',
        "ATG" => 'M',
        "GTT" | "GTC" | "GTA" | "GTG" => 'V',
        "TCT" | "TCC" | "TCA" | "TCG" | "AGT" | "AGC" => 'S',
        "CCT" | "CCC" | "CCA" | "CCG" => 'P',
        "ACT" | "ACC" | "ACA" | "ACG" => 'T',
        "GCT" | "GCC" | "GCA" | "GCG" => 'A',
        "TAT" | "TAC" => 'Y',
        "TAA" | "TAG" | "TGA" => '*',
        "CAT" | "CAC" => 'H',
        "CAA" | "CAG" => 'Q',
        "AAT" | "AAC" => 'N',
        "AAA" | "AAG" => 'K',
        "GAT" | "GAC" => 'D',
        "GAA" | "GAG" => 'E',
        "TGT" | "TGC" => 'C',
        "TGG" => 'W',
        "CGT" | "CGC" | "CGA" | "CGG" | "AGA" | "AGG" => 'R',
        "GGT" | "GGC" | "GGA" | "GGG" => 'G',
        _ => return None,
    };
    Some(amino_acid)
}
