// Gene registry and sequence providers
// Providers are external collaborators; any failure is reported as ProviderUnavailable

use super::fasta::extract_bases;
use crate::error::{Result, SequencerError};
use std::collections::HashMap;
use std::path::PathBuf;

/// Built-in gene entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gene {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub species: &'static str,
}

pub const GENE_REGISTRY: [Gene; 5] = [
    Gene {
        id: "ENSG00000254647",
        name: "INS",
        description: "Insulin - Regulates blood sugar",
        species: "Homo sapiens",
    },
    Gene {
        id: "ENSG00000141510",
        name: "TP53",
        description: "Tumor Protein p53 - \"Guardian of the genome\"",
        species: "Homo sapiens",
    },
    Gene {
        id: "ENSG00000244734",
        name: "HBB",
        description: "Hemoglobin Subunit Beta",
        species: "Homo sapiens",
    },
    Gene {
        id: "ENSG00000111206",
        name: "FOXO3",
        description: "Forkhead box O3 - Longevity associated",
        species: "Homo sapiens",
    },
    Gene {
        id: "ENSG00000157764",
        name: "BRAF",
        description: "B-Raf Proto-Oncogene",
        species: "Homo sapiens",
    },
];

/// Look up a registry gene by Ensembl id
pub fn lookup(id: &str) -> Option<&'static Gene> {
    GENE_REGISTRY.iter().find(|gene| gene.id == id)
}

/// Look up a registry gene by symbol, case-insensitive
pub fn find_by_name(name: &str) -> Option<&'static Gene> {
    GENE_REGISTRY
        .iter()
        .find(|gene| gene.name.eq_ignore_ascii_case(name))
}

/// Motif repeated to build the synthetic fallback sequence
pub const FALLBACK_MOTIF: &str = "ATGGCATTCGAGTACCGTAAGCTTGGATCC";

/// Length of the synthetic fallback sequence
pub const FALLBACK_LENGTH: usize = 300;

/// Deterministic sequence installed when the provider cannot deliver
pub fn synthetic_sequence() -> String {
    FALLBACK_MOTIF
        .chars()
        .cycle()
        .take(FALLBACK_LENGTH)
        .collect()
}

/// Source of raw base strings keyed by gene id
pub trait SequenceProvider: Send {
    /// Fetch the raw sequence text for `gene_id`.
    /// Implementations report every failure as [`SequencerError::ProviderUnavailable`].
    fn fetch_sequence(&mut self, gene_id: &str) -> Result<String>;
}

/// In-memory provider, handy for tests and offline sessions
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    sequences: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequence(mut self, gene_id: &str, raw: &str) -> Self {
        self.insert(gene_id, raw);
        self
    }

    pub fn insert(&mut self, gene_id: &str, raw: &str) {
        self.sequences.insert(gene_id.to_string(), raw.to_string());
    }
}

impl SequenceProvider for StaticProvider {
    fn fetch_sequence(&mut self, gene_id: &str) -> Result<String> {
        self.sequences
            .get(gene_id)
            .cloned()
            .ok_or_else(|| SequencerError::ProviderUnavailable(format!("no sequence for {}", gene_id)))
    }
}

/// Reads `<root>/<gene_id>.fasta` (or `.fa`, `.txt`) from a local mirror directory
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SequenceProvider for DirectoryProvider {
    fn fetch_sequence(&mut self, gene_id: &str) -> Result<String> {
        for extension in ["fasta", "fa", "txt"] {
            let path = self.root.join(format!("{}.{}", gene_id, extension));
            if let Ok(text) = std::fs::read_to_string(&path) {
                return Ok(extract_bases(&text));
            }
        }
        Err(SequencerError::ProviderUnavailable(format!(
            "{} not found under {}",
            gene_id,
            self.root.display()
        )))
    }
}

/// Provider that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl SequenceProvider for OfflineProvider {
    fn fetch_sequence(&mut self, _gene_id: &str) -> Result<String> {
        Err(SequencerError::ProviderUnavailable("offline".to_string()))
    }
}
