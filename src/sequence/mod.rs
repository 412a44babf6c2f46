// Sequence module - Nucleotide data owned by each track

pub mod buffer;
pub mod codon;
pub mod compare;
pub mod fasta;
pub mod registry;

pub use buffer::{Base, MAX_BASES, MIN_BASES, SequenceBuffer};
pub use codon::Codon;
pub use registry::{
    DirectoryProvider, GENE_REGISTRY, Gene, OfflineProvider, SequenceProvider, StaticProvider,
};
