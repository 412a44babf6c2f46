// FASTA text handling - Export of a track and base extraction from uploaded files

use super::buffer::SequenceBuffer;
use std::path::Path;

/// Serialize a buffer as a single-record FASTA: header line then one unwrapped line of bases
pub fn to_fasta(label: &str, buffer: &SequenceBuffer) -> String {
    format!(">{}\n{}", label, buffer.bases())
}

/// Strip FASTA headers (`>`) and comment lines (`;`) from uploaded text.
///
/// Only the first record is kept. Plain text without a header passes through
/// unchanged, and the result still has to go through [`SequenceBuffer::load`].
pub fn extract_bases(text: &str) -> String {
    let mut records_seen = 0;
    let mut sequence = String::with_capacity(text.len());

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('>') {
            records_seen += 1;
            if records_seen > 1 {
                break;
            }
            continue;
        }
        if line.starts_with(';') {
            continue;
        }
        sequence.push_str(line);
    }

    sequence
}

/// Label for an uploaded file: its stem, or "Custom" when the name has none
pub fn label_for_file(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Custom".to_string())
}
