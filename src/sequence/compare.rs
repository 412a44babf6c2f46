// Compare mode - Positions where two tracks disagree

use super::buffer::SequenceBuffer;

/// Indices where both buffers have a base and the bases differ.
/// Positions beyond the shorter buffer are not reported.
pub fn diff_positions(a: &SequenceBuffer, b: &SequenceBuffer) -> Vec<usize> {
    a.bases()
        .bytes()
        .zip(b.bases().bytes())
        .enumerate()
        .filter(|(_, (left, right))| left != right)
        .map(|(index, _)| index)
        .collect()
}

/// Share of compared positions that match, as a percentage (0 when nothing overlaps)
pub fn identity_percent(a: &SequenceBuffer, b: &SequenceBuffer) -> f64 {
    let overlap = a.len().min(b.len());
    if overlap == 0 {
        return 0.0;
    }
    let matching = overlap - diff_positions(a, b).len();
    (matching as f64 / overlap as f64 * 1000.0).round() / 10.0
}
