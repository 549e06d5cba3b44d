//! Derived similarity metrics: identity, query coverage, combined score.

use crate::align::Alignment;

/// Identity, coverage, and combined ranking score for one alignment.
///
/// Values are unrounded; rounding to two decimal places happens only at the
/// report boundary so that ranking never ties on rounded values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Percent of aligned columns whose residues are identical.
    pub identity: f64,
    /// Percent of the query covered by alignment columns.
    pub coverage: f64,
    /// identity scaled by fractional coverage; the primary ranking key.
    pub combined: f64,
}

/// Compute metrics from an alignment and the query's full length.
///
/// Coverage counts alignment columns, internal gaps included, against the
/// query length, consistent with how `aligned_len` is measured. Gaps in
/// the query can push the column count past the query length, so coverage
/// is capped at 100 to stay a percentage.
pub fn compute(alignment: &Alignment, query_len: usize) -> Metrics {
    if alignment.aligned_len == 0 || query_len == 0 {
        return Metrics {
            identity: 0.0,
            coverage: 0.0,
            combined: 0.0,
        };
    }
    let identity = 100.0 * alignment.matches as f64 / alignment.aligned_len as f64;
    let coverage = (100.0 * alignment.aligned_len as f64 / query_len as f64).min(100.0);
    let combined = identity * coverage / 100.0;
    Metrics {
        identity,
        coverage,
        combined,
    }
}
