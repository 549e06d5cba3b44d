//! Smith-Waterman local alignment with affine gap penalties.
//!
//! Three-state recurrence: H (best score ending in a substitution), E (best
//! ending in a gap in the query, consuming subject) and F (best ending in a
//! gap in the subject, consuming query), with the maximum tracked over the
//! entire matrix. The pipeline downstream needs score, endpoint ranges,
//! aligned length and identical-column count but no traceback path, so each
//! cell carries its region origin and column statistics through the
//! recurrence instead of a traceback matrix: O(m*n) time, O(n) space.

use super::result::Alignment;
use crate::error::AlignmentError;
use crate::scoring::ScoringModel;
use crate::sequence::{Sequence, ALPHABET_SIZE};

/// Region origin and column statistics carried alongside each cell's score.
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    score: i32,
    q_start: usize,
    s_start: usize,
    cols: usize,
    matches: usize,
}

impl Cell {
    fn blocked() -> Self {
        Self {
            score: i32::MIN / 4,
            ..Self::default()
        }
    }
}

/// Compute the optimal local alignment of `query` and `subject`.
///
/// Tie-breaking is deterministic so results are reproducible across runs:
/// the best cell is the first occurrence in row-major scan order, and within
/// a cell the recurrence prefers substitution over gap-in-query over
/// gap-in-subject.
///
/// # Errors
///
/// `AlignmentError::EmptySequence` for zero-length input (callers normally
/// reject these earlier) and `AlignmentError::UnknownSymbol` when a residue
/// code falls outside the model's alphabet. Both are local failures: the
/// caller skips that one unit, never the batch.
pub fn align(
    query: &Sequence,
    subject: &Sequence,
    model: &ScoringModel,
) -> Result<Alignment, AlignmentError> {
    if query.is_empty() || subject.is_empty() {
        return Err(AlignmentError::EmptySequence);
    }
    check_alphabet(query)?;
    check_alphabet(subject)?;

    let q = query.codes();
    let s = subject.codes();
    let n = s.len();

    // Opening a gap of length 1 costs open + extend; each further column
    // costs extend.
    let open = model.gap_open() + model.gap_extend();
    let extend = model.gap_extend();

    // Rolling rows over the subject axis. E depends only on the cell to its
    // left in the same row, so it collapses to a scalar; F needs a full row.
    let mut h_prev: Vec<Cell> = vec![Cell::default(); n + 1];
    let mut h_curr: Vec<Cell> = vec![Cell::default(); n + 1];
    let mut f: Vec<Cell> = vec![Cell::blocked(); n + 1];

    let mut best = Cell::default();
    let mut best_q_end = 0usize;
    let mut best_s_end = 0usize;

    for i in 1..=q.len() {
        let qi = q[i - 1];
        let mut e = Cell::blocked();

        for j in 1..=n {
            let sj = s[j - 1];

            // E: open a gap in the query from H to the left, or extend the
            // running one.
            let left = h_curr[j - 1];
            let e_open = left.score - open;
            let e_extend = e.score - extend;
            e = if e_open >= e_extend {
                Cell {
                    score: e_open,
                    cols: left.cols + 1,
                    ..left
                }
            } else {
                Cell {
                    score: e_extend,
                    cols: e.cols + 1,
                    ..e
                }
            };

            // F: open a gap in the subject from H above, or extend.
            let up = h_prev[j];
            let f_prev = f[j];
            let f_open = up.score - open;
            let f_extend = f_prev.score - extend;
            f[j] = if f_open >= f_extend {
                Cell {
                    score: f_open,
                    cols: up.cols + 1,
                    ..up
                }
            } else {
                Cell {
                    score: f_extend,
                    cols: f_prev.cols + 1,
                    ..f_prev
                }
            };

            // H: substitution from the diagonal, the better gap state, or a
            // fresh region. A stored H cell is either zero (cols == 0) or a
            // positive-scoring region, so cols == 0 marks a fresh start.
            let diag = h_prev[j - 1];
            let mut cell = Cell {
                score: diag.score + model.score(qi, sj),
                q_start: if diag.cols == 0 { i - 1 } else { diag.q_start },
                s_start: if diag.cols == 0 { j - 1 } else { diag.s_start },
                cols: diag.cols + 1,
                matches: diag.matches + usize::from(qi == sj),
            };
            if e.score > cell.score {
                cell = e;
            }
            if f[j].score > cell.score {
                cell = f[j];
            }
            if cell.score <= 0 {
                cell = Cell::default();
            }
            h_curr[j] = cell;

            // Strict comparison keeps the first maximum in row-major order.
            if cell.score > best.score {
                best = cell;
                best_q_end = i;
                best_s_end = j;
            }
        }

        std::mem::swap(&mut h_prev, &mut h_curr);
        // h_curr now holds the stale row; every cell from column 1 on is
        // overwritten next pass and column 0 stays the zero boundary.
    }

    if best.score <= 0 {
        return Ok(Alignment::empty());
    }
    Ok(Alignment {
        score: best.score,
        q_start: best.q_start,
        q_end: best_q_end,
        s_start: best.s_start,
        s_end: best_s_end,
        aligned_len: best.cols,
        matches: best.matches,
    })
}

fn check_alphabet(seq: &Sequence) -> Result<(), AlignmentError> {
    match seq.codes().iter().find(|&&c| c as usize >= ALPHABET_SIZE) {
        Some(&code) => Err(AlignmentError::UnknownSymbol { code }),
        None => Ok(()),
    }
}
