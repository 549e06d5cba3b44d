//! Substitution scoring model: BLOSUM62 table plus affine gap penalties.
//!
//! The matrix is stored in packed order ARNDCQEGHILKMFPSTWYVBJZX* so that
//! normalized sequence codes index it directly. Ambiguity codes and the stop
//! symbol have defined rows; no symbol pair ever scores as undefined.

use crate::error::ConfigurationError;
use crate::sequence::ALPHABET_SIZE;

/// BLOSUM62 in packed order: ARNDCQEGHILKMFPSTWYVBJZX*
/// Source: NCBI sm_blosum62.c
pub static BLOSUM62: [i8; ALPHABET_SIZE * ALPHABET_SIZE] = [
    //       A,  R,  N,  D,  C,  Q,  E,  G,  H,  I,  L,  K,  M,  F,  P,  S,  T,  W,  Y,  V,  B,  J,  Z,  X,  *
    /*A*/    4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1, -1, -1, -4,
    /*R*/   -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1, -2,  0, -1, -4,
    /*N*/   -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  4, -3,  0, -1, -4,
    /*D*/   -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4, -3,  1, -1, -4,
    /*C*/    0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -1, -3, -1, -4,
    /*Q*/   -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0, -2,  4, -1, -4,
    /*E*/   -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1, -3,  4, -1, -4,
    /*G*/    0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -4, -2, -1, -4,
    /*H*/   -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0, -3,  0, -1, -4,
    /*I*/   -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3,  3, -3, -1, -4,
    /*L*/   -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4,  3, -3, -1, -4,
    /*K*/   -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0, -3,  1, -1, -4,
    /*M*/   -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3,  2, -1, -1, -4,
    /*F*/   -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3,  0, -3, -1, -4,
    /*P*/   -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -3, -1, -1, -4,
    /*S*/    1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0, -2,  0, -1, -4,
    /*T*/    0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1, -1, -1, -4,
    /*W*/   -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -2, -2, -1, -4,
    /*Y*/   -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -1, -2, -1, -4,
    /*V*/    0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3,  2, -2, -1, -4,
    /*B*/   -2, -1,  4,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4, -3,  0, -1, -4,
    /*J*/   -1, -2, -3, -3, -1, -2, -3, -4, -3,  3,  3, -3,  2,  0, -3, -2, -1, -2, -1,  2, -3,  3, -3, -1, -4,
    /*Z*/   -1,  0,  0,  1, -3,  4,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -2, -2, -2,  0, -3,  4, -1, -4,
    /*X*/   -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -4,
    /***/   -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1,
];

/// Immutable substitution-score table with affine gap parameters.
///
/// Shared read-only across every alignment in a run; requires no
/// synchronization. Gap penalties are stored as non-negative magnitudes and
/// applied as negative score contributions: a gap of length L costs
/// `gap_open + L * gap_extend`.
#[derive(Debug, Clone)]
pub struct ScoringModel {
    matrix: Vec<i32>,
    gap_open: i32,
    gap_extend: i32,
}

impl ScoringModel {
    /// Validate and build a model from raw matrix data.
    ///
    /// The matrix must be ALPHABET_SIZE x ALPHABET_SIZE, row-major, and
    /// symmetric; gap penalties must be non-negative. Ill-formed data is a
    /// `ConfigurationError`; it is fatal, there are no partial scoring tables.
    pub fn new(matrix: &[i8], gap_open: i32, gap_extend: i32) -> Result<Self, ConfigurationError> {
        if matrix.len() != ALPHABET_SIZE * ALPHABET_SIZE {
            return Err(ConfigurationError::MatrixShape {
                expected: ALPHABET_SIZE,
                actual: matrix.len(),
            });
        }
        for a in 0..ALPHABET_SIZE {
            for b in (a + 1)..ALPHABET_SIZE {
                if matrix[a * ALPHABET_SIZE + b] != matrix[b * ALPHABET_SIZE + a] {
                    return Err(ConfigurationError::AsymmetricMatrix { a, b });
                }
            }
        }
        if gap_open < 0 || gap_extend < 0 {
            return Err(ConfigurationError::NegativeGapPenalty {
                open: gap_open,
                extend: gap_extend,
            });
        }
        Ok(Self {
            matrix: matrix.iter().map(|&v| v as i32).collect(),
            gap_open,
            gap_extend,
        })
    }

    /// The default protein model: BLOSUM62 with the given gap penalties.
    pub fn blosum62(gap_open: i32, gap_extend: i32) -> Result<Self, ConfigurationError> {
        Self::new(&BLOSUM62, gap_open, gap_extend)
    }

    /// Substitution score for two alphabet codes. Codes must be below
    /// ALPHABET_SIZE; the alignment engine validates sequences up front.
    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.matrix[a as usize * ALPHABET_SIZE + b as usize]
    }

    /// Gap-open penalty magnitude.
    #[inline(always)]
    pub fn gap_open(&self) -> i32 {
        self.gap_open
    }

    /// Gap-extend penalty magnitude.
    #[inline(always)]
    pub fn gap_extend(&self) -> i32 {
        self.gap_extend
    }
}
