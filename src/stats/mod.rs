//! Empirical significance statistics.

pub mod pvalue;

pub use pvalue::*;
