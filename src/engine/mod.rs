//! Batch comparison orchestration.
//!
//! Runs the per-candidate pipeline (normalize, align, derive metrics,
//! estimate significance) over a rayon worker pool and ranks the surviving
//! records. Candidates are fully independent: the scoring model and the
//! query are shared read-only, everything else is owned per task, so the
//! loop needs no locking.

mod record;

pub use record::{ComparisonRecord, ResultSet};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::align;
use crate::error::{ConfigurationError, EstimationError, SearchError};
use crate::metrics;
use crate::scoring::ScoringModel;
use crate::sequence::Sequence;
use crate::stats;

/// Minimum permitted sample count for the significance test. Below this the
/// p-value resolution is too coarse to rank on.
pub const MIN_SAMPLE_COUNT: usize = 10;

/// Parameters of one comparison run.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Random alignments per candidate. The cost/precision dial: p-value
    /// resolution is `1 / sample_count` and runtime grows linearly with it.
    pub sample_count: usize,
    /// Base seed for significance sampling. Each candidate derives its own
    /// generator from this seed and its batch index, so results never
    /// depend on thread scheduling.
    pub seed: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            sample_count: 100,
            seed: 0,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.sample_count < MIN_SAMPLE_COUNT {
            return Err(ConfigurationError::SampleCountTooLow {
                min: MIN_SAMPLE_COUNT,
                got: self.sample_count,
            });
        }
        Ok(())
    }
}

/// Compare a query against a batch of candidates and rank the results.
///
/// The `progress` hook is invoked after each candidate completes (success or
/// skip) with `(completed, total)`; it is purely observational and never
/// affects ordering or correctness. `cancel` is checked between candidates
/// and between random samples; once set, the run terminates with
/// `SearchError::Cancelled` without waiting for the rest of the batch.
///
/// Per-candidate failures (empty after normalization, alignment error,
/// incomplete significance estimate) are absorbed as skips. Only whole-run
/// conditions terminate: invalid options, an empty query, cancellation, or
/// zero surviving records.
pub fn run_search<P>(
    raw_query: &str,
    raw_candidates: &[String],
    model: &ScoringModel,
    options: &SearchOptions,
    progress: P,
    cancel: &AtomicBool,
) -> Result<ResultSet, SearchError>
where
    P: Fn(usize, usize) + Sync,
{
    options.validate()?;

    let query = Sequence::normalize(raw_query).ok_or(SearchError::InvalidQuery)?;

    let total = raw_candidates.len();
    let completed = AtomicUsize::new(0);

    log::info!(
        "comparing query ({} residues) against {} candidates, {} samples each",
        query.len(),
        total,
        options.sample_count
    );

    let outcomes: Vec<Option<ComparisonRecord>> = raw_candidates
        .par_iter()
        .enumerate()
        .map(|(index, raw)| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let outcome = compare_candidate(&query, raw, index, model, options, cancel);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress(done, total);
            outcome
        })
        .collect();

    if cancel.load(Ordering::Relaxed) {
        return Err(SearchError::Cancelled);
    }

    let records: Vec<ComparisonRecord> = outcomes.into_iter().flatten().collect();
    if records.is_empty() {
        return Err(SearchError::NoValidAlignments {
            skipped: total,
            total,
        });
    }

    let kept = records.len();
    log::info!("{} of {} candidates produced records", kept, total);

    Ok(ResultSet::ranked(records))
}

/// Execute the full pipeline for one candidate. `None` means the candidate
/// was skipped; skips never fail the batch.
fn compare_candidate(
    query: &Sequence,
    raw: &str,
    index: usize,
    model: &ScoringModel,
    options: &SearchOptions,
    cancel: &AtomicBool,
) -> Option<ComparisonRecord> {
    let candidate = match Sequence::normalize(raw) {
        Some(seq) => seq,
        None => {
            log::debug!("candidate {index}: empty after normalization, skipped");
            return None;
        }
    };

    let alignment = match align::align(query, &candidate, model) {
        Ok(a) => a,
        Err(err) => {
            log::debug!("candidate {index}: alignment failed ({err}), skipped");
            return None;
        }
    };

    let derived = metrics::compute(&alignment, query.len());

    let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(index as u64));
    let p_value = match stats::estimate_p_value(
        query,
        candidate.len(),
        model,
        alignment.score,
        options.sample_count,
        &mut rng,
        Some(cancel),
    ) {
        Ok(p) => p,
        Err(EstimationError::Cancelled) => return None,
        Err(err) => {
            log::debug!("candidate {index}: significance estimate failed ({err}), skipped");
            return None;
        }
    };

    Some(ComparisonRecord {
        index,
        identity: derived.identity,
        coverage: derived.coverage,
        combined: derived.combined,
        score: alignment.score,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn model() -> ScoringModel {
        ScoringModel::blosum62(10, 1).unwrap()
    }

    fn options() -> SearchOptions {
        SearchOptions {
            sample_count: 20,
            seed: 7,
        }
    }

    fn no_progress(_done: usize, _total: usize) {}

    #[test]
    fn test_empty_query_fails_before_candidates() {
        let cancel = AtomicBool::new(false);
        let err = run_search(
            "123",
            &["MTSLNLLTDIPGIRVGH".to_string()],
            &model(),
            &options(),
            no_progress,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err, SearchError::InvalidQuery);
    }

    #[test]
    fn test_all_invalid_candidates_is_terminal() {
        let cancel = AtomicBool::new(false);
        let candidates = vec!["".to_string(), "42".to_string(), "juo".to_string()];
        let err = run_search(
            "MTSLNLLTDIPGIRVGH",
            &candidates,
            &model(),
            &options(),
            no_progress,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SearchError::NoValidAlignments {
                skipped: 3,
                total: 3
            }
        );
    }

    #[test]
    fn test_invalid_candidates_are_skipped_not_fatal() {
        let cancel = AtomicBool::new(false);
        let candidates = vec!["???".to_string(), "MTSLNLLTDIPGIRVGH".to_string()];
        let results = run_search(
            "MTSLNLLTDIPGIRVGH",
            &candidates,
            &model(),
            &options(),
            no_progress,
            &cancel,
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.records()[0].index, 1);
    }

    #[test]
    fn test_sample_count_below_minimum_is_rejected() {
        let cancel = AtomicBool::new(false);
        let opts = SearchOptions {
            sample_count: 5,
            seed: 0,
        };
        let err = run_search(
            "MTSLNLLTDIPGIRVGH",
            &["MTSLNLLTDIPGIRVGH".to_string()],
            &model(),
            &opts,
            no_progress,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SearchError::Configuration(ConfigurationError::SampleCountTooLow { min: 10, got: 5 })
        );
    }

    #[test]
    fn test_pre_cancelled_run_terminates() {
        let cancel = AtomicBool::new(true);
        let err = run_search(
            "MTSLNLLTDIPGIRVGH",
            &["MTSLNLLTDIPGIRVGH".to_string()],
            &model(),
            &options(),
            no_progress,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
    }

    #[test]
    fn test_progress_reports_every_candidate() {
        let cancel = AtomicBool::new(false);
        let seen = Mutex::new(Vec::new());
        let candidates = vec![
            "MTSLNLLTDIPGIRVGH".to_string(),
            "".to_string(),
            "MTSLNLLT".to_string(),
        ];
        run_search(
            "MTSLNLLTDIPGIRVGH",
            &candidates,
            &model(),
            &options(),
            |done, total| seen.lock().unwrap().push((done, total)),
            &cancel,
        )
        .unwrap();
        let mut calls = seen.into_inner().unwrap();
        calls.sort();
        // Skips report progress too; completion counts cover 1..=3.
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_results_are_deterministic_across_runs() {
        let candidates = vec![
            "MTSLNLLTDIPGIRVGH".to_string(),
            "MTSLNLLTDIP".to_string(),
            "HGVRIGPIDTLLNLSTM".to_string(),
        ];
        let run = || {
            run_search(
                "MTSLNLLTDIPGIRVGH",
                &candidates,
                &model(),
                &options(),
                no_progress,
                &AtomicBool::new(false),
            )
            .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.records(), second.records());
    }
}
