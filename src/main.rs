use anyhow::{bail, Context, Result};
use bio::io::fasta;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::AtomicBool;

use simsig::args::Args;
use simsig::engine::{self, SearchOptions};
use simsig::report::{self, ReportFormat};
use simsig::scoring::ScoringModel;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "info" } else { "warn" }),
    )
    .init();

    let num_threads = if args.num_threads == 0 {
        num_cpus::get()
    } else {
        args.num_threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to build thread pool")?;

    let format = match ReportFormat::from_name(&args.outfmt) {
        Some(f) => f,
        None => bail!("unsupported output format: {} (expected tsv or csv)", args.outfmt),
    };

    let model = ScoringModel::blosum62(args.gap_open, args.gap_extend)
        .context("invalid scoring configuration")?;

    let (query, candidates, ids) = read_sequences(&args)?;
    log::info!(
        "loaded query ({} chars) and {} candidates",
        query.len(),
        candidates.len()
    );

    let bar = ProgressBar::new(candidates.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );

    let options = SearchOptions {
        sample_count: args.samples,
        seed: args.seed,
    };
    let cancel = AtomicBool::new(false);
    let results = engine::run_search(
        &query,
        &candidates,
        &model,
        &options,
        |_done, _total| bar.inc(1),
        &cancel,
    )?;
    bar.finish_and_clear();

    log::info!("{} of {} candidates ranked", results.len(), candidates.len());
    report::write_report(&results, &ids, format, args.out.as_ref())?;
    Ok(())
}

/// Read the query (first record) and the candidate batch from FASTA.
/// Candidate batch indices follow file order; ids are the first whitespace
/// token of each record header.
fn read_sequences(args: &Args) -> Result<(String, Vec<String>, Vec<String>)> {
    let query_reader = fasta::Reader::from_file(&args.query)
        .with_context(|| format!("cannot open query file {}", args.query.display()))?;
    let query = query_reader
        .records()
        .filter_map(|r| r.ok())
        .next()
        .map(|r| String::from_utf8_lossy(r.seq()).into_owned())
        .context("query file contains no sequence records")?;

    let candidate_reader = fasta::Reader::from_file(&args.candidates)
        .with_context(|| format!("cannot open candidates file {}", args.candidates.display()))?;
    let mut candidates = Vec::new();
    let mut ids = Vec::new();
    for record in candidate_reader.records().filter_map(|r| r.ok()) {
        ids.push(
            record
                .id()
                .split_whitespace()
                .next()
                .unwrap_or("unknown")
                .to_string(),
        );
        candidates.push(String::from_utf8_lossy(record.seq()).into_owned());
    }
    Ok((query, candidates, ids))
}
