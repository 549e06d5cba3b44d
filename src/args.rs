use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simsig")]
#[command(version = "0.1.0")]
#[command(about = "Local protein similarity search with empirical significance testing", long_about = None)]
pub struct Args {
    /// Query sequence FASTA (the first record is used)
    #[arg(short, long)]
    pub query: PathBuf,
    /// Candidate sequences FASTA (every record is compared)
    #[arg(short, long)]
    pub candidates: PathBuf,
    /// Random alignments per candidate for the significance test.
    /// Higher values give finer p-value resolution at proportionally
    /// higher cost; minimum 10.
    #[arg(long, default_value_t = 100)]
    pub samples: usize,
    /// Gap-open penalty magnitude
    #[arg(long, default_value_t = 10)]
    pub gap_open: i32,
    /// Gap-extend penalty magnitude
    #[arg(long, default_value_t = 1)]
    pub gap_extend: i32,
    /// Base seed for the significance test's random source
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Worker threads (0 = all available cores)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub num_threads: usize,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Output format: tsv or csv
    #[arg(long, default_value = "tsv")]
    pub outfmt: String,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}
