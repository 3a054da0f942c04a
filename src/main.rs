use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use genoclean::{
    config::CleanOptions,
    process::{split::split_str_files, utils::expand_inputs},
    report::{write_run_record, RunRecord},
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "genoclean",
    version,
    about = "Drop blank columns/rows from genotype tables and split off sentinel-only rows"
)]
struct Args {
    /// Input files or glob patterns (e.g. "data/*.str")
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Directory for the `.drop` and `.sentinel` outputs
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// YAML options file (sentinel, id_columns, delimiter)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Placeholder meaning "no data"; overrides the options file
    #[arg(long, allow_hyphen_values = true)]
    sentinel: Option<String>,

    /// Leading identifier columns ignored by the sentinel check
    #[arg(long)]
    id_columns: Option<usize>,

    /// Write a JSON record of the run here
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    let processing_start = Utc::now();

    let mut opts = match &args.config {
        Some(path) => CleanOptions::from_yaml_file(path)?,
        None => CleanOptions::default(),
    };
    if let Some(sentinel) = args.sentinel {
        opts.sentinel = sentinel;
    }
    if let Some(id_columns) = args.id_columns {
        opts.id_columns = id_columns;
    }

    let inputs = expand_inputs(&args.inputs)?;
    info!(
        files = inputs.len(),
        sentinel = %opts.sentinel,
        id_columns = opts.id_columns,
        "cleaning"
    );

    let files = split_str_files(&inputs, &args.out_dir, &opts)?;
    let record = RunRecord {
        processing_start,
        processing_end: Utc::now(),
        options: opts,
        files,
    };
    info!(
        kept = record.total_kept(),
        sentinel = record.total_sentinel(),
        "all done"
    );

    if let Some(path) = &args.summary {
        write_run_record(path, &record)?;
        info!("wrote run record {}", path.display());
    }
    Ok(())
}
