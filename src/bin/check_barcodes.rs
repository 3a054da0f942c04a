// src/bin/check_barcodes.rs

use anyhow::Result;
use clap::Parser;
use genoclean::compare::{
    compare_tables, load_labelled_table, save_comparison, CompareOptions, MergedRow,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "check_barcodes",
    about = "Join before/after plate tables on well and list sample mismatches"
)]
struct Args {
    /// CSV with the original well → sample layout
    before: PathBuf,

    /// CSV with the layout to check against
    after: PathBuf,

    /// Column joining the two tables
    #[arg(long, default_value = "Well")]
    key: String,

    /// Column whose values must agree
    #[arg(long, default_value = "Sample")]
    compare: String,

    /// Write the mismatched rows as CSV
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// With --out, write every joined row instead of only mismatches
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let args = Args::parse();
    let opts = CompareOptions {
        key_column: args.key,
        compare_column: args.compare,
    };

    let before = load_labelled_table(&args.before)?;
    let after = load_labelled_table(&args.after)?;
    info!(
        rows = before.num_rows(),
        columns = before.num_columns(),
        "before"
    );
    info!(
        rows = after.num_rows(),
        columns = after.num_columns(),
        "after"
    );

    let cmp = compare_tables(&before, &after, &opts)?;
    if !cmp.row_counts_match() {
        warn!(
            before = cmp.before_rows,
            after = cmp.after_rows,
            "row counts differ; the tables may not cover the same {} values",
            opts.key_column
        );
    }
    if !cmp.before_only.is_empty() {
        warn!("only in before: {}", cmp.before_only.join(", "));
    }
    if !cmp.after_only.is_empty() {
        warn!("only in after: {}", cmp.after_only.join(", "));
    }

    let mismatches: Vec<&MergedRow> = cmp.mismatches().collect();
    info!(
        joined = cmp.rows.len(),
        mismatched = mismatches.len(),
        "compared {}",
        opts.compare_column
    );

    if mismatches.is_empty() {
        println!("All {} joined rows match.", cmp.rows.len());
    } else {
        println!(
            "{: <10} {: <20} {: <20}",
            opts.key_column, "before", "after"
        );
        for row in &mismatches {
            println!("{: <10} {: <20} {: <20}", row.key, row.before, row.after);
        }
    }

    if let Some(path) = &args.out {
        if args.all {
            let rows: Vec<&MergedRow> = cmp.rows.iter().collect();
            save_comparison(path, &rows, &opts)?;
        } else {
            save_comparison(path, &mismatches, &opts)?;
        }
        info!("wrote {}", path.display());
    }
    Ok(())
}
