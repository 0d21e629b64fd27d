use anyhow::{bail, Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};

use blastcloud::{
    read_report_file, read_report_stdin, ChunkBoundary, IdentifierSchema, RecordCollection,
    ReportConfig,
};

/// Group name that selects the simplified record name
const SIMPLE_GROUP: &str = "simple";

/// Identifier field tallied chronologically rather than by frequency
const YEAR_FIELD: &str = "collection_year";

/// blastcloud - Turn NCBI pairwise alignment summaries into a table
///
/// Cuts the report into four-line records (name, Length, Score/Expect,
/// Identities/Gaps) at every line containing the delimiter and writes one
/// tab-separated row per record.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Alignment report, plain or bgzipped (stdin if omitted or "-")
    #[clap(value_name = "REPORT")]
    input: Option<String>,

    /// Text marking the line that ends each record
    #[clap(short = 'd', long = "delimiter")]
    delimiter: String,

    /// The delimiter line starts the next record instead of being skipped
    #[clap(long = "lead-delimiter")]
    lead_delimiter: bool,

    /// Stop after the first record
    #[clap(short = '1', long = "one-result")]
    one_result: bool,

    /// Output TSV file (stdout if not specified)
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Print record counts per identifier field instead of the table:
    /// "simple", variant_name, location, isolate or collection_year
    #[clap(short = 'g', long = "group-by", value_name = "FIELD")]
    group_by: Option<String>,

    /// Quiet mode (warnings and errors only)
    #[clap(long = "quiet", conflicts_with = "verbose")]
    quiet: bool,

    /// Log every parsed record
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        LevelFilter::Warn
    } else if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // RUST_LOG, when set, wins over the flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn group_counts(collection: &RecordCollection, field: &str) -> Result<IndexMap<String, usize>> {
    if field == SIMPLE_GROUP {
        return collection
            .simplified_name_counts()
            .context("Cannot group by simplified name");
    }
    let mut counts = collection
        .field_counts(&IdentifierSchema::rsv(), field)
        .with_context(|| format!("Cannot group by {field}"))?;
    if field == YEAR_FIELD {
        counts.sort_keys();
    }
    Ok(counts)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    if args.delimiter.is_empty() {
        bail!("Chunk delimiter must not be empty");
    }

    let boundary = if args.lead_delimiter {
        ChunkBoundary::Lead
    } else {
        ChunkBoundary::Drop
    };
    let config = ReportConfig::new(&args.delimiter)
        .with_boundary(boundary)
        .with_one_result(args.one_result);

    let collection = match args.input.as_deref() {
        Some(path) if path != "-" => {
            info!("Reading alignment report {path}");
            read_report_file(path, &config)?
        }
        _ => {
            // Nothing piped in: show usage rather than wait on a terminal
            if io::stdin().is_terminal() {
                use clap::CommandFactory;
                Args::command().print_help()?;
                std::process::exit(0);
            }
            read_report_stdin(&config)?
        }
    };

    if collection.is_empty() {
        bail!("No alignment records found (delimiter {:?})", args.delimiter);
    }

    let mut writer: Box<dyn Write> = if let Some(ref path) = args.output {
        let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match args.group_by.as_deref() {
        Some(field) => {
            for (value, count) in group_counts(&collection, field)? {
                writeln!(writer, "{value}\t{count}")?;
            }
        }
        None => {
            let table = collection
                .to_tabular_view()
                .context("Record names must look like <prefix>/<label>/...")?;
            table.write_tsv(&mut writer)?;
            info!("Wrote {} row(s)", table.rows().len());
        }
    }

    writer.flush()?;
    Ok(())
}
