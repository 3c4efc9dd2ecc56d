//! A binary to check that a feature file is well-formed.
//!
//! ```shell
//! cargo run --bin=gff-check --features=binaries annotations.gff3.gz
//! ```
//!
//! The file is parsed in full; every problem is reported with its line
//! number, and the exit status reflects whether any were found. With
//! `--counts`, features are built and per-source totals are printed as
//! well.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use featurefile::core::Version;
use featurefile::feature::Block;
use featurefile::parser;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Checks a feature file for problems.
#[derive(Parser)]
struct Args {
    /// The feature file to check (gzip is detected from the `.gz`
    /// extension).
    path: PathBuf,

    /// The format version assumed when the file declares none.
    #[arg(long, default_value = "3")]
    gff_version: String,

    /// Halt on the first problem instead of collecting all of them.
    #[arg(short, long, default_value_t = false)]
    strict: bool,

    /// Validate the type column against the ontology table.
    #[arg(long, default_value_t = false)]
    so_compliant: bool,

    /// Build features and print per-source totals, rather than only
    /// validating syntax.
    #[arg(long, default_value_t = false)]
    counts: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Parses the file and reports what was found. Returns whether the file
/// was free of problems.
fn check(args: &Args) -> Result<bool> {
    let version = args.gff_version.parse::<Version>()?;

    let mut reader = featurefile::reader::open(&args.path)
        .with_context(|| format!("opening {}", args.path.display()))?;

    let mut parser = parser::Parser::builder()
        .version(version)
        .parse_only(!args.counts)
        .stop_on_error(args.strict)
        .so_compliant(args.so_compliant)
        .build();

    let fed = reader
        .feed(&mut parser)
        .with_context(|| format!("parsing {}", args.path.display()))?;

    info!(
        lines = fed,
        filtered = parser.filtered(),
        problems = parser.errors().len(),
        "parse complete"
    );

    if args.counts {
        let mut block = Block::new("");
        parser
            .take_features(&mut block)
            .context("collecting features")?;

        for set in block.sets() {
            println!("{}\t{}", set.source(), set.len());
        }
    }

    for record in parser.errors() {
        eprintln!("{record}");
    }

    Ok(parser.errors().is_empty())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    if !check(&args)? {
        std::process::exit(1);
    }

    Ok(())
}
