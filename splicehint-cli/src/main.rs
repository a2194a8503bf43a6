//! # splicehint CLI
//!
//! Command-line interface for scoring intron/exon boundaries in spliced
//! gene-to-protein alignments.
//!
//! ## Usage
//!
//! ```bash
//! # Score alignments from a file
//! splicehint -i alignments.ali -s blosum62.csv -o hints.gff
//!
//! # Read from stdin with a wider box-kernel window
//! spaln ... | splicehint -s blosum62.csv -o hints.gff -w 20 -k box
//!
//! # Keep weakly supported exons
//! splicehint -i alignments.ali -s blosum62.csv -o hints.gff -e 0
//! ```
//!
//! ## Options
//!
//! - `-i, --input <FILE>`: Input alignment file (default: stdin)
//! - `-o, --output <FILE>`: Output GFF file
//! - `-s, --matrix <FILE>`: Substitution scoring matrix
//! - `-w, --window <WIDTH>`: Scoring window width in codons (default: 10)
//! - `-k, --kernel <KERNEL>`: box, triangular, parabolic or triweight
//! - `-e, --min-exon-score <SCORE>`: Minimum exon score (default: 25)
//! - `-x, --min-initial-exon-score <SCORE>`: Minimum initial-exon score
//! - `-n, --min-initial-intron-score <SCORE>`: Minimum initial-intron score
//! - `--no-reverse`: Skip alignments on the reverse strand
//! - `-q, --quiet`: Only log warnings

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use clap::{Arg, ArgAction, Command};
use splicehint_core::{HintEngine, KernelShape, ScoreMatrix, ScoringConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("splicehint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scores intron/exon boundaries in spliced protein alignments")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Input alignment file (default: stdin)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .required(true)
                .help("Output GFF file"),
        )
        .arg(
            Arg::new("matrix")
                .short('s')
                .long("matrix")
                .value_name("FILE")
                .required(true)
                .help("Substitution scoring matrix in csv format"),
        )
        .arg(
            Arg::new("window")
                .short('w')
                .long("window")
                .value_name("WIDTH")
                .default_value("10")
                .help("Width of the scoring window around boundaries, in codons"),
        )
        .arg(
            Arg::new("kernel")
                .short('k')
                .long("kernel")
                .value_name("KERNEL")
                .default_value("triangular")
                .help("Weighting kernel: box, triangular, parabolic or triweight"),
        )
        .arg(
            Arg::new("min-exon-score")
                .short('e')
                .long("min-exon-score")
                .value_name("SCORE")
                .default_value("25")
                .help(
                    "Minimum exon score; exons scoring lower are not printed, nor are \
                     introns bordering them or starts/stops inside them",
                ),
        )
        .arg(
            Arg::new("min-initial-exon-score")
                .short('x')
                .long("min-initial-exon-score")
                .value_name("SCORE")
                .default_value("0")
                .help("Minimum score of the exon owning a start codon"),
        )
        .arg(
            Arg::new("min-initial-intron-score")
                .short('n')
                .long("min-initial-intron-score")
                .value_name("SCORE")
                .default_value("0")
                .help("Minimum score of the intron bordering the start codon's exon"),
        )
        .arg(
            Arg::new("no-reverse")
                .long("no-reverse")
                .action(ArgAction::SetTrue)
                .help("Skip alignments on the reverse strand"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log warnings"),
        )
        .get_matches();

    // Initialize tracing subscriber
    let quiet = matches.get_flag("quiet");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let window_width: usize = matches
        .get_one::<String>("window")
        .unwrap()
        .parse()
        .map_err(|_| "Invalid window width")?;
    let kernel_shape: KernelShape = matches.get_one::<String>("kernel").unwrap().parse()?;
    let min_exon_score: f64 = matches
        .get_one::<String>("min-exon-score")
        .unwrap()
        .parse()
        .map_err(|_| "Invalid minimum exon score")?;
    let min_initial_exon_score: f64 = matches
        .get_one::<String>("min-initial-exon-score")
        .unwrap()
        .parse()
        .map_err(|_| "Invalid minimum initial-exon score")?;
    let min_initial_intron_score: f64 = matches
        .get_one::<String>("min-initial-intron-score")
        .unwrap()
        .parse()
        .map_err(|_| "Invalid minimum initial-intron score")?;

    // A matrix or configuration problem is fatal before any block is read
    let matrix_path = matches.get_one::<String>("matrix").unwrap();
    let matrix = ScoreMatrix::from_path(matrix_path)?;

    let config = ScoringConfig {
        window_width,
        kernel_shape,
        min_exon_score,
        min_initial_exon_score,
        min_initial_intron_score,
        process_reverse: !matches.get_flag("no-reverse"),
    };
    let mut engine = HintEngine::new(config, &matrix);

    let output_path = matches.get_one::<String>("output").unwrap();
    let mut writer = BufWriter::new(File::create(output_path)?);
    let stats = match matches.get_one::<String>("input") {
        Some(input_path) => {
            let mut reader = BufReader::new(File::open(input_path)?);
            engine.process(&mut reader, &mut writer)?
        }
        None => engine.process(&mut io::stdin().lock(), &mut writer)?,
    };
    writer.flush()?;

    tracing::info!(
        blocks = stats.blocks_processed,
        skipped = stats.blocks_skipped,
        reverse_skipped = stats.reverse_skipped,
        features = stats.features_emitted,
        "splicehint: processing complete"
    );

    Ok(())
}
