//! # splicehint - spliced alignment boundary scorer
//!
//! Analyzes pairwise gene-to-protein spliced alignments to detect intron
//! and exon boundaries and start/stop codons, and assigns each detected
//! feature a confidence score based on the quality of the surrounding
//! amino-acid alignment. The output is a GFF-like annotation usable as
//! hints for gene-structure prediction tools.
//!
//! ## Overview
//!
//! An alignment block consists of three text tracks: the codons translated
//! from the DNA, the nucleotides themselves (lowercase at splice sites) and
//! the aligned protein. The parser walks the block once, maintaining the
//! intron/exon state, then a kernel-weighted scoring pass rates every
//! complete intron, the start/stop codons and each exon against a
//! substitution matrix.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use splicehint_core::{HintEngine, ScoreMatrix, ScoringConfig};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! let matrix = ScoreMatrix::from_path("blosum62.csv")?;
//! let mut engine = HintEngine::new(ScoringConfig::default(), &matrix);
//!
//! let mut input = BufReader::new(File::open("alignments.ali")?);
//! let mut output = BufWriter::new(File::create("hints.gff")?);
//! let stats = engine.process(&mut input, &mut output)?;
//! println!("{} blocks processed", stats.blocks_processed);
//! # Ok::<(), splicehint_core::SpliceHintError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`alignment`]: block parser and feature-detection state machine
//! - [`kernel`]: weighting kernels for boundary scoring
//! - [`matrix`]: substitution scoring matrix
//! - [`config`]: scoring and emission settings
//! - [`engine`]: streaming parse → score → emit driver
//! - [`output`]: GFF-like hint records
//! - [`types`]: core data types and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, SpliceHintError>`](types::SpliceHintError).
//! A malformed alignment block is not fatal: the engine logs a warning
//! identifying the gene-protein pair and resumes at the next header line.

pub mod alignment;
pub mod config;
pub mod constants;
pub mod engine;
pub mod kernel;
pub mod matrix;
pub mod output;
pub mod types;

pub use alignment::Alignment;
pub use config::ScoringConfig;
pub use engine::{HintEngine, ProcessingStats};
pub use kernel::{Kernel, KernelShape};
pub use matrix::ScoreMatrix;
pub use types::SpliceHintError;
