//! Streaming driver for the parse → score → emit cycle.

use std::io::{BufRead, Write};

use bio::bio_types::strand::Strand;

use crate::alignment::Alignment;
use crate::config::ScoringConfig;
use crate::kernel::Kernel;
use crate::matrix::ScoreMatrix;
use crate::output::write_hints;
use crate::types::SpliceHintError;

/// Counters describing one processing run.
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    /// Blocks parsed, scored and emitted
    pub blocks_processed: usize,
    /// Malformed blocks skipped with a warning
    pub blocks_skipped: usize,
    /// Reverse-strand blocks dropped by configuration
    pub reverse_skipped: usize,
    /// Feature records written
    pub features_emitted: usize,
}

/// Drives the full cycle over a stream of alignment blocks.
///
/// One reusable [`Alignment`] instance is processed to completion before the
/// next block is started; the scoring matrix is shared read-only across all
/// blocks and the kernel is configured once from the [`ScoringConfig`].
///
/// # Examples
///
/// ```rust,no_run
/// use splicehint_core::{HintEngine, ScoreMatrix, ScoringConfig};
/// use std::fs::File;
/// use std::io::{BufReader, BufWriter};
///
/// let matrix = ScoreMatrix::from_path("blosum62.csv")?;
/// let mut engine = HintEngine::new(ScoringConfig::default(), &matrix);
///
/// let mut input = BufReader::new(File::open("alignments.ali")?);
/// let mut output = BufWriter::new(File::create("hints.gff")?);
/// let stats = engine.process(&mut input, &mut output)?;
/// println!("{} features from {} blocks", stats.features_emitted, stats.blocks_processed);
/// # Ok::<(), splicehint_core::SpliceHintError>(())
/// ```
pub struct HintEngine<'a> {
    config: ScoringConfig,
    matrix: &'a ScoreMatrix,
    kernel: Kernel,
    alignment: Alignment,
}

impl<'a> HintEngine<'a> {
    /// Creates an engine with the given configuration and scoring matrix.
    #[must_use]
    pub fn new(config: ScoringConfig, matrix: &'a ScoreMatrix) -> Self {
        let kernel = Kernel::new(config.kernel_shape, config.window_width);
        Self {
            config,
            matrix,
            kernel,
            alignment: Alignment::new(),
        }
    }

    /// Processes every alignment block in `input`, writing hint records to
    /// `output`.
    ///
    /// Any line beginning with `>` starts a block. A malformed block is
    /// reported as a warning and abandoned; scanning resumes at the next
    /// header line.
    ///
    /// # Errors
    ///
    /// Only I/O failures are fatal and returned as [`SpliceHintError::Io`].
    pub fn process<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<ProcessingStats, SpliceHintError> {
        let mut stats = ProcessingStats::default();
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let header = line.trim_end_matches(['\r', '\n']);
            if !header.starts_with('>') {
                continue;
            }
            match self.alignment.parse(header, input) {
                Ok(()) => {
                    if self.alignment.strand() == Strand::Reverse && !self.config.process_reverse {
                        stats.reverse_skipped += 1;
                        continue;
                    }
                    self.alignment.score_exons(self.matrix);
                    self.alignment.score_introns(&self.kernel, self.matrix);
                    self.alignment.score_codons(&self.kernel, self.matrix);
                    stats.features_emitted += write_hints(output, &self.alignment, &self.config)?;
                    stats.blocks_processed += 1;
                }
                Err(SpliceHintError::Io(err)) => return Err(SpliceHintError::Io(err)),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping alignment block");
                    stats.blocks_skipped += 1;
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::fixtures::{block, TOY_MATRIX};
    use crate::kernel::KernelShape;

    fn toy_matrix() -> ScoreMatrix {
        ScoreMatrix::from_reader(TOY_MATRIX.as_bytes()).unwrap()
    }

    fn test_config() -> ScoringConfig {
        ScoringConfig {
            window_width: 2,
            kernel_shape: KernelShape::Box,
            min_exon_score: 0.0,
            ..Default::default()
        }
    }

    fn two_exon_block(header: &str) -> String {
        block(
            header,
            " M  K         F  * ",
            "ATGAAGgtcccagTTTTAA",
            " M  K         F  - ",
            100,
            1,
        )
    }

    #[test]
    fn test_process_single_block() {
        let matrix = toy_matrix();
        let mut engine = HintEngine::new(test_config(), &matrix);
        let input = two_exon_block(">g1 >p1");
        let mut output = Vec::new();
        let stats = engine.process(&mut input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats.blocks_processed, 1);
        assert_eq!(stats.blocks_skipped, 0);
        assert_eq!(stats.features_emitted, 5);

        let text = String::from_utf8(output).unwrap();
        let expected = "\
g1\tsplicehint\tIntron\t106\t112\t.\t+\t.\tprot=p1; intron_id=1; splice_sites=gt_ag; al_score=0.552771; LeScore=11; ReScore=4;
g1\tsplicehint\tstart_codon\t100\t102\t.\t+\t.\tprot=p1; al_score=0.416667; eScore=11;
g1\tsplicehint\tstop_codon\t116\t118\t.\t+\t.\tprot=p1; al_score=0.5; eScore=4;
g1\tsplicehint\tCDS\t100\t105\t.\t+\t.\tprot=p1; exon_id=1; eScore=11;
g1\tsplicehint\tCDS\t113\t118\t.\t+\t.\tprot=p1; exon_id=2; eScore=4;
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_malformed_block_is_skipped_and_stream_continues() {
        let matrix = toy_matrix();
        let mut engine = HintEngine::new(test_config(), &matrix);
        let mut input = String::from(">broken_header_without_protein\nsome text\n");
        input.push_str(&two_exon_block(">g2 >p2"));
        let mut output = Vec::new();
        let stats = engine.process(&mut input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats.blocks_skipped, 1);
        assert_eq!(stats.blocks_processed, 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("g2\t"));
        assert!(!text.contains("broken_header_without_protein"));
    }

    #[test]
    fn test_reverse_blocks_are_dropped_when_configured() {
        let matrix = toy_matrix();
        let config = ScoringConfig {
            process_reverse: false,
            ..test_config()
        };
        let mut engine = HintEngine::new(config, &matrix);
        let mut input = two_exon_block(">g1 >p1 (reverse)");
        input.push_str(&two_exon_block(">g2 >p2"));
        let mut output = Vec::new();
        let stats = engine.process(&mut input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats.reverse_skipped, 1);
        assert_eq!(stats.blocks_processed, 1);
        let text = String::from_utf8(output).unwrap();
        assert!(!text.contains("g1\t"));
        assert!(text.contains("g2\t"));
    }

    #[test]
    fn test_empty_stream() {
        let matrix = toy_matrix();
        let mut engine = HintEngine::new(test_config(), &matrix);
        let mut output = Vec::new();
        let stats = engine.process(&mut "".as_bytes(), &mut output).unwrap();
        assert_eq!(stats.blocks_processed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_two_blocks_reuse_one_alignment() {
        let matrix = toy_matrix();
        let mut engine = HintEngine::new(test_config(), &matrix);
        let mut input = two_exon_block(">g1 >p1");
        input.push_str(&two_exon_block(">g2 >p2"));
        let mut output = Vec::new();
        let stats = engine.process(&mut input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats.blocks_processed, 2);
        assert_eq!(stats.features_emitted, 10);
        let text = String::from_utf8(output).unwrap();
        // Intron numbering restarts per alignment
        assert_eq!(text.matches("intron_id=1;").count(), 2);
    }
}
