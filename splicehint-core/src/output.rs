//! GFF-like hint emission.
//!
//! One tab-separated record per feature that passes the configured score
//! thresholds:
//!
//! ```text
//! <gene>\t<source>\t<type>\t<start>\t<end>\t.\t<strand>\t.\tprot=<protein>; <attributes>;
//! ```
//!
//! Reverse-strand features report their genomic start/end fields in swapped
//! (end, start) column order, which keeps start <= end in the output.

use std::io::Write;

use bio::bio_types::strand::Strand;

use crate::alignment::Alignment;
use crate::config::ScoringConfig;
use crate::constants::{CODON_LENGTH, SOURCE_TAG};
use crate::types::{Codon, SpliceHintError};

/// Writes the records of every qualifying feature in the alignment.
///
/// An exon is emitted only if its own score meets the minimum; a complete
/// intron only if both bordering exons do; a stop codon only if its owning
/// exon does. A start codon additionally honors the initial-exon and
/// initial-intron thresholds. Returns the number of records written.
///
/// # Errors
///
/// Returns [`SpliceHintError::Io`] if the writer fails.
pub fn write_hints<W: Write>(
    writer: &mut W,
    alignment: &Alignment,
    config: &ScoringConfig,
) -> Result<usize, SpliceHintError> {
    let mut written = 0;

    for (number, intron) in alignment.introns().iter().enumerate() {
        if !intron.complete {
            continue;
        }
        let (left, right) = match (intron.left_exon, intron.right_exon) {
            (Some(left), Some(right)) => (&alignment.exons()[left], &alignment.exons()[right]),
            _ => continue,
        };
        if left.score < config.min_exon_score || right.score < config.min_exon_score {
            continue;
        }
        let attributes = format!(
            "intron_id={}; splice_sites={}; al_score={}; LeScore={}; ReScore={};",
            number + 1,
            intron.splice_sites(),
            format_score(intron.score),
            format_score(left.score),
            format_score(right.score)
        );
        write_record(writer, alignment, "Intron", intron.start, intron.end, &attributes)?;
        written += 1;
    }

    if let Some(codon) = alignment.start_codon() {
        if start_codon_passes(alignment, codon, config) {
            written += write_codon(writer, alignment, codon)?;
        }
    }
    if let Some(codon) = alignment.stop_codon() {
        if owning_exon_score(alignment, codon).is_some_and(|score| score >= config.min_exon_score) {
            written += write_codon(writer, alignment, codon)?;
        }
    }

    for (number, exon) in alignment.exons().iter().enumerate() {
        if exon.score < config.min_exon_score {
            continue;
        }
        let attributes = format!(
            "exon_id={}; eScore={};",
            number + 1,
            format_score(exon.score)
        );
        write_record(writer, alignment, "CDS", exon.start, exon.end, &attributes)?;
        written += 1;
    }

    Ok(written)
}

fn owning_exon_score(alignment: &Alignment, codon: &Codon) -> Option<f64> {
    codon.exon.map(|id| alignment.exons()[id].score)
}

/// A start codon is trustworthy only if its exon aligns well and the intron
/// bordering that exon, when there is one, looks real too.
fn start_codon_passes(alignment: &Alignment, codon: &Codon, config: &ScoringConfig) -> bool {
    let Some(owner) = codon.exon else {
        return false;
    };
    let score = alignment.exons()[owner].score;
    if score < config.min_exon_score || score < config.min_initial_exon_score {
        return false;
    }
    if let Some(intron) = alignment
        .introns()
        .iter()
        .find(|intron| intron.complete && intron.left_exon == Some(owner))
    {
        if intron.score < config.min_initial_intron_score {
            return false;
        }
    }
    true
}

fn write_codon<W: Write>(
    writer: &mut W,
    alignment: &Alignment,
    codon: &Codon,
) -> Result<usize, SpliceHintError> {
    let exon_score = owning_exon_score(alignment, codon).unwrap_or(0.0);
    let attributes = format!(
        "al_score={}; eScore={};",
        format_score(codon.score),
        format_score(exon_score)
    );
    write_record(
        writer,
        alignment,
        codon.kind.feature_type(),
        codon.position,
        codon.position + CODON_LENGTH - 1,
        &attributes,
    )?;
    Ok(1)
}

fn write_record<W: Write>(
    writer: &mut W,
    alignment: &Alignment,
    feature_type: &str,
    start_column: usize,
    end_column: usize,
    attributes: &str,
) -> Result<(), SpliceHintError> {
    let pairs = alignment.pairs();
    let first = pairs[start_column].real_position;
    let second = pairs[end_column].real_position;
    let (start, end, strand) = match alignment.strand() {
        Strand::Reverse => (second, first, '-'),
        _ => (first, second, '+'),
    };
    writeln!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t.\t{}\t.\tprot={}; {}",
        alignment.gene(),
        SOURCE_TAG,
        feature_type,
        start,
        end,
        strand,
        alignment.protein(),
        attributes
    )?;
    Ok(())
}

/// Fixed-notation score with trailing zeros trimmed.
fn format_score(score: f64) -> String {
    let mut text = format!("{score:.6}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::fixtures::{parsed, two_exon_alignment, TOY_MATRIX};
    use crate::kernel::{Kernel, KernelShape};
    use crate::matrix::ScoreMatrix;

    fn scored_fixture(header: &str) -> Alignment {
        let mut alignment = parsed(
            header,
            " M  K         F  * ",
            "ATGAAGgtcccagTTTTAA",
            " M  K         F  - ",
            100,
            1,
        );
        let matrix = ScoreMatrix::from_reader(TOY_MATRIX.as_bytes()).unwrap();
        let kernel = Kernel::new(KernelShape::Box, 2);
        alignment.score_exons(&matrix);
        alignment.score_introns(&kernel, &matrix);
        alignment.score_codons(&kernel, &matrix);
        alignment
    }

    fn permissive() -> ScoringConfig {
        ScoringConfig {
            min_exon_score: 0.0,
            ..Default::default()
        }
    }

    fn hints(alignment: &Alignment, config: &ScoringConfig) -> (String, usize) {
        let mut buffer = Vec::new();
        let written = write_hints(&mut buffer, alignment, config).unwrap();
        (String::from_utf8(buffer).unwrap(), written)
    }

    #[test]
    fn test_forward_emission() {
        let alignment = scored_fixture(">g1 >p1");
        let (text, written) = hints(&alignment, &permissive());
        let expected = "\
g1\tsplicehint\tIntron\t106\t112\t.\t+\t.\tprot=p1; intron_id=1; splice_sites=gt_ag; al_score=0.552771; LeScore=11; ReScore=4;
g1\tsplicehint\tstart_codon\t100\t102\t.\t+\t.\tprot=p1; al_score=0.416667; eScore=11;
g1\tsplicehint\tstop_codon\t116\t118\t.\t+\t.\tprot=p1; al_score=0.5; eScore=4;
g1\tsplicehint\tCDS\t100\t105\t.\t+\t.\tprot=p1; exon_id=1; eScore=11;
g1\tsplicehint\tCDS\t113\t118\t.\t+\t.\tprot=p1; exon_id=2; eScore=4;
";
        assert_eq!(text, expected);
        assert_eq!(written, 5);
    }

    #[test]
    fn test_reverse_emission_swaps_coordinates() {
        let alignment = scored_fixture(">g1 >p1 (reverse)");
        let (text, _) = hints(&alignment, &permissive());
        let expected = "\
g1\tsplicehint\tIntron\t88\t94\t.\t-\t.\tprot=p1; intron_id=1; splice_sites=gt_ag; al_score=0.552771; LeScore=11; ReScore=4;
g1\tsplicehint\tstart_codon\t98\t100\t.\t-\t.\tprot=p1; al_score=0.416667; eScore=11;
g1\tsplicehint\tstop_codon\t82\t84\t.\t-\t.\tprot=p1; al_score=0.5; eScore=4;
g1\tsplicehint\tCDS\t95\t100\t.\t-\t.\tprot=p1; exon_id=1; eScore=11;
g1\tsplicehint\tCDS\t82\t87\t.\t-\t.\tprot=p1; exon_id=2; eScore=4;
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_low_scoring_exon_suppresses_dependent_features() {
        let alignment = scored_fixture(">g1 >p1");
        // The downstream exon scores 4; everything referencing it must
        // disappear, while the unrelated upstream exon still prints
        let config = ScoringConfig {
            min_exon_score: 5.0,
            ..Default::default()
        };
        let (text, written) = hints(&alignment, &config);
        assert_eq!(written, 2);
        assert!(!text.contains("\tIntron\t"));
        assert!(!text.contains("stop_codon"));
        assert!(!text.contains("exon_id=2"));
        assert!(text.contains("start_codon"));
        assert!(text.contains("exon_id=1"));
    }

    #[test]
    fn test_initial_exon_threshold_gates_start_codon_only() {
        let alignment = scored_fixture(">g1 >p1");
        let config = ScoringConfig {
            min_exon_score: 0.0,
            min_initial_exon_score: 20.0,
            ..Default::default()
        };
        let (text, written) = hints(&alignment, &config);
        assert_eq!(written, 4);
        assert!(!text.contains("start_codon"));
        assert!(text.contains("\tIntron\t"));
        assert!(text.contains("stop_codon"));
    }

    #[test]
    fn test_initial_intron_threshold_gates_start_codon() {
        let alignment = scored_fixture(">g1 >p1");
        let config = ScoringConfig {
            min_exon_score: 0.0,
            min_initial_intron_score: 0.9,
            ..Default::default()
        };
        let (text, _) = hints(&alignment, &config);
        assert!(!text.contains("start_codon"));
        assert!(text.contains("\tIntron\t"));
    }

    #[test]
    fn test_incomplete_intron_is_never_emitted() {
        let mut alignment = parsed(
            ">g1 >p1",
            " M  K         F  * ",
            "ATGAAGgt-ccagTTTTAA",
            " M  K         F  - ",
            100,
            1,
        );
        let matrix = ScoreMatrix::from_reader(TOY_MATRIX.as_bytes()).unwrap();
        let kernel = Kernel::new(KernelShape::Box, 2);
        alignment.score_exons(&matrix);
        alignment.score_introns(&kernel, &matrix);
        let (text, _) = hints(&alignment, &permissive());
        assert!(!text.contains("\tIntron\t"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.5), "0.5");
        assert_eq!(format_score(11.0), "11");
        assert_eq!(format_score(0.552770798), "0.552771");
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(-2.25), "-2.25");
    }
}
