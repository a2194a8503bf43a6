use std::fmt;

use thiserror::Error;

use crate::constants::GAP;
use crate::matrix::ScoreMatrix;

/// Index of an [`Exon`] inside an alignment's exon arena.
///
/// Introns and codons refer to their bordering/owning exons through these
/// indices rather than pointers, so clearing or reallocating the arena can
/// never leave a dangling reference.
pub type ExonId = usize;

/// Error types that can occur while parsing alignments or loading
/// configuration inputs.
#[derive(Error, Debug)]
pub enum SpliceHintError {
    /// Header line did not contain parsable gene and protein names
    #[error("invalid alignment header: {0}")]
    HeaderFormat(String),
    /// Stream ended before the ALIGNMENT marker line
    #[error("alignment is missing after header of {gene}-{protein}")]
    MissingAlignment { gene: String, protein: String },
    /// One of the three content lines was missing, too short, or of
    /// inconsistent length
    #[error("corrupted alignment {gene}-{protein}: {reason}")]
    BlockLength {
        gene: String,
        protein: String,
        reason: String,
    },
    /// Unreadable or malformed scoring-matrix file
    #[error("invalid scoring matrix: {0}")]
    MatrixFile(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of a single alignment column.
///
/// Decided once, at construction of the [`AlignedPair`], from the local
/// nucleotide character and the current intron state, and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Exon column (uppercase nucleotide, or a gap outside an intron run)
    Exon,
    /// Intron column (lowercase nucleotide, or a gap inside an intron run)
    Intron,
}

impl PairKind {
    /// Single-character code used in debug dumps ('e'/'i')
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Exon => 'e',
            Self::Intron => 'i',
        }
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One column of the three-line alignment block.
///
/// The translated-codon and protein tracks are stored as printed by the
/// aligner: the amino-acid letter sits at the middle base of its codon and
/// the flanking bases hold spaces, which are later replaced by the phase
/// markers '1' and '3' where a codon is split or truncated.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    /// Nucleotide character; lowercase inside introns, '-' for gaps
    pub nucleotide: char,
    /// Amino acid implied by the DNA codon, a phase marker, or a space
    pub translated_codon: char,
    /// Aligned protein residue, a phase marker, or a space
    pub protein: char,
    /// Exon/intron classification of this column
    pub kind: PairKind,
    /// Genomic position of this column relative to the gene start; gap
    /// columns carry the position of the next unconsumed base
    pub real_position: i64,
}

impl AlignedPair {
    /// Saves one column and classifies it as exon or intron.
    ///
    /// A column is an intron column if its nucleotide is lowercase, or if it
    /// is a gap while an intron run is open.
    #[must_use]
    pub fn new(translated_codon: char, nucleotide: char, protein: char, inside_intron: bool) -> Self {
        let kind = if nucleotide.is_ascii_lowercase() || (inside_intron && nucleotide == GAP) {
            PairKind::Intron
        } else {
            PairKind::Exon
        };

        let translated_codon = match translated_codon {
            // A translated stop is treated as a plain mismatching residue
            '*' => 'A',
            // Spaln occasionally emits J for S
            'J' => 'S',
            other => other,
        };

        Self {
            nucleotide,
            translated_codon,
            protein,
            kind,
            real_position: 0,
        }
    }

    /// Substitution score of this column's translated codon against the
    /// aligned protein residue.
    #[must_use]
    pub fn substitution_score(&self, matrix: &ScoreMatrix) -> f64 {
        matrix.score(self.translated_codon, self.protein)
    }
}

/// Returns true if the character is an amino-acid letter or a gap.
pub(crate) fn gap_or_aa(c: char) -> bool {
    c.is_ascii_uppercase() || c == GAP
}

/// A maximal run of exon columns.
///
/// Opened when the state machine leaves an intron (or at the first real
/// exon column of the block), closed at the next intron start or at block
/// end. The score is the plain sum of substitution scores over its
/// residue-bearing columns, set once by the scoring pass.
#[derive(Debug, Clone)]
pub struct Exon {
    /// First block-column index (inclusive)
    pub start: usize,
    /// Last block-column index (inclusive)
    pub end: usize,
    /// Cumulative alignment score over protein-bearing columns
    pub score: f64,
    /// Whether the score has been computed
    pub score_set: bool,
}

impl Exon {
    /// Opens an exon at the given column; the end is assigned later.
    #[must_use]
    pub const fn starting_at(start: usize) -> Self {
        Self {
            start,
            end: start,
            score: 0.0,
            score_set: false,
        }
    }
}

/// An intron candidate detected inside one alignment block.
#[derive(Debug, Clone)]
pub struct Intron {
    /// First block-column index (inclusive)
    pub start: usize,
    /// Last block-column index (inclusive)
    pub end: usize,
    /// Donor dinucleotide at the intron start
    pub donor: [char; 2],
    /// Acceptor dinucleotide at the intron end
    pub acceptor: [char; 2],
    /// True only if the intron does not touch column 0 and contains no gap
    pub complete: bool,
    /// A gap was observed inside the intron
    pub gap: bool,
    /// Boundary confidence score, normalized to [0, 1]
    pub score: f64,
    /// Whether the score has been computed
    pub score_set: bool,
    /// Exon immediately to the left, if any
    pub left_exon: Option<ExonId>,
    /// Exon immediately to the right, if any
    pub right_exon: Option<ExonId>,
}

impl Intron {
    /// Opens an intron candidate at the given column with the first donor
    /// base; end, acceptor and completeness are filled in when the run ends.
    #[must_use]
    pub const fn starting_at(start: usize, donor_first: char) -> Self {
        Self {
            start,
            end: start,
            donor: [donor_first, ' '],
            acceptor: [' ', ' '],
            complete: false,
            gap: false,
            score: 0.0,
            score_set: false,
            left_exon: None,
            right_exon: None,
        }
    }

    /// Splice-site code in the `DD_AA` form used in emitted records.
    #[must_use]
    pub fn splice_sites(&self) -> String {
        format!(
            "{}{}_{}{}",
            self.donor[0], self.donor[1], self.acceptor[0], self.acceptor[1]
        )
    }
}

/// Whether a codon feature marks translation start or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodonKind {
    /// Translation start (ATG)
    Start,
    /// Translation stop (TAA/TAG/TGA)
    Stop,
}

impl CodonKind {
    /// Feature-type string used in emitted records
    #[must_use]
    pub const fn feature_type(self) -> &'static str {
        match self {
            Self::Start => "start_codon",
            Self::Stop => "stop_codon",
        }
    }
}

/// A detected start or stop codon; at most one of each per alignment block.
#[derive(Debug, Clone)]
pub struct Codon {
    /// Block-column index of the codon's first base
    pub position: usize,
    /// Start or stop
    pub kind: CodonKind,
    /// Boundary confidence score
    pub score: f64,
    /// Whether the score has been computed
    pub score_set: bool,
    /// Exon owning this codon, if any was open when it was detected
    pub exon: Option<ExonId>,
}

impl Codon {
    /// Records a codon anchored at the given column, owned by an exon.
    #[must_use]
    pub const fn new(position: usize, kind: CodonKind, exon: Option<ExonId>) -> Self {
        Self {
            position,
            kind,
            score: 0.0,
            score_set: false,
            exon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_classification_uppercase_is_exon() {
        let pair = AlignedPair::new(' ', 'A', ' ', false);
        assert_eq!(pair.kind, PairKind::Exon);
    }

    #[test]
    fn test_pair_classification_lowercase_is_intron() {
        let pair = AlignedPair::new(' ', 'g', ' ', false);
        assert_eq!(pair.kind, PairKind::Intron);
        // Also when an intron run is not open yet
        let pair = AlignedPair::new(' ', 'g', ' ', true);
        assert_eq!(pair.kind, PairKind::Intron);
    }

    #[test]
    fn test_pair_classification_gap_depends_on_intron_state() {
        let outside = AlignedPair::new(' ', '-', ' ', false);
        assert_eq!(outside.kind, PairKind::Exon);
        let inside = AlignedPair::new(' ', '-', ' ', true);
        assert_eq!(inside.kind, PairKind::Intron);
    }

    #[test]
    fn test_translated_codon_normalization() {
        let stop = AlignedPair::new('*', 'T', ' ', false);
        assert_eq!(stop.translated_codon, 'A');
        let j = AlignedPair::new('J', 'T', ' ', false);
        assert_eq!(j.translated_codon, 'S');
    }

    #[test]
    fn test_gap_or_aa() {
        assert!(gap_or_aa('M'));
        assert!(gap_or_aa('-'));
        assert!(!gap_or_aa('m'));
        assert!(!gap_or_aa(' '));
        assert!(!gap_or_aa('1'));
        assert!(!gap_or_aa('3'));
    }

    #[test]
    fn test_splice_sites_format() {
        let mut intron = Intron::starting_at(5, 'g');
        intron.donor[1] = 't';
        intron.acceptor = ['a', 'g'];
        assert_eq!(intron.splice_sites(), "gt_ag");
    }
}
