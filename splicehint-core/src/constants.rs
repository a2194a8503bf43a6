/// Source tag written to the second column of every emitted record
pub const SOURCE_TAG: &str = "splicehint";

/// Width of the numeric coordinate field at the start of each block line
pub const BLOCK_OFFSET: usize = 9;

/// Number of content lines in one alignment block
pub const BLOCK_LINE_COUNT: usize = 3;

/// Delimiter terminating the aligned tracks on every content line
pub const BLOCK_DELIMITER: char = ';';

/// Gap symbol used across all three tracks
pub const GAP: char = '-';

/// Shortest column run accepted as a real intron; anything shorter is a
/// frameshift artifact of the aligner
pub const MIN_INTRON_LENGTH: usize = 3;

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Penalty for substitution pairs absent from the scoring matrix
pub const UNKNOWN_AA_SCORE: f64 = -4.0;

/// Canonical start codon
pub const START_CODON: &str = "ATG";

/// Amino acid encoded by the start codon (methionine)
pub const START_AA: char = 'M';

/// The three canonical stop codons
pub const STOP_CODONS: [&str; 3] = ["TAA", "TAG", "TGA"];

/// Default width of the scoring window around boundaries, in codons
pub const DEFAULT_WINDOW_WIDTH: usize = 10;

/// Default minimum exon score
pub const DEFAULT_MIN_EXON_SCORE: f64 = 25.0;

/// Initial capacity of the aligned-pair buffer, sized for typical blocks
pub const INITIAL_PAIR_CAPACITY: usize = 3000;
