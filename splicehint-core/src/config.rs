//! Configuration for boundary scoring and hint emission.

use crate::constants::{DEFAULT_MIN_EXON_SCORE, DEFAULT_WINDOW_WIDTH};
use crate::kernel::KernelShape;

/// Settings controlling scoring windows, kernel choice, thresholds and
/// strand handling.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use splicehint_core::config::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.window_width, 10);
/// ```
///
/// ## Wider window with a box kernel
///
/// ```rust
/// use splicehint_core::config::ScoringConfig;
/// use splicehint_core::kernel::KernelShape;
///
/// let config = ScoringConfig {
///     window_width: 20,
///     kernel_shape: KernelShape::Box,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Number of codons scored upstream and downstream of each boundary.
    ///
    /// **Default**: `10`
    pub window_width: usize,

    /// Shape of the weighting kernel applied over the window.
    ///
    /// **Default**: [`KernelShape::Triangular`]
    pub kernel_shape: KernelShape,

    /// Minimum exon score.
    ///
    /// Exons scoring lower are not emitted, and neither are introns
    /// bordering them nor start/stop codons inside them.
    ///
    /// **Default**: `25.0`
    pub min_exon_score: f64,

    /// Minimum score of the exon owning a start codon.
    ///
    /// A start codon whose exon scores lower is not emitted. Evaluated in
    /// addition to [`min_exon_score`](Self::min_exon_score).
    ///
    /// **Default**: `0.0`
    pub min_initial_exon_score: f64,

    /// Minimum score of the intron bordering the start codon's exon.
    ///
    /// When the exon owning a start codon is followed by a complete intron,
    /// the start codon is only emitted if that intron scores at least this
    /// much.
    ///
    /// **Default**: `0.0`
    pub min_initial_intron_score: f64,

    /// Whether alignments on the reverse strand are processed at all.
    ///
    /// **Default**: `true`
    pub process_reverse: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            kernel_shape: KernelShape::default(),
            min_exon_score: DEFAULT_MIN_EXON_SCORE,
            min_initial_exon_score: 0.0,
            min_initial_intron_score: 0.0,
            process_reverse: true,
        }
    }
}
