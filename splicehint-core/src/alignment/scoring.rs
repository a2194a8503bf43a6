//! Kernel-weighted scoring of detected features.
//!
//! Confidence scores reflect the quality of the amino-acid alignment around
//! a boundary: substitution scores of the codons inside the window are
//! weighted by the kernel, averaged over the window's total weight and
//! normalized by the matrix maximum so scores of different alignments are
//! comparable. Window anchors always land on the amino-acid-bearing column
//! of a codon, which sits at its middle base.

use crate::constants::CODON_LENGTH;
use crate::kernel::Kernel;
use crate::matrix::ScoreMatrix;
use crate::types::{gap_or_aa, PairKind};

use super::Alignment;

impl Alignment {
    /// Scores every exon: the sum of substitution scores over all columns
    /// whose protein character is a resolved residue or gap.
    ///
    /// Already-scored exons are skipped.
    pub fn score_exons(&mut self, matrix: &ScoreMatrix) {
        for exon in &mut self.exons {
            if exon.score_set {
                continue;
            }
            let mut score = 0.0;
            for pair in &self.pairs[exon.start..=exon.end] {
                if gap_or_aa(pair.protein) {
                    score += pair.substitution_score(matrix);
                }
            }
            exon.score = score;
            exon.score_set = true;
        }
    }

    /// Scores every complete intron using exon alignment quality in the
    /// upstream and downstream windows.
    ///
    /// Already-scored introns are skipped.
    pub fn score_introns(&mut self, kernel: &Kernel, matrix: &ScoreMatrix) {
        for i in 0..self.introns.len() {
            if self.introns[i].complete && !self.introns[i].score_set {
                self.score_intron(i, kernel, matrix);
            }
        }
    }

    fn score_intron(&mut self, i: usize, kernel: &Kernel, matrix: &ScoreMatrix) {
        let (start, end) = (self.introns[i].start, self.introns[i].end);

        // Determine whether the intron splits a codon, and where, from the
        // phase markers immediately upstream of the intron start. The
        // start-1 check takes precedence when both would match.
        let (left_anchor, right_anchor) = if start >= 1 && self.carries_phase3(start - 1) {
            // Codon is not split
            (start as i64 - 2, end as i64 + 2)
        } else if start >= 2 && self.carries_phase3(start - 2) {
            // Split after the first base; the majority of the codon lies to
            // the right of the intron
            (start as i64 - 3, end as i64 + 1)
        } else {
            // Split after the second base; majority to the left
            (start as i64 - 1, end as i64 + 3)
        };

        let left = self.windowed_sum(left_anchor, -1, kernel, matrix);
        let right = self.windowed_sum(right_anchor, 1, kernel, matrix);

        let intron = &mut self.introns[i];
        if left <= 0.0 || right <= 0.0 {
            intron.score = 0.0;
        } else {
            // Normalize each side by the window weight, otherwise alignments
            // in short exons between introns are penalized
            let weight_sum = kernel.weight_sum();
            intron.score =
                ((left / weight_sum) * (right / weight_sum)).sqrt() / matrix.max_score();
        }
        intron.score_set = true;
    }

    /// Scores the start and stop codons, if present, from the alignment
    /// quality of the adjacent exon region.
    ///
    /// Already-scored codons are skipped.
    pub fn score_codons(&mut self, kernel: &Kernel, matrix: &ScoreMatrix) {
        let weight_sum = kernel.weight_sum();

        // Downstream walk, anchored at the first amino-acid column beyond
        // the codon's last base
        let start_anchor = self
            .start_codon
            .as_ref()
            .filter(|codon| !codon.score_set)
            .map(|codon| codon.position as i64 + CODON_LENGTH as i64 + 1);
        if let Some(anchor) = start_anchor {
            let score = self.windowed_sum(anchor, 1, kernel, matrix) / weight_sum / matrix.max_score();
            if let Some(codon) = self.start_codon.as_mut() {
                codon.score = score;
                codon.score_set = true;
            }
        }

        // Symmetric upstream walk from the codon's first base
        let stop_anchor = self
            .stop_codon
            .as_ref()
            .filter(|codon| !codon.score_set)
            .map(|codon| codon.position as i64 - 2);
        if let Some(anchor) = stop_anchor {
            let score = self.windowed_sum(anchor, -1, kernel, matrix) / weight_sum / matrix.max_score();
            if let Some(codon) = self.stop_codon.as_mut() {
                codon.score = score;
                codon.score_set = true;
            }
        }
    }

    fn carries_phase3(&self, index: usize) -> bool {
        self.pairs[index].protein == '3' || self.pairs[index].translated_codon == '3'
    }

    /// Weighted substitution-score sum over a window walked from `anchor`
    /// one codon at a time in `direction`, stopping at the alignment bounds
    /// or at the first non-exon column.
    fn windowed_sum(
        &self,
        anchor: i64,
        direction: i64,
        kernel: &Kernel,
        matrix: &ScoreMatrix,
    ) -> f64 {
        let mut sum = 0.0;
        for offset in 0..kernel.width() {
            let index = anchor + direction * (CODON_LENGTH * offset) as i64;
            if index < 0 || index >= self.pairs.len() as i64 {
                break;
            }
            let pair = &self.pairs[index as usize];
            if pair.kind != PairKind::Exon {
                break;
            }
            sum += pair.substitution_score(matrix) * kernel.weight(offset);
        }
        sum
    }
}
