//! Intron/exon/codon detection.
//!
//! The detection pass walks the three trimmed tracks once, left to right,
//! threading an explicit [`DetectionState`] through the walk. All transient
//! state lives in that value and in the alignment's feature lists, so every
//! transition and its side effects are auditable in one place.

use bio::bio_types::strand::Strand;

use crate::constants::{CODON_LENGTH, GAP, MIN_INTRON_LENGTH, START_AA, START_CODON, STOP_CODONS};
use crate::types::{gap_or_aa, AlignedPair, Codon, CodonKind, Exon, Intron, PairKind};

use super::Alignment;

/// Parser state for the detection walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectionState {
    /// Between introns, or before the first one
    Exon,
    /// The column immediately after an intron start; it completes the
    /// 2-character donor site unconditionally
    IntronAwaitingDonor,
    /// Inside an intron run
    Intron,
}

impl Alignment {
    /// Builds the aligned-pair sequence from the trimmed tracks and detects
    /// exons, introns and start/stop codons in a single pass.
    pub(super) fn parse_block(&mut self, translated: &str, nucleotide: &str, protein: &str) {
        let step: i64 = match self.strand {
            Strand::Reverse => -1,
            _ => 1,
        };
        let mut state = DetectionState::Exon;

        for ((tc, n), p) in translated.chars().zip(nucleotide.chars()).zip(protein.chars()) {
            let index = self.pairs.len();
            let inside_intron = state != DetectionState::Exon;
            let mut pair = AlignedPair::new(tc, n, p, inside_intron);

            state = self.advance(state, &pair, index);

            // The first real exon column opens the first exon; this covers
            // alignments that do not begin at column 0.
            if self.exons.is_empty()
                && pair.kind == PairKind::Exon
                && pair.nucleotide != GAP
                && self.position_counter == self.dna_start
            {
                self.exons.push(Exon::starting_at(index));
            }

            pair.real_position = self.position_counter;
            if pair.nucleotide != GAP {
                self.position_counter += step;
            }
            self.pairs.push(pair);

            if index == CODON_LENGTH - 1 {
                self.check_for_start();
            }
        }

        // The last column, if exon-type, closes the open exon
        if let Some(last) = self.pairs.last() {
            if last.kind == PairKind::Exon {
                if let Some(exon) = self.exons.last_mut() {
                    exon.end = self.pairs.len() - 1;
                }
            }
        }

        self.check_for_stop();
        self.assign_codon_phases();
    }

    /// Applies one column to the state machine, recording intron boundaries
    /// and donor/acceptor sites as transitions fire.
    fn advance(&mut self, state: DetectionState, pair: &AlignedPair, index: usize) -> DetectionState {
        match state {
            DetectionState::IntronAwaitingDonor => {
                // The donor-completion column is consumed unconditionally and
                // takes no further part in boundary or gap checks.
                if let Some(intron) = self.introns.last_mut() {
                    intron.donor[1] = pair.nucleotide;
                }
                DetectionState::Intron
            }
            DetectionState::Exon if pair.kind == PairKind::Intron => {
                let mut intron = Intron::starting_at(index, pair.nucleotide);
                if let Some(left) = self.exons.len().checked_sub(1) {
                    self.exons[left].end = index - 1;
                    intron.left_exon = Some(left);
                }
                self.introns.push(intron);
                DetectionState::IntronAwaitingDonor
            }
            DetectionState::Intron if pair.kind == PairKind::Exon => {
                self.close_intron(index);
                DetectionState::Exon
            }
            DetectionState::Intron if pair.nucleotide == GAP => {
                if let Some(intron) = self.introns.last_mut() {
                    intron.gap = true;
                }
                DetectionState::Intron
            }
            other => other,
        }
    }

    /// Ends the open intron run at `index` (exclusive). Runs shorter than
    /// the minimum intron length are frameshift artifacts and are dropped;
    /// the enclosing exon re-extends over them when its end is next
    /// assigned.
    fn close_intron(&mut self, index: usize) {
        let Some(intron) = self.introns.last_mut() else {
            return;
        };
        if index - intron.start < MIN_INTRON_LENGTH {
            self.introns.pop();
            return;
        }

        intron.end = index - 1;
        intron.acceptor = [
            self.pairs[index - 2].nucleotide,
            self.pairs[index - 1].nucleotide,
        ];
        intron.complete = !intron.gap && intron.start != 0;

        let right = self.exons.len();
        self.exons.push(Exon::starting_at(index));
        intron.right_exon = Some(right);
    }

    /// Records a start codon if the block opens with one.
    ///
    /// Fires at the third column: the codon over columns 0..=2 must read
    /// ATG, the protein alignment must start at its first residue and that
    /// residue (at the codon's middle column) must be methionine.
    fn check_for_start(&mut self) {
        if self.protein_start != 1 || self.pairs.len() < CODON_LENGTH {
            return;
        }
        let codon: String = self.pairs[..CODON_LENGTH]
            .iter()
            .map(|pair| pair.nucleotide)
            .collect();
        if codon == START_CODON && self.pairs[1].protein == START_AA {
            let owner = self.exons.len().checked_sub(1);
            self.start_codon = Some(Codon::new(0, CodonKind::Start, owner));
        }
    }

    /// Records a stop codon if the block ends with one inside an exon.
    fn check_for_stop(&mut self) {
        let length = self.pairs.len();
        if length <= CODON_LENGTH {
            return;
        }
        if self.pairs[length - CODON_LENGTH - 1].kind != PairKind::Exon {
            return;
        }
        // Both TAA and TGA end in A, TAG in G
        let last = self.pairs[length - 1].nucleotide;
        if last != 'A' && last != 'G' {
            return;
        }
        let codon: String = self.pairs[length - CODON_LENGTH..]
            .iter()
            .map(|pair| pair.nucleotide)
            .collect();
        if STOP_CODONS.contains(&codon.as_str()) {
            let owner = self.exons.len().checked_sub(1);
            self.stop_codon = Some(Codon::new(length - CODON_LENGTH, CodonKind::Stop, owner));
        }
    }

    /// Fills undetermined columns of both tracks with phase markers, which
    /// later tell the scoring pass whether an intron splits a codon.
    fn assign_codon_phases(&mut self) {
        for i in 0..self.pairs.len() {
            if self.pairs[i].kind != PairKind::Exon {
                continue;
            }
            if self.pairs[i].translated_codon == ' ' {
                if let Some(mark) = self.phase_mark(i, |pair| pair.translated_codon) {
                    self.pairs[i].translated_codon = mark;
                }
            }
            if self.pairs[i].protein == ' ' {
                if let Some(mark) = self.phase_mark(i, |pair| pair.protein) {
                    self.pairs[i].protein = mark;
                }
            }
        }
    }

    /// Phase marker for an undetermined exon column: '1' when the majority
    /// of its codon lies to the right, '3' when it lies to the left.
    fn phase_mark(&self, i: usize, track: impl Fn(&AlignedPair) -> char) -> Option<char> {
        let last = self.pairs.len() - 1;
        if i == 0 {
            return Some('1');
        }
        if i == last {
            return Some('3');
        }
        if gap_or_aa(track(&self.pairs[i + 1])) {
            return Some('1');
        }
        if gap_or_aa(track(&self.pairs[i - 1])) {
            return Some('3');
        }
        if self.pairs[i + 1].kind == PairKind::Intron {
            return Some('1');
        }
        if self.pairs[i - 1].kind == PairKind::Intron {
            return Some('3');
        }
        None
    }
}
