//! Parsing and feature detection for a single gene-to-protein alignment.
//!
//! One [`Alignment`] is reused across blocks: [`Alignment::parse`] resets
//! the instance, reads the three-line block into a column-indexed sequence
//! of [`AlignedPair`]s and runs the intron/exon/codon detection pass. The
//! scoring pass then assigns confidence scores to the detected features.

mod detection;
mod scoring;

use std::io::{self, BufRead, Write};

use bio::bio_types::strand::Strand;

use crate::constants::{BLOCK_DELIMITER, BLOCK_LINE_COUNT, BLOCK_OFFSET, INITIAL_PAIR_CAPACITY};
use crate::types::{AlignedPair, Codon, Exon, Intron, SpliceHintError};

/// A single parsed gene-to-protein alignment block.
///
/// Owns the ordered sequence of aligned columns, the exon arena, the intron
/// candidates (which reference exons by index) and the optional start/stop
/// codons. The instance is constructed once and reused; `parse` clears all
/// transient state before reading a new block.
#[derive(Debug)]
pub struct Alignment {
    gene: String,
    protein: String,
    /// Genomic coordinate of the first real nucleotide
    dna_start: i64,
    /// Protein coordinate of the first aligned residue
    protein_start: i64,
    strand: Strand,
    block_length: usize,
    /// Running genomic position; advanced only by real bases
    position_counter: i64,
    pairs: Vec<AlignedPair>,
    exons: Vec<Exon>,
    introns: Vec<Intron>,
    start_codon: Option<Codon>,
    stop_codon: Option<Codon>,
}

impl Alignment {
    /// Creates an empty, reusable alignment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gene: String::new(),
            protein: String::new(),
            dna_start: 0,
            protein_start: 0,
            strand: Strand::Forward,
            block_length: 0,
            position_counter: 0,
            pairs: Vec::with_capacity(INITIAL_PAIR_CAPACITY),
            exons: Vec::new(),
            introns: Vec::new(),
            start_codon: None,
            stop_codon: None,
        }
    }

    /// Clears all transient state so the instance can parse a new block.
    ///
    /// Releases the exons and codons owned by the previous block; the pair
    /// buffer keeps its capacity.
    pub fn clear(&mut self) {
        self.gene.clear();
        self.protein.clear();
        self.dna_start = 0;
        self.protein_start = 0;
        self.strand = Strand::Forward;
        self.block_length = 0;
        self.position_counter = 0;
        self.pairs.clear();
        self.exons.clear();
        self.introns.clear();
        self.start_codon = None;
        self.stop_codon = None;
    }

    /// Parses a single alignment block.
    ///
    /// `header_line` is the `>`-line that introduced the block; `input` must
    /// be positioned directly after it. The general structure of the block
    /// is checked, but the validity of individual bases and residues is not.
    ///
    /// # Errors
    ///
    /// Returns [`SpliceHintError::HeaderFormat`] for an unparsable header,
    /// [`SpliceHintError::MissingAlignment`] if the stream ends before the
    /// `ALIGNMENT` marker and [`SpliceHintError::BlockLength`] for any
    /// structural problem with the three content lines.
    pub fn parse<R: BufRead>(
        &mut self,
        header_line: &str,
        input: &mut R,
    ) -> Result<(), SpliceHintError> {
        self.clear();
        self.parse_header(header_line)?;

        // Skip ahead to the alignment itself
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Err(SpliceHintError::MissingAlignment {
                    gene: self.gene.clone(),
                    protein: self.protein.clone(),
                });
            }
            if line.starts_with("ALIGNMENT") {
                break;
            }
        }

        line.clear();
        input.read_line(&mut line)?;
        if !line.trim_end_matches(['\r', '\n']).is_empty() {
            return Err(self.block_error("expected an empty line after the ALIGNMENT marker"));
        }

        let mut block_lines: Vec<String> = Vec::with_capacity(BLOCK_LINE_COUNT);
        for _ in 0..BLOCK_LINE_COUNT {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Err(self.block_error("content line is missing"));
            }
            let content = line.trim_end_matches(['\r', '\n']);
            if content.len() <= BLOCK_OFFSET {
                return Err(self.block_error("content line is shorter than the coordinate field"));
            }
            block_lines.push(content.to_string());
        }

        self.dna_start = block_lines[1]
            .get(..BLOCK_OFFSET)
            .and_then(|field| field.trim().parse().ok())
            .filter(|&start: &i64| start > 0)
            .ok_or_else(|| self.block_error("could not read the genomic start position"))?;
        self.protein_start = block_lines[2]
            .get(..BLOCK_OFFSET)
            .and_then(|field| field.trim().parse().ok())
            .ok_or_else(|| self.block_error("could not read the protein start position"))?;
        self.position_counter = self.dna_start;

        // The true end of content is the last non-space character before the
        // terminating delimiter on the nucleotide line; gaps inside introns
        // are printed as spaces and must not be mistaken for end-of-content.
        let nucleotide_line = &block_lines[1];
        let delimiter = nucleotide_line
            .get(BLOCK_OFFSET..)
            .and_then(|track| track.find(BLOCK_DELIMITER))
            .map(|at| at + BLOCK_OFFSET)
            .ok_or_else(|| self.block_error("missing terminating delimiter"))?;
        let content_end = nucleotide_line[..delimiter]
            .rfind(|c: char| c != ' ')
            .map_or(0, |at| at + 1);
        if content_end <= BLOCK_OFFSET {
            return Err(self.block_error("empty alignment block"));
        }
        self.block_length = content_end - BLOCK_OFFSET;

        let mut tracks: Vec<&str> = Vec::with_capacity(BLOCK_LINE_COUNT);
        for content in &block_lines {
            let track = content
                .get(BLOCK_OFFSET..content_end)
                .ok_or_else(|| self.block_error("wrong line length"))?;
            tracks.push(track);
        }
        let nucleotide = tracks[1].replace(' ', "-");

        self.parse_block(tracks[0], &nucleotide, tracks[2]);
        Ok(())
    }

    fn parse_header(&mut self, header: &str) -> Result<(), SpliceHintError> {
        let mut names = header
            .split_whitespace()
            .filter_map(|token| token.strip_prefix('>'))
            .filter(|name| !name.is_empty());
        match (names.next(), names.next()) {
            (Some(gene), Some(protein)) => {
                self.gene = gene.to_string();
                self.protein = protein.to_string();
                self.strand = if header.contains("(reverse)") {
                    Strand::Reverse
                } else {
                    Strand::Forward
                };
                Ok(())
            }
            _ => Err(SpliceHintError::HeaderFormat(header.to_string())),
        }
    }

    fn block_error(&self, reason: &str) -> SpliceHintError {
        SpliceHintError::BlockLength {
            gene: self.gene.clone(),
            protein: self.protein.clone(),
            reason: reason.to_string(),
        }
    }

    /// Name of the aligned gene.
    #[must_use]
    pub fn gene(&self) -> &str {
        &self.gene
    }

    /// Name of the aligned protein.
    #[must_use]
    pub fn protein(&self) -> &str {
        &self.protein
    }

    /// Strand the alignment lies on.
    #[must_use]
    pub const fn strand(&self) -> Strand {
        self.strand
    }

    /// Total alignment length in columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the alignment holds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if the alignment contains any intron candidate.
    #[must_use]
    pub fn has_introns(&self) -> bool {
        !self.introns.is_empty()
    }

    /// The aligned columns, in block order.
    #[must_use]
    pub fn pairs(&self) -> &[AlignedPair] {
        &self.pairs
    }

    /// The exon arena; introns and codons refer to entries by index.
    #[must_use]
    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    /// All intron candidates, including incomplete ones.
    #[must_use]
    pub fn introns(&self) -> &[Intron] {
        &self.introns
    }

    /// The detected start codon, if any.
    #[must_use]
    pub fn start_codon(&self) -> Option<&Codon> {
        self.start_codon.as_ref()
    }

    /// The detected stop codon, if any.
    #[must_use]
    pub fn stop_codon(&self) -> Option<&Codon> {
        self.stop_codon.as_ref()
    }

    /// Writes the four tracks (translated, nucleotide, protein,
    /// classification) for inspection.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for pair in &self.pairs {
            write!(writer, "{}", pair.translated_codon)?;
        }
        writeln!(writer)?;
        for pair in &self.pairs {
            write!(writer, "{}", pair.nucleotide)?;
        }
        writeln!(writer)?;
        for pair in &self.pairs {
            write!(writer, "{}", pair.protein)?;
        }
        writeln!(writer)?;
        for pair in &self.pairs {
            write!(writer, "{}", pair.kind)?;
        }
        writeln!(writer)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::new()
    }
}
