//! Substitution scoring matrix.
//!
//! Loads an amino-acid substitution matrix from a CSV-like text table and
//! answers score lookups for character pairs. Lookups are case-insensitive
//! and spaces/dashes are folded onto the gap symbol `*`, matching how gaps
//! are printed in the alignment tracks.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::UNKNOWN_AA_SCORE;
use crate::types::SpliceHintError;

/// Symbol the matrix uses for gaps.
const GAP_SYMBOL: char = '*';

/// An amino-acid substitution scoring matrix.
///
/// # Examples
///
/// ```rust
/// use splicehint_core::matrix::ScoreMatrix;
///
/// let table = "a, r, *\na, 4, -1, -2\nr, -1, 5, -2\n*, -2, -2, 1\n";
/// let matrix = ScoreMatrix::from_reader(table.as_bytes())?;
/// assert_eq!(matrix.score('A', 'R'), -1.0);
/// assert_eq!(matrix.score('A', '-'), -2.0);
/// assert_eq!(matrix.max_score(), 5.0);
/// # Ok::<(), splicehint_core::SpliceHintError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    scores: HashMap<char, HashMap<char, f64>>,
    max_score: f64,
}

impl ScoreMatrix {
    /// Loads a scoring matrix from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SpliceHintError::MatrixFile`] if the file cannot be opened
    /// or does not hold a well-formed matrix.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SpliceHintError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            SpliceHintError::MatrixFile(format!("failed to open \"{}\": {err}", path.display()))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a scoring matrix from a reader.
    ///
    /// The first non-comment line lists the column header characters; each
    /// following row starts with its row header character followed by one
    /// numeric score per column. `"`, `,`, `;` and `|` are all accepted as
    /// separators and `#`-lines before the header are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SpliceHintError::MatrixFile`] on any structural problem:
    /// missing header, short row, or an unparsable score.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SpliceHintError> {
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.starts_with('#') {
                        break line;
                    }
                }
                None => {
                    return Err(SpliceHintError::MatrixFile(
                        "missing column header row".to_string(),
                    ));
                }
            }
        };

        let columns = parse_header_row(&header)?;

        let mut scores: HashMap<char, HashMap<char, f64>> = HashMap::new();
        for _ in 0..columns.len() {
            let line = lines.next().transpose()?.ok_or_else(|| {
                SpliceHintError::MatrixFile(format!(
                    "expected {} score rows, found fewer",
                    columns.len()
                ))
            })?;
            let (row_header, row) = parse_score_row(&line, &columns)?;
            scores.insert(row_header, row);
        }

        let max_score = scores
            .values()
            .flat_map(|row| row.values().copied())
            .fold(f64::MIN, f64::max);

        Ok(Self { scores, max_score })
    }

    /// Score of a substitution pair.
    ///
    /// Lookups are case-insensitive; space and `-` are folded onto the gap
    /// symbol. Pairs absent from the matrix score a fixed penalty, which
    /// covers frameshift filler characters and the occasional shifted gap
    /// in the aligner's output.
    #[must_use]
    pub fn score(&self, a: char, b: char) -> f64 {
        let a = normalize(a);
        let b = normalize(b);
        self.scores
            .get(&a)
            .and_then(|row| row.get(&b))
            .copied()
            .unwrap_or(UNKNOWN_AA_SCORE)
    }

    /// Maximum score of any pair in the matrix.
    #[must_use]
    pub const fn max_score(&self) -> f64 {
        self.max_score
    }
}

fn normalize(c: char) -> char {
    match c {
        ' ' | '-' => GAP_SYMBOL,
        other => other.to_ascii_lowercase(),
    }
}

/// Replaces all accepted separators with spaces so rows can be split on
/// whitespace.
fn strip_separators(line: &str) -> String {
    line.replace(['"', ',', ';', '|'], " ")
}

fn parse_header_row(line: &str) -> Result<Vec<char>, SpliceHintError> {
    let stripped = strip_separators(line);
    let mut columns = Vec::new();
    for token in stripped.split_whitespace() {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => columns.push(c.to_ascii_lowercase()),
            _ => {
                return Err(SpliceHintError::MatrixFile(format!(
                    "invalid column header token \"{token}\""
                )));
            }
        }
    }
    if columns.is_empty() {
        return Err(SpliceHintError::MatrixFile(
            "empty column header row".to_string(),
        ));
    }
    Ok(columns)
}

fn parse_score_row(
    line: &str,
    columns: &[char],
) -> Result<(char, HashMap<char, f64>), SpliceHintError> {
    let stripped = strip_separators(line);
    let mut tokens = stripped.split_whitespace();

    let header_token = tokens
        .next()
        .ok_or_else(|| SpliceHintError::MatrixFile("empty score row".to_string()))?;
    let mut chars = header_token.chars();
    let row_header = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => {
            return Err(SpliceHintError::MatrixFile(format!(
                "invalid row header token \"{header_token}\""
            )));
        }
    };

    let mut row = HashMap::new();
    for &column in columns {
        let token = tokens.next().ok_or_else(|| {
            SpliceHintError::MatrixFile(format!("row \"{row_header}\" is missing scores"))
        })?;
        let score: f64 = token.parse().map_err(|_| {
            SpliceHintError::MatrixFile(format!(
                "invalid score \"{token}\" in row \"{row_header}\""
            ))
        })?;
        row.insert(column, score);
    }

    Ok((row_header, row))
}
