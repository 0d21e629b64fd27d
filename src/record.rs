/// Alignment record parsing
///
/// One record comes from a four-line chunk of an NCBI pairwise summary:
///
/// ```text
/// hRSV/A/England/397/2017
/// Length = 15225
/// Score = 27724 bits (15013), Expect = 0.0
/// Identities = 15163/15225 (99%), Gaps = 4/15225 (0%)
/// ```
///
/// Only the line positions and the `=`, `,` and `(` punctuation are relied
/// upon; the labels themselves are not checked.
use log::debug;
use std::fmt;

use crate::error::{ChunkError, MalformedField};
use crate::field::{labeled_value, parse_ratio, strip_labeled_number};

/// Lines a chunk must provide: name, length, score/expect, identities/gaps
pub const CHUNK_LINES: usize = 4;

/// Parsed form of one pairwise alignment summary
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    name: String,
    length: u64,
    score: i64,
    e_value: f64,
    homology_ratio: f64,
    gap_ratio: f64,
}

impl AlignmentRecord {
    /// Build a record, rejecting values no alignment summary can hold
    pub fn new(
        name: &str,
        length: u64,
        score: i64,
        e_value: f64,
        homology_ratio: f64,
        gap_ratio: f64,
    ) -> Result<Self, MalformedField> {
        if name.trim().is_empty() {
            return Err(MalformedField::new(name, "a non-empty identifier"));
        }
        if length == 0 {
            return Err(MalformedField::new(&length.to_string(), "a positive length"));
        }
        if !e_value.is_finite() || e_value < 0.0 {
            return Err(MalformedField::new(
                &e_value.to_string(),
                "a finite non-negative e-value",
            ));
        }
        for ratio in [homology_ratio, gap_ratio] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(MalformedField::new(&ratio.to_string(), "a ratio in [0, 1]"));
            }
        }

        Ok(AlignmentRecord {
            name: name.to_string(),
            length,
            score,
            e_value,
            homology_ratio,
            gap_ratio,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn e_value(&self) -> f64 {
        self.e_value
    }

    /// Identical positions over aligned positions
    pub fn homology_ratio(&self) -> f64 {
        self.homology_ratio
    }

    /// Gap positions over aligned positions
    pub fn gap_ratio(&self) -> f64 {
        self.gap_ratio
    }
}

impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "sequence length: {}", self.length)?;
        writeln!(f, "homology: {}", self.homology_ratio)?;
        writeln!(f, "gaps: {}", self.gap_ratio)?;
        writeln!(f, "evalue: {}", self.e_value)?;
        write!(f, "score: {}", self.score)
    }
}

/// Parse one chunk into a record
///
/// Blank lines are skipped. The first four remaining lines are used and any
/// further lines are ignored.
pub fn parse_chunk(text: &str) -> Result<AlignmentRecord, ChunkError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < CHUNK_LINES {
        return Err(ChunkError::MalformedChunk { found: lines.len() });
    }
    if lines.len() > CHUNK_LINES {
        debug!(
            "Ignoring {} trailing line(s) after record {}",
            lines.len() - CHUNK_LINES,
            lines[0]
        );
    }

    let name = lines[0];
    let length: u64 = strip_labeled_number(lines[1], '=', None)?;

    let (score_part, expect_part) = split_pair(lines[2], "`Score = ..., Expect = ...`")?;
    let score = parse_score(score_part)?;
    let e_value = parse_e_value(expect_part)?;

    let (identity_part, gap_part) =
        split_pair(lines[3], "`Identities = a/b (..), Gaps = c/d (..)`")?;
    let homology_ratio = parse_ratio(labeled_value(identity_part, '=', Some('('))?)?;
    let gap_ratio = parse_ratio(labeled_value(gap_part, '=', Some('('))?)?;

    Ok(AlignmentRecord::new(
        name,
        length,
        score,
        e_value,
        homology_ratio,
        gap_ratio,
    )?)
}

fn split_pair<'a>(
    line: &'a str,
    expected: &'static str,
) -> Result<(&'a str, &'a str), MalformedField> {
    line.split_once(',')
        .ok_or_else(|| MalformedField::new(line, expected))
}

/// Leading integer inside the parentheses of the score fragment
///
/// Accepts both `Score = (50 bits)` and NCBI's `Score = 241 bits (130)`.
fn parse_score(fragment: &str) -> Result<i64, MalformedField> {
    let value = labeled_value(fragment, '=', None)?;
    let inner = value
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| MalformedField::new(fragment, "a parenthesized score"))?;

    inner
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| MalformedField::new(fragment, "an integer score in parentheses"))
}

/// E-value after the label; NCBI drops the mantissa of tiny values (`e-60`)
fn parse_e_value(fragment: &str) -> Result<f64, MalformedField> {
    let value = labeled_value(fragment, '=', None)?;
    let parsed = if value.starts_with(['e', 'E']) {
        format!("1{value}").parse::<f64>()
    } else {
        value.parse::<f64>()
    };
    parsed.map_err(|_| MalformedField::new(fragment, "a floating-point e-value"))
}
