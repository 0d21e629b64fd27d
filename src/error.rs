/// Error kinds raised while turning report text into alignment records
///
/// Field-level failures propagate unchanged through chunk parsing; the report
/// scanner wraps them with the location of the chunk that failed.
use thiserror::Error;

/// A line or fragment lacks the expected punctuation, or its number does not parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed field {fragment:?}: expected {expected}")]
pub struct MalformedField {
    /// The offending text, as it appeared in the report
    pub fragment: String,
    /// Human-readable shape the fragment should have had
    pub expected: &'static str,
}

impl MalformedField {
    pub fn new(fragment: &str, expected: &'static str) -> Self {
        MalformedField {
            fragment: fragment.to_string(),
            expected,
        }
    }
}

/// Failure to turn one four-line chunk into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk has {found} non-empty lines, expected 4 (name, length, score, identities)")]
    MalformedChunk { found: usize },

    #[error(transparent)]
    MalformedField(#[from] MalformedField),
}

/// A chunk failure located within the full report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {ordinal} starting at line {line} could not be parsed")]
pub struct ReportError {
    /// 1-based position of the chunk in the report
    pub ordinal: usize,
    /// 1-based report line on which the chunk begins
    pub line: usize,
    #[source]
    pub source: ChunkError,
}

/// Failure to pull a named field out of a compound identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier schema has no field named {0:?}")]
    UnknownField(String),

    #[error(transparent)]
    MalformedField(#[from] MalformedField),
}
