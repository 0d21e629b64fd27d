/// Report scanning: splitting a full alignment report into record chunks
///
/// A report is read in full, the source is closed, and only then is the text
/// split and parsed. Lines containing the chunk delimiter mark where one
/// record ends; whatever is left after the last delimiter is parsed as the
/// final record.
use anyhow::{Context, Result};
use log::{debug, info};
use noodles::bgzf;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::collection::RecordCollection;
use crate::error::ReportError;
use crate::record::parse_chunk;

/// What happens to the line carrying the chunk delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkBoundary {
    /// The delimiter line separates chunks and belongs to neither
    #[default]
    Drop,
    /// The delimiter line opens the next chunk (e.g. `>` on identifier lines)
    Lead,
}

/// How a report is cut into chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub chunk_delimiter: String,
    pub boundary: ChunkBoundary,
    /// Stop after the first record, ignoring the rest of the report
    pub one_result: bool,
}

impl ReportConfig {
    pub fn new(chunk_delimiter: &str) -> Self {
        ReportConfig {
            chunk_delimiter: chunk_delimiter.to_string(),
            boundary: ChunkBoundary::default(),
            one_result: false,
        }
    }

    pub fn with_boundary(mut self, boundary: ChunkBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_one_result(mut self, one_result: bool) -> Self {
        self.one_result = one_result;
        self
    }
}

/// A slice of the report holding one record's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based position among the chunks of the report
    pub ordinal: usize,
    /// 1-based report line of the chunk's first non-blank line
    pub line: usize,
    pub text: &'a str,
}

/// Lazily yields the chunks of a report, in report order
pub struct Chunks<'a> {
    text: &'a str,
    delimiter: &'a str,
    boundary: ChunkBoundary,
    pos: usize,
    line_no: usize,
    ordinal: usize,
}

/// Split `text` on lines containing `delimiter`
///
/// A buffer holding only blank lines never becomes a chunk. An empty
/// delimiter never matches, so the whole text is one chunk.
pub fn chunks<'a>(text: &'a str, delimiter: &'a str, boundary: ChunkBoundary) -> Chunks<'a> {
    Chunks {
        text,
        delimiter,
        boundary,
        pos: 0,
        line_no: 1,
        ordinal: 0,
    }
}

impl<'a> Chunks<'a> {
    fn advance(&mut self, len: usize) {
        self.pos += len;
        self.line_no += 1;
    }

    fn emit(&mut self, start: usize, end: usize, line: usize) -> Chunk<'a> {
        let text = self.text;
        self.ordinal += 1;
        Chunk {
            ordinal: self.ordinal,
            line,
            text: &text[start..end],
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        // Offset and line number of the first non-blank line in the buffer
        let mut start: Option<(usize, usize)> = None;

        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            let line = &rest[..len];
            let is_boundary = !self.delimiter.is_empty() && line.contains(self.delimiter);

            if is_boundary {
                if let Some((offset, line_no)) = start {
                    let chunk = self.emit(offset, self.pos, line_no);
                    if self.boundary == ChunkBoundary::Drop {
                        self.advance(len);
                    }
                    return Some(chunk);
                }
                if self.boundary == ChunkBoundary::Drop {
                    self.advance(len);
                    continue;
                }
            }

            if start.is_none() && !line.trim().is_empty() {
                start = Some((self.pos, self.line_no));
            }
            self.advance(len);
        }

        start.map(|(offset, line_no)| self.emit(offset, self.text.len(), line_no))
    }
}

/// Parse every chunk of `text` into a record collection
///
/// The first chunk that fails to parse aborts the whole report. With
/// `one_result` set, scanning stops at the first record and the remainder of
/// the report is never looked at.
pub fn split_into_chunks(
    text: &str,
    config: &ReportConfig,
) -> std::result::Result<RecordCollection, ReportError> {
    let mut records = Vec::new();

    for chunk in chunks(text, &config.chunk_delimiter, config.boundary) {
        let record = parse_chunk(chunk.text).map_err(|source| ReportError {
            ordinal: chunk.ordinal,
            line: chunk.line,
            source,
        })?;
        debug!(
            "Parsed record {} ({}) from line {}",
            chunk.ordinal,
            record.name(),
            chunk.line
        );
        records.push(record);

        if config.one_result {
            break;
        }
    }

    Ok(RecordCollection::from_records(records))
}

/// Open a report file, auto-detecting bgzip compression by extension
pub fn open_report_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let is_compressed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz" || ext == "bgz")
        .unwrap_or(false);

    if is_compressed {
        Ok(Box::new(BufReader::new(bgzf::io::reader::Reader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a whole report from `reader`, then parse it
pub fn read_report<R: Read>(mut reader: R, config: &ReportConfig) -> Result<RecordCollection> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read alignment report")?;
    drop(reader);

    let collection = split_into_chunks(&text, config)?;
    info!("Parsed {} alignment record(s)", collection.len());
    Ok(collection)
}

/// Read and parse a report file (plain or bgzipped)
pub fn read_report_file<P: AsRef<Path>>(
    path: P,
    config: &ReportConfig,
) -> Result<RecordCollection> {
    let path = path.as_ref();
    let input = open_report_input(path)?;
    read_report(input, config).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read and parse a report from stdin
pub fn read_report_stdin(config: &ReportConfig) -> Result<RecordCollection> {
    read_report(std::io::stdin().lock(), config)
}
