// Library exports for blastcloud
pub mod collection;
pub mod error;
pub mod field;
pub mod identifier;
pub mod record;
pub mod report;

pub use collection::{RecordCollection, TableRow, TabularView};
pub use error::{ChunkError, IdentifierError, MalformedField, ReportError};
pub use field::{
    extract_field, find_nth_occurrence, nth_field, parse_ratio, strip_labeled_number, FieldPolicy,
};
pub use identifier::IdentifierSchema;
pub use record::{parse_chunk, AlignmentRecord};
pub use report::{
    chunks, read_report, read_report_file, read_report_stdin, split_into_chunks, ChunkBoundary,
    ReportConfig,
};
