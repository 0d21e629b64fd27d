/// Ordered collections of alignment records
///
/// The collection keeps records in report order and never changes after it
/// is built. Every projection is recomputed from the stored records, so the
/// Nth element of `names()`, `lengths()` or `simplified_names()` always
/// describes the Nth record.
use indexmap::IndexMap;
use std::io::{self, Write};

use crate::error::{IdentifierError, MalformedField};
use crate::field::{extract_field, FieldPolicy};
use crate::identifier::IdentifierSchema;
use crate::record::AlignmentRecord;

/// Delimiter separating the fields of a record name
pub const NAME_DELIMITER: &str = "/";

/// Column names of the tabular export, in output order
pub const TABLE_COLUMNS: [&str; 6] = [
    "homology", "seq_len", "gap_perc", "evalue", "score", "name",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<AlignmentRecord>,
}

impl RecordCollection {
    pub fn from_records(records: Vec<AlignmentRecord>) -> Self {
        RecordCollection { records }
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AlignmentRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(AlignmentRecord::name).collect()
    }

    pub fn lengths(&self) -> Vec<u64> {
        self.records.iter().map(AlignmentRecord::length).collect()
    }

    pub fn homology_ratios(&self) -> Vec<f64> {
        self.records.iter().map(AlignmentRecord::homology_ratio).collect()
    }

    pub fn gap_ratios(&self) -> Vec<f64> {
        self.records.iter().map(AlignmentRecord::gap_ratio).collect()
    }

    pub fn e_values(&self) -> Vec<f64> {
        self.records.iter().map(AlignmentRecord::e_value).collect()
    }

    pub fn scores(&self) -> Vec<i64> {
        self.records.iter().map(AlignmentRecord::score).collect()
    }

    /// Short variant label of every record: the text between the first and
    /// second `/` of its name (`hRSV/A/USA/2020` gives `A`)
    ///
    /// Fails on the first name with fewer than two `/`.
    pub fn simplified_names(&self) -> Result<Vec<&str>, MalformedField> {
        self.records
            .iter()
            .map(|record| simplified_name(record.name()))
            .collect()
    }

    /// Records sharing a simplified name, groups in first-seen order
    pub fn group_by_simplified_name(
        &self,
    ) -> Result<IndexMap<&str, Vec<&AlignmentRecord>>, MalformedField> {
        let mut groups: IndexMap<&str, Vec<&AlignmentRecord>> = IndexMap::new();
        for record in &self.records {
            groups
                .entry(simplified_name(record.name())?)
                .or_default()
                .push(record);
        }
        Ok(groups)
    }

    /// Number of records per simplified name, most frequent first
    pub fn simplified_name_counts(&self) -> Result<IndexMap<String, usize>, MalformedField> {
        let mut counts: IndexMap<String, usize> = self
            .group_by_simplified_name()?
            .into_iter()
            .map(|(name, members)| (name.to_string(), members.len()))
            .collect();
        counts.sort_by(|_, a, _, b| b.cmp(a));
        Ok(counts)
    }

    /// Tally of one named identifier field over all record names
    pub fn field_counts(
        &self,
        schema: &IdentifierSchema,
        field: &str,
    ) -> Result<IndexMap<String, usize>, IdentifierError> {
        schema.field_counts(self.names(), field)
    }

    /// One row per record, named with its simplified name
    pub fn to_tabular_view(&self) -> Result<TabularView, MalformedField> {
        let rows = self
            .records
            .iter()
            .map(|record| -> Result<TableRow, MalformedField> {
                Ok(TableRow {
                    homology: record.homology_ratio(),
                    seq_len: record.length(),
                    gap_perc: record.gap_ratio(),
                    evalue: record.e_value(),
                    score: record.score(),
                    name: simplified_name(record.name())?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TabularView { rows })
    }
}

fn simplified_name(name: &str) -> Result<&str, MalformedField> {
    extract_field(name, NAME_DELIMITER, 1, 2, FieldPolicy::default())
}

impl FromIterator<AlignmentRecord> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = AlignmentRecord>>(iter: I) -> Self {
        RecordCollection::from_records(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordCollection {
    type Item = AlignmentRecord;
    type IntoIter = std::vec::IntoIter<AlignmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a AlignmentRecord;
    type IntoIter = std::slice::Iter<'a, AlignmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Row of the tabular export
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub homology: f64,
    pub seq_len: u64,
    pub gap_perc: f64,
    pub evalue: f64,
    pub score: i64,
    pub name: String,
}

/// Columnar export handed to plotting and classification tools
#[derive(Debug, Clone, PartialEq)]
pub struct TabularView {
    rows: Vec<TableRow>,
}

impl TabularView {
    pub fn columns(&self) -> &'static [&'static str] {
        &TABLE_COLUMNS
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Tab-separated output with a header line; e-values in scientific notation
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", TABLE_COLUMNS.join("\t"))?;
        for row in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{:e}\t{}\t{}",
                row.homology, row.seq_len, row.gap_perc, row.evalue, row.score, row.name
            )?;
        }
        Ok(())
    }
}
