/// Compound identifier decomposition
///
/// Identifiers such as `hRSV/A/England/397/2017` carry several logical fields
/// by position. An [`IdentifierSchema`] names those positions so callers ask
/// for `"location"` rather than remembering that it lives at index 2.
use indexmap::IndexMap;

use crate::error::{IdentifierError, MalformedField};
use crate::field::{nth_field, FieldPolicy};

/// Named positions within a delimiter-separated identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSchema {
    delimiter: String,
    policy: FieldPolicy,
    fields: IndexMap<String, usize>,
}

impl IdentifierSchema {
    /// Empty schema over `delimiter` with the default trailing-field policy
    pub fn new(delimiter: &str) -> Self {
        IdentifierSchema {
            delimiter: delimiter.to_string(),
            policy: FieldPolicy::default(),
            fields: IndexMap::new(),
        }
    }

    /// GISAID-style RSV header: `hRSV/<subtype>/<location>/<isolate>/<year>`
    ///
    /// The year is the last field and is read through the trailing-field
    /// fallback, so headers with extra isolate segments still yield the year.
    pub fn rsv() -> Self {
        IdentifierSchema::new("/")
            .with_field("variant_name", 1)
            .with_field("location", 2)
            .with_field("isolate", 3)
            .with_field("collection_year", 4)
    }

    pub fn with_field(mut self, name: &str, index: usize) -> Self {
        self.fields.insert(name.to_string(), index);
        self
    }

    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    /// Position of a named field
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get(name).copied()
    }

    /// Field names in the order they were declared
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Value of the named field within `identifier`
    pub fn field<'a>(&self, identifier: &'a str, name: &str) -> Result<&'a str, IdentifierError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| IdentifierError::UnknownField(name.to_string()))?;
        Ok(nth_field(identifier, &self.delimiter, index, self.policy)?)
    }

    /// All named fields of `identifier`, in schema order
    pub fn decompose<'s, 'a>(
        &'s self,
        identifier: &'a str,
    ) -> Result<IndexMap<&'s str, &'a str>, MalformedField> {
        self.fields
            .iter()
            .map(|(name, &index)| {
                nth_field(identifier, &self.delimiter, index, self.policy)
                    .map(|value| (name.as_str(), value))
            })
            .collect()
    }

    /// How often each value of the named field occurs, most frequent first
    ///
    /// Values with equal counts keep the order in which they were first seen.
    /// The first identifier lacking the field aborts the tally.
    pub fn field_counts<'a, I>(
        &self,
        identifiers: I,
        name: &str,
    ) -> Result<IndexMap<String, usize>, IdentifierError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for identifier in identifiers {
            let value = self.field(identifier, name)?;
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        counts.sort_by(|_, a, _, b| b.cmp(a));
        Ok(counts)
    }
}

impl Default for IdentifierSchema {
    fn default() -> Self {
        IdentifierSchema::rsv()
    }
}
