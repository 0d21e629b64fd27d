#![allow(dead_code)]

/// Utility functions for testing
use std::fs;
use std::path::Path;

/// Delimiter line used between records in generated reports
pub const RECORD_DELIMITER: &str = "Sequence ID:";

/// Field values behind one generated report block
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRecord {
    pub name: String,
    pub length: u64,
    pub score: i64,
    pub e_value: f64,
    pub identities: u64,
    pub gaps: u64,
}

impl SyntheticRecord {
    /// Four-line NCBI-style block for this record
    pub fn to_block(&self) -> String {
        let identity_pct = 100 * self.identities / self.length;
        let gap_pct = 100 * self.gaps / self.length;
        format!(
            "{}\nLength = {}\nScore = {} bits ({}),  Expect = {:e}\n\
             Identities = {}/{} ({}%), Gaps = {}/{} ({}%)\n",
            self.name,
            self.length,
            self.score * 2,
            self.score,
            self.e_value,
            self.identities,
            self.length,
            identity_pct,
            self.gaps,
            self.length,
            gap_pct,
        )
    }
}

/// Generate a random GISAID-style RSV identifier
pub fn generate_identifier<R: rand::Rng>(rng: &mut R, serial: usize) -> String {
    let subtypes = ["A", "B"];
    let locations = ["Chile", "Kenya", "England", "USA", "Australia"];
    format!(
        "hRSV/{}/{}/{}/{}",
        subtypes[rng.gen_range(0..subtypes.len())],
        locations[rng.gen_range(0..locations.len())],
        serial,
        rng.gen_range(2015..2024)
    )
}

/// Generate `count` random records with consistent counts
pub fn generate_records(count: usize, seed: u64) -> Vec<SyntheticRecord> {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let length = rng.gen_range(100..16_000u64);
            let identities = rng.gen_range(length / 2..=length);
            let gaps = rng.gen_range(0..=(length - identities));
            SyntheticRecord {
                name: generate_identifier(&mut rng, i),
                length,
                score: rng.gen_range(10..30_000),
                e_value: if rng.gen_bool(0.3) { 0.0 } else { 10f64.powi(-rng.gen_range(1..180)) },
                identities,
                gaps,
            }
        })
        .collect()
}

/// Render records as a report, each block introduced by a delimiter line
pub fn render_report(records: &[SyntheticRecord]) -> String {
    let mut report = String::new();
    for record in records {
        report.push_str(&format!("{RECORD_DELIMITER} {}\n", record.name));
        report.push_str(&record.to_block());
        report.push('\n');
    }
    report
}

/// Write a generated report to `path`
pub fn create_report_file(path: &Path, records: &[SyntheticRecord]) {
    fs::write(path, render_report(records)).expect("Failed to write report");
}
