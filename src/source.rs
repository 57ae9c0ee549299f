// 📂 Source Rows - Scraped (module, level, lines) tuples
//
// The scraper hands over one CSV record per requirement line:
//   Module,Level,Requirement
//   Lavatory,1,50000 Rubles
//   Lavatory,1,Prapor LL1
// Consecutive records of the same module level form one `RawModuleRow`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// One CSV record
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RequirementRecord {
    #[serde(rename = "Module")]
    pub module: String,

    #[serde(rename = "Level")]
    pub level: u32,

    /// Raw requirement text; empty for a level with no requirements
    #[serde(rename = "Requirement", default)]
    pub requirement: String,
}

/// Requirement lines of one module level, as scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModuleRow {
    pub module: String,
    pub level: u32,
    pub lines: Vec<String>,
}

impl RawModuleRow {
    pub fn new(module: impl Into<String>, level: u32, lines: &[&str]) -> Self {
        RawModuleRow {
            module: module.into(),
            level,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Load module rows from a CSV file
pub fn load_rows(csv_path: &Path) -> Result<Vec<RawModuleRow>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open rows file: {}", csv_path.display()))?;
    read_rows(file)
}

/// Read module rows from any CSV source with a header line
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawModuleRow>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in rdr.deserialize().enumerate() {
        let record: RequirementRecord = result.with_context(|| {
            // +2 because: 1-indexed + header row
            format!("Failed to deserialize requirement record on line {}", line_num + 2)
        })?;
        records.push(record);
    }

    Ok(group_records(records))
}

/// Merge consecutive records of the same module level
pub fn group_records(records: Vec<RequirementRecord>) -> Vec<RawModuleRow> {
    let mut rows: Vec<RawModuleRow> = Vec::new();

    for record in records {
        let requirement = record.requirement.trim().to_string();

        match rows.last_mut() {
            Some(row) if row.module == record.module && row.level == record.level => {
                if !requirement.is_empty() {
                    row.lines.push(requirement);
                }
            }
            _ => rows.push(RawModuleRow {
                module: record.module,
                level: record.level,
                lines: if requirement.is_empty() {
                    Vec::new()
                } else {
                    vec![requirement]
                },
            }),
        }
    }

    rows
}

/// SHA-256 over the scraped content, in order.
/// Identical page content gives an identical fingerprint.
pub fn fingerprint(rows: &[RawModuleRow]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        for line in &row.lines {
            hasher.update(format!("{}\u{1f}{}\u{1f}{}\n", row.module, row.level, line));
        }
        if row.lines.is_empty() {
            hasher.update(format!("{}\u{1f}{}\n", row.module, row.level));
        }
    }
    format!("{:x}", hasher.finalize())
}
