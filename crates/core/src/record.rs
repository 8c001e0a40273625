use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::TIMESTAMP_FORMAT;

/// A single scraped anchor link — one TSV row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: u64,
    pub url: String,
    pub created_at: NaiveDateTime,
}

impl LinkRecord {
    /// Render as one TSV line (no trailing newline).
    pub fn to_tsv_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.id,
            self.url,
            self.created_at.format(TIMESTAMP_FORMAT)
        )
    }

    /// Parse a TSV line back into a record. `None` for malformed rows.
    pub fn from_tsv_line(line: &str) -> Option<Self> {
        let mut parts = line.splitn(3, '\t');
        let id = parts.next()?.parse().ok()?;
        let url = parts.next()?.to_string();
        let created_at = NaiveDateTime::parse_from_str(parts.next()?, TIMESTAMP_FORMAT).ok()?;
        Some(Self { id, url, created_at })
    }
}
