//! Population rows and the immutable population frame.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// One audited transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationRow {
    pub id: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl PopulationRow {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            category: None,
            subcategory: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Identifier shown in work-papers. Rows loaded without an id are
    /// referred to by their position in the frame.
    pub fn display_id(&self, index: usize) -> String {
        if self.id.trim().is_empty() {
            format!("ROW-{index}")
        } else {
            self.id.clone()
        }
    }
}

/// An ordered, immutable population frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    rows: Vec<PopulationRow>,
}

impl Population {
    pub fn new(rows: Vec<PopulationRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PopulationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The monetary value column, in frame order.
    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Stable xxh3 digest over ids and value bits, as 16 hex chars.
    pub fn fingerprint(&self) -> String {
        fingerprint_rows(&self.rows)
    }
}

impl From<Vec<PopulationRow>> for Population {
    fn from(rows: Vec<PopulationRow>) -> Self {
        Self::new(rows)
    }
}

/// Digest of a row slice. Identical ids and values in identical order
/// always produce the same fingerprint.
pub fn fingerprint_rows(rows: &[PopulationRow]) -> String {
    let mut hasher = Xxh3::new();
    hasher.update(&(rows.len() as u64).to_le_bytes());
    for row in rows {
        hasher.update(&(row.id.len() as u64).to_le_bytes());
        hasher.update(row.id.as_bytes());
        // -0.0 and 0.0 are the same amount.
        let value = if row.value == 0.0 { 0.0_f64 } else { row.value };
        hasher.update(&value.to_bits().to_le_bytes());
    }
    format!("{:016x}", hasher.digest())
}
