use serde::{Deserialize, Serialize};

/// One host definition extracted from a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    pub address: String,
}

impl HostRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// A record is only worth creating when both fields survive trimming
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.address.trim().is_empty()
    }
}

/// Ordered name → address mapping built from one config file.
///
/// Keys are unique within a file: a later block with the same host name
/// replaces the earlier address (last value wins), but the record keeps its
/// first-occurrence position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    records: Vec<HostRecord>,
}

impl ParsedFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: HostRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.name == record.name) {
            existing.address = record.address;
        } else {
            self.records.push(record);
        }
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostRecord> {
        self.records.iter()
    }
}

impl FromIterator<HostRecord> for ParsedFile {
    fn from_iter<I: IntoIterator<Item = HostRecord>>(iter: I) -> Self {
        let mut parsed = Self::new();
        for record in iter {
            parsed.push(record);
        }
        parsed
    }
}
