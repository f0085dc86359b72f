use serde::Serialize;

/// Field map pulled from one listing page.
///
/// Keys keep the order they were first inserted in; inserting an existing key
/// replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    fields: Vec<(String, String)>,
}

impl ListingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListingRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ListingRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Result of extracting one listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemOutcome {
    Extracted(ListingRecord),
    Failed { url: String, cause: String },
}

impl ItemOutcome {
    /// URL the outcome belongs to (falls back to the record's `url` field)
    pub fn url(&self) -> Option<&str> {
        match self {
            ItemOutcome::Extracted(record) => record.get("url"),
            ItemOutcome::Failed { url, .. } => Some(url),
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, ItemOutcome::Extracted(_))
    }
}

/// Rectangular table built from heterogeneous listing records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    /// Cell values of one named column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_position_on_overwrite() {
        let mut record = ListingRecord::new();
        record.insert("url", "https://example.org/1.html");
        record.insert("title", "first");
        record.insert("price", "$1");
        record.insert("title", "second");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["url", "title", "price"]);
        assert_eq!(record.get("title"), Some("second"));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_outcome_url() {
        let failed = ItemOutcome::Failed {
            url: "u".to_string(),
            cause: "gone".to_string(),
        };
        assert_eq!(failed.url(), Some("u"));
        assert!(!failed.is_extracted());

        let ok = ItemOutcome::Extracted([("url", "v")].into_iter().collect());
        assert_eq!(ok.url(), Some("v"));
    }
}
