//! Turning listing outcomes into one rectangular table
//!
//! Listings expose different attribute sets, so the table's columns are the
//! union of every record's keys in first-seen order, and cells a record does
//! not have stay empty.

use crate::error::ScrapeError;
use crate::models::{ItemOutcome, ResultTable};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// What a failed extraction contributes to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep the row: `url` filled, every other cell empty
    #[default]
    NullRow,
    /// Leave failed listings out of the table
    Exclude,
}

/// Build the result table from per-listing outcomes
pub fn list_to_table(items: &[ItemOutcome], policy: FailurePolicy) -> ResultTable {
    let kept: Vec<&ItemOutcome> = items
        .iter()
        .filter(|item| policy == FailurePolicy::NullRow || item.is_extracted())
        .collect();

    let mut columns: Vec<String> = Vec::new();
    let mut add_column = |name: &str| {
        if !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
    };
    for item in &kept {
        match item {
            ItemOutcome::Extracted(record) => record.keys().for_each(&mut add_column),
            ItemOutcome::Failed { .. } => add_column("url"),
        }
    }

    let rows = kept
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|col| match item {
                    ItemOutcome::Extracted(record) => record.get(col).map(str::to_string),
                    ItemOutcome::Failed { url, .. } if col == "url" => Some(url.clone()),
                    ItemOutcome::Failed { .. } => None,
                })
                .collect()
        })
        .collect();

    ResultTable { columns, rows }
}

/// Write the table as CSV: header row, no index column, empty cells for nulls
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// [`write_csv`] into a freshly created file
pub fn write_csv_path(table: &ResultTable, path: impl AsRef<Path>) -> Result<(), ScrapeError> {
    let path = path.as_ref();
    File::create(path)
        .map_err(csv::Error::from)
        .and_then(|file| write_csv(table, file))
        .map_err(|source| ScrapeError::Output {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingRecord;

    fn record(pairs: &[(&str, &str)]) -> ItemOutcome {
        ItemOutcome::Extracted(pairs.iter().copied().collect::<ListingRecord>())
    }

    fn failed(url: &str) -> ItemOutcome {
        ItemOutcome::Failed {
            url: url.to_string(),
            cause: "Element not found: span.postingtitletext".to_string(),
        }
    }

    #[test]
    fn test_union_of_partially_overlapping_keys() {
        let items = vec![record(&[("a", "1"), ("b", "2")]), record(&[("b", "3"), ("c", "4")])];
        let table = list_to_table(&items, FailurePolicy::NullRow);

        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("1".to_string()), Some("2".to_string()), None],
                vec![None, Some("3".to_string()), Some("4".to_string())],
            ]
        );
    }

    #[test]
    fn test_failed_item_becomes_null_row() {
        let items = vec![
            record(&[("url", "u1"), ("title", "t1")]),
            failed("u2"),
            record(&[("url", "u3"), ("price", "$5")]),
        ];
        let table = list_to_table(&items, FailurePolicy::NullRow);

        assert_eq!(table.columns, vec!["url", "title", "price"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("url").unwrap(), vec![Some("u1"), Some("u2"), Some("u3")]);
        assert_eq!(table.rows[1], vec![Some("u2".to_string()), None, None]);
    }

    #[test]
    fn test_failed_item_excluded() {
        let items = vec![failed("u0"), record(&[("url", "u1"), ("title", "t1")]), failed("u2")];
        let table = list_to_table(&items, FailurePolicy::Exclude);

        assert_eq!(table.columns, vec!["url", "title"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.column("title").unwrap(), vec![Some("t1")]);
    }

    #[test]
    fn test_only_failures() {
        let items = vec![failed("u0")];
        assert_eq!(list_to_table(&items, FailurePolicy::NullRow).columns, vec!["url"]);

        let excluded = list_to_table(&items, FailurePolicy::Exclude);
        assert!(excluded.columns.is_empty());
        assert!(excluded.is_empty());
    }

    #[test]
    fn test_write_csv() {
        let items = vec![
            record(&[("url", "u1"), ("title", "Model S, clean")]),
            record(&[("url", "u2"), ("odometer", "81000")]),
        ];
        let table = list_to_table(&items, FailurePolicy::NullRow);

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "url,title,odometer\nu1,\"Model S, clean\",\nu2,,81000\n"
        );
    }
    #[test]
    fn test_write_csv_path_reports_output_file() {
        let table = list_to_table(&[record(&[("url", "u1")])], FailurePolicy::NullRow);
        let path = std::env::temp_dir()
            .join("craigslist_scraper_no_such_dir")
            .join("out.csv");

        let err = write_csv_path(&table, &path).unwrap_err();

        match err {
            ScrapeError::Output { path: reported, .. } => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_write_csv_path() {
        let table = list_to_table(&[record(&[("url", "u1")])], FailurePolicy::NullRow);
        let path = std::env::temp_dir().join(format!("craigslist_scraper_{}.csv", std::process::id()));

        write_csv_path(&table, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(text, "url\nu1\n");
    }
}
