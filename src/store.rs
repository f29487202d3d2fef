// 🗄️ Record Store - in-memory table mirrored to a CSV file
//
// The file is always rewritten in full after a mutation. Records stay sorted
// ascending by date; ties keep insertion order (stable sort).

use crate::error::{Field, StoreError, ValidationError};
use crate::record::{parse_amount, parse_calendar_day, validate_entry, Record};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header row of the persistent file
pub const CSV_HEADER: [&str; 3] = ["Date", "Income", "Expenses"];

/// Example data written when no file exists yet: (date, income, expenses)
const SEED_RECORDS: [(&str, f64, f64); 3] = [
    ("2023-01-01", 4000.0, 2000.0),
    ("2023-02-01", 2000.0, 1000.0),
    ("2023-03-01", 7000.0, 3000.0),
];

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub count: usize,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Authoritative list of records, bound to the CSV file it persists to.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl RecordStore {
    /// Load `path` if it exists, otherwise seed it with the example records.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Self::seed(path)
        }
    }

    /// Read every record from `path`.
    ///
    /// A bad header, a short row, an unparsable value or a negative amount is
    /// reported as [`StoreError::Corrupt`] with the file line it was found on.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = rdr.headers().map_err(corrupt_from_csv)?;
        if headers.iter().ne(CSV_HEADER.iter().copied()) {
            return Err(StoreError::Corrupt {
                line: 1,
                reason: format!(
                    "expected header {:?}, found {:?}",
                    CSV_HEADER.join(","),
                    headers.iter().collect::<Vec<_>>().join(",")
                ),
            });
        }

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row.map_err(corrupt_from_csv)?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            records.push(parse_row(&row).map_err(|reason| StoreError::Corrupt { line, reason })?);
        }

        sort_records(&mut records);
        let store = RecordStore { path, records };

        tracing::info!(
            path = %store.path.display(),
            records = store.records.len(),
            "loaded records"
        );
        Ok(store)
    }

    /// Create the store with the example records and write them out immediately.
    pub fn seed(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let records = SEED_RECORDS
            .iter()
            .map(|(date, income, expenses)| -> Result<Record, StoreError> {
                let date = NaiveDate::parse_from_str(date, crate::record::DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidDateFormat(date.to_string()))?;
                Ok(Record::new(date, *income, *expenses))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let store = RecordStore {
            path: path.into(),
            records,
        };
        store.save()?;

        tracing::info!(path = %store.path.display(), "no data file found, seeded example records");
        Ok(store)
    }

    /// Rewrite the whole file from the in-memory records.
    pub fn save(&self) -> Result<(), StoreError> {
        write_records(&self.path, &self.records)
    }

    /// Persist `records` and only then make them the current contents.
    ///
    /// A failed write leaves memory as it was, so it keeps matching the file.
    fn commit(&mut self, records: Vec<Record>) -> Result<(), StoreError> {
        write_records(&self.path, &records)?;
        self.records = records;
        Ok(())
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Validate raw input and append it as a new record.
    ///
    /// On a validation failure the store and the file are left untouched.
    pub fn append(
        &mut self,
        date: &str,
        income: &str,
        expenses: &str,
    ) -> Result<Record, StoreError> {
        let record = validate_entry(Some(date), Some(income), Some(expenses))?;
        self.insert(record.clone())?;
        Ok(record)
    }

    /// Append an already-built record, re-sort and persist.
    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        check_amount(Field::Income, record.income)?;
        check_amount(Field::Expenses, record.expenses)?;

        tracing::info!(
            date = %record.date_label(),
            income = record.income,
            expenses = record.expenses,
            "appending record"
        );
        let mut records = self.records.clone();
        records.push(record);
        sort_records(&mut records);
        self.commit(records)
    }

    /// Remove every record dated `date` (time of day is ignored).
    ///
    /// Returns how many records were removed; zero is not an error. The file is
    /// rewritten either way.
    pub fn remove_by_date(&mut self, date: &str) -> Result<usize, StoreError> {
        let day = parse_calendar_day(date)?;
        self.remove_day(day)
    }

    /// Remove every record on the given calendar day and persist.
    pub fn remove_day(&mut self, day: NaiveDate) -> Result<usize, StoreError> {
        let kept: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.date != day)
            .cloned()
            .collect();
        let removed = self.records.len() - kept.len();

        self.commit(kept)?;
        tracing::info!(date = %day, removed, "removed records by date");
        Ok(removed)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// All records, ascending by date
    pub fn all_sorted(&self) -> &[Record] {
        &self.records
    }

    /// `(YYYY-MM-DD, expenses)` for every record, in date order
    pub fn expense_distribution(&self) -> Vec<(String, f64)> {
        self.records
            .iter()
            .map(|r| (r.date_label(), r.expenses))
            .collect()
    }

    pub fn totals(&self) -> Totals {
        let income: f64 = self.records.iter().map(|r| r.income).sum();
        let expenses: f64 = self.records.iter().map(|r| r.expenses).sum();
        Totals {
            count: self.records.len(),
            income,
            expenses,
            net: income - expenses,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn sort_records(records: &mut [Record]) {
    records.sort_by_key(|r| r.date);
}

fn write_records(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| StoreError::io(path, e))?;

    tracing::debug!(path = %path.display(), records = records.len(), "saved records");
    Ok(())
}

fn parse_row(row: &csv::StringRecord) -> Result<Record, String> {
    let cell = |idx: usize| row.get(idx).unwrap_or_default();

    let date = parse_calendar_day(cell(0)).map_err(|e| format!("Date: {}", e))?;
    let income = parse_amount(Field::Income, cell(1)).map_err(|e| format!("Income: {}", e))?;
    let expenses =
        parse_amount(Field::Expenses, cell(2)).map_err(|e| format!("Expenses: {}", e))?;

    Ok(Record::new(date, income, expenses))
}

fn check_amount(field: Field, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonNumericAmount {
            field,
            value: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

fn corrupt_from_csv(err: csv::Error) -> StoreError {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        return StoreError::Csv(err);
    }
    StoreError::Corrupt {
        line: err.position().map(|p| p.line()).unwrap_or_default(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Unique CSV path under the system temp dir, removed on drop
    struct TempCsv(PathBuf);

    impl TempCsv {
        fn new() -> Self {
            TempCsv(std::env::temp_dir().join(format!(
                "finance-dashboard-{}.csv",
                uuid::Uuid::new_v4()
            )))
        }

        fn with_contents(contents: &str) -> Self {
            let tmp = Self::new();
            fs::write(&tmp.0, contents).unwrap();
            tmp
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn assert_sorted(store: &RecordStore) {
        let dates: Vec<_> = store.all_sorted().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted, "records must stay sorted by date");
    }

    #[test]
    fn test_open_seeds_missing_file() {
        let tmp = TempCsv::new();
        let store = RecordStore::open(&tmp.0).unwrap();

        assert_eq!(store.len(), 3);
        assert!(tmp.0.exists(), "seed data should be written immediately");

        let contents = fs::read_to_string(&tmp.0).unwrap();
        assert!(contents.starts_with("Date,Income,Expenses\n"));
        assert!(contents.contains("2023-02-01"));

        let reloaded = RecordStore::load(&tmp.0).unwrap();
        assert_eq!(reloaded.all_sorted(), store.all_sorted());
    }

    #[test]
    fn test_append_then_remove_scenario() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();

        let added = store.append("2023-09-09", "5000", "3000").unwrap();
        assert_eq!(added, Record::new(day("2023-09-09"), 5000.0, 3000.0));
        assert_eq!(store.len(), 4);
        assert_eq!(store.all_sorted().last(), Some(&added));

        // The file is rewritten on every mutation
        let on_disk = RecordStore::load(&tmp.0).unwrap();
        assert_eq!(on_disk.all_sorted().last(), Some(&added));

        let removed = store.remove_by_date("2023-09-09").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 3);
        assert!(store.all_sorted().iter().all(|r| r.date != day("2023-09-09")));

        // Removing again is a no-op, not an error
        assert_eq!(store.remove_by_date("2023-09-09").unwrap(), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_append_keeps_order_and_insertion_ties() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();

        store.append("2022-12-31", "1", "1").unwrap();
        store.append("2023-02-01", "99", "11").unwrap();
        assert_sorted(&store);

        assert_eq!(store.all_sorted()[0].date, day("2022-12-31"));

        let same_day: Vec<_> = store
            .all_sorted()
            .iter()
            .filter(|r| r.date == day("2023-02-01"))
            .map(|r| r.income)
            .collect();
        assert_eq!(same_day, vec![2000.0, 99.0], "ties keep insertion order");
    }

    #[test]
    fn test_rejected_append_leaves_store_unchanged() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();
        let before = fs::read_to_string(&tmp.0).unwrap();

        let err = store.append("2023-09-09", "-5", "3").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NegativeAmount { field: Field::Income, .. })
        ));

        let err = store.append("09/09/2023", "5", "3").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::InvalidDateFormat(_))
        ));

        let err = store.append("2023-09-09", "5", "lots").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NonNumericAmount { .. })
        ));

        let err = store
            .insert(Record::new(day("2023-09-09"), 1.0, -0.5))
            .unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NegativeAmount { .. })
        ));

        assert_eq!(store.len(), 3);
        assert_eq!(fs::read_to_string(&tmp.0).unwrap(), before);
    }

    #[test]
    fn test_remove_deletes_every_match_only() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();
        store.append("2023-02-01", "10", "5").unwrap();
        store.append("2023-02-01", "20", "5").unwrap();

        let removed = store.remove_by_date("2023-02-01 00:00:00").unwrap();
        assert_eq!(removed, 3);
        assert_eq!(
            store.all_sorted().iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![day("2023-01-01"), day("2023-03-01")]
        );

        assert!(matches!(
            store.remove_by_date("not a date").unwrap_err().as_validation(),
            Some(ValidationError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_remove_without_match_still_rewrites_file() {
        let tmp = TempCsv::with_contents("Date,Income,Expenses\n2023-01-01,4000,2000\n");
        let mut store = RecordStore::open(&tmp.0).unwrap();

        assert_eq!(store.remove_by_date("2030-01-01").unwrap(), 0);

        // Rewritten in canonical form
        let contents = fs::read_to_string(&tmp.0).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("Date,Income,Expenses\n2023-01-01,"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();
        store.append("2023-01-15", "123.45", "0").unwrap();
        store.append("2021-06-30", "0", "17.5").unwrap();
        store.save().unwrap();

        let loaded = RecordStore::load(&tmp.0).unwrap();
        assert_eq!(loaded.all_sorted(), store.all_sorted());
        assert_eq!(loaded.path(), store.path());
    }

    #[test]
    fn test_load_sorts_unordered_file_with_timestamps() {
        let tmp = TempCsv::with_contents(
            "Date,Income,Expenses\n\
             2023-03-01 00:00:00,7000,3000\n\
             2023-01-01,4000.0,2000.0\n",
        );
        let store = RecordStore::load(&tmp.0).unwrap();

        assert_eq!(
            store.expense_distribution(),
            vec![
                ("2023-01-01".to_string(), 2000.0),
                ("2023-03-01".to_string(), 3000.0),
            ]
        );
    }

    #[test]
    fn test_load_reports_corrupt_lines() {
        let bad_header = TempCsv::with_contents("When,In,Out\n2023-01-01,1,1\n");
        assert!(matches!(
            RecordStore::load(&bad_header.0),
            Err(StoreError::Corrupt { line: 1, .. })
        ));

        let bad_value = TempCsv::with_contents(
            "Date,Income,Expenses\n2023-01-01,1,1\n2023-01-02,abc,1\n",
        );
        match RecordStore::load(&bad_value.0) {
            Err(StoreError::Corrupt { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.starts_with("Income:"), "{}", reason);
            }
            other => panic!("expected corrupt error, got {:?}", other),
        }

        let negative = TempCsv::with_contents("Date,Income,Expenses\n2023-01-01,1,-1\n");
        assert!(matches!(
            RecordStore::load(&negative.0),
            Err(StoreError::Corrupt { line: 2, .. })
        ));

        let short_row = TempCsv::with_contents("Date,Income,Expenses\n2023-01-01,1\n");
        assert!(matches!(
            RecordStore::load(&short_row.0),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let path = std::env::temp_dir()
            .join(format!("missing-{}", uuid::Uuid::new_v4()))
            .join("person_finance.csv");

        assert!(RecordStore::load(&path).is_err());
        assert!(RecordStore::open(&path).is_err());
    }

    #[test]
    fn test_failed_write_keeps_memory_in_sync_with_file() {
        let tmp = TempCsv::new();
        let mut store = RecordStore::open(&tmp.0).unwrap();

        // A directory in place of the data file makes every rewrite fail
        fs::remove_file(&tmp.0).unwrap();
        fs::create_dir(&tmp.0).unwrap();

        assert!(store.append("2023-09-09", "5000", "3000").is_err());
        assert_eq!(store.len(), 3);
        assert!(store.all_sorted().iter().all(|r| r.date != day("2023-09-09")));

        assert!(store.remove_by_date("2023-01-01").is_err());
        assert_eq!(store.len(), 3);
        assert_eq!(store.all_sorted()[0].date, day("2023-01-01"));

        fs::remove_dir(&tmp.0).unwrap();
    }

    #[test]
    fn test_totals() {
        let tmp = TempCsv::new();
        let store = RecordStore::open(&tmp.0).unwrap();

        let totals = store.totals();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.income, 13000.0);
        assert_eq!(totals.expenses, 6000.0);
        assert_eq!(totals.net, 7000.0);
    }
}
