// 🧾 Record - one income/expense entry and the rules for accepting it
//
// Input arrives as raw text from a form field or a CLI flag. Everything that
// turns text into a `Record` lives here so every front-end rejects the same
// things with the same messages.

use crate::error::{Field, ValidationError};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Canonical on-disk and display format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// RECORD
// ============================================================================

/// One dated income/expense entry.
///
/// Invariants (enforced by [`validate_entry`] and by the store's loader):
/// `income >= 0`, `expenses >= 0`, both finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Income")]
    pub income: f64,

    #[serde(rename = "Expenses")]
    pub expenses: f64,
}

impl Record {
    pub fn new(date: NaiveDate, income: f64, expenses: f64) -> Self {
        Record {
            date,
            income,
            expenses,
        }
    }

    /// Date rendered as `YYYY-MM-DD`
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Income minus expenses for this entry
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyInput(Field::Date));
    }

    if !has_date_shape(text) {
        return Err(ValidationError::InvalidDateFormat(text.to_string()));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat(text.to_string()))
}

/// Parse a date that may carry a time-of-day suffix and keep only the calendar day.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fff]]` and the `T`-separated form.
pub fn parse_calendar_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    let text = raw.trim();
    if text.len() <= 10 {
        return parse_date(text);
    }

    let invalid = || ValidationError::InvalidDateFormat(text.to_string());

    if !text.is_char_boundary(10) {
        return Err(invalid());
    }
    let (day, rest) = text.split_at(10);
    let time = rest
        .strip_prefix(' ')
        .or_else(|| rest.strip_prefix('T'))
        .ok_or_else(invalid)?;

    let time_ok = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"]
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time, fmt).is_ok());
    if !time_ok {
        return Err(invalid());
    }

    parse_date(day).map_err(|_| invalid())
}

/// Parse a non-negative, finite amount for `field`.
pub fn parse_amount(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyInput(field));
    }

    let value: f64 = text
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::NonNumericAmount {
            field,
            value: text.to_string(),
        })?;

    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }

    Ok(value)
}

/// Turn raw form input into a record, or report the first violation found.
///
/// Fields are checked in form order: date, income, expenses.
pub fn validate_entry(
    date: Option<&str>,
    income: Option<&str>,
    expenses: Option<&str>,
) -> Result<Record, ValidationError> {
    let date = parse_date(date.unwrap_or_default())?;
    let income = parse_amount(Field::Income, income.unwrap_or_default())?;
    let expenses = parse_amount(Field::Expenses, expenses.unwrap_or_default())?;

    Ok(Record::new(date, income, expenses))
}

fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_round_trips_label() {
        let date = parse_date("2023-01-03").unwrap();
        assert_eq!(date, day(2023, 1, 3));
        assert_eq!(Record::new(date, 0.0, 0.0).date_label(), "2023-01-03");
    }

    #[test]
    fn test_parse_date_rejects_other_shapes() {
        for bad in ["2023/01/03", "03-01-2023", "2023-1-3", "2023-02-30", "yesterday"] {
            assert!(
                matches!(parse_date(bad), Err(ValidationError::InvalidDateFormat(_))),
                "{} should be rejected",
                bad
            );
        }
        assert_eq!(
            parse_date("   "),
            Err(ValidationError::EmptyInput(Field::Date))
        );
    }

    #[test]
    fn test_calendar_day_ignores_time_of_day() {
        assert_eq!(parse_calendar_day("2023-09-09").unwrap(), day(2023, 9, 9));
        assert_eq!(
            parse_calendar_day("2023-09-09 00:00:00").unwrap(),
            day(2023, 9, 9)
        );
        assert_eq!(
            parse_calendar_day("2023-09-09T17:45:12.250").unwrap(),
            day(2023, 9, 9)
        );
        assert!(parse_calendar_day("2023-09-09 noon").is_err());
        assert!(parse_calendar_day("2023-09-09X10:00").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Field::Income, " 5000 ").unwrap(), 5000.0);
        assert_eq!(parse_amount(Field::Income, "12.5").unwrap(), 12.5);
        assert_eq!(parse_amount(Field::Income, "0").unwrap(), 0.0);

        assert_eq!(
            parse_amount(Field::Income, ""),
            Err(ValidationError::EmptyInput(Field::Income))
        );
        assert!(matches!(
            parse_amount(Field::Expenses, "ten"),
            Err(ValidationError::NonNumericAmount { field: Field::Expenses, .. })
        ));
        assert!(matches!(
            parse_amount(Field::Expenses, "NaN"),
            Err(ValidationError::NonNumericAmount { .. })
        ));
        assert!(matches!(
            parse_amount(Field::Income, "inf"),
            Err(ValidationError::NonNumericAmount { .. })
        ));
        assert!(matches!(
            parse_amount(Field::Income, "-1"),
            Err(ValidationError::NegativeAmount { field: Field::Income, .. })
        ));
    }

    #[test]
    fn test_validate_entry_reports_first_violation() {
        let ok = validate_entry(Some("2023-09-09"), Some("5000"), Some("3000")).unwrap();
        assert_eq!(ok, Record::new(day(2023, 9, 9), 5000.0, 3000.0));
        assert_eq!(ok.net(), 2000.0);

        assert_eq!(
            validate_entry(None, Some("1"), Some("1")),
            Err(ValidationError::EmptyInput(Field::Date))
        );
        assert!(matches!(
            validate_entry(Some("bad"), Some("x"), Some("-1")),
            Err(ValidationError::InvalidDateFormat(_))
        ));
        assert_eq!(
            validate_entry(Some("2023-09-09"), Some("1"), None),
            Err(ValidationError::EmptyInput(Field::Expenses))
        );
        assert!(matches!(
            validate_entry(Some("2023-09-09"), Some("1"), Some("-3")),
            Err(ValidationError::NegativeAmount { field: Field::Expenses, .. })
        ));
    }
}
