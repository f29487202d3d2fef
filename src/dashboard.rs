// 🧭 Dashboard - one user action in, one full view out
//
// Shared by the web server, the TUI and the one-shot CLI. Each action runs to
// completion (validate, mutate or reject, persist, rebuild the view) before the
// next one is accepted.

use crate::error::{Field, StoreError, ValidationError};
use crate::record::{parse_calendar_day, Record};
use crate::store::{RecordStore, Totals};
use crate::views::{build_charts, year_options, Charts};
use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary shown before any action
pub const INITIAL_SUMMARY: &str = "Enter data to see the summary";

/// Summary shown after a rejected action
pub const REJECTED_SUMMARY: &str = "Enter data to see the summary.";

// ============================================================================
// INPUT
// ============================================================================

/// An amount as typed: HTML number inputs post numbers, text fields post strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn as_text(&self) -> String {
        match self {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

/// Contents of the entry form when "Add" is pressed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub income: Option<RawAmount>,
    #[serde(default)]
    pub expenses: Option<RawAmount>,
}

impl EntryForm {
    pub fn new(date: &str, income: &str, expenses: &str) -> Self {
        EntryForm {
            date: Some(date.to_string()),
            income: Some(income.into()),
            expenses: Some(expenses.into()),
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// No action yet
    Idle,
    Accepted,
    Rejected,
}

/// Everything a front-end needs to re-render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: ActionStatus,
    pub summary: String,
    pub error: String,
    pub charts: Charts,
    pub totals: Totals,
    pub records: Vec<Record>,
    pub years: Vec<i32>,
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub struct Dashboard {
    store: RecordStore,
    status: ActionStatus,
    summary: String,
    error: String,
}

impl Dashboard {
    pub fn new(store: RecordStore) -> Self {
        Dashboard {
            store,
            status: ActionStatus::Idle,
            summary: INITIAL_SUMMARY.to_string(),
            error: String::new(),
        }
    }

    /// Open (or seed) the data file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = RecordStore::open(&path)
            .with_context(|| format!("Failed to open data file {}", path.display()))?;
        Ok(Self::new(store))
    }

    /// Handle "Add". Invalid input is reported in the view, not as an `Err`.
    pub fn add(&mut self, form: &EntryForm) -> Result<DashboardView> {
        let date = form.date.clone().unwrap_or_default();
        let income = form.income.as_ref().map(RawAmount::as_text).unwrap_or_default();
        let expenses = form.expenses.as_ref().map(RawAmount::as_text).unwrap_or_default();

        match self.store.append(&date, &income, &expenses) {
            Ok(record) => {
                self.accept(format!(
                    "Latest Entry - Date: {}, Income: ${}, Expenses: ${}",
                    record.date_label(),
                    record.income,
                    record.expenses
                ));
            }
            Err(StoreError::Invalid(err)) => self.reject(err),
            Err(err) => return Err(err).context("Failed to save new entry"),
        }

        Ok(self.view())
    }

    /// Handle "Remove": delete every entry on the given date.
    pub fn remove(&mut self, date: Option<&str>) -> Result<DashboardView> {
        let day = match date.map(str::trim).filter(|d| !d.is_empty()) {
            None => {
                self.reject(ValidationError::EmptyInput(Field::Date));
                return Ok(self.view());
            }
            Some(raw) => match parse_calendar_day(raw) {
                Ok(day) => day,
                Err(err) => {
                    self.reject(err);
                    return Ok(self.view());
                }
            },
        };

        let removed = self
            .store
            .remove_day(day)
            .context("Failed to save after removing entries")?;

        let summary = match removed {
            0 => format!("No entries dated {} to remove.", day),
            1 => format!("Removed 1 entry dated {}.", day),
            n => format!("Removed {} entries dated {}.", n, day),
        };
        self.accept(summary);

        Ok(self.view())
    }

    /// The current view, rebuilt from the store.
    pub fn view(&self) -> DashboardView {
        let records = self.store.all_sorted();
        DashboardView {
            status: self.status,
            summary: self.summary.clone(),
            error: self.error.clone(),
            charts: build_charts(records),
            totals: self.store.totals(),
            records: records.to_vec(),
            years: year_options(Local::now().date_naive()),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    fn accept(&mut self, summary: String) {
        tracing::info!(summary = summary.as_str(), "action accepted");
        self.status = ActionStatus::Accepted;
        self.summary = summary;
        self.error.clear();
    }

    fn reject(&mut self, err: ValidationError) {
        let message = err.to_string();
        tracing::warn!(error = message.as_str(), "action rejected");
        self.status = ActionStatus::Rejected;
        self.summary = REJECTED_SUMMARY.to_string();
        self.error = message;
    }
}
