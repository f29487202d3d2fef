// 📊 Views - chart payloads derived from the current records
//
// Pure functions: the same records always produce the same payloads. The JSON
// shape follows Plotly's `{data: [...], layout: {...}}` figure format so the web
// page can hand it straight to the charting library; the TUI reads the same
// series.

use crate::record::Record;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// First year offered by the year picker
pub const FIRST_YEAR: i32 = 2020;

pub const INCOME_EXPENSE_TITLE: &str = "Monthly Income vs Expenses";
pub const DISTRIBUTION_TITLE: &str = "Expense Distribution";
pub const TREND_TITLE: &str = "Income and Expenses Over Time";

// ============================================================================
// FIGURE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
}

/// One series of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar {
        name: String,
        x: Vec<String>,
        y: Vec<f64>,
    },
    Pie {
        name: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    /// Line chart; Plotly draws lines as scatter traces with `mode: "lines"`
    Scatter {
        name: String,
        mode: String,
        x: Vec<String>,
        y: Vec<f64>,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Bar { name, .. } | Trace::Pie { name, .. } | Trace::Scatter { name, .. } => name,
        }
    }

    /// Numeric values of the series (`y` for bars/lines, `values` for pies)
    pub fn values(&self) -> &[f64] {
        match self {
            Trace::Bar { y, .. } | Trace::Scatter { y, .. } => y,
            Trace::Pie { values, .. } => values,
        }
    }

    /// Category labels of the series (`x` for bars/lines, `labels` for pies)
    pub fn labels(&self) -> &[String] {
        match self {
            Trace::Bar { x, .. } | Trace::Scatter { x, .. } => x,
            Trace::Pie { labels, .. } => labels,
        }
    }
}

/// The three dashboard charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub income_expense: Figure,
    pub expense_distribution: Figure,
    pub trend: Figure,
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Build all three charts from records already sorted by date.
pub fn build_charts(records: &[Record]) -> Charts {
    Charts {
        income_expense: income_expense_bars(records),
        expense_distribution: expense_distribution_pie(records),
        trend: income_expense_trend(records),
    }
}

/// Grouped bars: income and expenses per date
pub fn income_expense_bars(records: &[Record]) -> Figure {
    let x = date_labels(records);
    Figure {
        data: vec![
            Trace::Bar {
                name: "Income".to_string(),
                x: x.clone(),
                y: records.iter().map(|r| r.income).collect(),
            },
            Trace::Bar {
                name: "Expenses".to_string(),
                x,
                y: records.iter().map(|r| r.expenses).collect(),
            },
        ],
        layout: Layout {
            title: INCOME_EXPENSE_TITLE.to_string(),
        },
    }
}

/// Pie: share of expenses by date
pub fn expense_distribution_pie(records: &[Record]) -> Figure {
    Figure {
        data: vec![Trace::Pie {
            name: "Expenses".to_string(),
            labels: date_labels(records),
            values: records.iter().map(|r| r.expenses).collect(),
        }],
        layout: Layout {
            title: DISTRIBUTION_TITLE.to_string(),
        },
    }
}

/// Lines: income and expenses over time
pub fn income_expense_trend(records: &[Record]) -> Figure {
    let x = date_labels(records);
    let line = |name: &str, y: Vec<f64>, x: Vec<String>| Trace::Scatter {
        name: name.to_string(),
        mode: "lines+markers".to_string(),
        x,
        y,
    };

    Figure {
        data: vec![
            line("Income", records.iter().map(|r| r.income).collect(), x.clone()),
            line("Expenses", records.iter().map(|r| r.expenses).collect(), x),
        ],
        layout: Layout {
            title: TREND_TITLE.to_string(),
        },
    }
}

// ============================================================================
// YEAR PICKER
// ============================================================================

/// Years offered by the year picker: 2020 through the current year.
pub fn year_options(today: NaiveDate) -> Vec<i32> {
    (FIRST_YEAR..=today.year()).collect()
}

/// January 1st of `year`, where the date input jumps when a year is picked
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Share of each value in the total, in percent. All zeros when the total is zero.
pub fn percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

fn date_labels(records: &[Record]) -> Vec<String> {
    records.iter().map(Record::date_label).collect()
}
