// 🖥️ Terminal dashboard - entry form, messages and the three charts
//
// Key handling lives on `App` so it can be driven without a terminal.

use crate::dashboard::{Dashboard, DashboardView, EntryForm};
use crate::views::{percentages, year_start, Figure};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Charts,
    Ledger,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Charts => Page::Ledger,
            Page::Ledger => Page::Charts,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Charts => "Charts",
            Page::Ledger => "Ledger",
        }
    }
}

/// Form field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Date,
    Income,
    Expenses,
}

impl InputField {
    pub fn next(&self) -> Self {
        match self {
            InputField::Date => InputField::Income,
            InputField::Income => InputField::Expenses,
            InputField::Expenses => InputField::Date,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            InputField::Date => InputField::Expenses,
            InputField::Income => InputField::Date,
            InputField::Expenses => InputField::Income,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            InputField::Date => "Date (YYYY-MM-DD)",
            InputField::Income => "Income",
            InputField::Expenses => "Expenses",
        }
    }

    fn index(&self) -> usize {
        match self {
            InputField::Date => 0,
            InputField::Income => 1,
            InputField::Expenses => 2,
        }
    }
}

pub struct App {
    pub dashboard: Dashboard,
    pub view: DashboardView,
    pub inputs: [String; 3],
    pub focus: InputField,
    pub current_page: Page,
    pub state: TableState,
    pub year_index: Option<usize>,
    pub should_quit: bool,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let view = dashboard.view();

        let mut state = TableState::default();
        if !view.records.is_empty() {
            state.select(Some(0));
        }

        Self {
            dashboard,
            view,
            inputs: Default::default(),
            focus: InputField::Date,
            current_page: Page::Charts,
            state,
            year_index: None,
            should_quit: false,
        }
    }

    pub fn input(&self, field: InputField) -> &str {
        &self.inputs[field.index()]
    }

    pub fn form(&self) -> EntryForm {
        EntryForm::new(
            self.input(InputField::Date),
            self.input(InputField::Income),
            self.input(InputField::Expenses),
        )
    }

    /// "Add" with the current form contents
    pub fn submit_add(&mut self) -> Result<()> {
        let view = self.dashboard.add(&self.form())?;
        self.set_view(view);
        Ok(())
    }

    /// "Remove" every entry on the date in the form
    pub fn submit_remove(&mut self) -> Result<()> {
        let date = self.input(InputField::Date).to_string();
        let view = self.dashboard.remove(Some(&date))?;
        self.set_view(view);
        Ok(())
    }

    /// Step the year picker and jump the date field to January 1st of that year
    pub fn cycle_year(&mut self) {
        if self.view.years.is_empty() {
            return;
        }
        let next = match self.year_index {
            Some(i) if i + 1 < self.view.years.len() => i + 1,
            _ => 0,
        };
        self.year_index = Some(next);
        if let Some(date) = year_start(self.view.years[next]) {
            self.inputs[InputField::Date.index()] = date.to_string();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.submit_remove()?,
            KeyCode::Char('y') if ctrl => self.cycle_year(),
            KeyCode::Enter => self.submit_add()?,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::F(2) => self.current_page = self.current_page.next(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Backspace => {
                self.inputs[self.focus.index()].pop();
            }
            KeyCode::Char(c) if !ctrl => self.inputs[self.focus.index()].push(c),
            _ => {}
        }

        Ok(())
    }

    pub fn next(&mut self) {
        let len = self.view.records.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.view.records.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn set_view(&mut self, view: DashboardView) {
        let len = view.records.len();
        self.view = view;

        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(3), // Entry form
            Constraint::Length(4), // Summary + error
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_messages(f, chunks[2], app);

    match app.current_page {
        Page::Charts => render_charts(f, chunks[3], app),
        Page::Ledger => render_table(f, chunks[3], app),
    }

    render_status_bar(f, chunks[4]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let totals = app.view.totals;

    let mut spans = vec![Span::styled(
        "Personal Finance Dashboard",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for page in [Page::Charts, Page::Ledger] {
        spans.push(Span::raw(" │ "));
        let style = if page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Entries: {}", totals.count),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("↑ {:.2}", totals.income),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("↓ {:.2}", totals.expenses),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    for (i, field) in [InputField::Date, InputField::Income, InputField::Expenses]
        .into_iter()
        .enumerate()
    {
        let border = if field == app.focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(app.input(field).to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", field.title())),
        );
        f.render_widget(input, columns[i]);
    }
}

fn render_messages(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(app.view.summary.clone()),
        Line::from(Span::styled(
            app.view.error.clone(),
            Style::default().fg(Color::Red),
        )),
    ];

    let messages = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(messages, area);
}

fn render_charts(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let charts = &app.view.charts;
    render_bar_chart(f, rows[0], &charts.income_expense);
    render_distribution(f, bottom[0], &charts.expense_distribution);
    render_trend(f, bottom[1], &charts.trend);
}

fn render_bar_chart(f: &mut Frame, area: Rect, figure: &Figure) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", figure.layout.title));

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3);

    if let [income, expenses] = figure.data.as_slice() {
        let groups = income
            .labels()
            .iter()
            .zip(income.values().iter().zip(expenses.values()));

        for (label, (inc, exp)) in groups {
            let bars = [
                Bar::default()
                    .value(inc.round() as u64)
                    .text_value(format!("{:.0}", inc))
                    .style(Style::default().fg(Color::Green)),
                Bar::default()
                    .value(exp.round() as u64)
                    .text_value(format!("{:.0}", exp))
                    .style(Style::default().fg(Color::Red)),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(label.clone()))
                    .bars(&bars),
            );
        }
    }

    f.render_widget(chart, area);
}

fn render_distribution(f: &mut Frame, area: Rect, figure: &Figure) {
    let mut lines = Vec::new();

    if let Some(series) = figure.data.first() {
        let shares = percentages(series.values());
        for ((label, value), share) in series.labels().iter().zip(series.values()).zip(shares) {
            let width = (share / 5.0).round() as usize;
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", label)),
                Span::styled("█".repeat(width), Style::default().fg(Color::Magenta)),
                Span::raw(format!(" {:.1}% ({:.2})", share, value)),
            ]));
        }
    }

    let distribution = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", figure.layout.title)),
    );
    f.render_widget(distribution, area);
}

fn render_trend(f: &mut Frame, area: Rect, figure: &Figure) {
    let colors = [Color::Green, Color::Red];

    let points: Vec<Vec<(f64, f64)>> = figure
        .data
        .iter()
        .map(|trace| {
            trace
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets = figure
        .data
        .iter()
        .zip(&points)
        .zip(colors)
        .map(|((trace, data), color)| {
            Dataset::default()
                .name(trace.name().to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let labels = figure.data.first().map(|t| t.labels()).unwrap_or_default();
    let x_max = labels.len().saturating_sub(1).max(1) as f64;
    let y_max = points
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let x_labels = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        _ => vec![],
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", figure.layout.title)),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max * 1.1])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
        );

    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Income", "Expenses", "Net"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.view.records.iter().map(|record| {
        let net = record.net();
        let color = if net >= 0.0 { Color::Green } else { Color::Red };

        Row::new(vec![
            Cell::from(record.date_label()),
            Cell::from(format!("{:.2}", record.income)),
            Cell::from(format!("{:.2}", record.expenses)),
            Cell::from(format!("{:.2}", net)).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Entries "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let status = Paragraph::new(vec![Line::from(vec![
        Span::raw(" "),
        key("Tab"),
        Span::raw(" Field | "),
        key("Enter"),
        Span::raw(" Add | "),
        key("Ctrl-r"),
        Span::raw(" Remove date | "),
        key("Ctrl-y"),
        Span::raw(" Year | "),
        key("F2"),
        Span::raw(" Page | "),
        key("↑/↓"),
        Span::raw(" Nav | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status, area);
}
