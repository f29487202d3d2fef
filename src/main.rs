use anyhow::Result;
use clap::Parser;
use finance_dashboard::config::{init_logging, Cli, Command, CommonArgs};
use finance_dashboard::{ActionStatus, Dashboard, DashboardView, EntryForm, RawAmount};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.clone().unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(&cli.common),
        Command::Add {
            date,
            income,
            expenses,
        } => {
            init_logging(Some(&cli.common.log_level))?;
            let mut dashboard = Dashboard::open(&cli.common.data_file)?;
            let form = EntryForm {
                date,
                income: income.map(RawAmount::Text),
                expenses: expenses.map(RawAmount::Text),
            };
            let view = dashboard.add(&form)?;
            report(&view)
        }
        Command::Remove { date } => {
            init_logging(Some(&cli.common.log_level))?;
            let mut dashboard = Dashboard::open(&cli.common.data_file)?;
            let view = dashboard.remove(date.as_deref())?;
            report(&view)
        }
        Command::List => {
            init_logging(Some(&cli.common.log_level))?;
            let dashboard = Dashboard::open(&cli.common.data_file)?;
            print_records(&dashboard.view());
            Ok(())
        }
    }
}

/// Print the outcome of a one-shot action; a rejected action exits with status 1.
fn report(view: &DashboardView) -> Result<()> {
    if view.status == ActionStatus::Rejected {
        eprintln!("❌ {}", view.error);
        std::process::exit(1);
    }

    println!("✓ {}", view.summary);
    print_records(view);
    Ok(())
}

fn print_records(view: &DashboardView) {
    println!("\n{:<12} {:>12} {:>12}", "Date", "Income", "Expenses");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for record in &view.records {
        println!(
            "{:<12} {:>12.2} {:>12.2}",
            record.date_label(),
            record.income,
            record.expenses
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<12} {:>12.2} {:>12.2}",
        format!("{} entries", view.totals.count),
        view.totals.income,
        view.totals.expenses
    );
}

#[cfg(feature = "tui")]
fn run_ui_mode(common: &CommonArgs) -> Result<()> {
    use finance_dashboard::ui;

    // The TUI owns the terminal: only log when RUST_LOG asks for it
    init_logging(None)?;

    println!("🖥️  Loading Personal Finance Dashboard...\n");
    let dashboard = Dashboard::open(&common.data_file)?;
    println!("✓ Loaded {} entries", dashboard.store().len());

    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_common: &CommonArgs) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin finance-server --features server");
    std::process::exit(1);
}
