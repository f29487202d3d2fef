// Personal Finance Dashboard - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use finance_dashboard::config::{init_logging, ServerArgs};
use finance_dashboard::server::{router, AppState};
use finance_dashboard::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_logging(Some(&args.common.log_level))?;

    println!("🌐 Personal Finance Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load (or seed) the data file; failures here are fatal
    let dashboard = Dashboard::open(&args.common.data_file)?;
    println!(
        "✓ Data file opened: {:?} ({} records)",
        args.common.data_file,
        dashboard.store().len()
    );

    let app = router(AppState::new(dashboard));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    println!("\n🚀 Server running on http://{}", args.bind);
    println!("   API: http://{}/api/dashboard", args.bind);
    println!("\n   Press Ctrl+C to stop\n");
    tracing::info!(bind = %args.bind, "server listening");

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
