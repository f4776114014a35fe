//! Admission Wizard - line-driven console for the admission form
//!
//! Reads one command per line from stdin and prints the wizard state as
//! JSON after each command. Drafts are autosaved and resumed on the next run.

mod app;

use admission_wizard::WizardConfig;
use anyhow::Result;
use app::{App, Command, HELP};
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admission_wizard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = WizardConfig::load()?;
    let mut app = App::new(&config).await;

    let result = run_app(&mut app).await;
    app.shutdown().await;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(app: &mut App) -> Result<()> {
    println!("{HELP}");
    report(app).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(command) => app.handle_command(command).await,
            Err(usage) => app.status_message = Some(usage),
        }
        report(app).await?;

        if app.should_quit() {
            return Ok(());
        }
    }

    // stdin closed: behave like quit so the last edits are not lost
    app.handle_command(Command::Quit).await;
    Ok(())
}

async fn report(app: &mut App) -> Result<()> {
    for warning in app.take_warnings().await {
        eprintln!("warning: {warning}");
    }

    let view = app.view().await;
    println!("{}", serde_json::to_string_pretty(&view)?);
    println!("{}", view.headline());
    if let Some(message) = app.status_message.take() {
        println!("{message}");
    }
    Ok(())
}
