//! Smart Companion server.
//!
//! Usage:
//! - `smart-companion` or `smart-companion serve` - run the HTTP API
//! - `smart-companion plan` - read one line of tasks from stdin and print plans

use std::io::{self, BufRead, Write};

use smart_companion::pipeline::PlanError;
use smart_companion::{api, Config, PlanContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => api::serve(config).await,
        Some("plan") => run_plan(&config).await,
        Some(other) => anyhow::bail!("Unknown command '{}'; expected 'serve' or 'plan'", other),
    }
}

/// Interactive one-shot planning on the terminal.
async fn run_plan(config: &Config) -> anyhow::Result<()> {
    let planner = PlanContext::from_config(config)?;

    print!(
        "What tasks do you want help starting right now?\n\
         (You can list more than one, separated by commas)\n> "
    );
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let records = match planner.generate_plan(&line).await {
        Ok(records) => records,
        Err(PlanError::InputRejected(_)) => {
            println!("Please enter simple actionable tasks.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for record in records {
        println!("\nTask: {}", record.task);
        for (i, step) in record.all_steps.iter().enumerate() {
            println!("{}. {}", i + 1, step);
        }
    }
    Ok(())
}
