use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use ridehail::{
    api::RideClient,
    cli::{Cli, Commands},
    config::Config,
    models::Identity,
    tui::App,
    views::TripCard,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "ridehail=info");
    }

    let config = Config::from_env()?;
    config.validate()?;
    init_logging(&config, cli.cli);

    let client = RideClient::from_config(&config)?;

    if cli.cli {
        return match cli.command {
            Some(command) => handle_cli_command(command, &client).await,
            None => {
                eprintln!("Error: CLI mode requires a command");
                std::process::exit(1);
            }
        };
    }

    let prefill = cli.prefill()?;
    run_tui(&config, client, prefill)
}

/// Log to the configured file; CLI mode also logs to stderr. The TUI owns
/// the terminal, so it only gets the file.
fn init_logging(config: &Config, to_stderr: bool) {
    let file_appender = tracing_appender::rolling::never(config.log_dir(), config.log_file_name());

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn run_tui(config: &Config, client: RideClient, prefill: Option<Identity>) -> Result<()> {
    info!("Starting ridehail TUI against {}", config.base_url);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, config.tick(), prefill);
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("ridehail TUI exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("ridehail TUI encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle CLI mode commands - print output and exit
async fn handle_cli_command(command: Commands, client: &RideClient) -> Result<()> {
    let identity = command.identity()?;

    match command {
        Commands::Trips { .. } => {
            let trips = client
                .list_trips(&identity)
                .await
                .with_context(|| format!("Could not list trips for {}", identity.phone_number))?;

            if trips.is_empty() {
                println!("No trips found for {} ({})", identity.phone_number, identity.role);
                return Ok(());
            }

            println!("Found {} trips for {} ({})", trips.len(), identity.phone_number, identity.role);
            println!("{}", "-".repeat(60));
            for trip in &trips {
                let card = TripCard {
                    key: trip.key(),
                    role: identity.role,
                    trip,
                };
                println!("{}", card.title());
                for line in card.lines() {
                    println!("  {}", line);
                }
                println!();
            }
        }
        Commands::Profile { .. } => {
            let profile = client
                .fetch_profile(&identity)
                .await
                .with_context(|| format!("Could not fetch profile for {}", identity.phone_number))?;

            let mut keys: Vec<&String> = profile.keys().collect();
            keys.sort();
            for key in keys {
                if key == "password" {
                    continue;
                }
                println!("{:<12} {}", key, profile[key.as_str()]);
            }
        }
    }

    Ok(())
}
