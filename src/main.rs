use clap::Parser;
use ticklist::cli::commands::{Cli, Commands};
use ticklist::server;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = ticklist::tui::run(&cli.api_url) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve(args)) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "ticklist=info".into()),
                )
                .init();

            if let Err(e) = server::run_blocking(args.port, &args.db) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
