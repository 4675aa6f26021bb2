use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("[x] ticklist v", env!("CARGO_PKG_VERSION"), " - a task list you can serve"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// API base URL the TUI connects to
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    pub api_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the task API server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, default_value = "tasks.db")]
    pub db: String,
}
