use clap::{Parser, Subcommand};
use std::process;

use todos_cli::config::Config;

#[derive(Parser)]
#[command(name = "todos")]
#[command(about = "Todo CRUD service with partitioned list fetches")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on, overriding PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert many copies of one todo
    Seed {
        #[arg(long, default_value = "1000")]
        count: usize,
        #[arg(long, default_value = "Seeded todo")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    todos_cli::init_tracing();

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            todos_cli::run_server(config).await
        }
        Commands::Seed {
            count,
            title,
            description,
        } => todos_cli::seed(config, title, description, count).await,
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        process::exit(1);
    }
}
