//! Neighborly messaging and presence server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin neighborly-server
//! cargo run --bin neighborly-server -- --host 0.0.0.0 --port 3000 --seed-users users.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use neighborly_server::{
    domain::ConnectionRegistry,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageRepository, InMemoryUserRepository},
        seed::load_seed_users,
    },
    ui::{AppState, Server},
};
use neighborly_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "neighborly-server")]
#[command(about = "Direct messaging and presence server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "NEIGHBORLY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// JSON file with the initial user records
    #[arg(long)]
    seed_users: Option<PathBuf>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Repositories (in-memory stores)
    let users = match &args.seed_users {
        Some(path) => {
            let users = load_seed_users(path).await?;
            tracing::info!("Loaded {} users from {}", users.len(), path.display());
            users
        }
        None => Vec::new(),
    };
    let user_repository = Arc::new(InMemoryUserRepository::with_users(users));
    let message_repository = Arc::new(InMemoryMessageRepository::new());

    // 2. Connection registry and MessagePusher (WebSocket implementation)
    let registry = Arc::new(ConnectionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    let state = AppState::new(
        registry,
        user_repository,
        message_repository,
        message_pusher,
        Arc::new(SystemClock),
    );

    // 4. Server
    Server::new(Arc::new(state)).run(args.host, args.port).await
}
