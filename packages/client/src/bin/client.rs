//! Neighborly messaging CLI client with reconnection support.
//!
//! Connects to the messaging server, registers the given user and reads
//! commands from the prompt:
//!
//! - `@bob hello` sends "hello" to bob
//! - `/typing bob` tells bob you are typing
//! - `/quit` exits
//!
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin neighborly-client -- --user-id alice
//! cargo run --bin neighborly-client -- -u bob --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use neighborly_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "neighborly-client")]
#[command(about = "Direct messaging client for the Neighborly server", long_about = None)]
struct Args {
    /// User ID to register as
    #[arg(short = 'u', long)]
    user_id: String,

    /// WebSocket server URL
    #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = neighborly_client::run_client(args.url, args.user_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
