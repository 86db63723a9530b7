//! Hiroba chat server node.
//!
//! Run a single node with the in-memory store:
//! ```not_rust
//! cargo run --bin hiroba-server
//! ```
//!
//! Run several nodes against one Redis:
//! ```not_rust
//! cargo run --bin hiroba-server -- --store redis --port 8080
//! cargo run --bin hiroba-server -- --store redis --port 8081
//! ```

use clap::Parser;
use hiroba_server::ServerConfig;
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = hiroba_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
