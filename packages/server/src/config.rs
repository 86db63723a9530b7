//! Server configuration (command line flags and `HIROBA_*` environment variables).

use clap::{Parser, ValueEnum};

/// Shared store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Process-local store; only useful for a single node or tests
    Memory,
    /// Redis, shared by every node
    Redis,
}

/// Hiroba chat server node
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "HIROBA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Shared store backend
    #[arg(long, env = "HIROBA_STORE", value_enum, default_value_t = StoreBackend::Memory)]
    pub store: StoreBackend,

    /// Redis URL, used with `--store redis`
    #[arg(long, env = "HIROBA_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Node identifier shown in logs (defaults to `$HOSTNAME:port`)
    #[arg(long, env = "HIROBA_NODE_ID")]
    pub node_id: Option<String>,

    /// Default log level when `RUST_LOG` is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured node id, or `hostname:port`
    pub fn resolve_node_id(&self, port: u16) -> String {
        if let Some(node_id) = &self.node_id {
            return node_id.clone();
        }
        let hostname = std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string());
        format!("{hostname}:{port}")
    }
}
